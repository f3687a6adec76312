//! Data structures for beach tournaments: registrations, brackets, American rounds, standings.

mod american;
mod bracket;
mod error;
mod game;
mod player;
mod registration;
mod standings;
mod tournament;

pub use american::{AmericanRound, Pairing, RoundStatus};
pub use bracket::Bracket;
pub use error::{ErrorKind, TournamentError, TournamentResult};
pub use game::{
    parse_set_scores, round_name, set_tally, GameMatch, MatchId, MatchStatus, SetScore, Side,
    FINAL_ROUND, QUARTERFINAL_ROUND, SEMIFINAL_ROUND,
};
pub use player::{PlayerId, PlayerResult, ScoringRules, Standing};
pub use registration::{PaymentStatus, Registration, RegistrationId, RegistrationStatus};
pub use standings::{ContestId, ContestOutcome, StandingsTable};
pub use tournament::{
    NewTournament, Tournament, TournamentFormat, TournamentId, TournamentStatus, TournamentType,
    MAX_CAPACITY, MIN_CAPACITY,
};
