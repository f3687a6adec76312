//! Beach tournament web app: library with models, business logic, store and HTTP API.

pub mod api;
pub mod config;
pub mod export;
pub mod logic;
pub mod models;
pub mod store;

pub use config::AppConfig;
pub use export::standings_csv;
pub use logic::{
    assign_seed, build_bracket, cancel_registration, change_status, check_in, confirm_registration,
    create_tournament, generate_next_round, rebuild_standings, record_match_score,
    record_pairing_score, record_payment, record_walkover, register, seeded_entrants,
    start_tournament, NewRegistration, ScoreReport,
};
pub use models::{
    Bracket, GameMatch, MatchId, PlayerId, RegistrationId, ScoringRules, Standing, Tournament,
    TournamentError, TournamentFormat, TournamentId, TournamentResult, TournamentStatus,
    TournamentType,
};
pub use store::TournamentStore;
