//! Errors raised by tournament operations.

use crate::models::game::MatchId;
use crate::models::player::PlayerId;
use crate::models::registration::RegistrationId;
use crate::models::tournament::{TournamentFormat, TournamentId, TournamentStatus};
use thiserror::Error;

/// How an error is reported at the request boundary.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// Bad input or an operation that does not apply; nothing was attempted.
    Validation,
    /// The request collides with the current state (already done, already running).
    Conflict,
    /// The data would break a structural invariant; refused before it is stored.
    DataIntegrity,
    NotFound,
    Internal,
}

/// Errors that can occur during tournament operations.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum TournamentError {
    #[error("Tournament not found")]
    TournamentNotFound(TournamentId),
    #[error("Invalid tournament")]
    InvalidTournament(Vec<String>),
    #[error("Cannot move tournament from {from:?} to {to:?}")]
    InvalidTransition {
        from: TournamentStatus,
        to: TournamentStatus,
    },
    #[error("Action not allowed while tournament is {0:?}")]
    InvalidState(TournamentStatus),

    #[error("Registration is not open")]
    RegistrationNotOpen,
    #[error("Tournament is full")]
    TournamentFull,
    #[error("Player is already registered")]
    DuplicateRegistration(PlayerId),
    #[error("A partner is required for this tournament type")]
    PartnerRequired,
    #[error("This tournament type does not take a partner")]
    PartnerNotAllowed,
    #[error("A player cannot partner themselves")]
    SamePlayerTwice,
    #[error("Registration not found")]
    RegistrationNotFound(RegistrationId),
    #[error("Registration has been cancelled")]
    RegistrationCancelled(RegistrationId),
    #[error("Seed {0} is already taken")]
    DuplicateSeed(u32),

    #[error("Need at least {minimum} participants to build a bracket (have {participants})")]
    InvalidBracketSize { participants: usize, minimum: usize },
    #[error("Format {0:?} does not use a bracket")]
    FormatNotSupported(TournamentFormat),
    #[error("Bracket has already been generated")]
    BracketAlreadyGenerated,
    #[error("Tournament has no bracket")]
    NoBracket,
    #[error("The final has not been decided yet")]
    FinalUndecided,

    #[error("Match not found")]
    MatchNotFound(MatchId),
    #[error("Match {0} does not have both participants yet")]
    MatchNotReady(MatchId),
    #[error("Match {0} already has a result")]
    MatchAlreadyCompleted(MatchId),
    #[error("There is no result to correct")]
    NothingToCorrect,
    #[error("Match {0} cannot be corrected: the next match is already under way")]
    DownstreamMatchStarted(MatchId),
    #[error("Elimination matches cannot end in a tie")]
    TiedScore,
    #[error("Invalid set score: {0}")]
    InvalidSetScores(String),

    #[error("Need at least {required} players for a round (have {available})")]
    NotEnoughPlayers { required: usize, available: usize },
    #[error("Round {0} is still being played")]
    RoundInProgress(u32),
    #[error("Round {0} not found")]
    RoundNotFound(u32),
    #[error("Pairing {pairing} not found in round {round}")]
    PairingNotFound { round: u32, pairing: usize },
    #[error("Pairing {pairing} of round {round} already has a result")]
    PairingAlreadyCompleted { round: u32, pairing: usize },
    #[error("A different result is already recorded for this contest")]
    ResultConflict,

    #[error("Match {from} points to missing match {to}")]
    BrokenLink { from: MatchId, to: MatchId },
    #[error("Match {from} points to match {to} which is not in a later round")]
    NonForwardLink { from: MatchId, to: MatchId },
    #[error("Bracket must have exactly one final (found {0})")]
    SinkCount(usize),
    #[error("Match {match_id} is fed by {feeds} sources instead of 2")]
    UnbalancedFeeds { match_id: MatchId, feeds: usize },
    #[error("Player appears more than once in a round")]
    PlayerRepeatedInRound(PlayerId),

    #[error("Storage lock poisoned")]
    LockPoisoned,
    #[error("Export failed: {0}")]
    Export(String),
}

impl TournamentError {
    pub fn kind(&self) -> ErrorKind {
        use TournamentError::*;
        match self {
            TournamentNotFound(_)
            | RegistrationNotFound(_)
            | MatchNotFound(_)
            | RoundNotFound(_)
            | PairingNotFound { .. } => ErrorKind::NotFound,
            InvalidTournament(_)
            | RegistrationNotOpen
            | TournamentFull
            | PartnerRequired
            | PartnerNotAllowed
            | SamePlayerTwice
            | RegistrationCancelled(_)
            | DuplicateSeed(_)
            | InvalidBracketSize { .. }
            | FormatNotSupported(_)
            | NoBracket
            | MatchNotReady(_)
            | NothingToCorrect
            | TiedScore
            | InvalidSetScores(_)
            | NotEnoughPlayers { .. } => ErrorKind::Validation,
            InvalidTransition { .. }
            | InvalidState(_)
            | DuplicateRegistration(_)
            | BracketAlreadyGenerated
            | FinalUndecided
            | MatchAlreadyCompleted(_)
            | DownstreamMatchStarted(_)
            | RoundInProgress(_)
            | PairingAlreadyCompleted { .. }
            | ResultConflict => ErrorKind::Conflict,
            BrokenLink { .. }
            | NonForwardLink { .. }
            | SinkCount(_)
            | UnbalancedFeeds { .. }
            | PlayerRepeatedInRound(_) => ErrorKind::DataIntegrity,
            LockPoisoned | Export(_) => ErrorKind::Internal,
        }
    }

    /// Field-level messages for the response envelope, when there are any.
    pub fn details(&self) -> Option<Vec<String>> {
        match self {
            TournamentError::InvalidTournament(errors) => Some(errors.clone()),
            _ => None,
        }
    }
}

/// Result type for tournament operations.
pub type TournamentResult<T> = Result<T, TournamentError>;
