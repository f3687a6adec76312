//! Tournament business logic: registration, bracket building, scoring, standings, rotation.

mod bracket;
mod lifecycle;
mod registration;
mod rotation;
mod scoring;
mod standings;

pub use bracket::{build_bracket, elimination_round_code, seed_positions};
pub use lifecycle::{change_status, create_tournament, start_tournament};
pub use registration::{
    assign_seed, cancel_registration, check_in, confirm_registration, record_payment, register,
    seeded_entrants, NewRegistration,
};
pub use rotation::{
    active_players, check_round, generate_next_round, plan_round, RotationHistory, RoundPlan,
};
pub use scoring::{record_match_score, record_pairing_score, record_walkover, ScoreReport};
pub use standings::{fold_contest, match_outcome, pairing_outcome, rebuild_standings};
