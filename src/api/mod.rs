//! HTTP surface: REST/JSON endpoints wrapped in a common response envelope.

mod envelope;
mod routes;
mod views;

pub use envelope::ApiResponse;
pub use views::{
    MatchView, PairingView, RegistrationView, RoundView, StandingView, TournamentView,
};

use crate::models::ScoringRules;
use crate::store::TournamentStore;
use actix_web::{error::InternalError, web, HttpResponse};

/// Shared application state: the tournament store and the default scoring rules.
#[derive(Debug, Default)]
pub struct AppState {
    pub store: TournamentStore,
    pub scoring: ScoringRules,
}

impl AppState {
    pub fn new(scoring: ScoringRules) -> Self {
        Self {
            store: TournamentStore::new(),
            scoring,
        }
    }
}

/// Register every API route plus a JSON error handler that answers in the envelope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    let json = web::JsonConfig::default().error_handler(|err, _req| {
        let body = ApiResponse::<()>::failure("Invalid request body", Some(vec![err.to_string()]));
        InternalError::from_response(err, HttpResponse::BadRequest().json(body)).into()
    });
    cfg.app_data(json)
        .service(routes::api_health)
        .service(routes::api_list_tournaments)
        .service(routes::api_create_tournament)
        .service(routes::api_get_tournament)
        .service(routes::api_change_status)
        .service(routes::api_register)
        .service(routes::api_confirm_registration)
        .service(routes::api_record_payment)
        .service(routes::api_check_in)
        .service(routes::api_assign_seed)
        .service(routes::api_cancel_registration)
        .service(routes::api_start_tournament)
        .service(routes::api_list_matches)
        .service(routes::api_record_match_score)
        .service(routes::api_record_walkover)
        .service(routes::api_list_rounds)
        .service(routes::api_next_round)
        .service(routes::api_record_pairing_score)
        .service(routes::api_standings)
        .service(routes::api_standings_csv);
}
