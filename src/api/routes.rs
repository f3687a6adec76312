//! REST handlers under `/api`. Every write goes through [`crate::store::TournamentStore::transact`], so a
//! failed request leaves the tournament as it was.

use crate::api::envelope::{created, ok};
use crate::api::views::{standings_view, MatchView, RegistrationView, RoundView, TournamentView};
use crate::api::AppState;
use crate::export::standings_csv;
use crate::logic::{
    assign_seed, cancel_registration, change_status, check_in, confirm_registration,
    create_tournament, generate_next_round, record_match_score, record_pairing_score,
    record_payment, record_walkover, register, start_tournament, NewRegistration, ScoreReport,
};
use crate::models::{
    MatchId, NewTournament, PaymentStatus, RegistrationId, Side, TournamentError, TournamentId,
    TournamentStatus,
};
use actix_web::{
    delete, get, post, put,
    web::{Data, Json, Path},
    HttpResponse,
};
use chrono::Utc;
use serde::Deserialize;

type HandlerResult = Result<HttpResponse, TournamentError>;

#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

#[derive(Deserialize)]
struct RegistrationPath {
    id: TournamentId,
    registration_id: RegistrationId,
}

#[derive(Deserialize)]
struct MatchPath {
    id: TournamentId,
    match_id: MatchId,
}

#[derive(Deserialize)]
struct PairingPath {
    id: TournamentId,
    round: u32,
    pairing: usize,
}

#[derive(Deserialize)]
struct StatusBody {
    status: TournamentStatus,
}

#[derive(Deserialize)]
struct PaymentBody {
    payment_status: PaymentStatus,
}

#[derive(Deserialize)]
struct SeedBody {
    #[serde(default)]
    seed_number: Option<u32>,
}

#[derive(Deserialize)]
struct WalkoverBody {
    winner: Side,
}

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[get("/api/health")]
pub(super) async fn api_health() -> HttpResponse {
    ok(
        "Service is running",
        HealthResponse {
            ok: true,
            service: "beach-tournament-web",
        },
    )
}

#[get("/api/tournaments")]
pub(super) async fn api_list_tournaments(state: Data<AppState>) -> HandlerResult {
    let now = Utc::now();
    let views: Vec<TournamentView> = state
        .store
        .list()?
        .iter()
        .map(|t| TournamentView::new(t, now))
        .collect();
    Ok(ok("Tournaments retrieved", views))
}

/// Create a Draft tournament; scoring defaults to the server's configured rules.
#[post("/api/tournaments")]
pub(super) async fn api_create_tournament(state: Data<AppState>, body: Json<NewTournament>) -> HandlerResult {
    let now = Utc::now();
    let tournament = create_tournament(body.into_inner(), state.scoring, now)?;
    let view = TournamentView::new(&tournament, now);
    state.store.insert(tournament)?;
    Ok(created("Tournament created", view))
}

#[get("/api/tournaments/{id}")]
pub(super) async fn api_get_tournament(state: Data<AppState>, path: Path<TournamentPath>) -> HandlerResult {
    let tournament = state.store.get(path.id)?;
    Ok(ok("Tournament retrieved", TournamentView::new(&tournament, Utc::now())))
}

#[put("/api/tournaments/{id}/status")]
pub(super) async fn api_change_status(
    state: Data<AppState>,
    path: Path<TournamentPath>,
    body: Json<StatusBody>,
) -> HandlerResult {
    let now = Utc::now();
    let view = state.store.transact(path.id, |t| {
        change_status(t, body.status, now)?;
        Ok(TournamentView::new(t, now))
    })?;
    Ok(ok("Tournament status updated", view))
}

#[post("/api/tournaments/{id}/registrations")]
pub(super) async fn api_register(
    state: Data<AppState>,
    path: Path<TournamentPath>,
    body: Json<NewRegistration>,
) -> HandlerResult {
    let now = Utc::now();
    let view = state.store.transact(path.id, |t| {
        let id = register(t, body.into_inner(), now)?;
        t.registration(id).map(RegistrationView::from)
    })?;
    Ok(created("Registration created", view))
}

#[post("/api/tournaments/{id}/registrations/{registration_id}/confirm")]
pub(super) async fn api_confirm_registration(state: Data<AppState>, path: Path<RegistrationPath>) -> HandlerResult {
    let now = Utc::now();
    let view = state.store.transact(path.id, |t| {
        confirm_registration(t, path.registration_id, now)?;
        t.registration(path.registration_id).map(RegistrationView::from)
    })?;
    Ok(ok("Registration confirmed", view))
}

#[put("/api/tournaments/{id}/registrations/{registration_id}/payment")]
pub(super) async fn api_record_payment(
    state: Data<AppState>,
    path: Path<RegistrationPath>,
    body: Json<PaymentBody>,
) -> HandlerResult {
    let now = Utc::now();
    let view = state.store.transact(path.id, |t| {
        record_payment(t, path.registration_id, body.payment_status, now)?;
        t.registration(path.registration_id).map(RegistrationView::from)
    })?;
    Ok(ok("Payment status updated", view))
}

#[post("/api/tournaments/{id}/registrations/{registration_id}/check-in")]
pub(super) async fn api_check_in(state: Data<AppState>, path: Path<RegistrationPath>) -> HandlerResult {
    let now = Utc::now();
    let view = state.store.transact(path.id, |t| {
        check_in(t, path.registration_id, now)?;
        t.registration(path.registration_id).map(RegistrationView::from)
    })?;
    Ok(ok("Checked in", view))
}

#[put("/api/tournaments/{id}/registrations/{registration_id}/seed")]
pub(super) async fn api_assign_seed(
    state: Data<AppState>,
    path: Path<RegistrationPath>,
    body: Json<SeedBody>,
) -> HandlerResult {
    let now = Utc::now();
    let view = state.store.transact(path.id, |t| {
        assign_seed(t, path.registration_id, body.seed_number, now)?;
        t.registration(path.registration_id).map(RegistrationView::from)
    })?;
    Ok(ok("Seed updated", view))
}

#[delete("/api/tournaments/{id}/registrations/{registration_id}")]
pub(super) async fn api_cancel_registration(state: Data<AppState>, path: Path<RegistrationPath>) -> HandlerResult {
    let now = Utc::now();
    let view = state.store.transact(path.id, |t| {
        cancel_registration(t, path.registration_id, now)?;
        Ok(TournamentView::new(t, now))
    })?;
    Ok(ok("Registration cancelled", view))
}

/// Build the bracket (elimination formats) or round 1 (American) and start play.
#[post("/api/tournaments/{id}/start")]
pub(super) async fn api_start_tournament(state: Data<AppState>, path: Path<TournamentPath>) -> HandlerResult {
    let now = Utc::now();
    let view = state.store.transact(path.id, |t| {
        start_tournament(t, now, &mut rand::thread_rng())?;
        Ok(TournamentView::new(t, now))
    })?;
    Ok(ok("Tournament started", view))
}

#[get("/api/tournaments/{id}/matches")]
pub(super) async fn api_list_matches(state: Data<AppState>, path: Path<TournamentPath>) -> HandlerResult {
    let tournament = state.store.get(path.id)?;
    let bracket = tournament.bracket.as_ref().ok_or(TournamentError::NoBracket)?;
    let views: Vec<MatchView> = bracket.matches.iter().map(MatchView::from).collect();
    Ok(ok("Matches retrieved", views))
}

#[put("/api/tournaments/{id}/matches/{match_id}/score")]
pub(super) async fn api_record_match_score(
    state: Data<AppState>,
    path: Path<MatchPath>,
    body: Json<ScoreReport>,
) -> HandlerResult {
    let now = Utc::now();
    let view = state.store.transact(path.id, |t| {
        record_match_score(t, path.match_id, body.into_inner(), now)?;
        let bracket = t.bracket.as_ref().ok_or(TournamentError::NoBracket)?;
        bracket.get(path.match_id).map(MatchView::from)
    })?;
    Ok(ok("Match score recorded", view))
}

#[put("/api/tournaments/{id}/matches/{match_id}/walkover")]
pub(super) async fn api_record_walkover(
    state: Data<AppState>,
    path: Path<MatchPath>,
    body: Json<WalkoverBody>,
) -> HandlerResult {
    let now = Utc::now();
    let view = state.store.transact(path.id, |t| {
        record_walkover(t, path.match_id, body.winner, now)?;
        let bracket = t.bracket.as_ref().ok_or(TournamentError::NoBracket)?;
        bracket.get(path.match_id).map(MatchView::from)
    })?;
    Ok(ok("Walkover recorded", view))
}

#[get("/api/tournaments/{id}/rounds")]
pub(super) async fn api_list_rounds(state: Data<AppState>, path: Path<TournamentPath>) -> HandlerResult {
    let tournament = state.store.get(path.id)?;
    let views: Vec<RoundView> = tournament.rounds.iter().map(RoundView::from).collect();
    Ok(ok("Rounds retrieved", views))
}

/// Generate the next American round from the current standings.
#[post("/api/tournaments/{id}/rounds")]
pub(super) async fn api_next_round(state: Data<AppState>, path: Path<TournamentPath>) -> HandlerResult {
    let now = Utc::now();
    let view = state.store.transact(path.id, |t| {
        let number = generate_next_round(t, now, &mut rand::thread_rng())?;
        t.rounds
            .iter()
            .find(|r| r.number == number)
            .map(RoundView::from)
            .ok_or(TournamentError::RoundNotFound(number))
    })?;
    Ok(created("Round generated", view))
}

#[put("/api/tournaments/{id}/rounds/{round}/pairings/{pairing}/score")]
pub(super) async fn api_record_pairing_score(
    state: Data<AppState>,
    path: Path<PairingPath>,
    body: Json<ScoreReport>,
) -> HandlerResult {
    let now = Utc::now();
    let view = state.store.transact(path.id, |t| {
        record_pairing_score(t, path.round, path.pairing, body.into_inner(), now)?;
        t.rounds
            .iter()
            .find(|r| r.number == path.round)
            .map(RoundView::from)
            .ok_or(TournamentError::RoundNotFound(path.round))
    })?;
    Ok(ok("Pairing score recorded", view))
}

#[get("/api/tournaments/{id}/standings")]
pub(super) async fn api_standings(state: Data<AppState>, path: Path<TournamentPath>) -> HandlerResult {
    let tournament = state.store.get(path.id)?;
    Ok(ok("Standings retrieved", standings_view(&tournament)))
}

#[get("/api/tournaments/{id}/standings.csv")]
pub(super) async fn api_standings_csv(state: Data<AppState>, path: Path<TournamentPath>) -> HandlerResult {
    let tournament = state.store.get(path.id)?;
    let body = standings_csv(&tournament)?;
    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"standings-{}.csv\"", tournament.id),
        ))
        .body(body))
}
