//! Tournament lifecycle: creation, status changes, and start (bracket or first round).

use crate::logic::bracket::build_bracket;
use crate::logic::registration::seeded_entrants;
use crate::logic::rotation::generate_next_round;
use crate::models::{
    NewTournament, PlayerId, RegistrationId, ScoringRules, Tournament, TournamentError, TournamentFormat,
    TournamentResult, TournamentStatus,
};
use chrono::{DateTime, Utc};
use rand::Rng;

/// Create a Draft tournament. Scoring falls back to `default_scoring` when the request
/// carries none.
pub fn create_tournament(
    new: NewTournament,
    default_scoring: ScoringRules,
    now: DateTime<Utc>,
) -> TournamentResult<Tournament> {
    let tournament = Tournament::create(new, default_scoring, now)?;
    log::info!(
        "tournament {} created: {:?} {:?}, up to {} participants",
        tournament.id,
        tournament.tournament_type,
        tournament.format,
        tournament.max_participants
    );
    Ok(tournament)
}

/// Move the tournament to `status`. Starting goes through [`start_tournament`]; a bracket
/// completes only once its final is decided, an American tournament once its last round
/// is finished.
pub fn change_status(
    tournament: &mut Tournament,
    status: TournamentStatus,
    now: DateTime<Utc>,
) -> TournamentResult<()> {
    match status {
        TournamentStatus::InProgress => {
            return Err(TournamentError::InvalidTransition {
                from: tournament.status,
                to: status,
            })
        }
        TournamentStatus::Completed => {
            if let Some(bracket) = &tournament.bracket {
                if !bracket.final_match().is_some_and(|m| m.is_completed()) {
                    return Err(TournamentError::FinalUndecided);
                }
            }
            if let Some(last) = tournament.rounds.last() {
                if !last.is_completed() {
                    return Err(TournamentError::RoundInProgress(last.number));
                }
            }
        }
        TournamentStatus::Draft
        | TournamentStatus::OpenForRegistration
        | TournamentStatus::RegistrationClosed
        | TournamentStatus::Cancelled => {}
    }
    let from = tournament.status;
    tournament.transition(status, now)?;
    if status == TournamentStatus::Completed && tournament.end_date.is_none() {
        tournament.end_date = Some(now);
    }
    log::info!("tournament {}: {:?} -> {:?}", tournament.id, from, status);
    Ok(())
}

/// Start a tournament whose registration is closed: build and validate the bracket for
/// elimination formats, or generate the first round for the American format.
pub fn start_tournament<R: Rng + ?Sized>(
    tournament: &mut Tournament,
    now: DateTime<Utc>,
    rng: &mut R,
) -> TournamentResult<()> {
    if tournament.bracket.is_some() {
        return Err(TournamentError::BracketAlreadyGenerated);
    }
    if !tournament.status.can_transition_to(TournamentStatus::InProgress) {
        return Err(TournamentError::InvalidTransition {
            from: tournament.status,
            to: TournamentStatus::InProgress,
        });
    }
    match tournament.format {
        TournamentFormat::SingleElimination | TournamentFormat::DoubleElimination => {
            let accepted = seeded_entrants(tournament);
            let entrants: Vec<RegistrationId> = accepted.iter().map(|r| r.id).collect();
            let players: Vec<PlayerId> = accepted.iter().flat_map(|r| r.players()).collect();
            let bracket = build_bracket(&entrants, tournament.format, tournament.min_participants as usize)?;
            tournament.transition(TournamentStatus::InProgress, now)?;
            tournament.standings.seed_players(players, now);
            log::info!(
                "tournament {} started: {} entrants, {} matches",
                tournament.id,
                entrants.len(),
                bracket.matches.len()
            );
            tournament.bracket = Some(bracket);
        }
        TournamentFormat::American => {
            if !tournament.rounds.is_empty() {
                return Err(TournamentError::InvalidState(tournament.status));
            }
            let from = tournament.status;
            tournament.transition(TournamentStatus::InProgress, now)?;
            if let Err(e) = generate_next_round(tournament, now, rng) {
                tournament.status = from;
                return Err(e);
            }
            log::info!("tournament {} started with round 1", tournament.id);
        }
        TournamentFormat::RoundRobin | TournamentFormat::SwissSystem => {
            return Err(TournamentError::FormatNotSupported(tournament.format));
        }
    }
    tournament.updated_at = now;
    Ok(())
}
