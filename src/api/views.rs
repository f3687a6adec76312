//! Response shapes: stored records plus the fields derived from them.

use crate::models::{
    AmericanRound, GameMatch, Pairing, PlayerId, Registration, RoundStatus, ScoringRules, Side,
    Standing, Tournament, TournamentFormat, TournamentId, TournamentStatus, TournamentType,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct RegistrationView {
    #[serde(flatten)]
    pub registration: Registration,
    pub is_team: bool,
    pub is_ready_to_play: bool,
}

impl From<&Registration> for RegistrationView {
    fn from(registration: &Registration) -> Self {
        Self {
            registration: registration.clone(),
            is_team: registration.is_team(),
            is_ready_to_play: registration.is_ready_to_play(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TournamentView {
    pub id: TournamentId,
    pub name: String,
    pub description: Option<String>,
    pub tournament_type: TournamentType,
    pub format: TournamentFormat,
    pub location: String,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub registration_deadline: DateTime<Utc>,
    pub max_participants: u32,
    pub min_participants: u32,
    pub current_participants: u32,
    pub status: TournamentStatus,
    pub courts: Vec<String>,
    pub scoring: ScoringRules,
    pub is_full: bool,
    pub is_registration_open: bool,
    pub days_until_start: i64,
    pub is_team_based: bool,
    pub has_bracket: bool,
    pub rounds_played: usize,
    pub registrations: Vec<RegistrationView>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TournamentView {
    pub fn new(t: &Tournament, now: DateTime<Utc>) -> Self {
        Self {
            id: t.id,
            name: t.name.clone(),
            description: t.description.clone(),
            tournament_type: t.tournament_type,
            format: t.format,
            location: t.location.clone(),
            start_date: t.start_date,
            end_date: t.end_date,
            registration_deadline: t.registration_deadline,
            max_participants: t.max_participants,
            min_participants: t.min_participants,
            current_participants: t.current_participants,
            status: t.status,
            courts: t.courts.clone(),
            scoring: t.scoring,
            is_full: t.is_full(),
            is_registration_open: t.is_registration_open(now),
            days_until_start: t.days_until_start(now),
            is_team_based: t.is_team_based(),
            has_bracket: t.bracket.is_some(),
            rounds_played: t.rounds.len(),
            registrations: t.registrations.iter().map(RegistrationView::from).collect(),
            created_at: t.created_at,
            updated_at: t.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MatchView {
    #[serde(flatten)]
    pub game: GameMatch,
    pub round_name: String,
    pub duration_minutes: Option<i64>,
    pub is_completed: bool,
    pub is_ready: bool,
}

impl From<&GameMatch> for MatchView {
    fn from(m: &GameMatch) -> Self {
        Self {
            game: m.clone(),
            round_name: m.round_name(),
            duration_minutes: m.duration_minutes(),
            is_completed: m.is_completed(),
            is_ready: m.is_ready(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StandingView {
    pub rank: usize,
    #[serde(flatten)]
    pub standing: Standing,
    pub matches_played: u32,
    pub win_rate: f64,
    pub set_difference: i64,
}

impl StandingView {
    pub fn new(rank: usize, standing: &Standing) -> Self {
        Self {
            rank,
            standing: standing.clone(),
            matches_played: standing.matches_played(),
            win_rate: standing.win_rate(),
            set_difference: standing.set_difference(),
        }
    }
}

/// Ranked table, best first.
pub fn standings_view(t: &Tournament) -> Vec<StandingView> {
    t.standings
        .ranked()
        .into_iter()
        .enumerate()
        .map(|(i, s)| StandingView::new(i + 1, s))
        .collect()
}

#[derive(Debug, Serialize)]
pub struct PairingView {
    pub index: usize,
    #[serde(flatten)]
    pub pairing: Pairing,
    pub winner: Option<Side>,
}

#[derive(Debug, Serialize)]
pub struct RoundView {
    pub number: u32,
    pub status: RoundStatus,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub pairings: Vec<PairingView>,
    pub sitting_out: Vec<PlayerId>,
}

impl From<&AmericanRound> for RoundView {
    fn from(round: &AmericanRound) -> Self {
        Self {
            number: round.number,
            status: round.status,
            start_time: round.start_time,
            end_time: round.end_time,
            created_at: round.created_at,
            pairings: round
                .pairings
                .iter()
                .enumerate()
                .map(|(index, p)| PairingView {
                    index,
                    pairing: p.clone(),
                    winner: p.winner(),
                })
                .collect(),
            sitting_out: round.sitting_out.clone(),
        }
    }
}
