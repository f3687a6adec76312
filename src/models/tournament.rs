//! Tournament, its format/type/status enums, and the creation request.

use crate::models::american::AmericanRound;
use crate::models::bracket::Bracket;
use crate::models::error::{TournamentError, TournamentResult};
use crate::models::player::ScoringRules;
use crate::models::registration::{Registration, RegistrationId};
use crate::models::standings::StandingsTable;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

pub const MIN_CAPACITY: u32 = 2;
pub const MAX_CAPACITY: u32 = 256;

/// Who plays: single players, fixed pairs, or rotating partners.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentType {
    Singles,
    Doubles,
    MixedDoubles,
    American,
}

/// How the field is played out.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentFormat {
    SingleElimination,
    DoubleElimination,
    RoundRobin,
    SwissSystem,
    American,
}

/// Lifecycle: Draft → OpenForRegistration → RegistrationClosed → InProgress → Completed,
/// with Cancelled reachable from any status that is not final.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentStatus {
    #[default]
    Draft,
    OpenForRegistration,
    RegistrationClosed,
    InProgress,
    Completed,
    Cancelled,
}

impl TournamentStatus {
    pub fn can_transition_to(self, next: TournamentStatus) -> bool {
        use TournamentStatus::*;
        match (self, next) {
            (Completed | Cancelled, _) => false,
            (_, Cancelled) => true,
            (Draft, OpenForRegistration) => true,
            (OpenForRegistration, RegistrationClosed) => true,
            // Reopen after closing early.
            (RegistrationClosed, OpenForRegistration) => true,
            (RegistrationClosed, InProgress) => true,
            (InProgress, Completed) => true,
            (Draft | OpenForRegistration | RegistrationClosed | InProgress, _) => false,
        }
    }
}

/// Request to create a tournament. Validated as a whole; every problem is reported.
#[derive(Clone, Debug, Deserialize)]
pub struct NewTournament {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub tournament_type: TournamentType,
    pub format: TournamentFormat,
    pub location: String,
    pub start_date: DateTime<Utc>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    pub registration_deadline: DateTime<Utc>,
    pub max_participants: u32,
    #[serde(default = "default_min_participants")]
    pub min_participants: u32,
    #[serde(default)]
    pub courts: Vec<String>,
    #[serde(default)]
    pub scoring: Option<ScoringRules>,
}

fn default_min_participants() -> u32 {
    MIN_CAPACITY
}

impl NewTournament {
    pub fn validate(&self) -> TournamentResult<()> {
        let mut errors = Vec::new();
        let name = self.name.trim();
        if name.is_empty() {
            errors.push("Tournament name is required".to_string());
        } else if name.chars().count() > 200 {
            errors.push("Name cannot exceed 200 characters".to_string());
        }
        if self.description.as_ref().is_some_and(|d| d.chars().count() > 2000) {
            errors.push("Description cannot exceed 2000 characters".to_string());
        }
        let location = self.location.trim();
        if location.is_empty() {
            errors.push("Location is required".to_string());
        } else if location.chars().count() > 300 {
            errors.push("Location cannot exceed 300 characters".to_string());
        }
        if !(MIN_CAPACITY..=MAX_CAPACITY).contains(&self.max_participants) {
            errors.push(format!(
                "Max participants must be between {MIN_CAPACITY} and {MAX_CAPACITY}"
            ));
        }
        if !(MIN_CAPACITY..=MAX_CAPACITY).contains(&self.min_participants) {
            errors.push(format!(
                "Min participants must be between {MIN_CAPACITY} and {MAX_CAPACITY}"
            ));
        }
        if self.min_participants > self.max_participants {
            errors.push("Min participants cannot exceed max participants".to_string());
        }
        if self.registration_deadline > self.start_date {
            errors.push("Registration deadline must be before the start date".to_string());
        }
        if self.end_date.is_some_and(|end| end < self.start_date) {
            errors.push("End date cannot be before the start date".to_string());
        }
        let american_type = self.tournament_type == TournamentType::American;
        let american_format = self.format == TournamentFormat::American;
        if american_type != american_format {
            errors.push("American tournaments use the American format, and only they do".to_string());
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(TournamentError::InvalidTournament(errors))
        }
    }
}

/// Full tournament state: registrations, bracket or rounds, standings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Tournament {
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
    /// Active registrations. Only changed under the tournament's lock.
    pub current_participants: u32,
    pub status: TournamentStatus,
    /// Court labels handed out to American pairings.
    pub courts: Vec<String>,
    pub scoring: ScoringRules,
    pub registrations: Vec<Registration>,
    /// Elimination formats, once started.
    pub bracket: Option<Bracket>,
    /// American format rounds, oldest first.
    pub rounds: Vec<AmericanRound>,
    pub standings: StandingsTable,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Tournament {
    /// Create a Draft tournament from a validated request.
    pub fn create(new: NewTournament, default_scoring: ScoringRules, now: DateTime<Utc>) -> TournamentResult<Self> {
        new.validate()?;
        Ok(Self {
            id: Uuid::new_v4(),
            name: new.name.trim().to_string(),
            description: new.description,
            tournament_type: new.tournament_type,
            format: new.format,
            location: new.location.trim().to_string(),
            start_date: new.start_date,
            end_date: new.end_date,
            registration_deadline: new.registration_deadline,
            max_participants: new.max_participants,
            min_participants: new.min_participants,
            current_participants: 0,
            status: TournamentStatus::Draft,
            courts: new.courts,
            scoring: new.scoring.unwrap_or(default_scoring),
            registrations: Vec::new(),
            bracket: None,
            rounds: Vec::new(),
            standings: StandingsTable::new(),
            created_at: now,
            updated_at: now,
        })
    }

    pub fn is_full(&self) -> bool {
        self.current_participants >= self.max_participants
    }

    pub fn is_registration_open(&self, now: DateTime<Utc>) -> bool {
        self.status == TournamentStatus::OpenForRegistration
            && now <= self.registration_deadline
            && !self.is_full()
    }

    pub fn days_until_start(&self, now: DateTime<Utc>) -> i64 {
        (self.start_date - now).num_days()
    }

    pub fn is_team_based(&self) -> bool {
        match self.tournament_type {
            TournamentType::Doubles | TournamentType::MixedDoubles | TournamentType::American => true,
            TournamentType::Singles => false,
        }
    }

    /// Registrations carry a fixed partner (doubles); American partners rotate instead.
    pub fn requires_partner(&self) -> bool {
        match self.tournament_type {
            TournamentType::Doubles | TournamentType::MixedDoubles => true,
            TournamentType::Singles | TournamentType::American => false,
        }
    }

    pub fn registration(&self, id: RegistrationId) -> TournamentResult<&Registration> {
        self.registrations
            .iter()
            .find(|r| r.id == id)
            .ok_or(TournamentError::RegistrationNotFound(id))
    }

    pub fn registration_mut(&mut self, id: RegistrationId) -> TournamentResult<&mut Registration> {
        self.registrations
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(TournamentError::RegistrationNotFound(id))
    }

    /// Move to `next` if the lifecycle allows it.
    pub fn transition(&mut self, next: TournamentStatus, now: DateTime<Utc>) -> TournamentResult<()> {
        if !self.status.can_transition_to(next) {
            return Err(TournamentError::InvalidTransition {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        self.updated_at = now;
        Ok(())
    }

    /// Fail unless the tournament is currently in `status`.
    pub fn require_status(&self, status: TournamentStatus) -> TournamentResult<()> {
        if self.status == status {
            Ok(())
        } else {
            Err(TournamentError::InvalidState(self.status))
        }
    }
}
