//! Bracket match, scores and the side of a contest.

use crate::models::error::TournamentError;
use crate::models::registration::RegistrationId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Position of a match in its tournament's bracket arena. Bracket links are arena indices.
pub type MatchId = usize;

/// Round code of the final.
pub const FINAL_ROUND: i32 = -1;
/// Round code of the semifinals.
pub const SEMIFINAL_ROUND: i32 = -2;
/// Round code of the quarterfinals.
pub const QUARTERFINAL_ROUND: i32 = -3;

/// Which side of a match or pairing (team 1 / team A, team 2 / team B).
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    A,
    B,
}

impl Side {
    pub fn other(self) -> Self {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }

    /// Winner by strictly greater score; equal scores have no winner.
    pub fn from_scores(a: u32, b: u32) -> Option<Self> {
        match a.cmp(&b) {
            std::cmp::Ordering::Greater => Some(Side::A),
            std::cmp::Ordering::Less => Some(Side::B),
            std::cmp::Ordering::Equal => None,
        }
    }
}

/// Match (and pairing) status.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    #[default]
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
    Walkover,
}

impl MatchStatus {
    /// A result has been entered (played out or awarded).
    pub fn is_finished(self) -> bool {
        match self {
            MatchStatus::Completed | MatchStatus::Walkover => true,
            MatchStatus::Scheduled | MatchStatus::InProgress | MatchStatus::Cancelled => false,
        }
    }
}

/// Games won by each side in one set.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SetScore {
    pub a: u32,
    pub b: u32,
}

impl SetScore {
    pub fn winner(&self) -> Option<Side> {
        Side::from_scores(self.a, self.b)
    }
}

impl fmt::Display for SetScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.a, self.b)
    }
}

impl FromStr for SetScore {
    type Err = TournamentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || TournamentError::InvalidSetScores(s.trim().to_string());
        let (a, b) = s.trim().split_once('-').ok_or_else(invalid)?;
        Ok(Self {
            a: a.trim().parse().map_err(|_| invalid())?,
            b: b.trim().parse().map_err(|_| invalid())?,
        })
    }
}

/// Parse set-by-set scores written as `"6-3, 4-6, 7-5"`. Blank input means no sets.
pub fn parse_set_scores(text: &str) -> Result<Vec<SetScore>, TournamentError> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::parse)
        .collect()
}

/// Sets won by (A, B). Without set-by-set scores the final score counts as a single set.
pub fn set_tally(sets: &[SetScore], final_score: Option<(u32, u32)>) -> (u32, u32) {
    if sets.is_empty() {
        return match final_score.and_then(|(a, b)| Side::from_scores(a, b)) {
            Some(Side::A) => (1, 0),
            Some(Side::B) => (0, 1),
            None => (0, 0),
        };
    }
    sets.iter().fold((0, 0), |(a, b), set| match set.winner() {
        Some(Side::A) => (a + 1, b),
        Some(Side::B) => (a, b + 1),
        None => (a, b),
    })
}

/// Display name for a round code: -1 Final, -2 Semifinal, -3 Quarterfinal, else "Round {n}".
pub fn round_name(round: i32) -> String {
    match round {
        FINAL_ROUND => "Final".to_string(),
        SEMIFINAL_ROUND => "Semifinal".to_string(),
        QUARTERFINAL_ROUND => "Quarterfinal".to_string(),
        n => format!("Round {n}"),
    }
}

/// A single contest between two registrations within a bracket.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GameMatch {
    pub id: MatchId,
    /// 1-based number shown to players.
    pub match_number: u32,
    /// Ascending ordinal, or a named code for the last rounds (see [`round_name`]).
    pub round: i32,
    pub court: Option<String>,
    pub scheduled_time: Option<DateTime<Utc>>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    /// None until seeded or advanced into.
    pub team_1: Option<RegistrationId>,
    pub team_2: Option<RegistrationId>,
    pub winner: Option<RegistrationId>,
    pub status: MatchStatus,
    pub team_1_score: Option<u32>,
    pub team_2_score: Option<u32>,
    pub set_scores: Vec<SetScore>,
    pub notes: Option<String>,
    /// Where the winner goes. None for the final.
    pub next_match: Option<MatchId>,
    /// Where the loser goes (double elimination winners' bracket only).
    pub next_match_loser: Option<MatchId>,
    pub is_loser_bracket: bool,
}

impl GameMatch {
    pub fn new(id: MatchId, round: i32, is_loser_bracket: bool) -> Self {
        Self {
            id,
            match_number: id as u32 + 1,
            round,
            court: None,
            scheduled_time: None,
            start_time: None,
            end_time: None,
            team_1: None,
            team_2: None,
            winner: None,
            status: MatchStatus::Scheduled,
            team_1_score: None,
            team_2_score: None,
            set_scores: Vec::new(),
            notes: None,
            next_match: None,
            next_match_loser: None,
            is_loser_bracket,
        }
    }

    pub fn round_name(&self) -> String {
        round_name(self.round)
    }

    /// Whole minutes between start and end, if both are known.
    pub fn duration_minutes(&self) -> Option<i64> {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => Some((end - start).num_minutes()),
            _ => None,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status.is_finished() && self.winner.is_some()
    }

    /// Both participants are known.
    pub fn is_ready(&self) -> bool {
        self.team_1.is_some() && self.team_2.is_some()
    }

    pub fn team(&self, side: Side) -> Option<RegistrationId> {
        match side {
            Side::A => self.team_1,
            Side::B => self.team_2,
        }
    }

    /// Side the registration plays on, if it is in this match.
    pub fn side_of(&self, registration: RegistrationId) -> Option<Side> {
        if self.team_1 == Some(registration) {
            Some(Side::A)
        } else if self.team_2 == Some(registration) {
            Some(Side::B)
        } else {
            None
        }
    }

    /// Number of participant slots already filled.
    pub fn filled_slots(&self) -> usize {
        usize::from(self.team_1.is_some()) + usize::from(self.team_2.is_some())
    }

    /// Put a registration in the first open slot. Returns false when both are taken.
    pub fn fill_open_slot(&mut self, registration: RegistrationId) -> bool {
        if self.team_1.is_none() {
            self.team_1 = Some(registration);
        } else if self.team_2.is_none() {
            self.team_2 = Some(registration);
        } else {
            return false;
        }
        true
    }

    /// Swap one advanced registration for another, keeping its slot.
    pub fn replace_participant(&mut self, old: RegistrationId, new: RegistrationId) -> bool {
        match self.side_of(old) {
            Some(Side::A) => self.team_1 = Some(new),
            Some(Side::B) => self.team_2 = Some(new),
            None => return false,
        }
        true
    }

    /// Still untouched: no result, not under way.
    pub fn is_untouched(&self) -> bool {
        self.status == MatchStatus::Scheduled && self.winner.is_none()
    }
}
