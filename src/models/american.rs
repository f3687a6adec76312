//! American format: rounds of dynamically formed 2v2 pairings.

use crate::models::game::{MatchStatus, SetScore, Side};
use crate::models::player::PlayerId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

/// Two teams of two, formed for this pairing only.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Pairing {
    pub court: Option<String>,
    pub team_a: [PlayerId; 2],
    pub team_b: [PlayerId; 2],
    pub status: MatchStatus,
    pub team_a_score: Option<u32>,
    pub team_b_score: Option<u32>,
    pub set_scores: Vec<SetScore>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

impl Pairing {
    pub fn new(team_a: [PlayerId; 2], team_b: [PlayerId; 2], court: Option<String>) -> Self {
        Self {
            court,
            team_a,
            team_b,
            status: MatchStatus::Scheduled,
            team_a_score: None,
            team_b_score: None,
            set_scores: Vec::new(),
            start_time: None,
            end_time: None,
        }
    }

    /// Strictly higher score wins. Missing scores or a draw give no winner.
    pub fn winner(&self) -> Option<Side> {
        match (self.team_a_score, self.team_b_score) {
            (Some(a), Some(b)) => Side::from_scores(a, b),
            _ => None,
        }
    }

    pub fn team(&self, side: Side) -> &[PlayerId; 2] {
        match side {
            Side::A => &self.team_a,
            Side::B => &self.team_b,
        }
    }

    pub fn players(&self) -> [PlayerId; 4] {
        [self.team_a[0], self.team_a[1], self.team_b[0], self.team_b[1]]
    }

    pub fn is_completed(&self) -> bool {
        self.status.is_finished()
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct AmericanRound {
    /// 1-based.
    pub number: u32,
    pub status: RoundStatus,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub pairings: Vec<Pairing>,
    /// Active players left out of this round to make the count divisible by four.
    pub sitting_out: Vec<PlayerId>,
}

impl AmericanRound {
    pub fn new(number: u32, pairings: Vec<Pairing>, sitting_out: Vec<PlayerId>, now: DateTime<Utc>) -> Self {
        Self {
            number,
            status: RoundStatus::Pending,
            start_time: None,
            end_time: None,
            created_at: now,
            pairings,
            sitting_out,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == RoundStatus::Completed
    }

    pub fn all_pairings_completed(&self) -> bool {
        self.pairings.iter().all(Pairing::is_completed)
    }
}
