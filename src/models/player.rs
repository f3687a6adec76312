//! Player identity and the per-player standing record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a player (the user account behind a registration).
pub type PlayerId = Uuid;

/// Points awarded per contest outcome. `total_points` is linear in these.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ScoringRules {
    pub match_win: i32,
    pub match_loss: i32,
    pub set_won: i32,
    pub set_lost: i32,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            match_win: 3,
            match_loss: 0,
            set_won: 0,
            set_lost: 0,
        }
    }
}

/// How one contest went for a single player.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PlayerResult {
    /// Some(true) won, Some(false) lost, None drawn.
    pub won: Option<bool>,
    pub sets_won: u32,
    pub sets_lost: u32,
}

impl ScoringRules {
    pub fn points_for(&self, result: &PlayerResult) -> i32 {
        let match_points = match result.won {
            Some(true) => self.match_win,
            Some(false) => self.match_loss,
            None => 0,
        };
        match_points
            .saturating_add(self.set_won.saturating_mul(count(result.sets_won)))
            .saturating_add(self.set_lost.saturating_mul(count(result.sets_lost)))
    }
}

fn count(sets: u32) -> i32 {
    i32::try_from(sets).unwrap_or(i32::MAX)
}

/// A player's cumulative record within one tournament.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Standing {
    pub player_id: PlayerId,
    pub total_points: i32,
    pub matches_won: u32,
    pub matches_lost: u32,
    pub sets_won: u32,
    pub sets_lost: u32,
    pub updated_at: DateTime<Utc>,
}

impl Standing {
    pub fn new(player_id: PlayerId, now: DateTime<Utc>) -> Self {
        Self {
            player_id,
            total_points: 0,
            matches_won: 0,
            matches_lost: 0,
            sets_won: 0,
            sets_lost: 0,
            updated_at: now,
        }
    }

    pub fn matches_played(&self) -> u32 {
        self.matches_won + self.matches_lost
    }

    /// Percentage of matches won, rounded to two decimals. 0 when nothing was played.
    pub fn win_rate(&self) -> f64 {
        let played = self.matches_played();
        if played == 0 {
            return 0.0;
        }
        (f64::from(self.matches_won) / f64::from(played) * 10_000.0).round() / 100.0
    }

    pub fn set_difference(&self) -> i64 {
        i64::from(self.sets_won) - i64::from(self.sets_lost)
    }

    /// Fold one contest result in.
    pub fn add_result(&mut self, result: &PlayerResult, rules: &ScoringRules, now: DateTime<Utc>) {
        match result.won {
            Some(true) => self.matches_won += 1,
            Some(false) => self.matches_lost += 1,
            None => {}
        }
        self.sets_won = self.sets_won.saturating_add(result.sets_won);
        self.sets_lost = self.sets_lost.saturating_add(result.sets_lost);
        self.total_points = self.total_points.saturating_add(rules.points_for(result));
        self.updated_at = now;
    }

    /// Take back a result previously folded in with the same rules.
    pub fn remove_result(&mut self, result: &PlayerResult, rules: &ScoringRules, now: DateTime<Utc>) {
        match result.won {
            Some(true) => self.matches_won = self.matches_won.saturating_sub(1),
            Some(false) => self.matches_lost = self.matches_lost.saturating_sub(1),
            None => {}
        }
        self.sets_won = self.sets_won.saturating_sub(result.sets_won);
        self.sets_lost = self.sets_lost.saturating_sub(result.sets_lost);
        self.total_points = self.total_points.saturating_sub(rules.points_for(result));
        self.updated_at = now;
    }
}
