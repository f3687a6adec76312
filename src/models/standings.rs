//! Standings table: one row per player, folded from completed contests.

use crate::models::error::{TournamentError, TournamentResult};
use crate::models::game::{MatchId, Side};
use crate::models::player::{PlayerId, PlayerResult, ScoringRules, Standing};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::BTreeMap;

/// A contest whose result can be folded into standings.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContestId {
    Match(MatchId),
    Pairing { round: u32, pairing: usize },
}

/// Everything the table needs to know about a finished contest.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ContestOutcome {
    pub side_a: Vec<PlayerId>,
    pub side_b: Vec<PlayerId>,
    /// None for a draw.
    pub winner: Option<Side>,
    pub sets_a: u32,
    pub sets_b: u32,
}

impl ContestOutcome {
    /// Per-player results, both sides.
    fn player_results(&self) -> Vec<(PlayerId, PlayerResult)> {
        let a = PlayerResult {
            won: self.winner.map(|w| w == Side::A),
            sets_won: self.sets_a,
            sets_lost: self.sets_b,
        };
        let b = PlayerResult {
            won: self.winner.map(|w| w == Side::B),
            sets_won: self.sets_b,
            sets_lost: self.sets_a,
        };
        self.side_a
            .iter()
            .map(|&p| (p, a))
            .chain(self.side_b.iter().map(|&p| (p, b)))
            .collect()
    }
}

/// Cumulative standings of a tournament plus the ledger of contests already folded in.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct StandingsTable {
    rows: BTreeMap<PlayerId, Standing>,
    #[serde(with = "applied_entries")]
    applied: BTreeMap<ContestId, ContestOutcome>,
}

/// JSON map keys must be strings, so the ledger is written as a list of entries.
mod applied_entries {
    use super::{ContestId, ContestOutcome};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::collections::BTreeMap;

    pub fn serialize<S: Serializer>(
        applied: &BTreeMap<ContestId, ContestOutcome>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let entries: Vec<(&ContestId, &ContestOutcome)> = applied.iter().collect();
        entries.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BTreeMap<ContestId, ContestOutcome>, D::Error> {
        let entries = Vec::<(ContestId, ContestOutcome)>::deserialize(deserializer)?;
        Ok(entries.into_iter().collect())
    }
}

impl StandingsTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make sure every listed player has a row, even before they play.
    pub fn seed_players(&mut self, players: impl IntoIterator<Item = PlayerId>, now: DateTime<Utc>) {
        for p in players {
            self.rows.entry(p).or_insert_with(|| Standing::new(p, now));
        }
    }

    pub fn get(&self, player: PlayerId) -> Option<&Standing> {
        self.rows.get(&player)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn is_applied(&self, contest: ContestId) -> bool {
        self.applied.contains_key(&contest)
    }

    /// Fold a completed contest in. Returns false when this exact outcome was already applied.
    /// A different outcome for a contest already applied is refused; use [`Self::correct`].
    pub fn apply(
        &mut self,
        contest: ContestId,
        outcome: ContestOutcome,
        rules: &ScoringRules,
        now: DateTime<Utc>,
    ) -> TournamentResult<bool> {
        if let Some(existing) = self.applied.get(&contest) {
            if *existing == outcome {
                return Ok(false);
            }
            return Err(TournamentError::ResultConflict);
        }
        if outcome.winner.is_none() {
            log::warn!("{:?} ended in a draw; folding sets only", contest);
        }
        for (player, result) in outcome.player_results() {
            self.rows
                .entry(player)
                .or_insert_with(|| Standing::new(player, now))
                .add_result(&result, rules, now);
        }
        self.applied.insert(contest, outcome);
        Ok(true)
    }

    /// Take a contest back out. Returns the outcome that was removed.
    pub fn retract(
        &mut self,
        contest: ContestId,
        rules: &ScoringRules,
        now: DateTime<Utc>,
    ) -> Option<ContestOutcome> {
        let outcome = self.applied.remove(&contest)?;
        for (player, result) in outcome.player_results() {
            if let Some(row) = self.rows.get_mut(&player) {
                row.remove_result(&result, rules, now);
            }
        }
        Some(outcome)
    }

    /// Replace whatever was recorded for the contest with a new outcome.
    pub fn correct(
        &mut self,
        contest: ContestId,
        outcome: ContestOutcome,
        rules: &ScoringRules,
        now: DateTime<Utc>,
    ) -> TournamentResult<()> {
        self.retract(contest, rules, now);
        self.apply(contest, outcome, rules, now).map(|_| ())
    }

    /// Rows in display order: points, set difference, matches won, sets won, then player id.
    pub fn ranked(&self) -> Vec<&Standing> {
        let mut rows: Vec<&Standing> = self.rows.values().collect();
        rows.sort_by_key(|s| {
            (
                Reverse(s.total_points),
                Reverse(s.set_difference()),
                Reverse(s.matches_won),
                Reverse(s.sets_won),
                s.player_id,
            )
        });
        rows
    }
}
