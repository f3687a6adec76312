//! Bracket: the match arena of an elimination tournament and its structural checks.

use crate::models::error::{TournamentError, TournamentResult};
use crate::models::game::{GameMatch, MatchId, FINAL_ROUND};
use crate::models::tournament::TournamentFormat;
use serde::{Deserialize, Serialize};

/// All matches of one elimination bracket. `next_match` / `next_match_loser` are indices
/// into `matches`; the graph is fixed once built.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Bracket {
    pub format: TournamentFormat,
    /// Rounds in the winners' tree (log2 of the padded field size).
    pub winner_rounds: u32,
    pub matches: Vec<GameMatch>,
}

impl Bracket {
    pub fn get(&self, id: MatchId) -> TournamentResult<&GameMatch> {
        self.matches.get(id).ok_or(TournamentError::MatchNotFound(id))
    }

    pub fn get_mut(&mut self, id: MatchId) -> TournamentResult<&mut GameMatch> {
        self.matches.get_mut(id).ok_or(TournamentError::MatchNotFound(id))
    }

    /// Position of the match on the bracket's timeline. Every link must go to a later stage.
    ///
    /// Single elimination: the round ordinal, decoding the named codes from the end.
    /// Double elimination: winners' round `r` at `2r - 1`, losers' round `l` at `l + 2`,
    /// grand final last at `2k + 1`.
    pub fn stage(&self, m: &GameMatch) -> u32 {
        let k = self.winner_rounds as i64;
        let stage = match self.format {
            TournamentFormat::DoubleElimination => {
                if m.is_loser_bracket {
                    i64::from(m.round) + 2
                } else if m.round == FINAL_ROUND {
                    2 * k + 1
                } else {
                    2 * i64::from(m.round) - 1
                }
            }
            _ => {
                if m.round > 0 {
                    i64::from(m.round)
                } else {
                    k + 1 + i64::from(m.round)
                }
            }
        };
        stage.max(0) as u32
    }

    /// The match with nowhere to send its winner. None unless there is exactly one.
    pub fn final_match(&self) -> Option<&GameMatch> {
        let mut sinks = self.matches.iter().filter(|m| m.next_match.is_none());
        match (sinks.next(), sinks.next()) {
            (Some(m), None) => Some(m),
            _ => None,
        }
    }

    /// Structural check on a freshly built bracket, run before it is stored. Participants
    /// placed at build time count as feeds alongside incoming links.
    pub fn validate(&self) -> TournamentResult<()> {
        let mut feeds: Vec<usize> = self.matches.iter().map(GameMatch::filled_slots).collect();
        for m in &self.matches {
            for target in [m.next_match, m.next_match_loser].into_iter().flatten() {
                let next = self.matches.get(target).ok_or(TournamentError::BrokenLink {
                    from: m.id,
                    to: target,
                })?;
                if self.stage(next) <= self.stage(m) {
                    return Err(TournamentError::NonForwardLink {
                        from: m.id,
                        to: target,
                    });
                }
                feeds[target] += 1;
            }
        }

        let sinks = self.matches.iter().filter(|m| m.next_match.is_none()).count();
        if sinks != 1 {
            return Err(TournamentError::SinkCount(sinks));
        }

        if let Some((match_id, &count)) = feeds.iter().enumerate().find(|(_, &n)| n != 2) {
            return Err(TournamentError::UnbalancedFeeds {
                match_id,
                feeds: count,
            });
        }
        Ok(())
    }

    /// Follow winner links from `start` to the end. Errors on a cycle or a broken link.
    pub fn winner_path(&self, start: MatchId) -> TournamentResult<Vec<MatchId>> {
        let mut path = vec![start];
        let mut current = self.get(start)?;
        while let Some(next) = current.next_match {
            if path.contains(&next) || path.len() > self.matches.len() {
                return Err(TournamentError::NonForwardLink {
                    from: current.id,
                    to: next,
                });
            }
            current = self.matches.get(next).ok_or(TournamentError::BrokenLink {
                from: current.id,
                to: next,
            })?;
            path.push(next);
        }
        Ok(path)
    }
}
