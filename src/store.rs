//! In-memory tournament store. Each tournament sits behind its own lock, so writes to one
//! tournament are serialized while different tournaments proceed in parallel.

use crate::models::{Tournament, TournamentError, TournamentId, TournamentResult};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

type Entry = Arc<Mutex<Tournament>>;

#[derive(Debug, Default)]
pub struct TournamentStore {
    tournaments: RwLock<HashMap<TournamentId, Entry>>,
}

impl TournamentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, tournament: Tournament) -> TournamentResult<TournamentId> {
        let id = tournament.id;
        let mut map = self.tournaments.write().map_err(|_| TournamentError::LockPoisoned)?;
        map.insert(id, Arc::new(Mutex::new(tournament)));
        Ok(id)
    }

    fn entry(&self, id: TournamentId) -> TournamentResult<Entry> {
        let map = self.tournaments.read().map_err(|_| TournamentError::LockPoisoned)?;
        map.get(&id).cloned().ok_or(TournamentError::TournamentNotFound(id))
    }

    /// Snapshot of one tournament.
    pub fn get(&self, id: TournamentId) -> TournamentResult<Tournament> {
        let entry = self.entry(id)?;
        let tournament = entry.lock().map_err(|_| TournamentError::LockPoisoned)?;
        Ok(tournament.clone())
    }

    /// Snapshots of all tournaments, oldest first.
    pub fn list(&self) -> TournamentResult<Vec<Tournament>> {
        let entries: Vec<Entry> = {
            let map = self.tournaments.read().map_err(|_| TournamentError::LockPoisoned)?;
            map.values().cloned().collect()
        };
        let mut tournaments = entries
            .iter()
            .map(|entry| {
                entry
                    .lock()
                    .map(|t| t.clone())
                    .map_err(|_| TournamentError::LockPoisoned)
            })
            .collect::<TournamentResult<Vec<_>>>()?;
        tournaments.sort_by_key(|t| (t.created_at, t.id));
        Ok(tournaments)
    }

    pub fn len(&self) -> usize {
        self.tournaments.read().map(|map| map.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run `f` against a working copy of the tournament while holding its lock. The copy
    /// replaces the stored tournament only when `f` succeeds; on error nothing changes.
    pub fn transact<T, F>(&self, id: TournamentId, f: F) -> TournamentResult<T>
    where
        F: FnOnce(&mut Tournament) -> TournamentResult<T>,
    {
        let entry = self.entry(id)?;
        let mut stored = entry.lock().map_err(|_| TournamentError::LockPoisoned)?;
        let mut working = stored.clone();
        match f(&mut working) {
            Ok(value) => {
                *stored = working;
                Ok(value)
            }
            Err(e) => {
                log::debug!("tournament {}: rolled back ({})", id, e);
                Err(e)
            }
        }
    }
}
