//! CSV export of a tournament's standings.

use crate::models::{Tournament, TournamentError, TournamentResult};
use serde::Serialize;

const HEADER: [&str; 11] = [
    "rank",
    "player_id",
    "team_name",
    "total_points",
    "matches_won",
    "matches_lost",
    "matches_played",
    "win_rate",
    "sets_won",
    "sets_lost",
    "set_difference",
];

#[derive(Serialize)]
struct StandingRow<'a> {
    rank: usize,
    player_id: String,
    team_name: &'a str,
    total_points: i32,
    matches_won: u32,
    matches_lost: u32,
    matches_played: u32,
    win_rate: f64,
    sets_won: u32,
    sets_lost: u32,
    set_difference: i64,
}

/// Ranked standings as CSV with a header row.
pub fn standings_csv(tournament: &Tournament) -> TournamentResult<String> {
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(Vec::new());
    writer
        .write_record(HEADER)
        .map_err(|e| TournamentError::Export(e.to_string()))?;
    for (i, standing) in tournament.standings.ranked().into_iter().enumerate() {
        let team_name = tournament
            .registrations
            .iter()
            .find(|r| r.is_active() && r.includes(standing.player_id))
            .and_then(|r| r.team_name.as_deref())
            .unwrap_or("");
        writer
            .serialize(StandingRow {
                rank: i + 1,
                player_id: standing.player_id.to_string(),
                team_name,
                total_points: standing.total_points,
                matches_won: standing.matches_won,
                matches_lost: standing.matches_lost,
                matches_played: standing.matches_played(),
                win_rate: standing.win_rate(),
                sets_won: standing.sets_won,
                sets_lost: standing.sets_lost,
                set_difference: standing.set_difference(),
            })
            .map_err(|e| TournamentError::Export(e.to_string()))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| TournamentError::Export(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| TournamentError::Export(e.to_string()))
}
