//! Standings aggregator: turn finished matches and pairings into contest outcomes and
//! fold them into the tournament's standings table.

use crate::models::{
    set_tally, ContestId, ContestOutcome, GameMatch, Pairing, Side, StandingsTable, Tournament,
    TournamentError, TournamentResult,
};
use chrono::{DateTime, Utc};

/// Outcome of a finished bracket match, credited to every player of each registration.
pub fn match_outcome(tournament: &Tournament, m: &GameMatch) -> TournamentResult<ContestOutcome> {
    let (team_1, team_2) = match (m.team_1, m.team_2) {
        (Some(a), Some(b)) => (a, b),
        _ => return Err(TournamentError::MatchNotReady(m.id)),
    };
    let winner = m.winner.and_then(|w| m.side_of(w));
    let final_score = m.team_1_score.zip(m.team_2_score);
    let (sets_a, sets_b) = set_tally(&m.set_scores, final_score);
    Ok(ContestOutcome {
        side_a: tournament.registration(team_1)?.players(),
        side_b: tournament.registration(team_2)?.players(),
        winner,
        sets_a,
        sets_b,
    })
}

/// Outcome of a finished American pairing. Equal scores give an outcome without a winner.
pub fn pairing_outcome(pairing: &Pairing) -> ContestOutcome {
    let final_score = pairing.team_a_score.zip(pairing.team_b_score);
    let (sets_a, sets_b) = set_tally(&pairing.set_scores, final_score);
    ContestOutcome {
        side_a: pairing.team(Side::A).to_vec(),
        side_b: pairing.team(Side::B).to_vec(),
        winner: pairing.winner(),
        sets_a,
        sets_b,
    }
}

/// Fold one finished contest into the standings. Replaying the same result is a no-op;
/// with `correction` an earlier result for the contest is replaced.
pub fn fold_contest(
    tournament: &mut Tournament,
    contest: ContestId,
    outcome: ContestOutcome,
    correction: bool,
    now: DateTime<Utc>,
) -> TournamentResult<()> {
    let rules = tournament.scoring;
    if correction {
        tournament.standings.correct(contest, outcome, &rules, now)
    } else {
        tournament.standings.apply(contest, outcome, &rules, now).map(|_| ())
    }
}

/// Recompute the whole table from stored results: every finished match and pairing,
/// with rows for all accepted players.
pub fn rebuild_standings(tournament: &Tournament, now: DateTime<Utc>) -> TournamentResult<StandingsTable> {
    let rules = tournament.scoring;
    let mut table = StandingsTable::new();
    let players = crate::logic::seeded_entrants(tournament)
        .into_iter()
        .flat_map(|r| r.players());
    table.seed_players(players, now);

    if let Some(bracket) = &tournament.bracket {
        for m in bracket.matches.iter().filter(|m| m.is_completed()) {
            table.apply(ContestId::Match(m.id), match_outcome(tournament, m)?, &rules, now)?;
        }
    }
    for round in &tournament.rounds {
        for (index, pairing) in round.pairings.iter().enumerate() {
            if pairing.is_completed() {
                let contest = ContestId::Pairing {
                    round: round.number,
                    pairing: index,
                };
                table.apply(contest, pairing_outcome(pairing), &rules, now)?;
            }
        }
    }
    Ok(table)
}
