//! Score entry: complete matches and pairings, advance winners and losers along the
//! bracket, and fold results into standings.

use crate::logic::standings::{fold_contest, match_outcome, pairing_outcome};
use crate::models::{
    parse_set_scores, Bracket, ContestId, GameMatch, MatchId, MatchStatus, RegistrationId, RoundStatus,
    Side, Tournament, TournamentError, TournamentResult, TournamentStatus,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Score submission for a match (team 1 / team 2) or a pairing (team A / team B).
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ScoreReport {
    #[serde(alias = "team_a_score")]
    pub team_1_score: u32,
    #[serde(alias = "team_b_score")]
    pub team_2_score: u32,
    /// Set-by-set games, e.g. `"6-3, 4-6, 7-5"`.
    #[serde(default)]
    pub set_scores: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    /// Replace a result that was already entered.
    #[serde(default)]
    pub correction: bool,
}

/// The match's next matches must not have started before its result can change.
fn ensure_downstream_untouched(bracket: &Bracket, match_id: MatchId) -> TournamentResult<()> {
    let m = bracket.get(match_id)?;
    for next in [m.next_match, m.next_match_loser].into_iter().flatten() {
        if !bracket.get(next)?.is_untouched() {
            return Err(TournamentError::DownstreamMatchStarted(match_id));
        }
    }
    Ok(())
}

/// Send `registration` on to `target`, or swap it in for `previous` on a correction.
fn advance(
    bracket: &mut Bracket,
    target: Option<MatchId>,
    registration: RegistrationId,
    previous: Option<RegistrationId>,
) -> TournamentResult<()> {
    let Some(target) = target else {
        return Ok(());
    };
    let next = bracket.get_mut(target)?;
    let placed = match previous {
        Some(old) if old == registration => true,
        Some(old) => next.replace_participant(old, registration),
        None => next.fill_open_slot(registration),
    };
    if !placed {
        return Err(TournamentError::UnbalancedFeeds {
            match_id: target,
            feeds: 3,
        });
    }
    Ok(())
}

/// Winner and loser of a finished match, if it has a result.
fn result_of(bracket: &Bracket, match_id: MatchId) -> TournamentResult<Option<(RegistrationId, RegistrationId)>> {
    let m = bracket.get(match_id)?;
    if !m.is_completed() {
        return Ok(None);
    }
    let winner = m.winner.ok_or(TournamentError::MatchNotReady(match_id))?;
    let loser = m
        .side_of(winner)
        .and_then(|side| m.team(side.other()))
        .ok_or(TournamentError::MatchNotReady(match_id))?;
    Ok(Some((winner, loser)))
}

/// Complete `match_id` with `winner_side`, propagate, fold standings, and finish the
/// tournament when the final is decided.
fn complete_match(
    tournament: &mut Tournament,
    match_id: MatchId,
    winner_side: Side,
    correction: bool,
    now: DateTime<Utc>,
    fill: impl FnOnce(&mut GameMatch),
) -> TournamentResult<()> {
    tournament.require_status(TournamentStatus::InProgress)?;
    let bracket = tournament.bracket.as_mut().ok_or(TournamentError::NoBracket)?;
    let m = bracket.get(match_id)?;
    if !m.is_ready() {
        return Err(TournamentError::MatchNotReady(match_id));
    }
    let previous = result_of(bracket, match_id)?;
    match (previous.is_some(), correction) {
        (true, false) => return Err(TournamentError::MatchAlreadyCompleted(match_id)),
        (false, true) => return Err(TournamentError::NothingToCorrect),
        (true, true) => ensure_downstream_untouched(bracket, match_id)?,
        (false, false) => {}
    }

    let m = bracket.get(match_id)?;
    let winner = m.team(winner_side).ok_or(TournamentError::MatchNotReady(match_id))?;
    let loser = m
        .team(winner_side.other())
        .ok_or(TournamentError::MatchNotReady(match_id))?;
    let (next_match, next_match_loser) = (m.next_match, m.next_match_loser);

    advance(bracket, next_match, winner, previous.map(|(w, _)| w))?;
    advance(bracket, next_match_loser, loser, previous.map(|(_, l)| l))?;

    let m = bracket.get_mut(match_id)?;
    fill(m);
    m.winner = Some(winner);
    m.end_time = m.end_time.or(Some(now));

    let outcome = match_outcome(tournament, bracket_match(tournament, match_id)?)?;
    fold_contest(tournament, ContestId::Match(match_id), outcome, correction, now)?;
    tournament.updated_at = now;

    if next_match.is_none() {
        tournament.transition(TournamentStatus::Completed, now)?;
        tournament.end_date = Some(now);
        log::info!("tournament {}: final decided, tournament completed", tournament.id);
    }
    Ok(())
}

fn bracket_match(tournament: &Tournament, match_id: MatchId) -> TournamentResult<&GameMatch> {
    tournament
        .bracket
        .as_ref()
        .ok_or(TournamentError::NoBracket)?
        .get(match_id)
}

/// Enter the score of a bracket match. Ties are refused; the higher score wins.
pub fn record_match_score(
    tournament: &mut Tournament,
    match_id: MatchId,
    report: ScoreReport,
    now: DateTime<Utc>,
) -> TournamentResult<()> {
    let sets = parse_set_scores(report.set_scores.as_deref().unwrap_or(""))?;
    let winner_side =
        Side::from_scores(report.team_1_score, report.team_2_score).ok_or(TournamentError::TiedScore)?;
    let ScoreReport {
        team_1_score,
        team_2_score,
        notes,
        correction,
        ..
    } = report;
    complete_match(tournament, match_id, winner_side, correction, now, move |m| {
        m.status = MatchStatus::Completed;
        m.team_1_score = Some(team_1_score);
        m.team_2_score = Some(team_2_score);
        m.set_scores = sets;
        if notes.is_some() {
            m.notes = notes;
        }
    })?;
    log::info!(
        "tournament {}: match {} scored {}-{}",
        tournament.id,
        match_id,
        team_1_score,
        team_2_score
    );
    Ok(())
}

/// Award a match without play (no-show, retirement before start).
pub fn record_walkover(
    tournament: &mut Tournament,
    match_id: MatchId,
    winner: Side,
    now: DateTime<Utc>,
) -> TournamentResult<()> {
    complete_match(tournament, match_id, winner, false, now, |m| {
        m.status = MatchStatus::Walkover;
        m.team_1_score = None;
        m.team_2_score = None;
        m.set_scores.clear();
    })?;
    log::info!("tournament {}: match {} awarded as walkover", tournament.id, match_id);
    Ok(())
}

/// Enter the score of an American pairing. A draw is accepted and logged; it credits sets
/// but no match win or loss.
pub fn record_pairing_score(
    tournament: &mut Tournament,
    round_number: u32,
    pairing_index: usize,
    report: ScoreReport,
    now: DateTime<Utc>,
) -> TournamentResult<()> {
    tournament.require_status(TournamentStatus::InProgress)?;
    let sets = parse_set_scores(report.set_scores.as_deref().unwrap_or(""))?;
    let round = tournament
        .rounds
        .iter_mut()
        .find(|r| r.number == round_number)
        .ok_or(TournamentError::RoundNotFound(round_number))?;
    let pairing = round
        .pairings
        .get_mut(pairing_index)
        .ok_or(TournamentError::PairingNotFound {
            round: round_number,
            pairing: pairing_index,
        })?;
    match (pairing.is_completed(), report.correction) {
        (true, false) => {
            return Err(TournamentError::PairingAlreadyCompleted {
                round: round_number,
                pairing: pairing_index,
            })
        }
        (false, true) => return Err(TournamentError::NothingToCorrect),
        (true, true) | (false, false) => {}
    }

    pairing.team_a_score = Some(report.team_1_score);
    pairing.team_b_score = Some(report.team_2_score);
    pairing.set_scores = sets;
    pairing.status = MatchStatus::Completed;
    pairing.start_time = pairing.start_time.or(Some(now));
    pairing.end_time = Some(now);
    let outcome = pairing_outcome(pairing);

    if round.all_pairings_completed() {
        round.status = RoundStatus::Completed;
        round.end_time = Some(now);
    } else {
        round.status = RoundStatus::InProgress;
    }
    round.start_time = round.start_time.or(Some(now));

    let contest = ContestId::Pairing {
        round: round_number,
        pairing: pairing_index,
    };
    fold_contest(tournament, contest, outcome, report.correction, now)?;
    tournament.updated_at = now;
    Ok(())
}
