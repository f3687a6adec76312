//! Round rotator for the American format: next round's teams and opponents from the
//! current ranking, rotating partners.

use crate::models::{
    AmericanRound, Pairing, PlayerId, Tournament, TournamentError, TournamentFormat,
    TournamentResult, TournamentStatus,
};
use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use std::cell::Cell;
use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};

const PLAYERS_PER_PAIRING: usize = 4;

fn pair_key(a: PlayerId, b: PlayerId) -> (PlayerId, PlayerId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Who has played with and against whom so far, and how often each player sat out.
#[derive(Clone, Debug, Default)]
pub struct RotationHistory {
    teammates: HashMap<(PlayerId, PlayerId), u32>,
    opponents: HashMap<(PlayerId, PlayerId), u32>,
    sat_out: HashMap<PlayerId, u32>,
}

impl RotationHistory {
    pub fn from_rounds(rounds: &[AmericanRound]) -> Self {
        let mut history = Self::default();
        for round in rounds {
            for pairing in &round.pairings {
                history.record_pairing(pairing);
            }
            for &p in &round.sitting_out {
                *history.sat_out.entry(p).or_default() += 1;
            }
        }
        history
    }

    pub fn record_pairing(&mut self, pairing: &Pairing) {
        for team in [&pairing.team_a, &pairing.team_b] {
            *self.teammates.entry(pair_key(team[0], team[1])).or_default() += 1;
        }
        for &a in &pairing.team_a {
            for &b in &pairing.team_b {
                *self.opponents.entry(pair_key(a, b)).or_default() += 1;
            }
        }
    }

    pub fn teammate_count(&self, a: PlayerId, b: PlayerId) -> u32 {
        self.teammates.get(&pair_key(a, b)).copied().unwrap_or(0)
    }

    pub fn opponent_count(&self, a: PlayerId, b: PlayerId) -> u32 {
        self.opponents.get(&pair_key(a, b)).copied().unwrap_or(0)
    }

    pub fn sit_outs(&self, player: PlayerId) -> u32 {
        self.sat_out.get(&player).copied().unwrap_or(0)
    }
}

/// Pairings and sit-outs for one round.
#[derive(Clone, Debug)]
pub struct RoundPlan {
    pub pairings: Vec<Pairing>,
    pub sitting_out: Vec<PlayerId>,
}

/// Plan a round from players in ranking order (best first).
///
/// 1. `len % 4` players sit out: fewest previous sit-outs first, lowest ranked on ties.
/// 2. The rest form teams of two. The search prefers partners inside the player's ranked
///    group of four (`ad|bc`, then `ac|bd`, then `ab|cd`) and reaches into neighbouring
///    groups when that is the only way to avoid a previous teammate. Among repeat-free
///    team sets it takes one that still leaves a repeat-free round for later.
/// 3. Teams face each other in ranking order, skipping ahead to avoid repeated opponents.
pub fn plan_round(
    ranked: &[PlayerId],
    history: &RotationHistory,
    courts: &[String],
) -> TournamentResult<RoundPlan> {
    if ranked.len() < PLAYERS_PER_PAIRING {
        return Err(TournamentError::NotEnoughPlayers {
            required: PLAYERS_PER_PAIRING,
            available: ranked.len(),
        });
    }

    let excess = ranked.len() % PLAYERS_PER_PAIRING;
    let mut by_sit_out: Vec<(usize, PlayerId)> = ranked.iter().copied().enumerate().collect();
    by_sit_out.sort_by_key(|&(rank, p)| (history.sit_outs(p), Reverse(rank)));
    let sitting_out: Vec<PlayerId> = by_sit_out.iter().take(excess).map(|&(_, p)| p).collect();

    let playing: Vec<PlayerId> = ranked
        .iter()
        .copied()
        .filter(|p| !sitting_out.contains(p))
        .collect();

    let teams = choose_teams(&playing, history);
    let pairings = face_off(teams, &playing, history)
        .into_iter()
        .enumerate()
        .map(|(i, (team_a, team_b))| Pairing::new(team_a, team_b, Some(court_label(courts, i))))
        .collect();

    Ok(RoundPlan {
        pairings,
        sitting_out,
    })
}

/// Team of two, as indices into the ranked list of playing players, lower index first.
type Team = [usize; 2];

/// Search steps allowed per round before settling for the best team set found so far.
const SEARCH_BUDGET: usize = 20_000;

fn choose_teams(playing: &[PlayerId], history: &RotationHistory) -> Vec<Team> {
    let fresh = |a: usize, b: usize| history.teammate_count(playing[a], playing[b]) == 0;
    let budget = Cell::new(SEARCH_BUDGET);

    let mut first_fresh: Option<Vec<Team>> = None;
    let mut chosen: Option<Vec<Team>> = None;
    each_team_set(playing.len(), &fresh, &budget, &mut |teams: &[Team]| {
        if first_fresh.is_none() {
            first_fresh = Some(teams.to_vec());
        }
        let unused = |a: usize, b: usize| fresh(a, b) && !teams.contains(&[a, b]);
        if each_team_set(playing.len(), &unused, &budget, &mut |_: &[Team]| true) {
            chosen = Some(teams.to_vec());
            return true;
        }
        false
    });
    if let Some(teams) = chosen.or(first_fresh) {
        return teams;
    }

    // Every team set repeats someone: keep the most-repeated pair as low as possible.
    let most = (0..playing.len())
        .flat_map(|a| (a + 1..playing.len()).map(move |b| (a, b)))
        .map(|(a, b)| history.teammate_count(playing[a], playing[b]))
        .max()
        .unwrap_or(0);
    for limit in 1..most {
        let within = |a: usize, b: usize| history.teammate_count(playing[a], playing[b]) <= limit;
        let mut found = None;
        each_team_set(playing.len(), &within, &budget, &mut |teams: &[Team]| {
            found = Some(teams.to_vec());
            true
        });
        if let Some(teams) = found {
            log::debug!("rotation: teammates repeat up to {} times", limit);
            return teams;
        }
    }
    let anyone = |_: usize, _: usize| true;
    let mut natural = Vec::new();
    each_team_set(playing.len(), &anyone, &Cell::new(usize::MAX), &mut |teams: &[Team]| {
        natural = teams.to_vec();
        true
    });
    natural
}

/// Depth-first walk over ways to split `0..len` into allowed teams, best-ranked open
/// player first. `visit` returns true to stop; the walk returns true if it was stopped.
fn each_team_set(
    len: usize,
    allowed: &dyn Fn(usize, usize) -> bool,
    budget: &Cell<usize>,
    visit: &mut dyn FnMut(&[Team]) -> bool,
) -> bool {
    let open: Vec<usize> = (0..len).collect();
    extend_teams(&open, &mut Vec::new(), allowed, budget, visit)
}

fn extend_teams(
    open: &[usize],
    teams: &mut Vec<Team>,
    allowed: &dyn Fn(usize, usize) -> bool,
    budget: &Cell<usize>,
    visit: &mut dyn FnMut(&[Team]) -> bool,
) -> bool {
    let Some((&first, rest)) = open.split_first() else {
        return visit(teams);
    };
    if budget.get() == 0 {
        return false;
    }
    budget.set(budget.get() - 1);

    for partner in partner_order(first, rest) {
        if !allowed(first, partner) {
            continue;
        }
        let remaining: Vec<usize> = rest.iter().copied().filter(|&i| i != partner).collect();
        teams.push([first, partner]);
        let stopped = extend_teams(&remaining, teams, allowed, budget, visit);
        teams.pop();
        if stopped {
            return true;
        }
    }
    false
}

/// Same ranked group of four first, lowest ranked of the group first; then the nearest
/// players below.
fn partner_order(first: usize, candidates: &[usize]) -> Vec<usize> {
    let group = first / PLAYERS_PER_PAIRING;
    let mut order = candidates.to_vec();
    order.sort_by_key(|&i| {
        let distance = i / PLAYERS_PER_PAIRING - group;
        (distance, if distance == 0 { usize::MAX - i } else { i })
    });
    order
}

/// Match teams up in ranking order. Each team takes the next one it has met least often.
fn face_off(
    mut open: Vec<Team>,
    playing: &[PlayerId],
    history: &RotationHistory,
) -> Vec<([PlayerId; 2], [PlayerId; 2])> {
    open.sort();
    let players = |t: Team| [playing[t[0]], playing[t[1]]];
    let met = |x: Team, y: Team| -> u32 {
        x.iter()
            .flat_map(|&p| y.iter().map(move |&q| (p, q)))
            .map(|(p, q)| history.opponent_count(playing[p], playing[q]))
            .sum()
    };

    let mut pairings = Vec::with_capacity(open.len() / 2);
    while !open.is_empty() {
        let first = open.remove(0);
        let Some((index, _)) = open
            .iter()
            .enumerate()
            .min_by_key(|&(i, &other)| (met(first, other), i))
        else {
            break;
        };
        let second = open.remove(index);
        log::debug!(
            "rotation: {:?} vs {:?}, {} earlier meetings",
            first,
            second,
            met(first, second)
        );
        pairings.push((players(first), players(second)));
    }
    pairings
}

fn court_label(courts: &[String], index: usize) -> String {
    courts
        .get(index)
        .cloned()
        .unwrap_or_else(|| format!("Court {}", index + 1))
}

/// Each player appears at most once in a round, and never while also sitting out.
pub fn check_round(pairings: &[Pairing], sitting_out: &[PlayerId]) -> TournamentResult<()> {
    let mut seen = HashSet::new();
    let everyone = pairings
        .iter()
        .flat_map(Pairing::players)
        .chain(sitting_out.iter().copied());
    for player in everyone {
        if !seen.insert(player) {
            return Err(TournamentError::PlayerRepeatedInRound(player));
        }
    }
    Ok(())
}

/// Players taking part in an American tournament: primary players of accepted registrations.
pub fn active_players(tournament: &Tournament) -> Vec<PlayerId> {
    crate::logic::seeded_entrants(tournament)
        .into_iter()
        .map(|r| r.player_1)
        .collect()
}

/// Generate the next American round. Round 1 shuffles the field; later rounds follow the
/// standings. Returns the new round's number.
pub fn generate_next_round<R: Rng + ?Sized>(
    tournament: &mut Tournament,
    now: DateTime<Utc>,
    rng: &mut R,
) -> TournamentResult<u32> {
    if tournament.format != TournamentFormat::American {
        return Err(TournamentError::FormatNotSupported(tournament.format));
    }
    tournament.require_status(TournamentStatus::InProgress)?;
    if let Some(last) = tournament.rounds.last() {
        if !last.is_completed() {
            return Err(TournamentError::RoundInProgress(last.number));
        }
    }

    let players = active_players(tournament);
    let ranked: Vec<PlayerId> = if tournament.rounds.is_empty() {
        let mut shuffled = players.clone();
        shuffled.shuffle(rng);
        shuffled
    } else {
        let active: HashSet<PlayerId> = players.iter().copied().collect();
        let mut ranked: Vec<PlayerId> = tournament
            .standings
            .ranked()
            .into_iter()
            .map(|s| s.player_id)
            .filter(|p| active.contains(p))
            .collect();
        let missing: Vec<PlayerId> = players.iter().copied().filter(|p| !ranked.contains(p)).collect();
        ranked.extend(missing);
        ranked
    };

    let history = RotationHistory::from_rounds(&tournament.rounds);
    let plan = plan_round(&ranked, &history, &tournament.courts)?;
    check_round(&plan.pairings, &plan.sitting_out)?;

    let number = tournament.rounds.len() as u32 + 1;
    tournament.standings.seed_players(players, now);
    log::info!(
        "tournament {}: round {} with {} pairings, {} sitting out",
        tournament.id,
        number,
        plan.pairings.len(),
        plan.sitting_out.len()
    );
    tournament
        .rounds
        .push(AmericanRound::new(number, plan.pairings, plan.sitting_out, now));
    tournament.updated_at = now;
    Ok(number)
}
