//! Bracket builder: seeded entrants → single or double elimination match graph.
//!
//! The bracket is first laid out over a power-of-two field as templates whose inputs
//! are entrants, byes, or the winner/loser of an earlier template. Templates are then
//! materialized in order: a template with two real inputs becomes a match; one with a
//! single real input is dropped and that input is forwarded to wherever the template's
//! winner would have gone. This is how byes and the empty loser slots they cause
//! disappear from both trees.

use crate::models::{
    Bracket, GameMatch, MatchId, RegistrationId, TournamentError, TournamentFormat,
    TournamentResult, FINAL_ROUND, QUARTERFINAL_ROUND, SEMIFINAL_ROUND,
};

/// Input of a template match. Indices point at earlier templates.
#[derive(Clone, Copy, Debug)]
enum Source {
    Entrant(usize),
    Winner(usize),
    Loser(usize),
    Bye,
}

/// What a template input turned into once earlier templates were materialized.
#[derive(Clone, Copy, Debug)]
enum Resolved {
    Entrant(usize),
    WinnerOf(MatchId),
    LoserOf(MatchId),
    Empty,
}

#[derive(Clone, Copy, Debug)]
struct Template {
    round: i32,
    is_loser_bracket: bool,
    inputs: [Source; 2],
}

#[derive(Default)]
struct Layout {
    templates: Vec<Template>,
}

impl Layout {
    fn push(&mut self, round: i32, is_loser_bracket: bool, inputs: [Source; 2]) -> usize {
        self.templates.push(Template {
            round,
            is_loser_bracket,
            inputs,
        });
        self.templates.len() - 1
    }
}

/// Bracket slot order for a power-of-two field: seed 1 meets seed `size`, 2 meets `size - 1`,
/// and the top two seeds can only meet in the final.
pub fn seed_positions(size: usize) -> Vec<usize> {
    let mut positions = vec![1];
    while positions.len() < size {
        let mirror = positions.len() * 2 + 1;
        positions = positions.iter().flat_map(|&s| [s, mirror - s]).collect();
    }
    positions
}

/// Round code of single-elimination round `round` (1-based) out of `total_rounds`.
/// Round 1 keeps its number when there is more than one round; the last three rounds
/// otherwise take the named codes.
pub fn elimination_round_code(round: u32, total_rounds: u32) -> i32 {
    if round == 1 && total_rounds > 1 {
        return 1;
    }
    match total_rounds.saturating_sub(round) {
        0 => FINAL_ROUND,
        1 => SEMIFINAL_ROUND,
        2 => QUARTERFINAL_ROUND,
        _ => round as i32,
    }
}

/// Build the bracket for `entrants`, given best seed first.
///
/// Single elimination produces `entrants.len() - 1` matches. Double elimination adds a
/// losers' bracket and a grand final between the two champions.
pub fn build_bracket(
    entrants: &[RegistrationId],
    format: TournamentFormat,
    min_participants: usize,
) -> TournamentResult<Bracket> {
    match format {
        TournamentFormat::SingleElimination | TournamentFormat::DoubleElimination => {}
        TournamentFormat::RoundRobin | TournamentFormat::SwissSystem | TournamentFormat::American => {
            return Err(TournamentError::FormatNotSupported(format));
        }
    }
    let minimum = min_participants.max(2);
    if entrants.len() < minimum {
        return Err(TournamentError::InvalidBracketSize {
            participants: entrants.len(),
            minimum,
        });
    }

    let size = entrants.len().next_power_of_two();
    let winner_rounds = size.trailing_zeros();
    let mut layout = Layout::default();
    let winners = winners_tree(&mut layout, entrants.len(), size, winner_rounds, format);

    if format == TournamentFormat::DoubleElimination {
        let winners_final = winners[winners.len() - 1][0];
        let from_losers = match losers_tree(&mut layout, &winners) {
            Some(losers_final) => Source::Winner(losers_final),
            // Two entrants: the only loser goes straight to the grand final.
            None => Source::Loser(winners_final),
        };
        layout.push(FINAL_ROUND, false, [Source::Winner(winners_final), from_losers]);
    }

    let bracket = Bracket {
        format,
        winner_rounds,
        matches: materialize(&layout.templates, entrants),
    };
    bracket.validate()?;
    log::debug!(
        "built {:?} bracket: {} entrants, {} matches",
        format,
        entrants.len(),
        bracket.matches.len()
    );
    Ok(bracket)
}

/// Lay out the winners' tree. Returns template indices per round.
fn winners_tree(
    layout: &mut Layout,
    entrants: usize,
    size: usize,
    rounds: u32,
    format: TournamentFormat,
) -> Vec<Vec<usize>> {
    let code = |round: u32| match format {
        TournamentFormat::DoubleElimination => round as i32,
        _ => elimination_round_code(round, rounds),
    };
    let slot = |seed: usize| {
        if seed <= entrants {
            Source::Entrant(seed - 1)
        } else {
            Source::Bye
        }
    };

    let first: Vec<usize> = seed_positions(size)
        .chunks_exact(2)
        .map(|pair| layout.push(code(1), false, [slot(pair[0]), slot(pair[1])]))
        .collect();
    let mut tree = vec![first];
    for round in 2..=rounds {
        let next: Vec<usize> = tree[tree.len() - 1]
            .chunks_exact(2)
            .map(|pair| layout.push(code(round), false, [Source::Winner(pair[0]), Source::Winner(pair[1])]))
            .collect();
        tree.push(next);
    }
    tree
}

/// Lay out the losers' bracket fed by `winners`. Returns the losers' final, if there is one.
///
/// Round 1 pairs the first-round losers. Each later winners' round drops its losers into a
/// round against the surviving losers' bracket players, followed by a consolidation round
/// that halves the field, except after the last drop.
fn losers_tree(layout: &mut Layout, winners: &[Vec<usize>]) -> Option<usize> {
    if winners.len() < 2 {
        return None;
    }
    let mut round = 1;
    let mut current: Vec<usize> = winners[0]
        .chunks_exact(2)
        .map(|pair| layout.push(round, true, [Source::Loser(pair[0]), Source::Loser(pair[1])]))
        .collect();

    for (j, dropping) in winners.iter().enumerate().skip(1) {
        round += 1;
        // Alternate the drop order so first-round opponents are kept apart.
        let order: Vec<usize> = if j % 2 == 1 {
            dropping.iter().rev().copied().collect()
        } else {
            dropping.clone()
        };
        current = current
            .iter()
            .zip(order)
            .map(|(&survivor, dropped)| {
                layout.push(round, true, [Source::Winner(survivor), Source::Loser(dropped)])
            })
            .collect();

        if j + 1 < winners.len() {
            round += 1;
            current = current
                .chunks_exact(2)
                .map(|pair| layout.push(round, true, [Source::Winner(pair[0]), Source::Winner(pair[1])]))
                .collect();
        }
    }
    current.first().copied()
}

/// Turn templates into matches, dropping those without two real inputs and linking the rest.
fn materialize(templates: &[Template], entrants: &[RegistrationId]) -> Vec<GameMatch> {
    let mut matches: Vec<GameMatch> = Vec::new();
    let mut winner_of: Vec<Resolved> = Vec::with_capacity(templates.len());
    let mut loser_of: Vec<Resolved> = Vec::with_capacity(templates.len());

    for template in templates {
        let inputs = template.inputs.map(|source| match source {
            Source::Entrant(i) => Resolved::Entrant(i),
            Source::Winner(t) => winner_of[t],
            Source::Loser(t) => loser_of[t],
            Source::Bye => Resolved::Empty,
        });

        match inputs {
            [Resolved::Empty, Resolved::Empty] => {
                winner_of.push(Resolved::Empty);
                loser_of.push(Resolved::Empty);
            }
            [only, Resolved::Empty] | [Resolved::Empty, only] => {
                winner_of.push(only);
                loser_of.push(Resolved::Empty);
            }
            [first, second] => {
                let id = matches.len();
                let mut m = GameMatch::new(id, template.round, template.is_loser_bracket);
                for (slot, input) in [first, second].into_iter().enumerate() {
                    match input {
                        Resolved::Entrant(i) if slot == 0 => m.team_1 = Some(entrants[i]),
                        Resolved::Entrant(i) => m.team_2 = Some(entrants[i]),
                        Resolved::WinnerOf(src) => matches[src].next_match = Some(id),
                        Resolved::LoserOf(src) => matches[src].next_match_loser = Some(id),
                        Resolved::Empty => {}
                    }
                }
                matches.push(m);
                winner_of.push(Resolved::WinnerOf(id));
                loser_of.push(Resolved::LoserOf(id));
            }
        }
    }
    matches
}
