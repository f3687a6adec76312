//! Integration tests for the American format: round generation, partner rotation, sit-outs.

mod common;

use beach_tournament_web::logic::{
    change_status, check_round, generate_next_round, plan_round, record_pairing_score,
    start_tournament, RotationHistory, ScoreReport,
};
use beach_tournament_web::models::{ErrorKind, Pairing, RoundStatus, Side, TournamentType};
use beach_tournament_web::{PlayerId, Tournament, TournamentError, TournamentFormat, TournamentStatus};
use chrono::Utc;
use common::closed_tournament;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

fn american(n: usize, rng: &mut StdRng) -> Tournament {
    let (mut t, _) = closed_tournament(TournamentType::American, TournamentFormat::American, n);
    start_tournament(&mut t, Utc::now(), rng).unwrap();
    t
}

fn report(a: u32, b: u32) -> ScoreReport {
    ScoreReport {
        team_1_score: a,
        team_2_score: b,
        ..ScoreReport::default()
    }
}

/// Score every pairing of the latest round, team A winning the even-numbered ones.
fn finish_round(t: &mut Tournament) {
    let round = t.rounds.last().unwrap();
    let number = round.number;
    for index in 0..round.pairings.len() {
        let (a, b) = if index % 2 == 0 { (6, 3) } else { (2, 6) };
        record_pairing_score(t, number, index, report(a, b), Utc::now()).unwrap();
    }
}

fn teammates(t: &Tournament) -> Vec<(PlayerId, PlayerId)> {
    t.rounds
        .iter()
        .flat_map(|r| &r.pairings)
        .flat_map(|p| [p.team_a, p.team_b])
        .map(|[x, y]| if x <= y { (x, y) } else { (y, x) })
        .collect()
}

#[test]
fn pairing_winner_follows_the_score() {
    let ids: Vec<Uuid> = (0..4).map(|_| Uuid::new_v4()).collect();
    let mut pairing = Pairing::new([ids[0], ids[1]], [ids[2], ids[3]], None);
    assert_eq!(pairing.winner(), None);
    pairing.team_a_score = Some(6);
    pairing.team_b_score = Some(3);
    assert_eq!(pairing.winner(), Some(Side::A));
    pairing.team_b_score = Some(4);
    pairing.team_a_score = Some(4);
    assert_eq!(pairing.winner(), None);
}

#[test]
fn first_round_uses_every_court() {
    let mut rng = StdRng::seed_from_u64(42);
    let t = american(8, &mut rng);
    assert_eq!(t.status, TournamentStatus::InProgress);
    assert_eq!(t.rounds.len(), 1);
    let round = &t.rounds[0];
    assert_eq!(round.status, RoundStatus::Pending);
    assert_eq!(round.pairings.len(), 2);
    assert!(round.sitting_out.is_empty());
    let courts: Vec<_> = round.pairings.iter().map(|p| p.court.clone().unwrap()).collect();
    assert_eq!(courts, vec!["Center".to_string(), "Court 2".to_string()]);
    check_round(&round.pairings, &round.sitting_out).unwrap();
}

#[test]
fn eight_players_never_repeat_a_teammate_in_three_rounds() {
    let mut rng = StdRng::seed_from_u64(2024);
    let mut t = american(8, &mut rng);
    finish_round(&mut t);
    for _ in 0..2 {
        generate_next_round(&mut t, Utc::now(), &mut rng).unwrap();
        finish_round(&mut t);
    }
    let pairs = teammates(&t);
    assert_eq!(pairs.len(), 12);
    let distinct: HashSet<_> = pairs.iter().collect();
    assert_eq!(distinct.len(), pairs.len());
}

#[test]
fn eight_players_meet_every_partner_once_in_seven_rounds() {
    for seed in 0..20 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut t = american(8, &mut rng);
        finish_round(&mut t);
        for _ in 0..6 {
            generate_next_round(&mut t, Utc::now(), &mut rng).unwrap();
            finish_round(&mut t);
        }
        let pairs = teammates(&t);
        assert_eq!(pairs.len(), 28);
        let distinct: HashSet<_> = pairs.iter().collect();
        assert_eq!(distinct.len(), 28, "seed {seed} repeated a teammate");
    }
}

#[test]
fn planner_looks_past_the_ranked_group() {
    let ids: Vec<Uuid> = (0..8).map(|_| Uuid::new_v4()).collect();
    let mut history = RotationHistory::default();
    // The top group has used up every split among itself.
    history.record_pairing(&Pairing::new([ids[0], ids[3]], [ids[1], ids[2]], None));
    history.record_pairing(&Pairing::new([ids[0], ids[2]], [ids[1], ids[3]], None));
    history.record_pairing(&Pairing::new([ids[0], ids[1]], [ids[2], ids[3]], None));
    let plan = plan_round(&ids, &history, &[]).unwrap();
    assert_eq!(plan.pairings.len(), 2);
    for pairing in &plan.pairings {
        for [x, y] in [pairing.team_a, pairing.team_b] {
            assert_eq!(history.teammate_count(x, y), 0);
        }
    }
    let players: HashSet<PlayerId> = plan.pairings.iter().flat_map(|p| p.players()).collect();
    assert_eq!(players.len(), 8);
}

#[test]
fn everyone_sits_out_once_before_anyone_twice() {
    let mut rng = StdRng::seed_from_u64(5);
    let mut t = american(6, &mut rng);
    finish_round(&mut t);
    for _ in 0..2 {
        generate_next_round(&mut t, Utc::now(), &mut rng).unwrap();
        finish_round(&mut t);
    }
    let mut sat_out: HashMap<PlayerId, u32> = HashMap::new();
    for round in &t.rounds {
        assert_eq!(round.sitting_out.len(), 2);
        assert_eq!(round.pairings.len(), 1);
        check_round(&round.pairings, &round.sitting_out).unwrap();
        for &p in &round.sitting_out {
            *sat_out.entry(p).or_default() += 1;
        }
    }
    assert_eq!(sat_out.len(), 6);
    assert!(sat_out.values().all(|&n| n == 1));
}

#[test]
fn next_round_waits_for_results() {
    let mut rng = StdRng::seed_from_u64(3);
    let mut t = american(8, &mut rng);
    assert_eq!(
        generate_next_round(&mut t, Utc::now(), &mut rng),
        Err(TournamentError::RoundInProgress(1))
    );
    record_pairing_score(&mut t, 1, 0, report(6, 2), Utc::now()).unwrap();
    assert_eq!(t.rounds[0].status, RoundStatus::InProgress);
    record_pairing_score(&mut t, 1, 1, report(6, 2), Utc::now()).unwrap();
    assert_eq!(t.rounds[0].status, RoundStatus::Completed);
    assert_eq!(generate_next_round(&mut t, Utc::now(), &mut rng), Ok(2));
}

#[test]
fn pairing_results_feed_standings() {
    let mut rng = StdRng::seed_from_u64(9);
    let mut t = american(4, &mut rng);
    let pairing = t.rounds[0].pairings[0].clone();
    let scored = ScoreReport {
        set_scores: Some("6-3, 3-6, 10-8".to_string()),
        ..report(2, 1)
    };
    record_pairing_score(&mut t, 1, 0, scored, Utc::now()).unwrap();
    for p in pairing.team_a {
        let row = t.standings.get(p).unwrap();
        assert_eq!((row.matches_won, row.sets_won, row.sets_lost, row.total_points), (1, 2, 1, 3));
    }
    for p in pairing.team_b {
        let row = t.standings.get(p).unwrap();
        assert_eq!((row.matches_lost, row.sets_won, row.sets_lost), (1, 1, 2));
    }

    assert_eq!(
        record_pairing_score(&mut t, 1, 0, report(1, 2), Utc::now()),
        Err(TournamentError::PairingAlreadyCompleted { round: 1, pairing: 0 })
    );
    let flipped = ScoreReport {
        correction: true,
        ..report(1, 2)
    };
    record_pairing_score(&mut t, 1, 0, flipped, Utc::now()).unwrap();
    let row = t.standings.get(pairing.team_a[0]).unwrap();
    assert_eq!((row.matches_won, row.matches_lost, row.sets_won, row.sets_lost), (0, 1, 0, 1));
}

#[test]
fn drawn_pairing_has_no_winner() {
    let mut rng = StdRng::seed_from_u64(11);
    let mut t = american(4, &mut rng);
    record_pairing_score(&mut t, 1, 0, report(4, 4), Utc::now()).unwrap();
    let pairing = &t.rounds[0].pairings[0];
    assert_eq!(pairing.winner(), None);
    for p in pairing.players() {
        assert_eq!(t.standings.get(p).unwrap().matches_played(), 0);
    }
}

#[test]
fn unknown_round_or_pairing() {
    let mut rng = StdRng::seed_from_u64(1);
    let mut t = american(4, &mut rng);
    assert_eq!(
        record_pairing_score(&mut t, 2, 0, report(6, 1), Utc::now()),
        Err(TournamentError::RoundNotFound(2))
    );
    assert_eq!(
        record_pairing_score(&mut t, 1, 5, report(6, 1), Utc::now()),
        Err(TournamentError::PairingNotFound { round: 1, pairing: 5 })
    );
}

#[test]
fn american_needs_four_players() {
    let mut rng = StdRng::seed_from_u64(1);
    let (mut t, _) = closed_tournament(TournamentType::American, TournamentFormat::American, 3);
    assert_eq!(
        start_tournament(&mut t, Utc::now(), &mut rng),
        Err(TournamentError::NotEnoughPlayers {
            required: 4,
            available: 3
        })
    );
    assert_eq!(t.status, TournamentStatus::RegistrationClosed);
}

#[test]
fn completing_waits_for_the_last_round() {
    let mut rng = StdRng::seed_from_u64(8);
    let mut t = american(4, &mut rng);
    assert_eq!(
        change_status(&mut t, TournamentStatus::Completed, Utc::now()),
        Err(TournamentError::RoundInProgress(1))
    );
    finish_round(&mut t);
    change_status(&mut t, TournamentStatus::Completed, Utc::now()).unwrap();
    assert_eq!(t.status, TournamentStatus::Completed);
}

#[test]
fn planner_avoids_previous_teammates() {
    let ids: Vec<Uuid> = (0..4).map(|_| Uuid::new_v4()).collect();
    let mut history = RotationHistory::default();
    // ad|bc already played.
    history.record_pairing(&Pairing::new([ids[0], ids[3]], [ids[1], ids[2]], None));
    let plan = plan_round(&ids, &history, &[]).unwrap();
    let pairing = &plan.pairings[0];
    assert_eq!(pairing.team_a, [ids[0], ids[2]]);
    assert_eq!(pairing.team_b, [ids[1], ids[3]]);
    assert_eq!(pairing.court.as_deref(), Some("Court 1"));
    assert_eq!(history.teammate_count(ids[3], ids[0]), 1);
    assert_eq!(history.opponent_count(ids[0], ids[1]), 1);
}

#[test]
fn round_with_a_player_twice_is_rejected() {
    let ids: Vec<Uuid> = (0..6).map(|_| Uuid::new_v4()).collect();
    let twice = Pairing::new([ids[0], ids[1]], [ids[2], ids[0]], None);
    let err = check_round(&[twice], &[]).unwrap_err();
    assert_eq!(err, TournamentError::PlayerRepeatedInRound(ids[0]));
    assert_eq!(err.kind(), ErrorKind::DataIntegrity);

    let first = Pairing::new([ids[0], ids[1]], [ids[2], ids[3]], None);
    let second = Pairing::new([ids[4], ids[5]], [ids[3], ids[1]], None);
    assert_eq!(
        check_round(&[first.clone(), second], &[]),
        Err(TournamentError::PlayerRepeatedInRound(ids[3]))
    );
    assert_eq!(
        check_round(&[first.clone()], &[ids[2]]),
        Err(TournamentError::PlayerRepeatedInRound(ids[2]))
    );
    assert_eq!(check_round(&[first], &[ids[4], ids[5]]), Ok(()));
}
