//! Integration tests for the tournament store, configuration and CSV export.

mod common;

use beach_tournament_web::logic::{record_match_score, register, start_tournament, NewRegistration, ScoreReport};
use beach_tournament_web::models::TournamentType;
use beach_tournament_web::{
    standings_csv, AppConfig, ScoringRules, TournamentError, TournamentFormat, TournamentStore,
};
use chrono::Utc;
use common::{closed_tournament, open_tournament};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashMap;
use uuid::Uuid;

#[test]
fn failed_transaction_leaves_tournament_untouched() {
    let store = TournamentStore::new();
    let id = store
        .insert(open_tournament(TournamentType::Singles, TournamentFormat::SingleElimination, 8))
        .unwrap();

    let result: Result<(), TournamentError> = store.transact(id, |t| {
        register(
            t,
            NewRegistration {
                player_1: Uuid::new_v4(),
                player_2: None,
                team_name: None,
                notes: None,
            },
            Utc::now(),
        )?;
        Err(TournamentError::ResultConflict)
    });
    assert_eq!(result, Err(TournamentError::ResultConflict));

    let stored = store.get(id).unwrap();
    assert_eq!(stored.current_participants, 0);
    assert!(stored.registrations.is_empty());
}

#[test]
fn successful_transaction_is_committed() {
    let store = TournamentStore::new();
    let (t, _) = closed_tournament(TournamentType::Singles, TournamentFormat::SingleElimination, 4);
    let id = store.insert(t).unwrap();
    store
        .transact(id, |t| start_tournament(t, Utc::now(), &mut StdRng::seed_from_u64(1)))
        .unwrap();
    assert!(store.get(id).unwrap().bracket.is_some());
    assert_eq!(store.len(), 1);
    assert_eq!(store.list().unwrap().len(), 1);
}

#[test]
fn unknown_tournament() {
    let store = TournamentStore::new();
    let id = Uuid::new_v4();
    assert!(store.is_empty());
    assert_eq!(store.get(id).unwrap_err(), TournamentError::TournamentNotFound(id));
    assert_eq!(
        store.transact(id, |_| Ok(())),
        Err(TournamentError::TournamentNotFound(id))
    );
}

#[test]
fn config_falls_back_on_bad_values() {
    let env: HashMap<&str, &str> = [
        ("PORT", "not-a-port"),
        ("HOST", "127.0.0.1"),
        ("SCORE_MATCH_WIN", "2"),
        ("SCORE_SET_WON", "x"),
        ("STATIC_DIR", "frontend/dist"),
    ]
    .into_iter()
    .collect();
    let config = AppConfig::from_lookup(|key| env.get(key).map(|v| v.to_string()));
    assert_eq!(config.port, 8080);
    assert_eq!(config.host, "127.0.0.1");
    assert_eq!(config.static_dir.as_deref(), Some("frontend/dist"));
    assert_eq!(
        config.scoring,
        ScoringRules {
            match_win: 2,
            ..ScoringRules::default()
        }
    );
}

#[test]
fn config_defaults() {
    let config = AppConfig::from_lookup(|_| None);
    assert_eq!(config, AppConfig::default());
    assert_eq!(config.scoring.match_win, 3);
}

#[test]
fn standings_export_is_ranked_csv() {
    let (mut t, ids) = closed_tournament(TournamentType::Singles, TournamentFormat::SingleElimination, 2);
    start_tournament(&mut t, Utc::now(), &mut StdRng::seed_from_u64(1)).unwrap();
    let report = ScoreReport {
        team_1_score: 1,
        team_2_score: 2,
        ..ScoreReport::default()
    };
    record_match_score(&mut t, 0, report, Utc::now()).unwrap();

    let csv = standings_csv(&t).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("rank,player_id,team_name,total_points"));
    let winner = t.registration(ids[1]).unwrap().player_1.to_string();
    assert!(lines[1].starts_with(&format!("1,{winner},,3,1,0,1,100")));
}
