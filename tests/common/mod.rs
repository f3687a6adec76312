//! Shared fixtures: tournaments taken through sign-up to a chosen point.
#![allow(dead_code)]

use beach_tournament_web::logic::{change_status, confirm_registration, register, NewRegistration};
use beach_tournament_web::models::{NewTournament, ScoringRules, TournamentType};
use beach_tournament_web::{
    create_tournament, PlayerId, RegistrationId, Tournament, TournamentFormat, TournamentStatus,
};
use chrono::{Duration, Utc};
use uuid::Uuid;

pub fn new_tournament(tournament_type: TournamentType, format: TournamentFormat, max: u32) -> NewTournament {
    let now = Utc::now();
    NewTournament {
        name: "Summer Open".to_string(),
        description: None,
        tournament_type,
        format,
        location: "Copacabana".to_string(),
        start_date: now + Duration::days(10),
        end_date: None,
        registration_deadline: now + Duration::days(5),
        max_participants: max,
        min_participants: 2,
        courts: vec!["Center".to_string(), "Court 2".to_string()],
        scoring: None,
    }
}

/// A tournament open for registration.
pub fn open_tournament(tournament_type: TournamentType, format: TournamentFormat, max: u32) -> Tournament {
    let now = Utc::now();
    let mut t = create_tournament(new_tournament(tournament_type, format, max), ScoringRules::default(), now).unwrap();
    change_status(&mut t, TournamentStatus::OpenForRegistration, now).unwrap();
    t
}

/// Register and confirm one player (or team when the type needs a partner).
pub fn sign_up(t: &mut Tournament) -> RegistrationId {
    let partner = t.requires_partner().then(Uuid::new_v4);
    let request = NewRegistration {
        player_1: Uuid::new_v4(),
        player_2: partner,
        team_name: None,
        notes: None,
    };
    let id = register(t, request, Utc::now()).unwrap();
    confirm_registration(t, id, Utc::now()).unwrap();
    id
}

/// A tournament with `n` confirmed entrants and registration closed, ready to start.
pub fn closed_tournament(
    tournament_type: TournamentType,
    format: TournamentFormat,
    n: usize,
) -> (Tournament, Vec<RegistrationId>) {
    let mut t = open_tournament(tournament_type, format, 64);
    let ids = (0..n).map(|_| sign_up(&mut t)).collect();
    change_status(&mut t, TournamentStatus::RegistrationClosed, Utc::now()).unwrap();
    (t, ids)
}

pub fn primary_player(t: &Tournament, id: RegistrationId) -> PlayerId {
    t.registration(id).unwrap().player_1
}
