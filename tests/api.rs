//! HTTP tests: envelope shape, status codes, and a bracket played through the API.

use actix_web::{http::StatusCode, test, web::Data, App};
use beach_tournament_web::api::{self, AppState};
use beach_tournament_web::ScoringRules;
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use uuid::Uuid;

fn tournament_body(name: &str) -> Value {
    let now = Utc::now();
    json!({
        "name": name,
        "tournament_type": "singles",
        "format": "single_elimination",
        "location": "Ipanema",
        "start_date": now + Duration::days(7),
        "registration_deadline": now + Duration::days(3),
        "max_participants": 8
    })
}

macro_rules! app {
    () => {
        test::init_service(
            App::new()
                .app_data(Data::new(AppState::new(ScoringRules::default())))
                .configure(api::configure),
        )
        .await
    };
}

#[actix_web::test]
async fn health_is_wrapped_in_the_envelope() {
    let app = app!();
    let req = test::TestRequest::get().uri("/api/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["ok"], true);
    assert!(body.get("errors").is_none());
}

#[actix_web::test]
async fn invalid_tournament_lists_every_error() {
    let app = app!();
    let mut body = tournament_body("");
    body["max_participants"] = json!(500);
    let req = test::TestRequest::post()
        .uri("/api/tournaments")
        .set_json(&body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["errors"].as_array().map(Vec::len), Some(2));
}

#[actix_web::test]
async fn malformed_json_is_a_bad_request() {
    let app = app!();
    let req = test::TestRequest::post()
        .uri("/api/tournaments")
        .insert_header(("content-type", "application/json"))
        .set_payload("{ not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
}

#[actix_web::test]
async fn unknown_tournament_is_not_found() {
    let app = app!();
    let req = test::TestRequest::get()
        .uri(&format!("/api/tournaments/{}", Uuid::new_v4()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn bracket_played_through_the_api() {
    let app = app!();

    let req = test::TestRequest::post()
        .uri("/api/tournaments")
        .set_json(tournament_body("Beach Cup"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;
    let id = created["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(created["data"]["status"], "draft");
    assert_eq!(created["data"]["scoring"]["match_win"], 3);

    let base = format!("/api/tournaments/{id}");
    let req = test::TestRequest::put()
        .uri(&format!("{base}/status"))
        .set_json(json!({ "status": "open_for_registration" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["is_registration_open"], true);

    for _ in 0..4 {
        let req = test::TestRequest::post()
            .uri(&format!("{base}/registrations"))
            .set_json(json!({ "player_1": Uuid::new_v4() }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        let rid = body["data"]["id"].as_str().unwrap().to_string();
        let req = test::TestRequest::put()
            .uri(&format!("{base}/registrations/{rid}/payment"))
            .set_json(json!({ "payment_status": "paid" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["status"], "confirmed");
    }

    let req = test::TestRequest::put()
        .uri(&format!("{base}/status"))
        .set_json(json!({ "status": "registration_closed" }))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::post().uri(&format!("{base}/start")).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::post().uri(&format!("{base}/start")).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let req = test::TestRequest::get().uri(&format!("{base}/matches")).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let matches = body["data"].as_array().unwrap();
    assert_eq!(matches.len(), 3);
    assert_eq!(matches[2]["round_name"], "Final");

    let req = test::TestRequest::put()
        .uri(&format!("{base}/matches/0/score"))
        .set_json(json!({ "team_1_score": 2, "team_2_score": 2 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    for m in 0..3 {
        let req = test::TestRequest::put()
            .uri(&format!("{base}/matches/{m}/score"))
            .set_json(json!({ "team_1_score": 2, "team_2_score": 1, "set_scores": "6-4, 3-6, 6-2" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let req = test::TestRequest::get().uri(&base).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["status"], "completed");

    let req = test::TestRequest::get().uri(&format!("{base}/standings")).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let rows = body["data"].as_array().unwrap();
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[0]["rank"], 1);
    assert_eq!(rows[0]["matches_won"], 2);
    assert_eq!(rows[0]["win_rate"], 100.0);

    let req = test::TestRequest::get().uri(&format!("{base}/standings.csv")).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let csv = test::read_body(resp).await;
    assert_eq!(csv.iter().filter(|&&b| b == b'\n').count(), 5);
}

#[actix_web::test]
async fn rounds_endpoint_requires_american_format() {
    let app = app!();
    let req = test::TestRequest::post()
        .uri("/api/tournaments")
        .set_json(tournament_body("Not American"))
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri(&format!("/api/tournaments/{id}/rounds"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
}
