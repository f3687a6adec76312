//! Single binary web server: REST API under /api, optional frontend bundle from STATIC_DIR.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT, STATIC_DIR, and the
//! default scoring with SCORE_MATCH_WIN, SCORE_MATCH_LOSS, SCORE_SET_WON, SCORE_SET_LOST.

use actix_files::Files;
use actix_web::{get, web::Data, App, HttpResponse, HttpServer};
use beach_tournament_web::api::{self, AppState};
use beach_tournament_web::AppConfig;

/// Avoid 404 in browser tab: favicon not required for app logic.
#[get("/favicon.ico")]
async fn favicon() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = AppConfig::from_env();
    log::info!("Starting server at http://{}:{}", config.host, config.port);
    log::info!("Default scoring: {:?}", config.scoring);

    let state = Data::new(AppState::new(config.scoring));
    let static_dir = config.static_dir.clone();
    if let Some(dir) = &static_dir {
        log::info!("Serving frontend from {}", dir);
    }

    HttpServer::new(move || {
        let app = App::new()
            .app_data(state.clone())
            .configure(api::configure)
            .service(favicon);
        match &static_dir {
            Some(dir) => app.service(Files::new("/", dir).index_file("index.html")),
            None => app,
        }
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
