use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use std::sync::Arc;
use std::time::Instant;

mod config;
mod controllers;
mod notes;

use config::Config;
use notes::NoteStore;

pub struct AppState {
    pub store: Arc<NoteStore>,
    pub config: Config,
    pub started_at: Instant,
}

impl AppState {
    /// Build application state, creating the notes directory if needed
    pub fn new(config: Config) -> std::io::Result<Self> {
        let store = NoteStore::new(config.notes_dir.clone())?;
        Ok(Self {
            store: Arc::new(store),
            config,
            started_at: Instant::now(),
        })
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = Config::from_args();
    log::info!("Notes service v{}", env!("CARGO_PKG_VERSION"));

    let state = web::Data::new(AppState::new(config.clone()).map_err(|e| {
        log::error!("Failed to prepare notes directory {:?}: {}", config.notes_dir, e);
        e
    })?);
    log::info!("Storing notes in {}", state.store.notes_dir().display());

    let server = HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .app_data(state.clone())
            .wrap(Logger::default())
            .wrap(cors)
            .configure(controllers::health::config_routes)
            .configure(controllers::notes::config)
            .configure(controllers::upload_form::config)
    })
    .bind((config.host.as_str(), config.port))?
    .run();

    log::info!("Server running at http://{}:{}", config.host, config.port);

    server.await?;
    log::info!("Shutdown complete");
    Ok(())
}
