pub mod commands;
pub mod core;
pub mod db;
pub mod generation;
pub mod protocol;
pub mod providers;
pub mod security;
pub mod storyboard;
pub mod studio;

use std::{path::PathBuf, sync::Arc};

use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::{
    core::errors::AppResult,
    db::{default_data_dir, Database},
    generation::ContentGenerator,
    providers::gemini::GeminiClient,
    studio::StudioService,
};

fn log_level_from_env() -> &'static str {
    match std::env::var("STORYBOARD_LOG")
        .unwrap_or_else(|_| "info".to_string())
        .to_ascii_lowercase()
        .as_str()
    {
        "trace" => "trace",
        "debug" => "debug",
        "warn" => "warn",
        "error" => "error",
        _ => "info",
    }
}

fn sqlx_debug_enabled() -> bool {
    matches!(
        std::env::var("STORYBOARD_SQLX_DEBUG")
            .unwrap_or_default()
            .to_ascii_lowercase()
            .as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Logs go to stderr; stdout carries the protocol.
pub fn init_tracing() {
    let level = log_level_from_env();
    let directives = if sqlx_debug_enabled() {
        level.to_string()
    } else {
        format!("{level},sqlx::query=warn")
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(directives))
        .with_writer(std::io::stderr)
        .try_init();
}

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub studio: StudioService,
    pub gemini: GeminiClient,
    pub data_dir: PathBuf,
}

impl AppState {
    pub fn new(
        db: Database,
        generator: Arc<dyn ContentGenerator>,
        gemini: GeminiClient,
        data_dir: PathBuf,
    ) -> Self {
        Self {
            db,
            studio: StudioService::new(generator),
            gemini,
            data_dir,
        }
    }

    /// Production wiring: on-disk settings database and Gemini as the
    /// generation collaborator.
    pub async fn open(data_dir: PathBuf) -> AppResult<Self> {
        let db = Database::new(&data_dir).await?;
        let gemini = GeminiClient::new()?;
        Ok(Self::new(db, Arc::new(gemini.clone()), gemini, data_dir))
    }
}

pub async fn run() -> AppResult<()> {
    init_tracing();
    let data_dir = default_data_dir(None)?;
    let state = AppState::open(data_dir.clone()).await?;
    info!(data_dir = %data_dir.display(), "storyboard studio backend ready");

    let stdin = BufReader::new(tokio::io::stdin());
    protocol::serve(state, stdin, tokio::io::stdout()).await?;
    info!("stdin closed, shutting down");
    Ok(())
}
