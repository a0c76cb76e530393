use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::engine::EngineConfig;
use crate::leagues::DEFAULT_SEASON;
use crate::score_matrix::DEFAULT_MATRIX_SIZE;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub season: String,
    pub data_dir: PathBuf,
    pub log_dir: PathBuf,
    pub matrix_size: usize,
    pub form_games: usize,
    pub http_timeout: Duration,
    pub offline: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            season: DEFAULT_SEASON.to_string(),
            data_dir: PathBuf::from("data"),
            log_dir: PathBuf::from("logs"),
            matrix_size: DEFAULT_MATRIX_SIZE,
            form_games: 5,
            http_timeout: Duration::from_secs(10),
            offline: false,
        }
    }
}

impl AppConfig {
    /// Reads `.env.local` / `.env` (first one wins per key) and then the
    /// process environment.
    pub fn load() -> Self {
        let _ = dotenvy::from_filename(".env.local");
        let _ = dotenvy::from_filename(".env");
        Self::from_env()
    }

    pub fn from_env() -> Self {
        let defaults = Self::default();
        let season = env::var("TIPSTER_SEASON")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.season);
        let data_dir = opt_path_env("TIPSTER_DATA_DIR").unwrap_or(defaults.data_dir);
        let log_dir = opt_path_env("TIPSTER_LOG_DIR").unwrap_or(defaults.log_dir);
        let matrix_size = env::var("TIPSTER_MATRIX_SIZE")
            .ok()
            .and_then(|val| val.parse::<usize>().ok())
            .unwrap_or(defaults.matrix_size)
            .clamp(1, 15);
        let form_games = env::var("TIPSTER_FORM_GAMES")
            .ok()
            .and_then(|val| val.parse::<usize>().ok())
            .unwrap_or(defaults.form_games)
            .clamp(1, 38);
        let http_timeout = Duration::from_secs(
            env::var("HTTP_TIMEOUT_SECS")
                .ok()
                .and_then(|val| val.parse::<u64>().ok())
                .unwrap_or(defaults.http_timeout.as_secs())
                .max(2),
        );
        let offline = env::var("TIPSTER_OFFLINE")
            .map(|val| parse_flag(&val))
            .unwrap_or(false);

        Self {
            season,
            data_dir,
            log_dir,
            matrix_size,
            form_games,
            http_timeout,
            offline,
        }
    }

    pub fn engine(&self) -> EngineConfig {
        EngineConfig {
            matrix_size: self.matrix_size,
        }
    }
}

fn opt_path_env(key: &str) -> Option<PathBuf> {
    let raw = env::var(key).ok()?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(PathBuf::from(trimmed))
    }
}

fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
