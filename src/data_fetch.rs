use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::football_data::{load_csv_file, parse_results_csv};
use crate::http_cache::{BodySource, cached_body, fetch_text_cached};
use crate::http_client::http_client;
use crate::leagues::{League, LeagueContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    Download,
    NotModified,
    StaleCache,
    LocalFile,
}

impl DataSource {
    pub fn label(self) -> &'static str {
        match self {
            DataSource::Download => "downloaded",
            DataSource::NotModified => "up to date",
            DataSource::StaleCache => "cached copy (offline)",
            DataSource::LocalFile => "local file",
        }
    }
}

impl From<BodySource> for DataSource {
    fn from(src: BodySource) -> Self {
        match src {
            BodySource::Network => DataSource::Download,
            BodySource::NotModified => DataSource::NotModified,
            BodySource::StaleCache => DataSource::StaleCache,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoadedLeague {
    pub context: LeagueContext,
    pub source: DataSource,
    pub local_path: Option<PathBuf>,
}

/// Fetch one league season, keep a local CSV copy and parse it.
///
/// Falls back to the cached body and then to the local copy when the
/// download fails or `offline` is set.
pub fn load_league(cfg: &AppConfig, league: League) -> Result<LoadedLeague> {
    let url = league.csv_url(&cfg.season);
    let local = league.local_csv_path(&cfg.data_dir, &cfg.season);

    if !cfg.offline {
        match download(cfg, &url) {
            Ok((body, source)) => {
                let dataset = parse_results_csv(&body)
                    .with_context(|| format!("parse {} data", league.name))?;
                let local_path = match save_local(&local, &body) {
                    Ok(()) => Some(local.clone()),
                    Err(err) => {
                        warn!(path = %local.display(), error = %err, "could not save local copy");
                        None
                    }
                };
                info!(league = league.code, matches = dataset.len(), source = source.label(), "league loaded");
                return Ok(LoadedLeague {
                    context: LeagueContext::new(league, cfg.season.clone(), dataset),
                    source,
                    local_path,
                });
            }
            Err(err) => {
                warn!(league = league.code, error = %err, "download failed, trying local copy");
            }
        }
    } else if let Some(body) = cached_body(&url) {
        let dataset = parse_results_csv(&body)?;
        return Ok(LoadedLeague {
            context: LeagueContext::new(league, cfg.season.clone(), dataset),
            source: DataSource::StaleCache,
            local_path: None,
        });
    }

    if !local.exists() {
        return Err(anyhow!(
            "no data for {} ({}): download failed and {} does not exist",
            league.name,
            league.code,
            local.display()
        ));
    }
    let dataset = load_csv_file(&local)?;
    info!(league = league.code, matches = dataset.len(), "league loaded from local file");
    Ok(LoadedLeague {
        context: LeagueContext::new(league, cfg.season.clone(), dataset),
        source: DataSource::LocalFile,
        local_path: Some(local),
    })
}

fn download(cfg: &AppConfig, url: &str) -> Result<(String, DataSource)> {
    let client = http_client(cfg.http_timeout)?;
    let fetched = fetch_text_cached(client, url)?;
    Ok((fetched.body, fetched.source.into()))
}

/// Write via a temp file so a crash never leaves a truncated CSV behind.
pub fn save_local(path: &Path, body: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    let tmp = path.with_extension("csv.tmp");
    fs::write(&tmp, body).with_context(|| format!("write {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("swap {}", path.display()))?;
    Ok(())
}
