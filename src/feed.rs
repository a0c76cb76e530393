use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender};
use std::thread;

use tracing::{error, info};

use crate::config::AppConfig;
use crate::data_fetch::load_league;
use crate::engine::StatisticalEngine;
use crate::state::{Delta, ProviderCommand};

/// Loader thread: downloads and parses leagues on request so the UI never
/// blocks on the network. Exits when the command channel closes.
pub fn spawn_provider(cfg: AppConfig, tx: Sender<Delta>, cmd_rx: Receiver<ProviderCommand>) {
    thread::spawn(move || {
        while let Ok(cmd) = cmd_rx.recv() {
            let delta = handle_command(&cfg, cmd);
            if tx.send(delta).is_err() {
                break;
            }
        }
        info!("provider thread stopped");
    });
}

pub fn handle_command(cfg: &AppConfig, cmd: ProviderCommand) -> Delta {
    match cmd {
        ProviderCommand::LoadLeague(league) => {
            let loaded = match load_league(cfg, league) {
                Ok(loaded) => loaded,
                Err(err) => {
                    let msg = format!("{err:#}");
                    error!(league = league.code, error = %msg, "league load failed");
                    return Delta::LoadFailed { league, error: msg };
                }
            };
            match StatisticalEngine::new(loaded.context, cfg.engine()) {
                Ok(engine) => Delta::LeagueReady {
                    engine: Arc::new(engine),
                    source: loaded.source,
                },
                Err(err) => Delta::LoadFailed {
                    league,
                    error: err.to_string(),
                },
            }
        }
    }
}
