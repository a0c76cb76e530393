use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::{Result, anyhow};

use tipster_terminal::config::AppConfig;
use tipster_terminal::data_fetch::load_league;
use tipster_terminal::leagues::{LEAGUES, League, season_label};
use tipster_terminal::logging::init_stderr_tracing;

fn main() -> Result<()> {
    init_stderr_tracing();
    let args = std::env::args().skip(1).collect::<Vec<_>>();

    let mut cfg = AppConfig::load();
    if let Some(season) = arg_value(&args, "--season") {
        cfg.season = season;
    }
    if let Some(dir) = arg_value(&args, "--data-dir") {
        cfg.data_dir = PathBuf::from(dir);
    }
    let leagues = match arg_value(&args, "--leagues") {
        Some(raw) => parse_codes(&raw)?,
        None => LEAGUES.to_vec(),
    };
    if leagues.is_empty() {
        return Err(anyhow!("no leagues resolved for ingest"));
    }

    let mut ok = 0usize;
    let mut errors = Vec::new();
    for league in &leagues {
        match load_league(&cfg, *league) {
            Ok(loaded) => {
                ok += 1;
                let dataset = &loaded.context.dataset;
                let span = dataset
                    .date_range()
                    .map(|(first, last)| format!("{first} .. {last}"))
                    .unwrap_or_else(|| "n/a".to_string());
                println!(
                    "{:<4} {:<32} matches={:<4} teams={:<3} {} [{}]",
                    league.code,
                    league.name,
                    dataset.len(),
                    dataset.list_teams().len(),
                    span,
                    loaded.source.label()
                );
                if let Some(path) = loaded.local_path.as_ref() {
                    println!("     saved {}", path.display());
                }
            }
            Err(err) => errors.push(format!("{}: {err:#}", league.code)),
        }
    }

    println!();
    println!("Ingest complete");
    println!("Season: {}", season_label(&cfg.season));
    println!("Data dir: {}", cfg.data_dir.display());
    println!("Leagues: {ok}/{}", leagues.len());
    if !errors.is_empty() {
        println!("  errors: {}", errors.len());
        for err in &errors {
            println!("   - {err}");
        }
    }
    Ok(())
}

fn arg_value(args: &[String], flag: &str) -> Option<String> {
    let prefix = format!("{flag}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(raw) = arg.strip_prefix(&prefix) {
            let trimmed = raw.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if arg == flag
            && let Some(next) = args.get(idx + 1)
            && !next.trim().is_empty()
        {
            return Some(next.trim().to_string());
        }
    }
    None
}

fn parse_codes(raw: &str) -> Result<Vec<League>> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for code in raw.split([',', ';', ' ']).map(str::trim).filter(|c| !c.is_empty()) {
        let league =
            League::by_code(code).ok_or_else(|| anyhow!("unknown league code {code:?}"))?;
        if seen.insert(league.code) {
            out.push(league);
        }
    }
    Ok(out)
}
