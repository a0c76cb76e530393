use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};

use tipster_terminal::advisor::get_match_suggestion;
use tipster_terminal::config::AppConfig;
use tipster_terminal::engine::StatisticalEngine;
use tipster_terminal::football_data::load_csv_file;
use tipster_terminal::form::Venue;
use tipster_terminal::leagues::{DEFAULT_SEASON, LEAGUES, League, LeagueContext};
use tipster_terminal::logging::init_stderr_tracing;

const USAGE: &str = "usage: predict <csv> <home> <away> [--matrix-size N] [--league CODE]";

struct Args {
    csv: PathBuf,
    home: String,
    away: String,
    matrix_size: Option<usize>,
    league: League,
}

fn main() -> Result<()> {
    init_stderr_tracing();
    let cfg = AppConfig::load();
    let args = parse_args(std::env::args().skip(1).collect())?;

    let dataset = load_csv_file(&args.csv)?;
    let context = LeagueContext::new(args.league, DEFAULT_SEASON, dataset);
    let mut config = cfg.engine();
    if let Some(size) = args.matrix_size {
        config.matrix_size = size;
    }
    let engine = StatisticalEngine::new(context, config)
        .with_context(|| format!("build engine from {}", args.csv.display()))?;

    // Data shortages are a normal outcome here, not a failure of the tool.
    let suggestion = match get_match_suggestion(&engine, &args.home, &args.away) {
        Ok(s) => s,
        Err(err) => {
            println!("{} vs {}", args.home, args.away);
            if err.is_insufficient_data() {
                println!("Insufficient data for analysis: {err}");
            } else {
                println!("Cannot analyse fixture: {err}");
            }
            return Ok(());
        }
    };
    let bundle = &suggestion.bundle;

    println!("{}", suggestion.title());
    println!("Matches: {}", engine.dataset().len());
    println!(
        "Attack:  {:>6.2} {:>6.2}",
        bundle.home_strength.attack_home, bundle.away_strength.attack_away
    );
    println!(
        "Defense: {:>6.2} {:>6.2}",
        bundle.home_strength.defense_home, bundle.away_strength.defense_away
    );
    println!("xG:      {:>6.2} {:>6.2}", bundle.lambda_home, bundle.lambda_away);
    println!(
        "1X2:     {:.1}% / {:.1}% / {:.1}%",
        bundle.outcomes.home, bundle.outcomes.draw, bundle.outcomes.away
    );
    let (h, a, p) = bundle.matrix.most_likely_score();
    println!("Most likely score: {h}-{a} ({:.1}%)", p * 100.0);
    println!(
        "Corners: {:.2} + {:.2} = {:.2}",
        bundle.secondary.corners_home, bundle.secondary.corners_away, bundle.secondary.corners_total
    );
    println!(
        "Cards:   {:.2} + {:.2} = {:.2}",
        bundle.secondary.cards_home, bundle.secondary.cards_away, bundle.secondary.cards_total
    );
    if let Some(reason) = bundle.secondary_fallback.as_ref() {
        println!("  (corners/cards unavailable: {reason})");
    }

    for (team, venue) in [(&args.home, Venue::Home), (&args.away, Venue::Away)] {
        if let Ok(form) = engine.team_form(team, cfg.form_games, venue) {
            println!("{}: {}", form.team, form.summary());
        }
    }

    println!();
    if suggestion.tips.is_empty() {
        println!("No clear opportunities.");
    }
    for tip in &suggestion.tips {
        println!(
            "[{}] {} | prob {} | fair odds {} | {}",
            tip.market.label(),
            tip.selection,
            tip.probability,
            tip.fair_odds,
            tip.confidence.label()
        );
    }
    Ok(())
}

fn parse_args(raw: Vec<String>) -> Result<Args> {
    let mut positional = Vec::new();
    let mut matrix_size = None;
    let mut league = None;

    let mut iter = raw.into_iter();
    while let Some(arg) = iter.next() {
        if let Some(value) = arg.strip_prefix("--matrix-size=") {
            matrix_size = Some(parse_size(value)?);
        } else if arg == "--matrix-size" {
            let value = iter.next().ok_or_else(|| anyhow!("--matrix-size needs a value"))?;
            matrix_size = Some(parse_size(&value)?);
        } else if let Some(value) = arg.strip_prefix("--league=") {
            league = Some(parse_league(value)?);
        } else if arg == "--league" {
            let value = iter.next().ok_or_else(|| anyhow!("--league needs a value"))?;
            league = Some(parse_league(&value)?);
        } else {
            positional.push(arg);
        }
    }

    let mut positional = positional.into_iter();
    let (Some(csv), Some(home), Some(away)) =
        (positional.next(), positional.next(), positional.next())
    else {
        return Err(anyhow!(USAGE));
    };
    Ok(Args {
        csv: PathBuf::from(csv),
        home,
        away,
        matrix_size,
        league: league.unwrap_or(LEAGUES[0]),
    })
}

fn parse_size(value: &str) -> Result<usize> {
    let size = value
        .trim()
        .parse::<usize>()
        .with_context(|| format!("invalid matrix size {value:?}"))?;
    if size == 0 {
        return Err(anyhow!("matrix size must be at least 1"));
    }
    Ok(size)
}

fn parse_league(code: &str) -> Result<League> {
    League::by_code(code.trim()).ok_or_else(|| anyhow!("unknown league code {code:?}"))
}
