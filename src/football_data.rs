// football-data.co.uk results files.
//
// Only a handful of the ~100 columns are used; everything else (betting
// odds, referee, kick-off time) is ignored by the deserializer.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::dataset::{Dataset, MatchRecord};

#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct RawResultRow {
    #[serde(default)]
    Date: String,
    #[serde(default)]
    HomeTeam: String,
    #[serde(default)]
    AwayTeam: String,
    #[serde(default)]
    FTHG: Option<u32>,
    #[serde(default)]
    FTAG: Option<u32>,
    #[serde(default)]
    FTR: Option<String>,
    #[serde(default)]
    HST: Option<u32>,
    #[serde(default)]
    AST: Option<u32>,
    #[serde(default)]
    HC: Option<u32>,
    #[serde(default)]
    AC: Option<u32>,
    #[serde(default)]
    HY: Option<u32>,
    #[serde(default)]
    AY: Option<u32>,
    #[serde(default)]
    HR: Option<u32>,
    #[serde(default)]
    AR: Option<u32>,
}

pub fn load_csv_file(path: &Path) -> Result<Dataset> {
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    parse_results_csv(&raw).with_context(|| format!("parse {}", path.display()))
}

pub fn parse_results_csv(raw: &str) -> Result<Dataset> {
    let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(raw.as_bytes());

    let headers = reader.headers().context("read csv header")?.clone();
    for required in ["Date", "HomeTeam", "AwayTeam", "FTHG", "FTAG"] {
        if !headers.iter().any(|h| h == required) {
            return Err(anyhow!("missing required column {required}"));
        }
    }

    let mut records = Vec::new();
    let mut skipped = 0usize;
    for (idx, row) in reader.deserialize::<RawResultRow>().enumerate() {
        let row = match row {
            Ok(row) => row,
            Err(err) => {
                warn!(row = idx + 2, error = %err, "skipping malformed row");
                skipped += 1;
                continue;
            }
        };
        match into_record(row) {
            Some(record) => records.push(record),
            None => skipped += 1,
        }
    }

    if records.is_empty() {
        return Err(anyhow!("no completed matches found"));
    }
    debug!(matches = records.len(), skipped, "parsed results csv");
    Ok(Dataset::new(records))
}

fn into_record(row: RawResultRow) -> Option<MatchRecord> {
    if row.HomeTeam.is_empty() || row.AwayTeam.is_empty() {
        return None;
    }
    let (Some(goals_home), Some(goals_away)) = (row.FTHG, row.FTAG) else {
        return None;
    };
    let Some(date) = parse_match_date(&row.Date) else {
        warn!(date = %row.Date, home = %row.HomeTeam, away = %row.AwayTeam, "skipping row with bad date");
        return None;
    };

    Some(MatchRecord {
        date,
        home_team: row.HomeTeam,
        away_team: row.AwayTeam,
        goals_home,
        goals_away,
        result: row.FTR.as_deref().and_then(|r| r.chars().next()),
        shots_on_target_home: row.HST,
        shots_on_target_away: row.AST,
        corners_home: row.HC,
        corners_away: row.AC,
        cards_home: cards(row.HY, row.HR),
        cards_away: cards(row.AY, row.AR),
    })
}

fn cards(yellow: Option<u32>, red: Option<u32>) -> Option<u32> {
    match (yellow, red) {
        (None, None) => None,
        (y, r) => Some(y.unwrap_or(0) + r.unwrap_or(0)),
    }
}

/// Day-first dates, with either a two- or four-digit year.
pub fn parse_match_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let year = raw.rsplit('/').next()?;
    let fmt = if year.len() == 2 { "%d/%m/%y" } else { "%d/%m/%Y" };
    NaiveDate::parse_from_str(raw, fmt).ok()
}
