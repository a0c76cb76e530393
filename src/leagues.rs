use std::path::{Path, PathBuf};

const FOOTBALL_DATA_URL: &str = "https://www.football-data.co.uk/mmz4281";

pub const DEFAULT_SEASON: &str = "2526";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct League {
    pub name: &'static str,
    pub code: &'static str,
}

pub const LEAGUES: [League; 8] = [
    League {
        name: "Premier League (England)",
        code: "E0",
    },
    League {
        name: "Championship (England 2nd)",
        code: "E1",
    },
    League {
        name: "La Liga (Spain)",
        code: "SP1",
    },
    League {
        name: "Serie A (Italy)",
        code: "I1",
    },
    League {
        name: "Bundesliga (Germany)",
        code: "D1",
    },
    League {
        name: "Ligue 1 (France)",
        code: "F1",
    },
    League {
        name: "Liga Portugal (Portugal)",
        code: "P1",
    },
    League {
        name: "Eredivisie (Netherlands)",
        code: "N1",
    },
];

impl League {
    pub fn by_code(code: &str) -> Option<League> {
        let code = code.trim();
        LEAGUES
            .iter()
            .copied()
            .find(|l| l.code.eq_ignore_ascii_case(code))
    }

    pub fn csv_url(&self, season: &str) -> String {
        format!("{FOOTBALL_DATA_URL}/{season}/{}.csv", self.code)
    }

    /// `"La Liga (Spain)"` -> `"la_liga_spain"`.
    pub fn safe_name(&self) -> String {
        self.name
            .to_lowercase()
            .replace(' ', "_")
            .replace(['(', ')'], "")
    }

    pub fn local_csv_path(&self, data_dir: &Path, season: &str) -> PathBuf {
        data_dir.join(format!("{}_{season}.csv", self.safe_name()))
    }
}

/// A loaded league season. This is the only "current league" state; switching
/// leagues means building a new context and a new engine from it.
#[derive(Debug, Clone)]
pub struct LeagueContext {
    pub league: League,
    pub season: String,
    pub dataset: crate::dataset::Dataset,
}

impl LeagueContext {
    pub fn new(league: League, season: impl Into<String>, dataset: crate::dataset::Dataset) -> Self {
        Self {
            league,
            season: season.into(),
            dataset,
        }
    }

    pub fn label(&self) -> String {
        format!("{} {}", self.league.name, season_label(&self.season))
    }
}

/// `"2526"` -> `"25/26"`; anything else is returned unchanged.
pub fn season_label(season: &str) -> String {
    if season.len() == 4 && season.chars().all(|c| c.is_ascii_digit()) {
        format!("{}/{}", &season[..2], &season[2..])
    } else {
        season.to_string()
    }
}
