use std::collections::BTreeSet;

use chrono::NaiveDate;

/// One completed fixture.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchRecord {
    pub date: NaiveDate,
    pub home_team: String,
    pub away_team: String,
    pub goals_home: u32,
    pub goals_away: u32,
    // Optional detail columns; some leagues don't publish them.
    pub result: Option<char>,
    pub shots_on_target_home: Option<u32>,
    pub shots_on_target_away: Option<u32>,
    pub corners_home: Option<u32>,
    pub corners_away: Option<u32>,
    pub cards_home: Option<u32>,
    pub cards_away: Option<u32>,
}

impl MatchRecord {
    pub fn new(
        date: NaiveDate,
        home_team: impl Into<String>,
        away_team: impl Into<String>,
        goals_home: u32,
        goals_away: u32,
    ) -> Self {
        Self {
            date,
            home_team: home_team.into(),
            away_team: away_team.into(),
            goals_home,
            goals_away,
            result: None,
            shots_on_target_home: None,
            shots_on_target_away: None,
            corners_home: None,
            corners_away: None,
            cards_home: None,
            cards_away: None,
        }
    }

    pub fn with_corners(mut self, home: u32, away: u32) -> Self {
        self.corners_home = Some(home);
        self.corners_away = Some(away);
        self
    }

    pub fn with_cards(mut self, home: u32, away: u32) -> Self {
        self.cards_home = Some(home);
        self.cards_away = Some(away);
        self
    }

    pub fn involves(&self, team: &str) -> bool {
        self.home_team == team || self.away_team == team
    }
}

/// All completed matches of one league season, in source order.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<MatchRecord>,
}

impl Dataset {
    pub fn new(records: Vec<MatchRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[MatchRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sorted unique names of every team that appears as a home side.
    pub fn list_teams(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|m| m.home_team.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    pub fn home_matches<'a>(&'a self, team: &'a str) -> impl Iterator<Item = &'a MatchRecord> + 'a {
        self.records.iter().filter(move |m| m.home_team == team)
    }

    pub fn away_matches<'a>(&'a self, team: &'a str) -> impl Iterator<Item = &'a MatchRecord> + 'a {
        self.records.iter().filter(move |m| m.away_team == team)
    }

    pub fn has_corners(&self) -> bool {
        self.records
            .iter()
            .any(|m| m.corners_home.is_some() || m.corners_away.is_some())
    }

    pub fn has_cards(&self) -> bool {
        self.records
            .iter()
            .any(|m| m.cards_home.is_some() || m.cards_away.is_some())
    }

    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.records.iter().map(|m| m.date).min()?;
        let last = self.records.iter().map(|m| m.date).max()?;
        Some((first, last))
    }
}
