use crate::dataset::Dataset;
use crate::error::{EngineError, EngineResult};
use crate::numeric::mean_present;

/// Expected corners and cards for a fixture. Plain averages, not Poisson.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SecondaryMetrics {
    pub corners_home: f64,
    pub corners_away: f64,
    pub corners_total: f64,
    pub cards_home: f64,
    pub cards_away: f64,
    pub cards_total: f64,
}

impl SecondaryMetrics {
    pub fn zero() -> Self {
        Self::default()
    }
}

/// Corners blend each side's own rate with what the opponent usually
/// concedes at the matching venue. Cards only use each side's own rate.
pub fn estimate_secondary(dataset: &Dataset, home: &str, away: &str) -> EngineResult<SecondaryMetrics> {
    let home_games: Vec<_> = dataset.home_matches(home).collect();
    let away_games: Vec<_> = dataset.away_matches(away).collect();
    if home_games.is_empty() {
        return Err(EngineError::NoHomeMatches {
            team: home.to_string(),
        });
    }
    if away_games.is_empty() {
        return Err(EngineError::NoAwayMatches {
            team: away.to_string(),
        });
    }

    let home_won = mean_present(home_games.iter().map(|m| m.corners_home));
    let home_conceded = mean_present(home_games.iter().map(|m| m.corners_away));
    let away_won = mean_present(away_games.iter().map(|m| m.corners_away));
    let away_conceded = mean_present(away_games.iter().map(|m| m.corners_home));

    let corners_home = (home_won + away_conceded) / 2.0;
    let corners_away = (away_won + home_conceded) / 2.0;

    let cards_home = mean_present(home_games.iter().map(|m| m.cards_home));
    let cards_away = mean_present(away_games.iter().map(|m| m.cards_away));

    Ok(SecondaryMetrics {
        corners_home,
        corners_away,
        corners_total: corners_home + corners_away,
        cards_home,
        cards_away,
        cards_total: cards_home + cards_away,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::MatchRecord;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 11, d).unwrap()
    }

    #[test]
    fn corners_cross_average_cards_do_not() {
        let ds = Dataset::new(vec![
            // Ajax at home: wins 8 and 6 corners, concedes 2 and 4; cards 1 and 3
            MatchRecord::new(day(1), "Ajax", "Twente", 2, 0)
                .with_corners(8, 2)
                .with_cards(1, 2),
            MatchRecord::new(day(2), "Ajax", "AZ", 1, 1)
                .with_corners(6, 4)
                .with_cards(3, 1),
            // PSV away: wins 5 corners, concedes 7; 4 cards
            MatchRecord::new(day(3), "Twente", "PSV", 0, 2)
                .with_corners(7, 5)
                .with_cards(0, 4),
        ]);
        let m = estimate_secondary(&ds, "Ajax", "PSV").unwrap();
        assert_eq!(m.corners_home, (7.0 + 7.0) / 2.0);
        assert_eq!(m.corners_away, (5.0 + 3.0) / 2.0);
        assert_eq!(m.corners_total, m.corners_home + m.corners_away);
        assert_eq!(m.cards_home, 2.0);
        assert_eq!(m.cards_away, 4.0);
        assert_eq!(m.cards_total, 6.0);
    }

    #[test]
    fn no_qualifying_matches_is_tagged() {
        let ds = Dataset::new(vec![MatchRecord::new(day(1), "Ajax", "PSV", 1, 0)]);
        let err = estimate_secondary(&ds, "PSV", "Ajax").unwrap_err();
        assert!(matches!(err, EngineError::NoHomeMatches { .. }));
        let err = estimate_secondary(&ds, "Ajax", "Feyenoord").unwrap_err();
        assert!(matches!(err, EngineError::NoAwayMatches { .. }));
    }

    #[test]
    fn missing_columns_read_as_zero() {
        let ds = Dataset::new(vec![MatchRecord::new(day(1), "Ajax", "PSV", 1, 0)]);
        let m = estimate_secondary(&ds, "Ajax", "PSV").unwrap();
        assert_eq!(m, SecondaryMetrics::zero());
    }
}
