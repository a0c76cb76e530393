use std::fmt;

use crate::engine::{PredictionBundle, StatisticalEngine};
use crate::error::EngineResult;
use crate::numeric::round_dp;
use crate::outcome::to_percent;

const WINNER_MIN_PCT: f64 = 55.0;
const WINNER_HIGH_PCT: f64 = 65.0;
const OVER_LINE: f64 = 2.5;
const OVER_MIN_PCT: f64 = 60.0;
const OVER_HIGH_PCT: f64 = 70.0;
const BTTS_MIN_PCT: f64 = 60.0;
const CORNERS_MIN_TOTAL: f64 = 10.5;
const CARDS_MIN_TOTAL: f64 = 4.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Market {
    Winner,
    Goals,
    Corners,
    Cards,
}

impl Market {
    pub fn label(self) -> &'static str {
        match self {
            Market::Winner => "Winner",
            Market::Goals => "Goals",
            Market::Corners => "Corners",
            Market::Cards => "Cards",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    pub fn label(self) -> &'static str {
        match self {
            Confidence::Low => "Low",
            Confidence::Medium => "Medium",
            Confidence::High => "High",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StatedProbability {
    Percent(f64),
    /// Informational tips state the expected count instead of a probability.
    ExpectedCount(f64),
}

impl fmt::Display for StatedProbability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatedProbability::Percent(p) => write!(f, "{p:.1}%"),
            StatedProbability::ExpectedCount(n) => write!(f, "Expected avg: {n:.2}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FairOdds {
    Decimal(f64),
    NotApplicable,
}

impl FairOdds {
    /// Break-even decimal odds for a percentage, two decimals.
    pub fn from_percent(pct: f64) -> Self {
        if pct > 0.0 {
            FairOdds::Decimal(round_dp(100.0 / pct, 2))
        } else {
            FairOdds::NotApplicable
        }
    }

    pub fn value(self) -> Option<f64> {
        match self {
            FairOdds::Decimal(v) => Some(v),
            FairOdds::NotApplicable => None,
        }
    }
}

impl fmt::Display for FairOdds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FairOdds::Decimal(v) => write!(f, "{v:.2}"),
            FairOdds::NotApplicable => f.write_str("-"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tip {
    pub market: Market,
    pub selection: String,
    pub probability: StatedProbability,
    pub fair_odds: FairOdds,
    pub confidence: Confidence,
}

#[derive(Debug, Clone)]
pub struct MatchSuggestion {
    pub bundle: PredictionBundle,
    pub tips: Vec<Tip>,
}

impl MatchSuggestion {
    pub fn title(&self) -> String {
        format!("{} vs {}", self.bundle.home_team, self.bundle.away_team)
    }
}

/// Predict the fixture and run the tip rules over it. Any failure to predict
/// (usually a team without home or away history) is returned as-is and no
/// rule runs.
pub fn get_match_suggestion(
    engine: &StatisticalEngine,
    home: &str,
    away: &str,
) -> EngineResult<MatchSuggestion> {
    let bundle = engine.predict_match(home, away)?;
    let tips = advise(&bundle);
    Ok(MatchSuggestion { bundle, tips })
}

/// Tips in rule order: winner, over 2.5, both teams to score, corners, cards.
pub fn advise(bundle: &PredictionBundle) -> Vec<Tip> {
    let mut tips = Vec::new();
    if let Some(tip) = winner_tip(bundle) {
        tips.push(tip);
    }
    if let Some(tip) = over_goals_tip(bundle) {
        tips.push(tip);
    }
    if let Some(tip) = btts_tip(bundle) {
        tips.push(tip);
    }
    if let Some(tip) = corners_tip(bundle) {
        tips.push(tip);
    }
    if let Some(tip) = cards_tip(bundle) {
        tips.push(tip);
    }
    tips
}

fn winner_tip(bundle: &PredictionBundle) -> Option<Tip> {
    let (team, pct) = if bundle.outcomes.home >= WINNER_MIN_PCT {
        (&bundle.home_team, bundle.outcomes.home)
    } else if bundle.outcomes.away >= WINNER_MIN_PCT {
        (&bundle.away_team, bundle.outcomes.away)
    } else {
        return None;
    };
    Some(Tip {
        market: Market::Winner,
        selection: format!("{team} to win"),
        probability: StatedProbability::Percent(pct),
        fair_odds: FairOdds::from_percent(pct),
        confidence: if pct > WINNER_HIGH_PCT {
            Confidence::High
        } else {
            Confidence::Medium
        },
    })
}

fn over_goals_tip(bundle: &PredictionBundle) -> Option<Tip> {
    let pct = to_percent(bundle.matrix.over(OVER_LINE));
    if pct < OVER_MIN_PCT {
        return None;
    }
    Some(Tip {
        market: Market::Goals,
        selection: "Over 2.5 Goals".to_string(),
        probability: StatedProbability::Percent(pct),
        fair_odds: FairOdds::from_percent(pct),
        confidence: if pct > OVER_HIGH_PCT {
            Confidence::High
        } else {
            Confidence::Medium
        },
    })
}

fn btts_tip(bundle: &PredictionBundle) -> Option<Tip> {
    let pct = to_percent(bundle.matrix.both_teams_score());
    if pct < BTTS_MIN_PCT {
        return None;
    }
    Some(Tip {
        market: Market::Goals,
        selection: "Both Teams To Score: Yes".to_string(),
        probability: StatedProbability::Percent(pct),
        fair_odds: FairOdds::from_percent(pct),
        confidence: Confidence::Medium,
    })
}

fn corners_tip(bundle: &PredictionBundle) -> Option<Tip> {
    let total = bundle.secondary.corners_total;
    if total < CORNERS_MIN_TOTAL {
        return None;
    }
    Some(Tip {
        market: Market::Corners,
        selection: "Over 9.5 Corners".to_string(),
        probability: StatedProbability::ExpectedCount(total),
        fair_odds: FairOdds::NotApplicable,
        confidence: Confidence::Medium,
    })
}

fn cards_tip(bundle: &PredictionBundle) -> Option<Tip> {
    let total = bundle.secondary.cards_total;
    if total < CARDS_MIN_TOTAL {
        return None;
    }
    Some(Tip {
        market: Market::Cards,
        selection: "Over 3.5 Cards".to_string(),
        probability: StatedProbability::ExpectedCount(total),
        fair_odds: FairOdds::NotApplicable,
        confidence: Confidence::Low,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::goal_expectancy::ExpectedGoals;
    use crate::outcome::OutcomeProbs;
    use crate::score_matrix::{DEFAULT_MATRIX_SIZE, ScoreMatrix};
    use crate::secondary::SecondaryMetrics;
    use crate::strength::TeamStrength;

    fn avg_strength() -> TeamStrength {
        TeamStrength {
            attack_home: 1.0,
            defense_home: 1.0,
            attack_away: 1.0,
            defense_away: 1.0,
            home_matches: 10,
            away_matches: 10,
        }
    }

    fn bundle(lh: f64, la: f64) -> PredictionBundle {
        let matrix = ScoreMatrix::build(lh, la, DEFAULT_MATRIX_SIZE);
        let outcomes = crate::outcome::aggregate_outcomes(&matrix);
        PredictionBundle {
            home_team: "Roma".to_string(),
            away_team: "Lazio".to_string(),
            home_strength: avg_strength(),
            away_strength: avg_strength(),
            expected: ExpectedGoals { home: lh, away: la },
            lambda_home: lh,
            lambda_away: la,
            matrix,
            outcomes,
            secondary: SecondaryMetrics::zero(),
            secondary_fallback: None,
        }
    }

    #[test]
    fn winner_rule_fires_once_even_if_both_sides_qualify() {
        let mut b = bundle(1.2, 1.2);
        b.outcomes = OutcomeProbs {
            home: 60.0,
            draw: 10.0,
            away: 56.0,
        };
        let winners: Vec<_> = advise(&b)
            .into_iter()
            .filter(|t| t.market == Market::Winner)
            .collect();
        assert_eq!(winners.len(), 1);
        assert_eq!(winners[0].selection, "Roma to win");
        assert_eq!(winners[0].fair_odds, FairOdds::Decimal(1.67));
        assert_eq!(winners[0].confidence, Confidence::Medium);
    }

    #[test]
    fn away_winner_and_high_confidence() {
        let mut b = bundle(0.6, 2.4);
        b.outcomes = OutcomeProbs {
            home: 8.0,
            draw: 20.0,
            away: 70.0,
        };
        let tips = advise(&b);
        assert_eq!(tips[0].selection, "Lazio to win");
        assert_eq!(tips[0].confidence, Confidence::High);
    }

    #[test]
    fn balanced_low_scoring_fixture_yields_nothing() {
        let b = bundle(1.0, 0.9);
        assert!(advise(&b).is_empty());
    }

    #[test]
    fn goal_fest_tips_over_and_btts_in_order() {
        let b = bundle(2.4, 2.2);
        let tips = advise(&b);
        let selections: Vec<_> = tips.iter().map(|t| t.selection.as_str()).collect();
        assert_eq!(selections, vec!["Over 2.5 Goals", "Both Teams To Score: Yes"]);
        assert_eq!(tips[0].confidence, Confidence::High);
    }

    #[test]
    fn informational_tips_have_no_odds() {
        let mut b = bundle(1.0, 0.9);
        b.secondary = SecondaryMetrics {
            corners_home: 6.0,
            corners_away: 4.5,
            corners_total: 10.5,
            cards_home: 2.5,
            cards_away: 2.0,
            cards_total: 4.5,
        };
        let tips = advise(&b);
        assert_eq!(tips.len(), 2);
        assert_eq!(tips[0].market, Market::Corners);
        assert_eq!(tips[0].fair_odds, FairOdds::NotApplicable);
        assert_eq!(tips[0].confidence, Confidence::Medium);
        assert_eq!(tips[1].market, Market::Cards);
        assert_eq!(tips[1].confidence, Confidence::Low);
        assert_eq!(tips[1].probability.to_string(), "Expected avg: 4.50");
    }

    #[test]
    fn fair_odds_invert_percent() {
        assert_eq!(FairOdds::from_percent(62.5), FairOdds::Decimal(1.6));
        assert_eq!(FairOdds::from_percent(0.0), FairOdds::NotApplicable);
        assert_eq!(FairOdds::NotApplicable.to_string(), "-");
    }
}
