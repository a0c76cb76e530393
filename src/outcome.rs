use crate::numeric::round_dp;
use crate::score_matrix::ScoreMatrix;

/// 1X2 probabilities in percent, one decimal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutcomeProbs {
    pub home: f64,
    pub draw: f64,
    pub away: f64,
}

impl OutcomeProbs {
    pub fn sum(&self) -> f64 {
        self.home + self.draw + self.away
    }
}

/// Reduce the grid into home-win (h > a), draw (h == a) and away-win (h < a).
/// Not renormalized: the three values add up to the grid's mass, not 100.
pub fn aggregate_outcomes(matrix: &ScoreMatrix) -> OutcomeProbs {
    OutcomeProbs {
        home: to_percent(matrix.home_win()),
        draw: to_percent(matrix.draw()),
        away: to_percent(matrix.away_win()),
    }
}

pub fn to_percent(p: f64) -> f64 {
    round_dp(p * 100.0, 1)
}
