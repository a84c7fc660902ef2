//! Engagement-rate arithmetic.

use crate::platform::EngagementFormula;

/// Interactions as a percentage of views. Zero views yields `0.0`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn engagement_rate(interactions: i64, views: i64) -> f64 {
    if views <= 0 {
        return 0.0;
    }
    interactions as f64 / views as f64 * 100.0
}

/// Arithmetic mean of per-item rates; `0.0` for an empty batch.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn mean_rate(rates: &[f64]) -> f64 {
    if rates.is_empty() {
        return 0.0;
    }
    rates.iter().sum::<f64>() / rates.len() as f64
}

impl EngagementFormula {
    /// Per-item rate for the given counters under this formula.
    #[must_use]
    pub fn rate(self, views: i64, likes: i64, comments: i64, shares: i64) -> f64 {
        match self {
            EngagementFormula::NotComputed => 0.0,
            EngagementFormula::LikesComments => engagement_rate(likes + comments, views),
            EngagementFormula::LikesCommentsShares => {
                engagement_rate(likes + comments + shares, views)
            }
        }
    }
}
