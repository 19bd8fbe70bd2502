use crate::store::PatternStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A pattern is only trusted once it has strictly more cases than this.
pub const MIN_SAMPLE_SIZE: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Forecast {
    /// True when the claimant is favored.
    pub outcome: bool,
    pub confidence: u64,
}

/// Computes outcome forecasts from the historical pattern store. Threshold
/// gating belongs to the dispute engine; this only reports the numbers.
pub struct PredictionEngine {
    store: Arc<PatternStore>,
}

impl PredictionEngine {
    pub fn new(store: Arc<PatternStore>) -> Self {
        Self { store }
    }

    /// Stored confidence for the pair, or 0 while the sample is too small.
    pub async fn confidence(&self, category: &str, evidence_kind: &str) -> u64 {
        let pattern = self.store.get(category, evidence_kind).await;
        if pattern.total_cases > MIN_SAMPLE_SIZE {
            pattern.confidence
        } else {
            0
        }
    }

    /// Claimant favored iff wins exceed half the cases. The division floors,
    /// so an even split favors the respondent.
    pub async fn predict(&self, category: &str, evidence_kind: &str) -> bool {
        let pattern = self.store.get(category, evidence_kind).await;
        pattern.claimant_wins > pattern.total_cases / 2
    }

    pub async fn forecast(&self, category: &str, evidence_kind: &str) -> Forecast {
        Forecast {
            outcome: self.predict(category, evidence_kind).await,
            confidence: self.confidence(category, evidence_kind).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seeded(wins: u64, losses: u64) -> PredictionEngine {
        let store = Arc::new(PatternStore::new());
        for _ in 0..wins {
            store.record_outcome("loan", "doc", true, 10).await;
        }
        for _ in 0..losses {
            store.record_outcome("loan", "doc", false, 10).await;
        }
        PredictionEngine::new(store)
    }

    #[tokio::test]
    async fn test_confidence_gate_needs_more_than_ten_cases() {
        // 8 cases, all claimant wins: stored confidence is 100 but untrusted
        let engine = seeded(8, 0).await;
        assert_eq!(engine.confidence("loan", "doc").await, 0);

        // Exactly 10 is still below the gate
        let engine = seeded(10, 0).await;
        assert_eq!(engine.confidence("loan", "doc").await, 0);

        let engine = seeded(11, 0).await;
        assert_eq!(engine.confidence("loan", "doc").await, 100);
    }

    #[tokio::test]
    async fn test_confidence_for_unknown_pair_is_zero() {
        let engine = PredictionEngine::new(Arc::new(PatternStore::new()));
        assert_eq!(engine.confidence("unknown", "doc").await, 0);
    }

    #[tokio::test]
    async fn test_reference_pattern_twelve_of_fifteen() {
        let engine = seeded(12, 3).await;
        let forecast = engine.forecast("loan", "doc").await;
        // 12*100/15 = 80; 12 > 15/2 = 7
        assert_eq!(forecast.confidence, 80);
        assert!(forecast.outcome);
    }

    #[tokio::test]
    async fn test_even_split_favors_respondent() {
        // 6 of 12: 6 > 12/2 = 6 is false
        let engine = seeded(6, 6).await;
        assert!(!engine.predict("loan", "doc").await);

        // 7 of 13: 7 > 13/2 = 6 is true
        let engine = seeded(7, 6).await;
        assert!(engine.predict("loan", "doc").await);
    }
}
