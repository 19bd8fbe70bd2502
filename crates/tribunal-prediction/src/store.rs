use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PatternKey {
    pub category: String,
    pub evidence_kind: String,
}

/// Aggregated statistics for a (category, evidence kind) pair. Updated
/// cumulatively on every resolution, never reset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomePattern {
    pub total_cases: u64,
    pub claimant_wins: u64,
    pub avg_resolution_time: u64,
    /// Percentage of claimant wins, truncating.
    pub confidence: u64,
}

pub struct PatternStore {
    patterns: Arc<RwLock<HashMap<PatternKey, OutcomePattern>>>,
}

impl Default for PatternStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PatternStore {
    pub fn new() -> Self {
        Self {
            patterns: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Pattern row for a pair, all-zero when nothing has been recorded.
    pub async fn get(&self, category: &str, evidence_kind: &str) -> OutcomePattern {
        let patterns = self.patterns.read().await;
        patterns
            .get(&PatternKey {
                category: category.to_string(),
                evidence_kind: evidence_kind.to_string(),
            })
            .cloned()
            .unwrap_or_default()
    }

    /// Fold one resolved case into the pattern. The running mean and the
    /// confidence percentage both use truncating integer division.
    pub async fn record_outcome(
        &self,
        category: &str,
        evidence_kind: &str,
        claimant_won: bool,
        resolution_time: u64,
    ) {
        let mut patterns = self.patterns.write().await;
        let entry = patterns
            .entry(PatternKey {
                category: category.to_string(),
                evidence_kind: evidence_kind.to_string(),
            })
            .or_default();

        let old_total = entry.total_cases;
        entry.total_cases += 1;
        if claimant_won {
            entry.claimant_wins += 1;
        }
        entry.avg_resolution_time = ((entry.avg_resolution_time as u128 * old_total as u128
            + resolution_time as u128)
            / entry.total_cases as u128) as u64;
        entry.confidence = entry.claimant_wins * 100 / entry.total_cases;

        info!(
            category,
            evidence_kind,
            claimant_won,
            total_cases = entry.total_cases,
            confidence = entry.confidence,
            avg_resolution_time = entry.avg_resolution_time,
            "📈 Outcome pattern updated"
        );
    }

    pub async fn pattern_count(&self) -> usize {
        let patterns = self.patterns.read().await;
        patterns.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_pattern_is_all_zero() {
        let store = PatternStore::new();
        let p = store.get("loan", "doc").await;
        assert_eq!(p, OutcomePattern::default());
    }

    #[tokio::test]
    async fn test_record_outcome_accumulates() {
        let store = PatternStore::new();

        store.record_outcome("loan", "doc", true, 10).await;
        store.record_outcome("loan", "doc", false, 20).await;
        store.record_outcome("loan", "doc", true, 30).await;

        let p = store.get("loan", "doc").await;
        assert_eq!(p.total_cases, 3);
        assert_eq!(p.claimant_wins, 2);
        // (10*0+10)/1=10, (10*1+20)/2=15, (15*2+30)/3=20
        assert_eq!(p.avg_resolution_time, 20);
        // 2*100/3 = 66
        assert_eq!(p.confidence, 66);
    }

    #[tokio::test]
    async fn test_running_mean_truncates() {
        let store = PatternStore::new();

        store.record_outcome("loan", "doc", true, 10).await;
        store.record_outcome("loan", "doc", true, 11).await;

        // (10*1+11)/2 = 10, not 10.5
        let p = store.get("loan", "doc").await;
        assert_eq!(p.avg_resolution_time, 10);
    }

    #[tokio::test]
    async fn test_keys_are_per_category_and_kind() {
        let store = PatternStore::new();

        store.record_outcome("loan", "doc", true, 5).await;
        store.record_outcome("loan", "general", false, 5).await;
        store.record_outcome("rental", "doc", true, 5).await;

        assert_eq!(store.pattern_count().await, 3);
        assert_eq!(store.get("loan", "doc").await.claimant_wins, 1);
        assert_eq!(store.get("loan", "general").await.claimant_wins, 0);
    }
}
