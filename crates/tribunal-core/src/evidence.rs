use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;
use tribunal_types::{AccountId, ContentDigest, DisputeId};

/// One submitted piece of evidence. Sequence indices come from a single
/// process-wide counter, so they are strictly increasing across disputes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvidenceRecord {
    pub dispute: DisputeId,
    pub submitter: AccountId,
    pub sequence: u64,
    pub digest: ContentDigest,
    pub kind: String,
    pub submitted_at: u64,
    /// No in-scope transition verifies evidence; the flag stays false.
    pub verified: bool,
}

struct EvidenceBook {
    next_sequence: u64,
    entries: Vec<EvidenceRecord>,
}

/// Append-only evidence log.
pub struct EvidenceLog {
    book: Arc<RwLock<EvidenceBook>>,
}

impl Default for EvidenceLog {
    fn default() -> Self {
        Self::new()
    }
}

impl EvidenceLog {
    pub fn new() -> Self {
        Self {
            book: Arc::new(RwLock::new(EvidenceBook {
                next_sequence: 1,
                entries: Vec::new(),
            })),
        }
    }

    /// Append a submission and return its globally unique sequence index.
    pub async fn append(
        &self,
        dispute: DisputeId,
        submitter: AccountId,
        digest: ContentDigest,
        kind: String,
        submitted_at: u64,
    ) -> u64 {
        let mut book = self.book.write().await;
        let sequence = book.next_sequence;
        book.next_sequence += 1;

        book.entries.push(EvidenceRecord {
            dispute,
            submitter,
            sequence,
            digest,
            kind: kind.clone(),
            submitted_at,
            verified: false,
        });

        info!(
            dispute = %dispute,
            submitter = %submitter,
            sequence,
            kind = %kind,
            "📎 Evidence appended"
        );
        sequence
    }

    pub async fn for_dispute(&self, dispute: DisputeId) -> Vec<EvidenceRecord> {
        let book = self.book.read().await;
        book.entries
            .iter()
            .filter(|e| e.dispute == dispute)
            .cloned()
            .collect()
    }

    pub async fn get(
        &self,
        dispute: DisputeId,
        submitter: AccountId,
        sequence: u64,
    ) -> Option<EvidenceRecord> {
        let book = self.book.read().await;
        book.entries
            .iter()
            .find(|e| e.dispute == dispute && e.submitter == submitter && e.sequence == sequence)
            .cloned()
    }

    pub async fn len(&self) -> usize {
        let book = self.book.read().await;
        book.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sequences_are_global_and_increasing() {
        let log = EvidenceLog::new();
        let a = AccountId::from_bytes([1; 32]);
        let b = AccountId::from_bytes([2; 32]);
        let d1 = DisputeId::new(1);
        let d2 = DisputeId::new(2);

        let s1 = log
            .append(d1, a, ContentDigest::new(b"one"), "doc".into(), 10)
            .await;
        let s2 = log
            .append(d2, b, ContentDigest::new(b"two"), "doc".into(), 11)
            .await;
        let s3 = log
            .append(d1, b, ContentDigest::new(b"three"), "photo".into(), 12)
            .await;

        assert_eq!((s1, s2, s3), (1, 2, 3));
        assert_eq!(log.for_dispute(d1).await.len(), 2);
        assert_eq!(log.for_dispute(d2).await.len(), 1);
    }

    #[tokio::test]
    async fn test_entries_start_unverified() {
        let log = EvidenceLog::new();
        let a = AccountId::from_bytes([3; 32]);
        let d = DisputeId::new(1);

        let seq = log
            .append(d, a, ContentDigest::new(b"x"), "doc".into(), 5)
            .await;

        let record = log.get(d, a, seq).await.unwrap();
        assert!(!record.verified);
        assert_eq!(record.submitted_at, 5);
    }
}
