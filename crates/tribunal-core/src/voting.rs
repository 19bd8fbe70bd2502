use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;
use tribunal_types::{AccountId, ContentDigest, DisputeId, Result, TribunalError};

/// A recorded arbitrator vote. Write-once: the weight is fixed at vote time
/// and never recomputed from later reputation changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vote {
    pub dispute: DisputeId,
    pub arbitrator: AccountId,
    /// True favors the claimant.
    pub in_favor: bool,
    pub reasoning: ContentDigest,
    pub submitted_at: u64,
    pub weight: u64,
}

pub struct VotingLedger {
    votes: Arc<RwLock<HashMap<(DisputeId, AccountId), Vote>>>,
}

impl Default for VotingLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl VotingLedger {
    pub fn new() -> Self {
        Self {
            votes: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn record(&self, vote: Vote) -> Result<()> {
        let mut votes = self.votes.write().await;
        let key = (vote.dispute, vote.arbitrator);

        if votes.contains_key(&key) {
            return Err(TribunalError::AlreadyVoted(format!(
                "dispute {} by {}",
                vote.dispute, vote.arbitrator
            )));
        }

        info!(
            dispute = %vote.dispute,
            arbitrator = %vote.arbitrator,
            in_favor = vote.in_favor,
            weight = vote.weight,
            "🗳️ Vote recorded"
        );
        votes.insert(key, vote);
        Ok(())
    }

    pub async fn get(&self, dispute: DisputeId, arbitrator: AccountId) -> Option<Vote> {
        let votes = self.votes.read().await;
        votes.get(&(dispute, arbitrator)).cloned()
    }

    pub async fn for_dispute(&self, dispute: DisputeId) -> Vec<Vote> {
        let votes = self.votes.read().await;
        votes
            .values()
            .filter(|v| v.dispute == dispute)
            .cloned()
            .collect()
    }

    pub async fn len(&self) -> usize {
        let votes = self.votes.read().await;
        votes.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
