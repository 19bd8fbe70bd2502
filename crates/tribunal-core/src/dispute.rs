use serde::{Deserialize, Serialize};
use tribunal_types::{AccountId, ContentDigest, DisputeId, DisputeStatus, StakeAmount};

/// A claim between a claimant and a respondent, owned by the dispute book
/// and mutated only through engine transitions. Never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dispute {
    pub id: DisputeId,
    pub claimant: AccountId,
    pub respondent: AccountId,
    pub category: String,
    pub stake: StakeAmount,
    pub status: DisputeStatus,
    pub created_at: u64,
    pub resolved_at: Option<u64>,
    /// Final ruling, set exactly once at resolution. True favors the claimant.
    pub outcome: Option<bool>,
    /// Forecast recorded by generate_prediction, set at most once.
    pub predicted_outcome: Option<bool>,
    pub prediction_confidence: u64,
    pub arbitrator: Option<AccountId>,
    pub evidence_digest: ContentDigest,
    /// Appeal escalation is modeled but has no in-scope transitions.
    pub appeal_count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub winner: AccountId,
    pub payout: StakeAmount,
    pub resolved_at: u64,
}
