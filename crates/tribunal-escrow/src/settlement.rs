use serde::{Deserialize, Serialize};
use tribunal_types::StakeAmount;

/// Fee/payout split applied when a dispute is resolved. The fee stays with
/// the house; the payout goes to the winning party.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    pub fee: StakeAmount,
    pub payout: StakeAmount,
}

impl Settlement {
    /// fee = stake * fee_percent / 100, truncating; payout = stake - fee.
    pub fn split(stake: StakeAmount, fee_percent: u64) -> Self {
        let fee = stake.percent(fee_percent);
        let payout = stake.saturating_sub(fee);
        Self { fee, payout }
    }
}
