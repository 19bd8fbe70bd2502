use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;
use tribunal_escrow::EscrowLedger;
use tribunal_types::{AccountId, Result, StakeAmount, TribunalError, TribunalParams};

pub const INITIAL_REPUTATION: u64 = 50;
pub const REPUTATION_STEP: u64 = 5;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Arbitrator {
    pub account: AccountId,
    pub reputation: u64,
    pub total_cases: u64,
    pub successful_predictions: u64,
    pub specializations: Vec<String>,
    pub active: bool,
    pub stake_locked: StakeAmount,
}

/// Vote weight combines raw reputation with historical prediction accuracy:
/// reputation + successful * 100 / total, truncating, accuracy term dropped
/// while the arbitrator has no cases.
pub fn vote_weight(reputation: u64, successful_predictions: u64, total_cases: u64) -> u64 {
    if total_cases > 0 {
        reputation + successful_predictions * 100 / total_cases
    } else {
        reputation
    }
}

pub struct ArbitratorRegistry {
    arbitrators: Arc<RwLock<HashMap<AccountId, Arbitrator>>>,
    escrow: Arc<EscrowLedger>,
    params: TribunalParams,
}

impl ArbitratorRegistry {
    pub fn new(escrow: Arc<EscrowLedger>, params: TribunalParams) -> Self {
        Self {
            arbitrators: Arc::new(RwLock::new(HashMap::new())),
            escrow,
            params,
        }
    }

    /// Register the caller as an arbitrator, locking the minimum stake as a
    /// bond. Re-registration overwrites any prior record, history included.
    pub async fn register(
        &self,
        caller: AccountId,
        mut specializations: Vec<String>,
    ) -> Result<()> {
        let available = self
            .escrow
            .get_unlocked_balance(caller)
            .await
            .map_err(|e| TribunalError::Escrow(e.to_string()))?;

        if available < self.params.min_stake {
            return Err(TribunalError::InsufficientStake {
                required: self.params.min_stake,
                available,
            });
        }

        self.escrow
            .lock(caller, self.params.min_stake)
            .await
            .map_err(|e| TribunalError::Escrow(e.to_string()))?;

        specializations.truncate(self.params.max_specializations);

        let record = Arbitrator {
            account: caller,
            reputation: INITIAL_REPUTATION,
            total_cases: 0,
            successful_predictions: 0,
            specializations: specializations.clone(),
            active: true,
            stake_locked: self.params.min_stake,
        };

        let mut arbitrators = self.arbitrators.write().await;
        let overwrote = arbitrators.insert(caller, record).is_some();

        info!(
            arbitrator = %caller,
            stake = self.params.min_stake.to_units(),
            specializations = ?specializations,
            overwrote,
            "⚖️ Arbitrator registered"
        );
        Ok(())
    }

    /// Qualification gate consulted before assignment.
    /// Specializations are not matched against the category; qualification
    /// is reputation, stake and activity based.
    pub async fn is_qualified(&self, arbitrator: &AccountId, _category: &str) -> bool {
        let arbitrators = self.arbitrators.read().await;
        match arbitrators.get(arbitrator) {
            Some(a) => {
                a.active
                    && a.reputation >= self.params.min_arbitrator_reputation
                    && a.stake_locked >= self.params.min_stake
            }
            None => false,
        }
    }

    /// Apply a resolved case to the arbitrator's record: +5 reputation and a
    /// successful-prediction credit when the prediction held, -5 (floored at
    /// zero) when it did not. The case counter always advances.
    pub async fn record_case_outcome(
        &self,
        arbitrator: &AccountId,
        prediction_correct: bool,
    ) -> Result<()> {
        let mut arbitrators = self.arbitrators.write().await;
        let record = arbitrators
            .get_mut(arbitrator)
            .ok_or_else(|| TribunalError::NotFound(format!("arbitrator {}", arbitrator)))?;

        if prediction_correct {
            record.reputation += REPUTATION_STEP;
            record.successful_predictions += 1;
        } else {
            record.reputation = record.reputation.saturating_sub(REPUTATION_STEP);
        }
        record.total_cases += 1;

        info!(
            arbitrator = %arbitrator,
            prediction_correct,
            reputation = record.reputation,
            total_cases = record.total_cases,
            "📋 Arbitrator case recorded"
        );
        Ok(())
    }

    /// Weight for a vote cast right now, from the current record.
    pub async fn weight_for(&self, arbitrator: &AccountId) -> Result<u64> {
        let arbitrators = self.arbitrators.read().await;
        let record = arbitrators
            .get(arbitrator)
            .ok_or_else(|| TribunalError::NotFound(format!("arbitrator {}", arbitrator)))?;

        Ok(vote_weight(
            record.reputation,
            record.successful_predictions,
            record.total_cases,
        ))
    }

    pub async fn get(&self, arbitrator: &AccountId) -> Option<Arbitrator> {
        let arbitrators = self.arbitrators.read().await;
        arbitrators.get(arbitrator).cloned()
    }

    pub async fn active_count(&self) -> usize {
        let arbitrators = self.arbitrators.read().await;
        arbitrators.values().filter(|a| a.active).count()
    }

    /// Set reputation for testing
    pub async fn set_reputation(&self, arbitrator: &AccountId, value: u64) {
        let mut arbitrators = self.arbitrators.write().await;
        if let Some(record) = arbitrators.get_mut(arbitrator) {
            record.reputation = value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tribunal_escrow::MemoryStorage;

    fn setup() -> (Arc<EscrowLedger>, ArbitratorRegistry) {
        let escrow = Arc::new(EscrowLedger::new(Arc::new(MemoryStorage::new())));
        let registry = ArbitratorRegistry::new(escrow.clone(), TribunalParams::default());
        (escrow, registry)
    }

    async fn fund(escrow: &EscrowLedger, account: AccountId, units: u64) {
        escrow
            .credit(account, StakeAmount::from_units(units))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_register_locks_stake() {
        let (escrow, registry) = setup();
        let arb = AccountId::from_bytes([1; 32]);
        fund(&escrow, arb, 1_000_000).await;

        registry
            .register(arb, vec!["loan".to_string()])
            .await
            .unwrap();

        let record = registry.get(&arb).await.unwrap();
        assert_eq!(record.reputation, INITIAL_REPUTATION);
        assert_eq!(record.total_cases, 0);
        assert!(record.active);
        assert_eq!(record.stake_locked, StakeAmount::from_units(1_000_000));
        assert_eq!(
            escrow.get_locked_balance(arb).await.unwrap(),
            StakeAmount::from_units(1_000_000)
        );
    }

    #[tokio::test]
    async fn test_register_rejects_underfunded_caller() {
        let (escrow, registry) = setup();
        let arb = AccountId::from_bytes([2; 32]);
        fund(&escrow, arb, 999_999).await;

        let err = registry.register(arb, vec![]).await.unwrap_err();
        assert!(matches!(err, TribunalError::InsufficientStake { .. }));
        assert!(registry.get(&arb).await.is_none());
        assert_eq!(
            escrow.get_locked_balance(arb).await.unwrap(),
            StakeAmount::ZERO
        );
    }

    #[tokio::test]
    async fn test_reregistration_overwrites_history() {
        let (escrow, registry) = setup();
        let arb = AccountId::from_bytes([3; 32]);
        fund(&escrow, arb, 2_000_000).await;

        registry.register(arb, vec!["loan".to_string()]).await.unwrap();
        registry.record_case_outcome(&arb, true).await.unwrap();
        assert_eq!(registry.get(&arb).await.unwrap().total_cases, 1);

        registry
            .register(arb, vec!["rental".to_string()])
            .await
            .unwrap();

        let record = registry.get(&arb).await.unwrap();
        assert_eq!(record.total_cases, 0);
        assert_eq!(record.successful_predictions, 0);
        assert_eq!(record.reputation, INITIAL_REPUTATION);
        assert_eq!(record.specializations, vec!["rental".to_string()]);
    }

    #[tokio::test]
    async fn test_specializations_are_capped() {
        let (escrow, registry) = setup();
        let arb = AccountId::from_bytes([4; 32]);
        fund(&escrow, arb, 1_000_000).await;

        let tags: Vec<String> = (0..8).map(|i| format!("tag-{i}")).collect();
        registry.register(arb, tags).await.unwrap();

        assert_eq!(registry.get(&arb).await.unwrap().specializations.len(), 5);
    }

    #[tokio::test]
    async fn test_qualification_gates() {
        let (escrow, registry) = setup();
        let arb = AccountId::from_bytes([5; 32]);

        // Unknown arbitrator
        assert!(!registry.is_qualified(&arb, "loan").await);

        fund(&escrow, arb, 1_000_000).await;
        registry.register(arb, vec![]).await.unwrap();
        assert!(registry.is_qualified(&arb, "loan").await);

        // Reputation below the floor disqualifies
        registry.set_reputation(&arb, 45).await;
        assert!(!registry.is_qualified(&arb, "loan").await);

        registry.set_reputation(&arb, 50).await;
        assert!(registry.is_qualified(&arb, "loan").await);
    }

    #[tokio::test]
    async fn test_category_is_not_matched_against_specializations() {
        let (escrow, registry) = setup();
        let arb = AccountId::from_bytes([6; 32]);
        fund(&escrow, arb, 1_000_000).await;
        registry.register(arb, vec!["loan".to_string()]).await.unwrap();

        assert!(registry.is_qualified(&arb, "rental").await);
    }

    #[tokio::test]
    async fn test_reputation_floor_converges_to_zero() {
        let (escrow, registry) = setup();
        let arb = AccountId::from_bytes([7; 32]);
        fund(&escrow, arb, 1_000_000).await;
        registry.register(arb, vec![]).await.unwrap();

        for _ in 0..20 {
            registry.record_case_outcome(&arb, false).await.unwrap();
        }

        let record = registry.get(&arb).await.unwrap();
        assert_eq!(record.reputation, 0);
        assert_eq!(record.total_cases, 20);
        assert_eq!(record.successful_predictions, 0);
    }

    #[tokio::test]
    async fn test_correct_prediction_raises_reputation() {
        let (escrow, registry) = setup();
        let arb = AccountId::from_bytes([8; 32]);
        fund(&escrow, arb, 1_000_000).await;
        registry.register(arb, vec![]).await.unwrap();

        registry.record_case_outcome(&arb, true).await.unwrap();

        let record = registry.get(&arb).await.unwrap();
        assert_eq!(record.reputation, 55);
        assert_eq!(record.successful_predictions, 1);
        assert_eq!(record.total_cases, 1);
    }

    #[test]
    fn test_vote_weight_formula() {
        // No cases yet: raw reputation only
        assert_eq!(vote_weight(50, 0, 0), 50);
        // Perfect record: 50 + 100
        assert_eq!(vote_weight(50, 4, 4), 150);
        // Truncating accuracy: 1*100/3 = 33
        assert_eq!(vote_weight(60, 1, 3), 93);
    }
}
