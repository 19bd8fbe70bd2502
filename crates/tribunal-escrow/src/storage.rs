use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tribunal_types::{AccountId, StakeAmount};

/// Completed transfer, kept for history queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferRecord {
    pub from: AccountId,
    pub to: AccountId,
    pub amount: StakeAmount,
    pub height: u64,
    pub tx_hash: String,
}

type BalanceMap = HashMap<AccountId, StakeAmount>;
type TransactionBackup = Option<(BalanceMap, BalanceMap)>;

/// Value store backing the escrow ledger. Transactions are all-or-nothing:
/// everything between begin and commit is discarded on rollback.
#[async_trait]
pub trait EscrowStorage: Send + Sync {
    async fn get_balance(&self, account: AccountId) -> Result<StakeAmount>;
    async fn set_balance(&self, account: AccountId, balance: StakeAmount) -> Result<()>;
    async fn get_locked_balance(&self, account: AccountId) -> Result<StakeAmount>;
    async fn set_locked_balance(&self, account: AccountId, locked: StakeAmount) -> Result<()>;

    async fn begin_transaction(&self) -> Result<()>;
    async fn commit_transaction(&self) -> Result<()>;
    async fn rollback_transaction(&self) -> Result<()>;

    async fn record_transfer(&self, record: TransferRecord) -> Result<()>;
    async fn transfer_history(&self, account: AccountId) -> Result<Vec<TransferRecord>>;
}

pub struct MemoryStorage {
    balances: Arc<RwLock<BalanceMap>>,
    locked_balances: Arc<RwLock<BalanceMap>>,
    transaction_backup: Arc<RwLock<TransactionBackup>>,
    transfer_history: Arc<RwLock<Vec<TransferRecord>>>,
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            balances: Arc::new(RwLock::new(HashMap::new())),
            locked_balances: Arc::new(RwLock::new(HashMap::new())),
            transaction_backup: Arc::new(RwLock::new(None)),
            transfer_history: Arc::new(RwLock::new(Vec::new())),
        }
    }
}

#[async_trait]
impl EscrowStorage for MemoryStorage {
    async fn get_balance(&self, account: AccountId) -> Result<StakeAmount> {
        let balances = self.balances.read().await;
        Ok(balances.get(&account).copied().unwrap_or(StakeAmount::ZERO))
    }

    async fn set_balance(&self, account: AccountId, balance: StakeAmount) -> Result<()> {
        let mut balances = self.balances.write().await;
        if balance == StakeAmount::ZERO {
            balances.remove(&account);
        } else {
            balances.insert(account, balance);
        }
        Ok(())
    }

    async fn get_locked_balance(&self, account: AccountId) -> Result<StakeAmount> {
        let locked = self.locked_balances.read().await;
        Ok(locked.get(&account).copied().unwrap_or(StakeAmount::ZERO))
    }

    async fn set_locked_balance(&self, account: AccountId, locked: StakeAmount) -> Result<()> {
        let mut locked_balances = self.locked_balances.write().await;
        if locked == StakeAmount::ZERO {
            locked_balances.remove(&account);
        } else {
            locked_balances.insert(account, locked);
        }
        Ok(())
    }

    async fn begin_transaction(&self) -> Result<()> {
        let balances = self.balances.read().await;
        let locked = self.locked_balances.read().await;

        let mut backup = self.transaction_backup.write().await;
        *backup = Some((balances.clone(), locked.clone()));
        Ok(())
    }

    async fn commit_transaction(&self) -> Result<()> {
        let mut backup = self.transaction_backup.write().await;
        *backup = None;
        Ok(())
    }

    async fn rollback_transaction(&self) -> Result<()> {
        let mut backup = self.transaction_backup.write().await;

        if let Some((balance_backup, locked_backup)) = backup.take() {
            let mut balances = self.balances.write().await;
            let mut locked = self.locked_balances.write().await;
            *balances = balance_backup;
            *locked = locked_backup;

            tracing::info!(storage_type = "memory", "↩️ Escrow transaction rolled back");
        }
        Ok(())
    }

    async fn record_transfer(&self, record: TransferRecord) -> Result<()> {
        let mut history = self.transfer_history.write().await;
        history.push(record);
        Ok(())
    }

    async fn transfer_history(&self, account: AccountId) -> Result<Vec<TransferRecord>> {
        let history = self.transfer_history.read().await;
        Ok(history
            .iter()
            .filter(|r| r.from == account || r.to == account)
            .cloned()
            .collect())
    }
}
