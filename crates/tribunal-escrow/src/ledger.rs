use crate::storage::{EscrowStorage, TransferRecord};
use anyhow::{bail, Result};
use std::sync::Arc;
use tracing::info;
use tribunal_types::{AccountId, StakeAmount};

/// Holds and moves escrowed value on top of an injected storage backend.
pub struct EscrowLedger {
    storage: Arc<dyn EscrowStorage>,
}

impl EscrowLedger {
    pub fn new(storage: Arc<dyn EscrowStorage>) -> Self {
        Self { storage }
    }

    pub async fn get_balance(&self, account: AccountId) -> Result<StakeAmount> {
        self.storage.get_balance(account).await
    }

    pub async fn credit(&self, account: AccountId, amount: StakeAmount) -> Result<()> {
        if amount.is_zero() {
            return Ok(());
        }

        let current = self.storage.get_balance(account).await?;
        let new_balance = current
            .checked_add(amount)
            .ok_or_else(|| anyhow::anyhow!("Balance overflow for {}", account))?;

        self.storage.set_balance(account, new_balance).await?;

        info!(
            account = %account,
            amount = amount.to_units(),
            balance_after = new_balance.to_units(),
            "💰 Balance credited"
        );
        Ok(())
    }

    pub async fn debit(&self, account: AccountId, amount: StakeAmount) -> Result<()> {
        if amount.is_zero() {
            return Ok(());
        }

        let current = self.storage.get_balance(account).await?;
        let new_balance = current.checked_sub(amount).ok_or_else(|| {
            anyhow::anyhow!(
                "Insufficient balance for {}: has {}, needs {}",
                account,
                current,
                amount
            )
        })?;

        self.storage.set_balance(account, new_balance).await?;

        info!(
            account = %account,
            amount = amount.to_units(),
            balance_after = new_balance.to_units(),
            "💸 Balance debited"
        );
        Ok(())
    }

    /// Atomic transfer between two accounts. Either both balances move and a
    /// history row is written, or the storage is rolled back untouched.
    pub async fn transfer(
        &self,
        from: AccountId,
        to: AccountId,
        amount: StakeAmount,
        height: u64,
    ) -> Result<()> {
        if amount.is_zero() {
            return Ok(());
        }

        if from == to {
            bail!("Cannot transfer to same account");
        }

        self.storage.begin_transaction().await?;

        match self.transfer_internal(from, to, amount, height).await {
            Ok(tx_hash) => {
                self.storage.commit_transaction().await?;
                info!(
                    from = %from,
                    to = %to,
                    amount = amount.to_units(),
                    tx_hash = %tx_hash,
                    "✅ Transfer committed"
                );
                Ok(())
            }
            Err(e) => {
                self.storage.rollback_transaction().await?;
                info!(
                    from = %from,
                    to = %to,
                    amount = amount.to_units(),
                    error = %e,
                    "❌ Transfer rolled back"
                );
                Err(e)
            }
        }
    }

    async fn transfer_internal(
        &self,
        from: AccountId,
        to: AccountId,
        amount: StakeAmount,
        height: u64,
    ) -> Result<String> {
        let from_balance = self.storage.get_balance(from).await?;
        let from_locked = self.storage.get_locked_balance(from).await?;

        // Locked bonds are not spendable
        let spendable = from_balance.saturating_sub(from_locked);
        if spendable < amount {
            bail!(
                "Insufficient balance: {} has {} spendable, needs {}",
                from,
                spendable,
                amount
            );
        }

        let to_balance = self.storage.get_balance(to).await?;

        let new_from_balance = from_balance.saturating_sub(amount);
        let new_to_balance = to_balance
            .checked_add(amount)
            .ok_or_else(|| anyhow::anyhow!("Balance overflow for recipient {}", to))?;

        self.storage.set_balance(from, new_from_balance).await?;
        self.storage.set_balance(to, new_to_balance).await?;

        let mut hasher = blake3::Hasher::new();
        hasher.update(from.as_bytes());
        hasher.update(to.as_bytes());
        hasher.update(&amount.to_units().to_le_bytes());
        hasher.update(&height.to_le_bytes());
        let tx_hash = hex::encode(hasher.finalize().as_bytes());

        self.storage
            .record_transfer(TransferRecord {
                from,
                to,
                amount,
                height,
                tx_hash: tx_hash.clone(),
            })
            .await?;

        Ok(tx_hash)
    }

    /// Lock part of an account's balance as a bond.
    pub async fn lock(&self, account: AccountId, amount: StakeAmount) -> Result<()> {
        let balance = self.storage.get_balance(account).await?;
        let locked = self.storage.get_locked_balance(account).await?;

        let unlocked = balance.saturating_sub(locked);
        if unlocked < amount {
            bail!(
                "Insufficient unlocked balance: has {}, needs {}",
                unlocked,
                amount
            );
        }

        let new_locked = locked.saturating_add(amount);
        self.storage.set_locked_balance(account, new_locked).await?;

        info!(
            account = %account,
            amount = amount.to_units(),
            locked_after = new_locked.to_units(),
            "🔒 Stake locked"
        );
        Ok(())
    }

    pub async fn unlock(&self, account: AccountId, amount: StakeAmount) -> Result<()> {
        let locked = self.storage.get_locked_balance(account).await?;

        if locked < amount {
            bail!(
                "Insufficient locked balance: has {}, trying to unlock {}",
                locked,
                amount
            );
        }

        let new_locked = locked.saturating_sub(amount);
        self.storage.set_locked_balance(account, new_locked).await?;

        info!(
            account = %account,
            amount = amount.to_units(),
            locked_after = new_locked.to_units(),
            "🔓 Stake unlocked"
        );
        Ok(())
    }

    pub async fn get_locked_balance(&self, account: AccountId) -> Result<StakeAmount> {
        self.storage.get_locked_balance(account).await
    }

    pub async fn get_unlocked_balance(&self, account: AccountId) -> Result<StakeAmount> {
        let balance = self.storage.get_balance(account).await?;
        let locked = self.storage.get_locked_balance(account).await?;
        Ok(balance.saturating_sub(locked))
    }

    pub async fn transfer_history(&self, account: AccountId) -> Result<Vec<TransferRecord>> {
        self.storage.transfer_history(account).await
    }
}
