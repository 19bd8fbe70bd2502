use crate::dispute::{Dispute, Resolution};
use crate::evidence::{EvidenceLog, EvidenceRecord};
use crate::voting::{Vote, VotingLedger};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;
use tribunal_arbiter::ArbitratorRegistry;
use tribunal_escrow::{EscrowLedger, EscrowStorage, Settlement};
use tribunal_prediction::{Forecast, PatternStore, PredictionEngine};
use tribunal_types::{
    AccountId, ContentDigest, DisputeId, DisputeOp, DisputeStatus, Result, StakeAmount,
    TribunalError, TribunalParams,
};

/// Resolution statistics are always filed under this evidence kind, while
/// prediction lookups use the caller-supplied kind. The two key domains are
/// deliberately decoupled.
pub const GENERAL_EVIDENCE_KIND: &str = "general";

struct DisputeBook {
    next_id: u64,
    disputes: HashMap<DisputeId, Dispute>,
}

/// Orchestrates the dispute lifecycle across escrow, arbitrators, the
/// pattern store and the voting ledger. Every public operation takes the
/// authenticated caller explicitly and validates all guards before any
/// mutation, so a rejected call leaves no trace.
pub struct DisputeEngine {
    owner: AccountId,
    params: TribunalParams,
    escrow: Arc<EscrowLedger>,
    arbiters: Arc<ArbitratorRegistry>,
    patterns: Arc<PatternStore>,
    predictor: PredictionEngine,
    votes: VotingLedger,
    evidence: EvidenceLog,
    book: RwLock<DisputeBook>,
    // Metrics counters - updated externally by incrementing directly
    pub disputes_created: Option<Arc<prometheus::IntCounter>>,
    pub predictions_generated: Option<Arc<prometheus::IntCounter>>,
    pub votes_submitted: Option<Arc<prometheus::IntCounter>>,
    pub disputes_resolved: Option<Arc<prometheus::IntCounter>>,
}

impl DisputeEngine {
    pub fn new(
        owner: AccountId,
        params: TribunalParams,
        storage: Arc<dyn EscrowStorage>,
    ) -> Self {
        let escrow = Arc::new(EscrowLedger::new(storage));
        let arbiters = Arc::new(ArbitratorRegistry::new(escrow.clone(), params.clone()));
        let patterns = Arc::new(PatternStore::new());
        let predictor = PredictionEngine::new(patterns.clone());

        Self {
            owner,
            params,
            escrow,
            arbiters,
            patterns,
            predictor,
            votes: VotingLedger::new(),
            evidence: EvidenceLog::new(),
            book: RwLock::new(DisputeBook {
                next_id: 1,
                disputes: HashMap::new(),
            }),
            disputes_created: None,
            predictions_generated: None,
            votes_submitted: None,
            disputes_resolved: None,
        }
    }

    pub fn set_metrics(
        &mut self,
        disputes_created: Arc<prometheus::IntCounter>,
        predictions_generated: Arc<prometheus::IntCounter>,
        votes_submitted: Arc<prometheus::IntCounter>,
        disputes_resolved: Arc<prometheus::IntCounter>,
    ) {
        self.disputes_created = Some(disputes_created);
        self.predictions_generated = Some(predictions_generated);
        self.votes_submitted = Some(votes_submitted);
        self.disputes_resolved = Some(disputes_resolved);
    }

    pub fn owner(&self) -> AccountId {
        self.owner
    }

    pub fn params(&self) -> &TribunalParams {
        &self.params
    }

    pub fn escrow(&self) -> &Arc<EscrowLedger> {
        &self.escrow
    }

    pub fn arbiters(&self) -> &Arc<ArbitratorRegistry> {
        &self.arbiters
    }

    pub fn patterns(&self) -> &Arc<PatternStore> {
        &self.patterns
    }

    /// Register the caller as an arbitrator, bonding the minimum stake.
    pub async fn register_arbitrator(
        &self,
        caller: AccountId,
        specializations: Vec<String>,
    ) -> Result<()> {
        self.arbiters.register(caller, specializations).await
    }

    /// Open a dispute against a respondent, escrowing the stake with the
    /// house. Fails before any id is allocated if the stake is short or the
    /// escrow transfer does not go through.
    pub async fn create_dispute(
        &self,
        caller: AccountId,
        respondent: AccountId,
        category: String,
        evidence_digest: ContentDigest,
        stake: StakeAmount,
        height: u64,
    ) -> Result<DisputeId> {
        if stake < self.params.min_stake {
            return Err(TribunalError::InsufficientStake {
                required: self.params.min_stake,
                available: stake,
            });
        }

        self.escrow
            .transfer(caller, AccountId::house(), stake, height)
            .await
            .map_err(|e| TribunalError::Escrow(e.to_string()))?;

        let mut book = self.book.write().await;
        let id = DisputeId::new(book.next_id);
        book.next_id += 1;

        book.disputes.insert(
            id,
            Dispute {
                id,
                claimant: caller,
                respondent,
                category: category.clone(),
                stake,
                status: DisputeStatus::Pending,
                created_at: height,
                resolved_at: None,
                outcome: None,
                predicted_outcome: None,
                prediction_confidence: 0,
                arbitrator: None,
                evidence_digest,
                appeal_count: 0,
            },
        );

        if let Some(ref counter) = self.disputes_created {
            counter.inc();
        }

        info!(
            dispute = %id,
            claimant = %caller,
            respondent = %respondent,
            category = %category,
            stake = stake.to_units(),
            height,
            "🆕 Dispute created"
        );
        Ok(id)
    }

    /// Append evidence to a dispute in evidence collection. Only the
    /// claimant or the respondent may submit.
    pub async fn submit_evidence(
        &self,
        caller: AccountId,
        dispute_id: DisputeId,
        digest: ContentDigest,
        kind: String,
        height: u64,
    ) -> Result<u64> {
        let book = self.book.read().await;
        let dispute = book
            .disputes
            .get(&dispute_id)
            .ok_or_else(|| TribunalError::NotFound(format!("dispute {}", dispute_id)))?;

        if caller != dispute.claimant && caller != dispute.respondent {
            return Err(TribunalError::Unauthorized(format!(
                "{} is not a party to dispute {}",
                caller, dispute_id
            )));
        }

        dispute.status.apply(DisputeOp::SubmitEvidence)?;

        let sequence = self
            .evidence
            .append(dispute_id, caller, digest, kind, height)
            .await;
        Ok(sequence)
    }

    /// Run the predictor against the dispute's category and the supplied
    /// evidence kind. Succeeds only when predictions are enabled, the
    /// dispute is collecting evidence and the pattern is confident enough;
    /// on success the forecast is recorded and the dispute advances.
    pub async fn generate_prediction(
        &self,
        caller: AccountId,
        dispute_id: DisputeId,
        evidence_kind: &str,
    ) -> Result<Forecast> {
        let mut book = self.book.write().await;
        let dispute = book
            .disputes
            .get_mut(&dispute_id)
            .ok_or_else(|| TribunalError::NotFound(format!("dispute {}", dispute_id)))?;

        if !self.params.predictions_enabled {
            return Err(TribunalError::InvalidPrediction(
                "predictions are disabled".to_string(),
            ));
        }

        let next = dispute.status.apply(DisputeOp::GeneratePrediction)?;

        let confidence = self
            .predictor
            .confidence(&dispute.category, evidence_kind)
            .await;
        if confidence < self.params.confidence_threshold {
            return Err(TribunalError::InvalidPrediction(format!(
                "confidence {} below threshold {}",
                confidence, self.params.confidence_threshold
            )));
        }

        let outcome = self.predictor.predict(&dispute.category, evidence_kind).await;

        dispute.predicted_outcome = Some(outcome);
        dispute.prediction_confidence = confidence;
        dispute.status = next;

        if let Some(ref counter) = self.predictions_generated {
            counter.inc();
        }

        info!(
            dispute = %dispute_id,
            requested_by = %caller,
            evidence_kind,
            outcome,
            confidence,
            "🔮 Prediction recorded"
        );
        Ok(Forecast { outcome, confidence })
    }

    /// Assign a qualified arbitrator. Owner only.
    pub async fn assign_arbitrator(
        &self,
        caller: AccountId,
        dispute_id: DisputeId,
        arbitrator: AccountId,
    ) -> Result<()> {
        if caller != self.owner {
            return Err(TribunalError::OwnerOnly);
        }

        let mut book = self.book.write().await;
        let dispute = book
            .disputes
            .get_mut(&dispute_id)
            .ok_or_else(|| TribunalError::NotFound(format!("dispute {}", dispute_id)))?;

        if !self.arbiters.is_qualified(&arbitrator, &dispute.category).await {
            return Err(TribunalError::ArbitratorNotQualified(arbitrator.to_string()));
        }

        let next = dispute.status.apply(DisputeOp::AssignArbitrator)?;
        dispute.arbitrator = Some(arbitrator);
        dispute.status = next;

        info!(
            dispute = %dispute_id,
            arbitrator = %arbitrator,
            "👨‍⚖️ Arbitrator assigned"
        );
        Ok(())
    }

    /// Record the assigned arbitrator's vote, returning the weight computed
    /// from their record at this moment. One vote per arbitrator per dispute.
    pub async fn submit_vote(
        &self,
        caller: AccountId,
        dispute_id: DisputeId,
        in_favor: bool,
        reasoning: ContentDigest,
        height: u64,
    ) -> Result<u64> {
        let book = self.book.read().await;
        let dispute = book
            .disputes
            .get(&dispute_id)
            .ok_or_else(|| TribunalError::NotFound(format!("dispute {}", dispute_id)))?;

        if dispute.arbitrator != Some(caller) {
            return Err(TribunalError::Unauthorized(format!(
                "{} is not the assigned arbitrator for dispute {}",
                caller, dispute_id
            )));
        }

        dispute.status.apply(DisputeOp::SubmitVote)?;

        let weight = self.arbiters.weight_for(&caller).await?;

        self.votes
            .record(Vote {
                dispute: dispute_id,
                arbitrator: caller,
                in_favor,
                reasoning,
                submitted_at: height,
                weight,
            })
            .await?;

        if let Some(ref counter) = self.votes_submitted {
            counter.inc();
        }
        Ok(weight)
    }

    /// Close a dispute with a final ruling. Owner only. Pays the winner out
    /// of escrow (fee retained by the house), then feeds the result back
    /// into the arbitrator's record and the outcome patterns. A failed
    /// payout aborts the whole resolution.
    pub async fn resolve_dispute(
        &self,
        caller: AccountId,
        dispute_id: DisputeId,
        outcome: bool,
        height: u64,
    ) -> Result<Resolution> {
        if caller != self.owner {
            return Err(TribunalError::OwnerOnly);
        }

        let mut book = self.book.write().await;
        let dispute = book
            .disputes
            .get_mut(&dispute_id)
            .ok_or_else(|| TribunalError::NotFound(format!("dispute {}", dispute_id)))?;

        let next = dispute.status.apply(DisputeOp::Resolve)?;

        let settlement = Settlement::split(dispute.stake, self.params.fee_percent);
        let winner = if outcome {
            dispute.claimant
        } else {
            dispute.respondent
        };

        // All-or-nothing: if the payout fails, the dispute stays in
        // arbitration and nothing below runs.
        self.escrow
            .transfer(AccountId::house(), winner, settlement.payout, height)
            .await
            .map_err(|e| TribunalError::Escrow(e.to_string()))?;

        dispute.status = next;
        dispute.outcome = Some(outcome);
        dispute.resolved_at = Some(height);

        let resolution_time = height.saturating_sub(dispute.created_at);
        let prediction_correct = dispute.predicted_outcome == Some(outcome);

        if let Some(arbitrator) = dispute.arbitrator {
            self.arbiters
                .record_case_outcome(&arbitrator, prediction_correct)
                .await?;
        }

        self.patterns
            .record_outcome(&dispute.category, GENERAL_EVIDENCE_KIND, outcome, resolution_time)
            .await;

        if let Some(ref counter) = self.disputes_resolved {
            counter.inc();
        }

        info!(
            dispute = %dispute_id,
            winner = %winner,
            outcome,
            payout = settlement.payout.to_units(),
            fee = settlement.fee.to_units(),
            resolution_time,
            "⚖️ Dispute resolved"
        );

        Ok(Resolution {
            winner,
            payout: settlement.payout,
            resolved_at: height,
        })
    }

    pub async fn get_dispute(&self, dispute_id: DisputeId) -> Option<Dispute> {
        let book = self.book.read().await;
        book.disputes.get(&dispute_id).cloned()
    }

    pub async fn dispute_count(&self) -> usize {
        let book = self.book.read().await;
        book.disputes.len()
    }

    pub async fn evidence_for(&self, dispute_id: DisputeId) -> Vec<EvidenceRecord> {
        self.evidence.for_dispute(dispute_id).await
    }

    pub async fn votes_for(&self, dispute_id: DisputeId) -> Vec<Vote> {
        self.votes.for_dispute(dispute_id).await
    }

    pub async fn vote_for(&self, dispute_id: DisputeId, arbitrator: AccountId) -> Option<Vote> {
        self.votes.get(dispute_id, arbitrator).await
    }

    /// Set a dispute's status directly. No public transition leads out of
    /// Pending, so staging a dispute into EvidenceCollection goes through
    /// here; see DESIGN.md for why the gap is preserved.
    pub async fn force_status(&self, dispute_id: DisputeId, status: DisputeStatus) -> Result<()> {
        let mut book = self.book.write().await;
        let dispute = book
            .disputes
            .get_mut(&dispute_id)
            .ok_or_else(|| TribunalError::NotFound(format!("dispute {}", dispute_id)))?;

        dispute.status = status;
        Ok(())
    }
}
