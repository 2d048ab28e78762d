//! Locked ("future") outputs: creation from type-7 transactions and the
//! maturity scan run after each committed batch.

use std::sync::Arc;

use crate::domain::errors::ProcessingError;
use crate::domain::models::{
    FutureOutput, FutureStatus, LockType, TxClassification, TxContext, UnlockTrigger,
};
use crate::domain::services::transaction_log::record_transaction;
use crate::infrastructure::persistence::error::DbError;
use crate::infrastructure::persistence::repositories::{
    BlockRepository, FutureOutputRepository, TransactionRepository,
};
use crate::infrastructure::rpc::types::{FuturePayload, RpcTransaction};
use crate::utils::logging;

pub struct FutureChecker {
    futures: Arc<dyn FutureOutputRepository>,
    blocks: Arc<dyn BlockRepository>,
    transactions: Arc<dyn TransactionRepository>,
}

impl FutureChecker {
    pub fn new(
        futures: Arc<dyn FutureOutputRepository>,
        blocks: Arc<dyn BlockRepository>,
        transactions: Arc<dyn TransactionRepository>,
    ) -> Self {
        Self {
            futures,
            blocks,
            transactions,
        }
    }

    /// Store the output locked by a type-7 transaction
    pub async fn create(
        &self,
        tx: &RpcTransaction,
        payload: &FuturePayload,
        ctx: &TxContext,
    ) -> Result<FutureOutput, ProcessingError> {
        let output = tx.output(payload.lock_output_index).ok_or_else(|| {
            ProcessingError::data(format!(
                "future {} locks missing output {}",
                tx.txid, payload.lock_output_index
            ))
        })?;

        let (lock_type, asset_id, asset_name, amount) = match &output.script_pub_key.asset {
            Some(marker) => (
                LockType::Asset,
                marker.asset_id.clone(),
                marker.name.clone(),
                marker.amount,
            ),
            None => (LockType::Rtm, None, None, output.value),
        };

        // A negative component disables that unlock condition, and so does
        // one whose unlock point is not representable
        let unlock_height = u64::try_from(payload.maturity)
            .ok()
            .and_then(|maturity| ctx.height.checked_add(maturity))
            .filter(|height| i64::try_from(*height).is_ok());
        let unlock_time = (payload.lock_time >= 0)
            .then(|| ctx.block_time.checked_add(payload.lock_time))
            .flatten();
        if (unlock_height.is_none() && payload.maturity >= 0)
            || (unlock_time.is_none() && payload.lock_time >= 0)
        {
            logging::log_warning(&format!(
                "Future {} has an out-of-range lock (maturity {}, lockTime {}); that condition is disabled",
                tx.txid, payload.maturity, payload.lock_time
            ));
        }

        let future = FutureOutput {
            txid: tx.txid.clone(),
            vout: output.n,
            lock_type,
            asset_id,
            asset_name,
            amount,
            recipient: output.recipient().map(str::to_string),
            maturity: payload.maturity,
            lock_time: payload.lock_time,
            unlock_height,
            unlock_time,
            updatable_by_destination: payload.updatable_by_destination,
            block_height: ctx.height,
            block_time: ctx.block_time,
            status: FutureStatus::Locked,
            unlocked_by: None,
            unlocked_at_height: None,
            unlocked_at_time: None,
        };

        if self.futures.insert(&future).await? {
            logging::log_debug(&format!(
                "Locked {} {} in {}:{} (height {:?}, time {:?})",
                future.amount,
                future.lock_type,
                future.txid,
                future.vout,
                future.unlock_height,
                future.unlock_time
            ));
        }

        record_transaction(
            self.transactions.as_ref(),
            tx,
            ctx,
            TxClassification::FutureLock,
            serde_json::to_value(payload).ok(),
        )
        .await?;

        Ok(future)
    }

    /// Unlock every locked output whose height or time condition holds.
    ///
    /// Returns the outputs unlocked by this scan.
    pub async fn scan_maturity(&self, height: u64, time: i64) -> Result<Vec<FutureOutput>, DbError> {
        let matured = self.futures.find_matured(height, time).await?;
        let mut unlocked = Vec::with_capacity(matured.len());

        for mut future in matured {
            let trigger = self.first_trigger(&future, height, time).await?;
            if !self
                .futures
                .mark_unlocked(&future.txid, future.vout, trigger, height, time)
                .await?
            {
                continue;
            }

            future.status = FutureStatus::Unlocked;
            future.unlocked_by = Some(trigger);
            future.unlocked_at_height = Some(height);
            future.unlocked_at_time = Some(time);
            unlocked.push(future);
        }

        if !unlocked.is_empty() {
            logging::log_info(&format!(
                "Unlocked {} future output(s) at height {}",
                unlocked.len(),
                height
            ));
        }

        Ok(unlocked)
    }

    /// Which condition was satisfied first. With both satisfied the stored
    /// block at `unlock_height` decides: if it is no later than `unlock_time`
    /// the confirmations arrived first.
    async fn first_trigger(
        &self,
        future: &FutureOutput,
        height: u64,
        time: i64,
    ) -> Result<UnlockTrigger, DbError> {
        match (future.height_reached(height), future.time_reached(time)) {
            (true, false) => Ok(UnlockTrigger::Confirmations),
            (false, true) => Ok(UnlockTrigger::Time),
            _ => {
                let (Some(unlock_height), Some(unlock_time)) =
                    (future.unlock_height, future.unlock_time)
                else {
                    return Ok(UnlockTrigger::Confirmations);
                };
                match self.blocks.find_by_height(unlock_height).await? {
                    Some(block) if block.timestamp > unlock_time => Ok(UnlockTrigger::Time),
                    _ => Ok(UnlockTrigger::Confirmations),
                }
            }
        }
    }
}
