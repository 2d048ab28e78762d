use serde_json::Value;

use super::AssetProcessor;
use crate::domain::errors::ProcessingError;
use crate::domain::models::{TxClassification, TxContext};
use crate::domain::services::transaction_log::record_transaction;
use crate::infrastructure::rpc::types::RpcTransaction;

impl AssetProcessor {
    /// Record a type-9 update. The payload is stored raw and not applied to the asset.
    pub async fn update(
        &self,
        tx: &RpcTransaction,
        payload: Option<&Value>,
        ctx: &TxContext,
    ) -> Result<bool, ProcessingError> {
        let written = record_transaction(
            self.transactions.as_ref(),
            tx,
            ctx,
            TxClassification::AssetUpdate,
            payload.cloned(),
        )
        .await?;

        Ok(written)
    }
}
