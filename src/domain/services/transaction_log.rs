use crate::domain::models::{Transaction, TxClassification, TxContext};
use crate::infrastructure::persistence::error::DbError;
use crate::infrastructure::persistence::repositories::TransactionRepository;
use crate::infrastructure::rpc::types::RpcTransaction;
use serde_json::Value;

/// Find-or-skip write of a transaction row.
///
/// An existing row is never rewritten; the only change allowed is filling a
/// block hash that was missing when the row was first stored.
pub async fn record_transaction(
    repository: &dyn TransactionRepository,
    tx: &RpcTransaction,
    ctx: &TxContext,
    classification: TxClassification,
    payload: Option<Value>,
) -> Result<bool, DbError> {
    if let Some(existing) = repository.find_by_txid(&tx.txid).await? {
        if existing.block_hash.is_none() && !ctx.block_hash.is_empty() {
            repository.set_block_hash(&tx.txid, &ctx.block_hash).await?;
        }
        return Ok(false);
    }

    let row = Transaction::from_rpc(tx, ctx, classification, payload);
    repository.insert(&row).await
}
