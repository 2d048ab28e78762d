use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use std::fmt;

use super::TransactionRepository;
use crate::domain::models::{Transaction, TxClassification};
use crate::infrastructure::persistence::entities::transactions;
use crate::infrastructure::persistence::error::DbError;

/// Postgres-backed transaction repository
#[derive(Clone)]
pub struct SeaOrmTransactionRepository {
    conn: DatabaseConnection,
}

impl fmt::Debug for SeaOrmTransactionRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeaOrmTransactionRepository")
            .finish_non_exhaustive()
    }
}

impl SeaOrmTransactionRepository {
    /// Create a new SeaOrmTransactionRepository
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Convert a database entity to a domain model
    fn to_domain_model(entity: transactions::Model) -> Result<Transaction, DbError> {
        let classification = entity
            .classification
            .parse::<TxClassification>()
            .map_err(DbError::MappingError)?;

        Ok(Transaction {
            txid: entity.txid,
            block_height: entity.block_height.max(0) as u64,
            block_hash: entity.block_hash,
            timestamp: entity.timestamp,
            tx_type: entity.tx_type,
            classification,
            vin: entity.vin,
            vout: entity.vout,
            payload: entity.payload,
        })
    }
}

#[async_trait]
impl TransactionRepository for SeaOrmTransactionRepository {
    async fn find_by_txid(&self, txid: &str) -> Result<Option<Transaction>, DbError> {
        let result = transactions::Entity::find_by_id(txid.to_string())
            .one(&self.conn)
            .await?;

        result.map(Self::to_domain_model).transpose()
    }

    async fn insert(&self, transaction: &Transaction) -> Result<bool, DbError> {
        let model = transactions::ActiveModel {
            txid: Set(transaction.txid.clone()),
            block_height: Set(transaction.block_height as i64),
            block_hash: Set(transaction.block_hash.clone()),
            timestamp: Set(transaction.timestamp),
            tx_type: Set(transaction.tx_type),
            classification: Set(transaction.classification.as_str().to_string()),
            vin: Set(transaction.vin.clone()),
            vout: Set(transaction.vout.clone()),
            payload: Set(transaction.payload.clone()),
            created_at: Set(Utc::now()),
        };

        let rows = transactions::Entity::insert(model)
            .on_conflict(
                OnConflict::column(transactions::Column::Txid)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.conn)
            .await?;

        Ok(rows > 0)
    }

    async fn set_block_hash(&self, txid: &str, block_hash: &str) -> Result<(), DbError> {
        transactions::Entity::update_many()
            .col_expr(
                transactions::Column::BlockHash,
                Expr::value(block_hash.to_string()),
            )
            .filter(transactions::Column::Txid.eq(txid))
            .filter(transactions::Column::BlockHash.is_null())
            .exec(&self.conn)
            .await?;

        Ok(())
    }

    async fn delete_above(&self, height: u64) -> Result<u64, DbError> {
        let result = transactions::Entity::delete_many()
            .filter(transactions::Column::BlockHeight.gt(height as i64))
            .exec(&self.conn)
            .await?;

        Ok(result.rows_affected)
    }
}
