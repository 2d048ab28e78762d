use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // One progress row per ingestion stream
        manager
            .create_table(
                Table::create()
                    .table(SyncState::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SyncState::StreamId)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SyncState::CurrentBlock).big_integer().not_null())
                    .col(ColumnDef::new(SyncState::TargetBlock).big_integer().not_null())
                    .col(
                        ColumnDef::new(SyncState::Status)
                            .string()
                            .not_null()
                            .default("not_started"),
                    )
                    .col(ColumnDef::new(SyncState::LastSyncedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(SyncState::LastError).text())
                    .col(ColumnDef::new(SyncState::AverageBlockTime).double())
                    .col(
                        ColumnDef::new(SyncState::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Blocks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Blocks::Height)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Blocks::Hash).string().not_null())
                    .col(ColumnDef::new(Blocks::PreviousHash).string())
                    .col(ColumnDef::new(Blocks::Timestamp).big_integer().not_null())
                    .col(ColumnDef::new(Blocks::TxCount).integer().not_null())
                    .col(
                        ColumnDef::new(Blocks::Txids)
                            .json_binary()
                            .not_null()
                            .default("[]"),
                    )
                    .col(ColumnDef::new(Blocks::Size).big_integer().not_null())
                    .col(
                        ColumnDef::new(Blocks::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_blocks_hash")
                    .table(Blocks::Table)
                    .col(Blocks::Hash)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Transactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Transactions::Txid)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Transactions::BlockHeight).big_integer().not_null())
                    .col(ColumnDef::new(Transactions::BlockHash).string())
                    .col(ColumnDef::new(Transactions::Timestamp).big_integer().not_null())
                    .col(ColumnDef::new(Transactions::TxType).integer().not_null())
                    .col(ColumnDef::new(Transactions::Classification).string().not_null())
                    .col(
                        ColumnDef::new(Transactions::Vin)
                            .json_binary()
                            .not_null()
                            .default("[]"),
                    )
                    .col(
                        ColumnDef::new(Transactions::Vout)
                            .json_binary()
                            .not_null()
                            .default("[]"),
                    )
                    .col(ColumnDef::new(Transactions::Payload).json_binary())
                    .col(
                        ColumnDef::new(Transactions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_transactions_block_height")
                    .table(Transactions::Table)
                    .col(Transactions::BlockHeight)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_transactions_classification")
                    .table(Transactions::Table)
                    .col(Transactions::Classification)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Transactions::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Blocks::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SyncState::Table).if_exists().to_owned())
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
enum SyncState {
    Table,
    StreamId,
    CurrentBlock,
    TargetBlock,
    Status,
    LastSyncedAt,
    LastError,
    AverageBlockTime,
    UpdatedAt,
}

#[derive(Iden)]
enum Blocks {
    Table,
    Height,
    Hash,
    PreviousHash,
    Timestamp,
    TxCount,
    Txids,
    Size,
    CreatedAt,
}

#[derive(Iden)]
enum Transactions {
    Table,
    Txid,
    BlockHeight,
    BlockHash,
    Timestamp,
    TxType,
    Classification,
    Vin,
    Vout,
    Payload,
    CreatedAt,
}
