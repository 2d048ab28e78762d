use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Assets::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Assets::AssetId)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Assets::Name).string().not_null())
                    .col(ColumnDef::new(Assets::AssetType).string().not_null())
                    .col(ColumnDef::new(Assets::Creator).string().not_null())
                    .col(ColumnDef::new(Assets::CurrentOwner).string().not_null())
                    .col(ColumnDef::new(Assets::MintCount).big_integer().not_null().default(0))
                    .col(ColumnDef::new(Assets::MaxMintCount).big_integer().not_null().default(0))
                    .col(ColumnDef::new(Assets::TotalSupply).decimal_len(30, 8).not_null().default(0))
                    .col(
                        ColumnDef::new(Assets::CirculatingSupply)
                            .decimal_len(30, 8)
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Assets::TransferCount).big_integer().not_null().default(0))
                    .col(ColumnDef::new(Assets::DecimalPoint).integer().not_null().default(0))
                    .col(ColumnDef::new(Assets::Updatable).boolean().not_null().default(false))
                    .col(ColumnDef::new(Assets::IsUnique).boolean().not_null().default(false))
                    .col(ColumnDef::new(Assets::ReferenceHash).string())
                    .col(ColumnDef::new(Assets::IpfsVerified).boolean().not_null().default(false))
                    .col(ColumnDef::new(Assets::Metadata).json_binary())
                    .col(ColumnDef::new(Assets::ImageUrl).text())
                    .col(ColumnDef::new(Assets::IsSubAsset).boolean().not_null().default(false))
                    .col(ColumnDef::new(Assets::ParentAssetId).string())
                    .col(ColumnDef::new(Assets::ParentAssetName).string())
                    .col(ColumnDef::new(Assets::SubAssetName).string())
                    .col(ColumnDef::new(Assets::BlockHeight).big_integer().not_null())
                    .col(ColumnDef::new(Assets::CreatedTime).big_integer().not_null())
                    .col(ColumnDef::new(Assets::LastMintTime).big_integer())
                    .col(ColumnDef::new(Assets::LastTransferTime).big_integer())
                    .col(
                        ColumnDef::new(Assets::UpdatedAt)
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
                    .name("idx_assets_name")
                    .table(Assets::Table)
                    .col(Assets::Name)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_assets_parent_asset_id")
                    .table(Assets::Table)
                    .col(Assets::ParentAssetId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AssetTransfers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AssetTransfers::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AssetTransfers::Txid).string().not_null())
                    .col(ColumnDef::new(AssetTransfers::AssetId).string().not_null())
                    .col(ColumnDef::new(AssetTransfers::AssetName).string().not_null())
                    .col(ColumnDef::new(AssetTransfers::FromAddress).string())
                    .col(ColumnDef::new(AssetTransfers::ToAddress).string().not_null())
                    .col(ColumnDef::new(AssetTransfers::Amount).decimal_len(30, 8).not_null())
                    .col(ColumnDef::new(AssetTransfers::TransferType).string().not_null())
                    .col(ColumnDef::new(AssetTransfers::BlockHeight).big_integer().not_null())
                    .col(ColumnDef::new(AssetTransfers::Timestamp).big_integer().not_null())
                    .col(
                        ColumnDef::new(AssetTransfers::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Idempotent replay key
        manager
            .create_index(
                Index::create()
                    .name("idx_asset_transfers_replay_key")
                    .table(AssetTransfers::Table)
                    .col(AssetTransfers::Txid)
                    .col(AssetTransfers::AssetName)
                    .col(AssetTransfers::ToAddress)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_asset_transfers_asset_id")
                    .table(AssetTransfers::Table)
                    .col(AssetTransfers::AssetId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(FutureOutputs::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(FutureOutputs::Txid).string().not_null())
                    .col(ColumnDef::new(FutureOutputs::Vout).integer().not_null())
                    .col(ColumnDef::new(FutureOutputs::LockType).string().not_null())
                    .col(ColumnDef::new(FutureOutputs::AssetId).string())
                    .col(ColumnDef::new(FutureOutputs::AssetName).string())
                    .col(ColumnDef::new(FutureOutputs::Amount).decimal_len(30, 8).not_null())
                    .col(ColumnDef::new(FutureOutputs::Recipient).string())
                    .col(ColumnDef::new(FutureOutputs::Maturity).big_integer().not_null())
                    .col(ColumnDef::new(FutureOutputs::LockTime).big_integer().not_null())
                    .col(ColumnDef::new(FutureOutputs::UnlockHeight).big_integer())
                    .col(ColumnDef::new(FutureOutputs::UnlockTime).big_integer())
                    .col(
                        ColumnDef::new(FutureOutputs::UpdatableByDestination)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(FutureOutputs::BlockHeight).big_integer().not_null())
                    .col(ColumnDef::new(FutureOutputs::BlockTime).big_integer().not_null())
                    .col(
                        ColumnDef::new(FutureOutputs::Status)
                            .string()
                            .not_null()
                            .default("locked"),
                    )
                    .col(ColumnDef::new(FutureOutputs::UnlockedBy).string())
                    .col(ColumnDef::new(FutureOutputs::UnlockedAtHeight).big_integer())
                    .col(ColumnDef::new(FutureOutputs::UnlockedAtTime).big_integer())
                    .col(
                        ColumnDef::new(FutureOutputs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(FutureOutputs::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .primary_key(
                        Index::create()
                            .col(FutureOutputs::Txid)
                            .col(FutureOutputs::Vout),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_future_outputs_status")
                    .table(FutureOutputs::Table)
                    .col(FutureOutputs::Status)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(IpfsCache::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(IpfsCache::Hash)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(IpfsCache::Metadata).json_binary())
                    .col(ColumnDef::new(IpfsCache::Status).string().not_null())
                    .col(ColumnDef::new(IpfsCache::AccessCount).big_integer().not_null().default(0))
                    .col(
                        ColumnDef::new(IpfsCache::FetchedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(IpfsCache::LastAccessedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(IpfsCache::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(FutureOutputs::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AssetTransfers::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Assets::Table).if_exists().to_owned())
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
enum Assets {
    Table,
    AssetId,
    Name,
    AssetType,
    Creator,
    CurrentOwner,
    MintCount,
    MaxMintCount,
    TotalSupply,
    CirculatingSupply,
    TransferCount,
    DecimalPoint,
    Updatable,
    IsUnique,
    ReferenceHash,
    IpfsVerified,
    Metadata,
    ImageUrl,
    IsSubAsset,
    ParentAssetId,
    ParentAssetName,
    SubAssetName,
    BlockHeight,
    CreatedTime,
    LastMintTime,
    LastTransferTime,
    UpdatedAt,
}

#[derive(Iden)]
enum AssetTransfers {
    Table,
    Id,
    Txid,
    AssetId,
    AssetName,
    FromAddress,
    ToAddress,
    Amount,
    TransferType,
    BlockHeight,
    Timestamp,
    CreatedAt,
}

#[derive(Iden)]
enum FutureOutputs {
    Table,
    Txid,
    Vout,
    LockType,
    AssetId,
    AssetName,
    Amount,
    Recipient,
    Maturity,
    LockTime,
    UnlockHeight,
    UnlockTime,
    UpdatableByDestination,
    BlockHeight,
    BlockTime,
    Status,
    UnlockedBy,
    UnlockedAtHeight,
    UnlockedAtTime,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum IpfsCache {
    Table,
    Hash,
    Metadata,
    Status,
    AccessCount,
    FetchedAt,
    LastAccessedAt,
}
