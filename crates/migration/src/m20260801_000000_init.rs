//! Initial schema migration - creates all tables from scratch.
//!
//! - `wallets`: account-like buckets with a baseline and derived totals
//! - `tags`: income/expense categories
//! - `transactions`: dated monetary events, one wallet each; transfer legs
//!   carry the other wallet of the pair in `peer_wallet_id`
//!
//! The derived wallet columns (`balance`, `total_income`, `total_expense`)
//! are nullable: rows written before a column existed are normalized on
//! read by the engine instead of being migrated in place.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Wallets {
    Table,
    Id,
    Name,
    InitialBalance,
    Balance,
    TotalIncome,
    TotalExpense,
    CreatedAt,
}

#[derive(Iden)]
enum Tags {
    Table,
    Id,
    Name,
    Kind,
    Icon,
    TextColor,
    BgColor,
    SpendLimit,
    CreatedAt,
}

#[derive(Iden)]
enum Transactions {
    Table,
    Id,
    WalletId,
    TagId,
    Kind,
    Amount,
    Description,
    OccurredAt,
    PeerWalletId,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Wallets::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Wallets::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Wallets::Name).string().not_null())
                    .col(
                        ColumnDef::new(Wallets::InitialBalance)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Wallets::Balance).big_integer())
                    .col(ColumnDef::new(Wallets::TotalIncome).big_integer())
                    .col(ColumnDef::new(Wallets::TotalExpense).big_integer())
                    .col(ColumnDef::new(Wallets::CreatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-wallets-name-unique")
                    .table(Wallets::Table)
                    .col(Wallets::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Tags::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Tags::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Tags::Name).string().not_null())
                    .col(ColumnDef::new(Tags::Kind).string().not_null())
                    .col(ColumnDef::new(Tags::Icon).string().not_null())
                    .col(ColumnDef::new(Tags::TextColor).string().not_null())
                    .col(ColumnDef::new(Tags::BgColor).string().not_null())
                    .col(ColumnDef::new(Tags::SpendLimit).big_integer())
                    .col(ColumnDef::new(Tags::CreatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Transactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Transactions::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Transactions::WalletId).string().not_null())
                    .col(ColumnDef::new(Transactions::TagId).string().not_null())
                    .col(ColumnDef::new(Transactions::Kind).string().not_null())
                    .col(
                        ColumnDef::new(Transactions::Amount)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Transactions::Description)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Transactions::OccurredAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Transactions::PeerWalletId).string())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-transactions-wallet_id")
                            .from(Transactions::Table, Transactions::WalletId)
                            .to(Wallets::Table, Wallets::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-transactions-tag_id")
                            .from(Transactions::Table, Transactions::TagId)
                            .to(Tags::Table, Tags::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-transactions-wallet_id-occurred_at")
                    .table(Transactions::Table)
                    .col(Transactions::WalletId)
                    .col(Transactions::OccurredAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-transactions-tag_id")
                    .table(Transactions::Table)
                    .col(Transactions::TagId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Transactions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Tags::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Wallets::Table).to_owned())
            .await?;
        Ok(())
    }
}
