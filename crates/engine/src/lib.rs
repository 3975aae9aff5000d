//! Wallet ledger engine.
//!
//! Owns wallets, tags and transactions and keeps each wallet's derived
//! totals (`balance`, `total_income`, `total_expense`) consistent with the
//! set of transactions that reference it, under single creates, in-place
//! edits, deletes, wallet reassignment and two-sided transfers, with bulk
//! import/reset recomputing from scratch.
//!
//! The invariant the whole crate defends:
//!
//! `balance == initial_balance + total_income - total_expense`

pub use commands::{TransactionNewCmd, TransactionUpdateCmd, TransferCmd};
pub use delta::Delta;
pub use error::EngineError;
pub use ops::{
    Engine, EngineBuilder, ImportReport, Overview, SkippedRecord, TagUpdate, TransactionEvent,
    TransactionListFilter, TransferDeletion,
};
pub use projector::{TransactionWrite, WalletTotals, wallet_deltas};
pub use snapshot::Snapshot;
pub use tags::{Tag, TagKind};
pub use transactions::{Transaction, TransactionKind};
pub use wallets::Wallet;

mod commands;
mod delta;
mod error;
mod ops;
mod projector;
pub mod snapshot;
mod tags;
mod transactions;
mod wallets;

type ResultEngine<T> = Result<T, EngineError>;
