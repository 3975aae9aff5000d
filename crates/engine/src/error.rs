//! The module contains the errors the engine can throw.
//!
//! Every rejected operation names the invariant it violated so the calling
//! layer can render an actionable message instead of a generic failure.

use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Amount is zero, negative, or not representable as a finite integer.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    /// A transaction references a wallet or tag that does not exist.
    #[error("Missing reference: {0}")]
    MissingReference(String),
    /// An update projection was invoked without the pre-update snapshot.
    #[error("Missing prior state: {0}")]
    MissingPriorState(String),
    /// Attempt to change a field that is immutable after creation.
    #[error("Immutable field: {0}")]
    ImmutableField(String),
    /// Attempt to delete the only remaining wallet.
    #[error("Cannot delete the last wallet: {0}")]
    LastWallet(String),
    /// Transfer with identical source and destination wallet.
    #[error("Invalid transfer: {0}")]
    InvalidTransfer(String),
    /// Attempt to delete a tag still referenced by transactions.
    #[error("Tag in use: {0}")]
    TagInUse(String),
    /// A timestamp could not be parsed into the internal representation.
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::MissingReference(a), Self::MissingReference(b)) => a == b,
            (Self::MissingPriorState(a), Self::MissingPriorState(b)) => a == b,
            (Self::ImmutableField(a), Self::ImmutableField(b)) => a == b,
            (Self::LastWallet(a), Self::LastWallet(b)) => a == b,
            (Self::InvalidTransfer(a), Self::InvalidTransfer(b)) => a == b,
            (Self::TagInUse(a), Self::TagInUse(b)) => a == b,
            (Self::InvalidDate(a), Self::InvalidDate(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
