//! The module contains the error the ledger can throw.
//!
//! - [`Validation`] is raised before any write when a movement descriptor is
//!   malformed, or when a stored row carries a tag the boundary no longer
//!   accepts.
//! - [`Database`] wraps the storage error unchanged; retry policy belongs to
//!   the caller.
//!
//! [`Validation`]: LedgerError::Validation
//! [`Database`]: LedgerError::Database
use sea_orm::DbErr;
use thiserror::Error;

/// Ledger custom errors.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("invalid movement: {0}")]
    Validation(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for LedgerError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Validation(a), Self::Validation(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
