//! Domain error model.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::id::{ItemId, WarehouseId};

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// invariants, lifecycle rules, stock levels, conflicts). Infrastructure
/// concerns belong elsewhere.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. malformed input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A domain invariant was violated.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A referenced document, item or inventory row does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The requested status change is not an edge of the document type's graph.
    #[error("{document}: transition {from} -> {to} is not permitted")]
    InvalidTransition {
        document: String,
        from: String,
        to: String,
    },

    /// The document is outside its editable state.
    #[error("{document} fields are locked in status {status}")]
    FieldsLocked { document: String, status: String },

    /// A decrease would drive on-hand stock negative.
    #[error(
        "insufficient stock for item {item_id} at warehouse {warehouse_id}: on hand {on_hand}, requested {requested}"
    )]
    InsufficientStock {
        item_id: ItemId,
        warehouse_id: WarehouseId,
        on_hand: Decimal,
        requested: Decimal,
    },

    /// A non-positive (or negative, for absolute sets) quantity was supplied.
    #[error("invalid quantity: {0}")]
    InvalidQuantity(String),

    /// Optimistic concurrency conflict (stale version). Callers may retry.
    #[error("concurrent modification: {0}")]
    ConcurrentModification(String),

    /// A time-gated (or otherwise conditional) transition was attempted too early.
    #[error("precondition not met: {0}")]
    PreconditionNotMet(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn invalid_transition(
        document: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
    ) -> Self {
        Self::InvalidTransition {
            document: document.into(),
            from: from.into(),
            to: to.into(),
        }
    }

    pub fn fields_locked(document: impl Into<String>, status: impl Into<String>) -> Self {
        Self::FieldsLocked {
            document: document.into(),
            status: status.into(),
        }
    }

    pub fn insufficient_stock(
        item_id: ItemId,
        warehouse_id: WarehouseId,
        on_hand: Decimal,
        requested: Decimal,
    ) -> Self {
        Self::InsufficientStock {
            item_id,
            warehouse_id,
            on_hand,
            requested,
        }
    }

    pub fn invalid_quantity(msg: impl Into<String>) -> Self {
        Self::InvalidQuantity(msg.into())
    }

    pub fn concurrent(msg: impl Into<String>) -> Self {
        Self::ConcurrentModification(msg.into())
    }

    pub fn precondition(msg: impl Into<String>) -> Self {
        Self::PreconditionNotMet(msg.into())
    }

    /// Failures that reject a lifecycle request on business grounds.
    pub fn is_business_rule(&self) -> bool {
        matches!(
            self,
            DomainError::InvalidTransition { .. }
                | DomainError::FieldsLocked { .. }
                | DomainError::PreconditionNotMet(_)
                | DomainError::Validation(_)
                | DomainError::InvariantViolation(_)
        )
    }

    /// Only optimistic concurrency conflicts are worth retrying unchanged.
    pub fn is_retryable(&self) -> bool {
        matches!(self, DomainError::ConcurrentModification(_))
    }
}
