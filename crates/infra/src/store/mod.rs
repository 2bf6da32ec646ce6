//! Storage boundary: atomic units of work over levels, movements and documents.
//!
//! Nothing here assumes a storage technology. A unit of work stages writes,
//! each guarded by the version the caller read, and `commit` either applies
//! all of them or none.

pub mod in_memory;
pub mod r#trait;

pub use in_memory::{InMemoryStore, InMemoryTx};
pub use r#trait::{DocumentFilter, Page, Store, StoreError, StoredDocument, UnitOfWork};
