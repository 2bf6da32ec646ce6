//! Infrastructure layer: the transactional store boundary and every service
//! that performs IO on top of the pure domain crates.
//!
//! - [`store`]: `Store` / `UnitOfWork` traits and the in-memory reference store
//! - [`ledger`]: the inventory ledger service and in-transaction posting
//! - [`runtime`]: the shared document lifecycle pipeline
//! - [`services`]: typed lifecycle services, one per document type
//! - [`numbering`], [`audit`]: external collaborators
//! - [`settings`]: configuration loaded from the environment

pub mod audit;
pub mod error;
pub mod ledger;
pub mod numbering;
pub mod retry;
pub mod runtime;
pub mod services;
pub mod settings;
pub mod store;

#[cfg(test)]
mod integration_tests;
#[cfg(test)]
mod testing;

pub use audit::{AuditError, AuditSink, AuditTrail, BusAuditSink};
pub use error::{LifecycleError, LifecycleResult};
pub use ledger::InventoryLedger;
pub use numbering::{DocumentNumbering, NumberingError, SequentialNumbering};
pub use runtime::DocumentRuntime;
pub use services::{ActionOutcome, Services};
pub use settings::Settings;
pub use store::{
    DocumentFilter, InMemoryStore, Page, Store, StoreError, StoredDocument, UnitOfWork,
};
