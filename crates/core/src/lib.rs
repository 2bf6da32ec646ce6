//! `stockyard-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives shared by the workflow,
//! inventory and document crates (no infrastructure concerns).

pub mod aggregate;
pub mod context;
pub mod entity;
pub mod error;
pub mod id;
pub mod quantity;
pub mod value_object;

pub use aggregate::{AggregateRoot, ExpectedVersion};
pub use context::ActionContext;
pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{ActorId, DocumentId, ItemId, MovementId, WarehouseId};
pub use quantity::Quantity;
pub use value_object::ValueObject;
