//! Transition registry: the declarative status graphs of every document type.
//!
//! Pure configuration, no IO. Every lifecycle service asks this crate whether
//! `current -> requested` is legal before doing anything else.

pub mod graph;
pub mod kind;
pub mod registry;
pub mod status;

pub use graph::StatusGraph;
pub use kind::DocumentKind;
pub use registry::TransitionRegistry;
pub use status::{WorkflowStatus, ensure_transition};
