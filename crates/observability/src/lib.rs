//! Structured logging for stockyard binaries and test harnesses.
//!
//! Filters come from `RUST_LOG` when set, otherwise from the caller (usually
//! the `log` section of the loaded settings).

pub mod tracing;

pub use self::tracing::{init, init_with};
