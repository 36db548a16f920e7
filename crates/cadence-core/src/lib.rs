//! Cadence Core - Foundational types for the Cadence frame loop
//!
//! This crate provides the types that the runtime and host applications share:
//! - `LoopConfig` - Scheduler configuration, loadable from TOML
//! - `StateId` - Identity of a state on a state stack
//! - `Seconds`, `FramesPerSecond` - Time units
//! - Error types, `Result` alias and process exit codes

mod config;
mod error;
pub mod exit_code;
mod id;
mod types;

pub use config::{require_positive, ErrorPolicy, LoopConfig};
pub use error::{BoxError, CadenceError, Result};
pub use id::StateId;
pub use types::{FramesPerSecond, Seconds};
