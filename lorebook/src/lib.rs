//! # Lorebook
//!
//! The bridge between an authored world graph and the flat lorebook document
//! a narrative runtime consumes. Compiling derives triggers, spawn tables and
//! relationship maps from graph edges; loading rebuilds the edges from those
//! redundant fields.
//!
//! ## Core Components
//!
//! - **schema**: Lorebook entries and the wrapper document
//! - **compiler**: Graph snapshot -> ordered entries
//! - **loader**: Entries -> graph snapshot, with an import report
//! - **check**: Load-then-compile consistency check
//! - **config**: TOML configuration for graph defaults and import layout
//!
//! Both directions work on immutable [`GraphSnapshot`](world_graph::GraphSnapshot)
//! values and never touch a live store.

pub mod check;
pub mod compiler;
pub mod config;
pub mod error;
pub mod loader;
pub mod schema;

pub use check::*;
pub use compiler::*;
pub use config::*;
pub use error::*;
pub use loader::*;
pub use schema::*;
