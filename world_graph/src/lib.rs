//! # World Graph
//!
//! The authoring model for a narrative world: locations, their sublocations,
//! characters and time-bound events, connected by spawn, adjacency and
//! acquaintance edges. This crate is the single owner of graph state and its
//! invariants; it knows nothing about the lorebook format it compiles into.
//!
//! ## Core Components
//!
//! - **elements**: Node and edge definitions, identifiers, patches
//! - **connection**: The endpoint-type compatibility table and its validator
//! - **content**: The bracketed `Name=[...]` micro-format for content fields
//! - **store**: `GraphStore`, identity allocation and cascading deletion

pub mod connection;
pub mod content;
pub mod elements;
pub mod error;
pub mod settings;
pub mod store;

pub use connection::*;
pub use elements::*;
pub use error::*;
pub use settings::*;
pub use store::*;
