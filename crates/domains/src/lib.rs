//! # domains
//!
//! The central domain logic and interface definitions for the leafboard
//! forum engine: entities, port traits, the error taxonomy, and the tagged
//! events that mutating operations emit.

pub mod error;
pub mod events;
pub mod models;
pub mod ports;

// Re-exporting for easier access in other crates
pub use error::*;
pub use events::*;
pub use models::*;
pub use ports::*;
