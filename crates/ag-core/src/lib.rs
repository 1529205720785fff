//! agora/crates/ag-core/src/lib.rs
//!
//! Domain model, command vocabulary and service contract for Agora.

pub mod commands;
pub mod error;
pub mod ids;
pub mod models;
pub mod traits;
pub mod wire;

// Re-exporting for easier access in other crates
pub use commands::*;
pub use error::*;
pub use ids::*;
pub use models::*;
pub use traits::*;
