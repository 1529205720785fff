//! # ag-engine
//!
//! The Community Engine: sole owner and mutator of the entity graph.
//! Mutations are serialized through a single-consumer command queue.

pub mod config;
pub mod engine;
pub mod store;

pub use config::{EngineConfig, OrphanThreadPolicy};
pub use engine::{CommunityEngine, EngineHandle};
pub use store::EntityStore;
