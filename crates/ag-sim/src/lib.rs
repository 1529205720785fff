//! Agora Simulator
//!
//! Synthetic workload generator for the community engine: a paced warm-up
//! that creates members, communities and threads, then one random reply,
//! vote or message per tick, with throughput metrics at the end.
//!
//! # Example
//!
//! ```ignore
//! use ag_sim::{SimulationConfig, Simulator};
//!
//! let config = SimulationConfig::default().with_seed(42);
//! let mut simulator = Simulator::new(service, config.clone());
//! let report = simulator
//!     .run_simulation(config.members, config.communities, config.threads, config.duration())
//!     .await;
//! println!("{report}");
//! ```

mod config;
mod metrics;
mod simulator;

pub use config::SimulationConfig;
pub use metrics::{SimulationMetrics, SimulationReport};
pub use simulator::{zipf_index, Simulator};
