//! Fleetaudit Common - configuration, environment, and logging
//!
//! Everything here is run-ambient plumbing: resolving the deployment root,
//! loading `.env` overrides, building the run configuration from the process
//! environment, and the per-control log file sink.

pub mod config;
pub mod env;
pub mod logging;

pub use config::{find_deployment_root, RunConfig};
pub use env::load_dotenv;
pub use logging::{init_tracing, sanitize_file_component, FileControlLog};
