//! Fleetaudit Core - foundation types shared across the engine
//!
//! This crate provides the abstractions the rest of the workspace builds on:
//! - `Finding`: one pass/fail verdict about one fleet resource
//! - `Control`: the trait every compliance control implements
//! - `Inventory` / `RemoteExec`: the seams to the cloud API and SSH transport
//! - `Report`, `ControlResult`, `Summary`: the persisted run record

pub mod control;
pub mod error;
pub mod finding;
pub mod report;
pub mod resource;

// Re-export commonly used types at crate root
pub use control::{Control, ControlLog, ControlOutcome, Deps, Inventory, NoopLog, RemoteExec};
pub use error::{Error, Result};
pub use finding::Finding;
pub use report::{ControlResult, Report, Summary, ToolInfo};
pub use resource::{firewall_covered, Droplet, Firewall, NetworkV4, Networks};
