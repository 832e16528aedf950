//! Fleetaudit Engine - sequential control orchestration and the report sink

pub mod orchestrator;
pub mod report_sink;

pub use orchestrator::{prepare_run_dirs, select_controls, Orchestrator};
pub use report_sink::{echo_report, write_report};
