//! Fleetaudit Remote - SSH command execution against fleet hosts

pub mod runner;

pub use runner::SshRunner;
