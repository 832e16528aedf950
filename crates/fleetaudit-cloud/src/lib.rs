//! Fleetaudit Cloud - DigitalOcean API inventory gateway

pub mod client;

pub use client::DoClient;
