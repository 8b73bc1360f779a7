//! Core library for the `stampede` CLI.
//!
//! `stampede` fires a fixed number of identical HTTP requests at one URL
//! from a pool of concurrent workers, optionally paced to a target rate,
//! and reports throughput, latency extremes, and the error rate. The
//! binary is the primary interface; library APIs may change with it.
pub mod app;
pub mod args;
pub mod config;
mod entry;
pub mod error;
pub mod http;
pub mod logger;
pub mod metrics;
pub mod shutdown;
pub mod shutdown_handlers;

pub use entry::run;
