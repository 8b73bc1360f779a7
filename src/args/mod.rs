//! CLI argument types and parsing helpers.
mod cli;
mod defaults;
pub(crate) mod parsers;
mod types;

#[cfg(test)]
mod tests;

pub use cli::TesterArgs;
pub use types::{FormParams, HttpMethod, PositiveU64, PositiveUsize};

pub(crate) use defaults::{DEFAULT_CONFIG_FILES, DEFAULT_USER_AGENT, default_worker_count};
pub(crate) use parsers::{parse_duration_arg, parse_params};
