//! CLI argument types and parsing helpers.
mod cli;
mod defaults;
pub(crate) mod parsers;
mod types;

#[cfg(test)]
mod tests;

pub use cli::ReqArgs;
pub use types::{HttpMethod, OutputFormat, PositiveUsize};

pub(crate) use defaults::{DEFAULT_USER_AGENT, default_cpus};
