//! Run-level domain types.
mod run;

pub use run::RunConfig;
