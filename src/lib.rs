//! Core library for the `reqconcur` CLI.
//!
//! This crate provides the building blocks used by the binary: CLI
//! argument types, configuration parsing, request generation and dispatch,
//! the worker pool, outcome aggregation, and output sinks. The primary
//! user-facing interface is the `reqconcur` command-line application.
pub mod app;
pub mod args;
pub mod config;
pub mod domain;
pub mod entry;
pub mod error;
pub mod fail_fast;
pub mod http;
pub mod logger;
pub mod metrics;
pub mod shutdown;
pub mod shutdown_handlers;
pub mod sinks;
