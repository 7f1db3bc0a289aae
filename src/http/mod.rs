//! Request generation, dispatch, and the worker pool.
mod client;
mod dispatcher;
mod executor;
mod generator;
mod queue;
mod worker;


pub use client::{ClientSettings, build_client};
pub use dispatcher::{DispatchCounter, DispatchPhase, spawn_dispatcher};
pub use executor::{HttpExecutor, RequestExecutor, Response};
pub use generator::{RequestGenerator, RequestSpec};
pub use queue::{WorkQueue, work_queue};
pub use worker::{WorkerChannels, WorkerExit, WorkerExitReason, spawn_workers};
