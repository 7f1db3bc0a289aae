mod runner;
pub(crate) mod summary;


pub use runner::{RunReport, run_load, run_local};
pub use summary::print_report;
