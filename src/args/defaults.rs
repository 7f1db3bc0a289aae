use std::num::NonZeroUsize;

pub(crate) const DEFAULT_USER_AGENT: &str = concat!("reqconcur/", env!("CARGO_PKG_VERSION"));

/// Runtime worker threads when `--cpus` is not given.
pub(crate) fn default_cpus() -> usize {
    std::thread::available_parallelism().map_or(1, NonZeroUsize::get)
}
