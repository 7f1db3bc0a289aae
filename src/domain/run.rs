use url::Url;

use crate::args::{HttpMethod, PositiveUsize, ReqArgs};
use crate::error::{AppError, AppResult, HttpError, ValidationError};

/// Immutable parameters of one run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub target: Url,
    pub total_requests: u64,
    pub workers: PositiveUsize,
    pub queue_capacity: PositiveUsize,
    pub method: HttpMethod,
    pub fail_fast: bool,
    pub quiet: bool,
}

impl RunConfig {
    /// Validates the merged CLI/config arguments.
    ///
    /// # Errors
    ///
    /// Returns an error when the URL is missing, empty, or malformed.
    pub fn from_args(args: &ReqArgs) -> AppResult<Self> {
        let raw = args
            .url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or_else(|| AppError::validation(ValidationError::MissingUrl))?;
        let target = Url::parse(raw).map_err(|err| {
            AppError::http(HttpError::InvalidUrl {
                url: raw.to_owned(),
                source: err,
            })
        })?;

        Ok(Self {
            target,
            total_requests: args.requests,
            workers: args.workers,
            queue_capacity: args.queue_capacity(),
            method: args.effective_method(),
            fail_fast: args.fail_fast,
            quiet: args.quiet,
        })
    }
}
