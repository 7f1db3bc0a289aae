use clap::ArgMatches;
use clap::parser::ValueSource;

use crate::args::{PositiveUsize, ReqArgs};
use crate::error::{AppError, AppResult, ConfigError, ValidationError};

use super::types::{ConfigFile, DurationValue};

/// Applies config values for every option not given on the command line.
///
/// # Errors
///
/// Returns an error when a config value is out of range.
pub fn apply_config(args: &mut ReqArgs, matches: &ArgMatches, config: &ConfigFile) -> AppResult<()> {
    if !is_cli(matches, "url")
        && let Some(url) = config.url.clone()
    {
        args.url = Some(url);
    }

    if !is_cli(matches, "requests")
        && let Some(requests) = config.requests
    {
        args.requests = requests;
    }

    if !is_cli(matches, "workers")
        && let Some(workers) = config.workers
    {
        args.workers = ensure_positive_usize(workers, "workers")?;
    }

    if !is_cli(matches, "queue_depth")
        && let Some(depth) = config.queue_depth
    {
        args.queue_depth = Some(ensure_positive_usize(depth, "queue_depth")?);
    }

    if !is_cli(matches, "cpus")
        && let Some(cpus) = config.cpus
    {
        args.cpus = Some(ensure_positive_usize(cpus, "cpus")?);
    }

    if !is_cli(matches, "method")
        && let Some(method) = config.method
    {
        args.method = method;
    }

    apply_flag(matches, "head", config.head, &mut args.head);
    apply_flag(matches, "fail_fast", config.fail, &mut args.fail_fast);
    apply_flag(matches, "quiet", config.quiet, &mut args.quiet);
    apply_flag(matches, "verify_tls", config.verify_tls, &mut args.verify_tls);
    apply_flag(matches, "verbose", config.verbose, &mut args.verbose);

    if !is_cli(matches, "cert")
        && let Some(cert) = config.cert.clone()
    {
        args.cert = Some(cert);
    }

    if !is_cli(matches, "key")
        && let Some(key) = config.key.clone()
    {
        args.key = Some(key);
    }

    if !is_cli(matches, "cacert")
        && let Some(cacert) = config.cacert.clone()
    {
        args.cacert = Some(cacert);
    }

    if !is_cli(matches, "request_timeout")
        && let Some(timeout) = config.timeout.as_ref()
    {
        args.request_timeout = Some(to_duration(timeout, "timeout")?);
    }

    if !is_cli(matches, "connect_timeout")
        && let Some(timeout) = config.connect_timeout.as_ref()
    {
        args.connect_timeout = to_duration(timeout, "connect_timeout")?;
    }

    if !is_cli(matches, "output_format")
        && let Some(format) = config.output_format
    {
        args.output_format = format;
    }

    if !is_cli(matches, "outcomes_jsonl")
        && let Some(path) = config.outcomes_jsonl.clone()
    {
        args.outcomes_jsonl = Some(path);
    }

    Ok(())
}

fn is_cli(matches: &ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(ValueSource::CommandLine)
}

fn apply_flag(matches: &ArgMatches, name: &str, value: Option<bool>, target: &mut bool) {
    if !is_cli(matches, name)
        && let Some(value) = value
    {
        *target = value;
    }
}

fn ensure_positive_usize(value: usize, field: &'static str) -> AppResult<PositiveUsize> {
    PositiveUsize::try_from(value).map_err(|err| invalid(field, err))
}

fn to_duration(value: &DurationValue, field: &'static str) -> AppResult<std::time::Duration> {
    value.to_duration().map_err(|err| invalid(field, err))
}

fn invalid(field: &'static str, source: ValidationError) -> AppError {
    AppError::config(ConfigError::InvalidValue { field, source })
}
