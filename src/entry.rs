use std::ffi::OsString;
use std::process::ExitCode;

use clap::{CommandFactory, FromArgMatches};

use crate::app::{print_report, run_local};
use crate::args::{PositiveUsize, ReqArgs, default_cpus};
use crate::config::{apply_config, load_config};
use crate::error::AppResult;

/// Parses arguments, runs the load, prints the report, and maps the
/// termination to a process exit code.
///
/// # Errors
///
/// Returns an error for invalid arguments or config, runtime setup
/// failures, and client construction failures.
pub fn run() -> AppResult<ExitCode> {
    let args = parse_args(std::env::args_os())?;

    crate::logger::init_logging(args.verbose);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(args.cpus.map_or_else(default_cpus, PositiveUsize::get))
        .enable_all()
        .build()?;

    let report = runtime.block_on(run_local(&args))?;
    print_report(&report, args.output_format)?;
    Ok(ExitCode::from(report.exit_code()))
}

fn parse_args<I, T>(argv: I) -> AppResult<ReqArgs>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = ReqArgs::command().get_matches_from(argv);
    let mut args = ReqArgs::from_arg_matches(&matches)?;

    if let Some(config) = load_config(args.config.as_deref())? {
        apply_config(&mut args, &matches, &config)?;
    }

    Ok(args)
}
