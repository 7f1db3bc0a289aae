use super::*;
use clap::Parser;
use std::time::Duration;

fn parse_test_args<I, T>(args: I) -> Result<ReqArgs, String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    ReqArgs::try_parse_from(args).map_err(|err| format!("Expected parse success: {}", err))
}

#[test]
fn parse_args_defaults() -> Result<(), String> {
    let args = parse_test_args(["reqconcur", "-u", "http://localhost"])?;

    let checks = [
        (
            args.url.as_deref() == Some("http://localhost"),
            "Unexpected url",
        ),
        (args.requests == 10, "Unexpected requests"),
        (args.workers.get() == 5, "Unexpected workers"),
        (args.queue_depth.is_none(), "Expected queue_depth to be None"),
        (args.queue_capacity().get() == 5, "Unexpected queue capacity"),
        (args.cpus.is_none(), "Expected cpus to be None"),
        (
            args.effective_method() == HttpMethod::Get,
            "Expected HttpMethod::Get",
        ),
        (!args.fail_fast, "Expected fail_fast to be false"),
        (!args.quiet, "Expected quiet to be false"),
        (!args.verify_tls, "Expected verify_tls to be false"),
        (
            args.request_timeout.is_none(),
            "Expected request_timeout to be None",
        ),
        (
            args.connect_timeout == Duration::from_secs(10),
            "Unexpected connect_timeout",
        ),
        (
            args.output_format == OutputFormat::Text,
            "Expected text output",
        ),
        (args.outcomes_jsonl.is_none(), "Expected no outcome log"),
        (args.config.is_none(), "Expected config to be None"),
    ];
    for (ok, message) in checks {
        if !ok {
            return Err(message.to_owned());
        }
    }
    Ok(())
}

#[test]
fn head_flag_overrides_method() -> Result<(), String> {
    let args = parse_test_args(["reqconcur", "-u", "http://localhost", "-X", "get", "--head"])?;
    if args.effective_method() != HttpMethod::Head {
        return Err("Expected --head to select HEAD".to_owned());
    }
    Ok(())
}

#[test]
fn method_is_case_insensitive() -> Result<(), String> {
    let args = parse_test_args(["reqconcur", "-u", "http://localhost", "--method", "HEAD"])?;
    if args.effective_method() != HttpMethod::Head {
        return Err("Expected HEAD".to_owned());
    }
    Ok(())
}

#[test]
fn fail_fast_alias_and_quiet() -> Result<(), String> {
    let args = parse_test_args(["reqconcur", "-u", "http://x", "--fail-fast", "-q"])?;
    if !args.fail_fast || !args.quiet {
        return Err("Expected fail_fast and quiet".to_owned());
    }
    Ok(())
}

#[test]
fn zero_requests_is_accepted() -> Result<(), String> {
    let args = parse_test_args(["reqconcur", "-u", "http://x", "-n", "0"])?;
    if args.requests != 0 {
        return Err(format!("Unexpected requests: {}", args.requests));
    }
    Ok(())
}

#[test]
fn zero_workers_is_rejected() -> Result<(), String> {
    if ReqArgs::try_parse_from(["reqconcur", "-u", "http://x", "-w", "0"]).is_ok() {
        return Err("Expected zero workers to be rejected".to_owned());
    }
    Ok(())
}

#[test]
fn queue_depth_overrides_capacity() -> Result<(), String> {
    let args = parse_test_args(["reqconcur", "-u", "http://x", "-w", "3", "--queue-depth", "64"])?;
    if args.queue_capacity().get() != 64 {
        return Err("Expected queue capacity 64".to_owned());
    }
    Ok(())
}

#[test]
fn timeout_accepts_units() -> Result<(), String> {
    let args = parse_test_args(["reqconcur", "-u", "http://x", "--timeout", "250ms"])?;
    if args.request_timeout != Some(Duration::from_millis(250)) {
        return Err(format!("Unexpected timeout: {:?}", args.request_timeout));
    }
    Ok(())
}

#[test]
fn duration_parser_rejects_bad_input() -> Result<(), String> {
    for value in ["", "abc", "10x", "0s"] {
        if parsers::parse_duration_value(value).is_ok() {
            return Err(format!("Expected '{}' to be rejected", value));
        }
    }
    if parsers::parse_duration_value("2m").ok() != Some(Duration::from_secs(120)) {
        return Err("Expected 2m == 120s".to_owned());
    }
    Ok(())
}
