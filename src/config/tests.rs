use std::io::Write;
use std::time::Duration;

use clap::{CommandFactory, FromArgMatches};

use super::loader::load_config_file;
use super::{apply_config, load_config};
use crate::args::{HttpMethod, OutputFormat, ReqArgs};
use crate::error::{AppError, ConfigError};

fn parse_with(argv: &[&str]) -> Result<(ReqArgs, clap::ArgMatches), String> {
    let matches = ReqArgs::command()
        .try_get_matches_from(argv)
        .map_err(|err| format!("parse failed: {}", err))?;
    let args = ReqArgs::from_arg_matches(&matches).map_err(|err| format!("{}", err))?;
    Ok((args, matches))
}

fn write_config(suffix: &str, body: &str) -> Result<tempfile::NamedTempFile, String> {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .map_err(|err| format!("tempfile failed: {}", err))?;
    file.write_all(body.as_bytes())
        .map_err(|err| format!("write failed: {}", err))?;
    Ok(file)
}

#[test]
fn toml_config_fills_unset_options() -> Result<(), String> {
    let file = write_config(
        ".toml",
        r#"
url = "http://localhost:8080/"
requests = 42
workers = 3
method = "head"
fail = true
timeout = "500ms"
connect_timeout = 2
output_format = "json"
"#,
    )?;
    let config = load_config_file(file.path()).map_err(|err| format!("{}", err))?;
    let (mut args, matches) = parse_with(&["reqconcur"])?;
    apply_config(&mut args, &matches, &config).map_err(|err| format!("{}", err))?;

    if args.url.as_deref() != Some("http://localhost:8080/") {
        return Err(format!("unexpected url: {:?}", args.url));
    }
    if args.requests != 42 || args.workers.get() != 3 {
        return Err(format!(
            "unexpected load: {} requests, {} workers",
            args.requests, args.workers
        ));
    }
    if args.method != HttpMethod::Head || !args.fail_fast {
        return Err("method or fail flag not applied".to_owned());
    }
    if args.request_timeout != Some(Duration::from_millis(500)) {
        return Err(format!("unexpected timeout: {:?}", args.request_timeout));
    }
    if args.connect_timeout != Duration::from_secs(2) {
        return Err(format!(
            "unexpected connect timeout: {:?}",
            args.connect_timeout
        ));
    }
    if args.output_format != OutputFormat::Json {
        return Err("output format not applied".to_owned());
    }
    Ok(())
}

#[test]
fn command_line_wins_over_config() -> Result<(), String> {
    let file = write_config(
        ".json",
        r#"{ "url": "http://config.invalid/", "requests": 99, "quiet": true }"#,
    )?;
    let config = load_config_file(file.path()).map_err(|err| format!("{}", err))?;
    let (mut args, matches) =
        parse_with(&["reqconcur", "-u", "http://cli.invalid/", "-n", "7"])?;
    apply_config(&mut args, &matches, &config).map_err(|err| format!("{}", err))?;

    if args.url.as_deref() != Some("http://cli.invalid/") {
        return Err(format!("config overrode --url: {:?}", args.url));
    }
    if args.requests != 7 {
        return Err(format!("config overrode -n: {}", args.requests));
    }
    if !args.quiet {
        return Err("quiet from config should apply".to_owned());
    }
    Ok(())
}

#[test]
fn fail_fast_key_is_accepted() -> Result<(), String> {
    let file = write_config(".toml", "fail_fast = true\n")?;
    let config = load_config_file(file.path()).map_err(|err| format!("{}", err))?;
    if config.fail != Some(true) {
        return Err(format!("unexpected fail value: {:?}", config.fail));
    }
    Ok(())
}

#[test]
fn zero_workers_in_config_is_rejected() -> Result<(), String> {
    let file = write_config(".toml", "workers = 0\n")?;
    let config = load_config_file(file.path()).map_err(|err| format!("{}", err))?;
    let (mut args, matches) = parse_with(&["reqconcur"])?;
    match apply_config(&mut args, &matches, &config) {
        Err(AppError::Config(ConfigError::InvalidValue { field: "workers", .. })) => Ok(()),
        other => Err(format!("expected invalid workers, got {:?}", other)),
    }
}

#[test]
fn unknown_extension_is_rejected() -> Result<(), String> {
    let file = write_config(".yaml", "url: x\n")?;
    match load_config_file(file.path()) {
        Err(AppError::Config(ConfigError::UnsupportedExtension { ext })) if ext == "yaml" => {
            Ok(())
        }
        other => Err(format!("expected unsupported extension, got {:?}", other)),
    }
}

#[test]
fn unknown_key_is_rejected() -> Result<(), String> {
    let file = write_config(".toml", "rate = 5\n")?;
    match load_config_file(file.path()) {
        Err(AppError::Config(ConfigError::ParseToml { .. })) => Ok(()),
        other => Err(format!("expected parse error, got {:?}", other)),
    }
}

#[test]
fn missing_explicit_config_is_an_error() -> Result<(), String> {
    let dir = tempfile::tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let path = dir.path().join("absent.toml");
    let path = path.to_str().ok_or("non-utf8 temp path")?;
    match load_config(Some(path)) {
        Err(AppError::Config(ConfigError::ReadConfig { .. })) => Ok(()),
        other => Err(format!("expected read error, got {:?}", other.map(|_| ()))),
    }
}
