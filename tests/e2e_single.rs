
use tempfile::tempdir;

use support_single::{run_reqconcur, spawn_http_server_or_skip};

fn describe(output: &std::process::Output) -> String {
    format!(
        "status: {:?}\nstdout: {}\nstderr: {}",
        output.status.code(),
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    )
}

#[test]
fn e2e_single_all_success() -> Result<(), String> {
    let Some((url, server)) = spawn_http_server_or_skip(200)? else {
        return Ok(());
    };

    let output = run_reqconcur(["-u", url.as_str(), "-n", "10", "-w", "3", "-q"])?;
    if output.status.code() != Some(0) {
        return Err(describe(&output));
    }
    let stdout = String::from_utf8_lossy(&output.stdout);
    if !stdout.starts_with("completed 10 requests") || !stdout.contains("  200: 10") {
        return Err(describe(&output));
    }
    if server.hits() != 10 {
        return Err(format!("server saw {} requests", server.hits()));
    }
    Ok(())
}

#[test]
fn e2e_single_fail_fast_exit_code() -> Result<(), String> {
    let Some((url, _server)) = spawn_http_server_or_skip(500)? else {
        return Ok(());
    };

    let output = run_reqconcur(["-u", url.as_str(), "-n", "20", "-w", "2", "--fail"])?;
    if output.status.code() != Some(2) {
        return Err(describe(&output));
    }
    let stdout = String::from_utf8_lossy(&output.stdout);
    if !stdout.contains("before failure") || !stdout.contains("returned status 500") {
        return Err(describe(&output));
    }
    Ok(())
}

#[test]
fn e2e_single_json_report_and_outcome_log() -> Result<(), String> {
    let Some((url, _server)) = spawn_http_server_or_skip(404)? else {
        return Ok(());
    };
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let log_path = dir.path().join("outcomes.jsonl");
    let log_arg = log_path.to_string_lossy().into_owned();

    let output = run_reqconcur([
        "-u",
        url.as_str(),
        "-n",
        "4",
        "--head",
        "--output-format",
        "json",
        "--outcomes-jsonl",
        log_arg.as_str(),
    ])?;
    if output.status.code() != Some(0) {
        return Err(describe(&output));
    }
    let report: serde_json::Value = serde_json::from_slice(&output.stdout)
        .map_err(|err| format!("bad json report: {}\n{}", err, describe(&output)))?;
    if report["status_codes"]["404"] != 4 || report["termination"] != "completed" {
        return Err(describe(&output));
    }

    let log = std::fs::read_to_string(&log_path)
        .map_err(|err| format!("read outcome log failed: {}", err))?;
    if log.lines().count() != 4 {
        return Err(format!("unexpected outcome log:\n{}", log));
    }
    Ok(())
}

#[test]
fn e2e_single_missing_url_fails() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let config = dir.path().join("empty.toml");
    std::fs::write(&config, "requests = 1\n")
        .map_err(|err| format!("write config failed: {}", err))?;
    let config_arg = config.to_string_lossy().into_owned();

    let output = run_reqconcur(["-c", config_arg.as_str()])?;
    if output.status.code() != Some(1) {
        return Err(describe(&output));
    }
    if !String::from_utf8_lossy(&output.stderr).contains("--url") {
        return Err(describe(&output));
    }
    Ok(())
}
