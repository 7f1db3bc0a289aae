use std::fmt::Write as _;

use serde::Serialize;

use crate::args::OutputFormat;
use crate::error::AppResult;
use crate::metrics::{FailureSignal, LatencySummary, StatusHistogram, Termination};

use super::RunReport;

#[derive(Serialize)]
struct FailureJson<'a> {
    kind: &'static str,
    sequence: u64,
    worker: usize,
    status_code: u16,
    error: Option<&'a str>,
}

#[derive(Serialize)]
struct LatencyJson {
    min: u64,
    avg: u64,
    max: u64,
    p50: u64,
    p90: u64,
    p99: u64,
}

#[derive(Serialize)]
struct ReportJson<'a> {
    termination: &'static str,
    started_at: String,
    elapsed_ms: u64,
    total_requests: u64,
    dispatched: u64,
    completed: u64,
    skipped: u64,
    status_codes: &'a StatusHistogram,
    latency_ms: LatencyJson,
    failure: Option<FailureJson<'a>>,
}

impl<'a> From<&'a FailureSignal> for FailureJson<'a> {
    fn from(signal: &'a FailureSignal) -> Self {
        Self {
            kind: signal.kind.as_str(),
            sequence: signal.outcome.sequence,
            worker: signal.outcome.worker,
            status_code: signal.outcome.status_code,
            error: signal.outcome.error.as_deref(),
        }
    }
}

impl From<LatencySummary> for LatencyJson {
    fn from(latency: LatencySummary) -> Self {
        Self {
            min: latency.min_ms,
            avg: latency.avg_ms,
            max: latency.max_ms,
            p50: latency.p50_ms,
            p90: latency.p90_ms,
            p99: latency.p99_ms,
        }
    }
}

/// Prints the final report to stdout.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn print_report(report: &RunReport, format: OutputFormat) -> AppResult<()> {
    let rendered = render_report(report, format)?;
    println!("{}", rendered);
    Ok(())
}

pub(crate) fn render_report(report: &RunReport, format: OutputFormat) -> AppResult<String> {
    match format {
        OutputFormat::Text => Ok(render_text(report)),
        OutputFormat::Json => render_json(report),
    }
}

fn render_json(report: &RunReport) -> AppResult<String> {
    let json = ReportJson {
        termination: report.termination.as_str(),
        started_at: report.started_at.to_rfc3339(),
        elapsed_ms: u64::try_from(report.elapsed.as_millis()).unwrap_or(u64::MAX),
        total_requests: report.total_requests,
        dispatched: report.dispatched,
        completed: report.completed,
        skipped: report.skipped,
        status_codes: &report.histogram,
        latency_ms: LatencyJson::from(report.latency),
        failure: report.failure.as_ref().map(FailureJson::from),
    };
    Ok(serde_json::to_string_pretty(&json)?)
}

fn render_text(report: &RunReport) -> String {
    let mut out = String::new();
    match report.termination {
        Termination::Completed => {
            push_line(
                &mut out,
                format_args!(
                    "completed {} requests in {:.3?}",
                    report.completed, report.elapsed
                ),
            );
        }
        Termination::Aborted => {
            push_line(
                &mut out,
                format_args!("made {} requests before failure", report.completed),
            );
            if let Some(failure) = report.failure.as_ref() {
                push_line(&mut out, format_args!("ERROR: {}", describe_failure(failure)));
            }
        }
        Termination::Interrupted => {
            push_line(
                &mut out,
                format_args!(
                    "interrupted after {} of {} requests in {:.3?}",
                    report.completed, report.total_requests, report.elapsed
                ),
            );
        }
        Termination::Incomplete => {
            push_line(
                &mut out,
                format_args!(
                    "ERROR: all workers stopped after {} of {} requests in {:.3?}",
                    report.completed.saturating_add(report.skipped),
                    report.total_requests,
                    report.elapsed
                ),
            );
        }
    }
    if report.skipped > 0 {
        push_line(
            &mut out,
            format_args!("skipped {} requests that could not be built", report.skipped),
        );
    }

    if report.histogram.is_empty() {
        push_line(&mut out, format_args!("Status codes: none"));
    } else {
        push_line(&mut out, format_args!("Status codes:"));
        for (status, count) in report.histogram.iter() {
            push_line(&mut out, format_args!("  {}: {}", status_label(status), count));
        }
    }

    if report.completed > 0 {
        let latency = report.latency;
        push_line(
            &mut out,
            format_args!(
                "Latency min/avg/max: {}ms / {}ms / {}ms",
                latency.min_ms, latency.avg_ms, latency.max_ms
            ),
        );
        push_line(
            &mut out,
            format_args!(
                "Latency p50/p90/p99: {}ms / {}ms / {}ms",
                latency.p50_ms, latency.p90_ms, latency.p99_ms
            ),
        );
    }
    // Trailing newline is added by println!.
    if out.ends_with('\n') {
        out.pop();
    }
    out
}

fn describe_failure(failure: &FailureSignal) -> String {
    let outcome = &failure.outcome;
    match outcome.error.as_deref() {
        Some(error) => format!(
            "{} failure on request #{} (worker {}): {}",
            failure.kind.as_str(),
            outcome.sequence,
            outcome.worker,
            error
        ),
        None => format!(
            "request #{} (worker {}) returned status {}",
            outcome.sequence, outcome.worker, outcome.status_code
        ),
    }
}

fn status_label(status: u16) -> String {
    if status == crate::metrics::NO_RESPONSE_STATUS {
        "no response".to_owned()
    } else {
        status.to_string()
    }
}

fn push_line(out: &mut String, args: std::fmt::Arguments<'_>) {
    // Writing into a String cannot fail.
    drop(out.write_fmt(args));
    out.push('\n');
}
