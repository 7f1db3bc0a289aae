use super::*;
use crate::args::HttpMethod;
use std::sync::{Arc, Mutex};
use std::time::Duration;

fn outcome(sequence: u64, status_code: u16, error: Option<&str>) -> Outcome {
    Outcome {
        sequence,
        worker: 2,
        method: HttpMethod::Head,
        status_code,
        content_length: None,
        succeeded: status_code == 200,
        error: error.map(str::to_owned),
        latency: Duration::from_millis(12),
    }
}

#[derive(Clone, Default)]
struct CountingSink {
    records: Arc<Mutex<u64>>,
    flushes: Arc<Mutex<u64>>,
}

impl CountingSink {
    fn counts(&self) -> (u64, u64) {
        let records = self.records.lock().map(|count| *count).unwrap_or(0);
        let flushes = self.flushes.lock().map(|count| *count).unwrap_or(0);
        (records, flushes)
    }
}

impl OutcomeSink for CountingSink {
    fn record(&mut self, _outcome: &Outcome) {
        if let Ok(mut count) = self.records.lock() {
            *count = count.saturating_add(1);
        }
    }

    fn flush(&mut self) {
        if let Ok(mut count) = self.flushes.lock() {
            *count = count.saturating_add(1);
        }
    }
}

#[test]
fn jsonl_sink_writes_one_object_per_line() -> Result<(), String> {
    let mut sink = JsonLinesSink::new(Vec::new());
    sink.record(&outcome(1, 200, None));
    sink.record(&outcome(2, 0, Some("connection refused")));
    sink.flush();

    let bytes = sink.into_inner();
    let text = String::from_utf8(bytes).map_err(|err| format!("not utf-8: {}", err))?;
    let lines: Vec<&str> = text.lines().collect();
    let [first, second] = lines.as_slice() else {
        return Err(format!("expected two lines, got {}", lines.len()));
    };

    let first: serde_json::Value =
        serde_json::from_str(first).map_err(|err| format!("bad json: {}", err))?;
    let second: serde_json::Value =
        serde_json::from_str(second).map_err(|err| format!("bad json: {}", err))?;

    let checks = [
        (first["sequence"] == 1, "sequence"),
        (first["method"] == "HEAD", "method"),
        (first["status_code"] == 200, "status_code"),
        (first["succeeded"] == true, "succeeded"),
        (first["latency_ms"] == 12, "latency_ms"),
        (first["error"].is_null(), "error"),
        (first["timestamp"].is_string(), "timestamp"),
        (second["status_code"] == 0, "no-response status"),
        (second["error"] == "connection refused", "error text"),
    ];
    for (ok, field) in checks {
        if !ok {
            return Err(format!("unexpected {} in {} / {}", field, first, second));
        }
    }
    Ok(())
}

#[test]
fn fanout_forwards_records_and_flushes() -> Result<(), String> {
    let left = CountingSink::default();
    let right = CountingSink::default();
    let mut fanout = FanoutSink::new()
        .with(Box::new(left.clone()))
        .with(Box::new(right.clone()));
    fanout.record(&outcome(1, 200, None));
    fanout.record(&outcome(2, 404, None));
    fanout.flush();

    for (name, sink) in [("left", &left), ("right", &right)] {
        if sink.counts() != (2, 1) {
            return Err(format!("{} sink saw {:?}", name, sink.counts()));
        }
    }
    Ok(())
}

#[test]
fn log_sink_accepts_every_outcome_kind() {
    let mut sink = LogSink;
    sink.record(&outcome(1, 200, None));
    sink.record(&outcome(2, 0, Some("timed out")));
    sink.flush();
}
