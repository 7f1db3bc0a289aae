use clap::Parser;
use std::time::Duration;

use super::parsers::{parse_duration_arg, parse_positive_usize};
use super::types::{HttpMethod, OutputFormat, PositiveUsize};

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Make a bunch of concurrent requests against a URL and report the status-code histogram."
)]
pub struct ReqArgs {
    /// URL to fetch (like https://www.mydomain.com/content/)
    #[arg(long, short)]
    pub url: Option<String>,

    /// Number of requests to perform
    #[arg(long, short = 'n', default_value_t = 10)]
    pub requests: u64,

    /// Number of concurrent workers
    #[arg(long, short = 'w', default_value = "5", value_parser = parse_positive_usize)]
    pub workers: PositiveUsize,

    /// Capacity of the request queue feeding the workers (defaults to --workers)
    #[arg(long = "queue-depth", value_parser = parse_positive_usize)]
    pub queue_depth: Option<PositiveUsize>,

    /// Number of runtime threads to use (defaults to all CPUs)
    #[arg(long, value_parser = parse_positive_usize)]
    pub cpus: Option<PositiveUsize>,

    /// HTTP method to use
    #[arg(long, short = 'X', default_value = "get", ignore_case = true)]
    pub method: HttpMethod,

    /// Use HTTP HEAD (shortcut for --method head)
    #[arg(long)]
    pub head: bool,

    /// Abort the run on the first non-OK response or transport error
    #[arg(long = "fail", alias = "fail-fast")]
    pub fail_fast: bool,

    /// Do not print every response
    #[arg(long, short)]
    pub quiet: bool,

    /// x509 client certificate file (PEM)
    #[arg(long)]
    pub cert: Option<String>,

    /// Private key file for --cert (PKCS#8 PEM)
    #[arg(long)]
    pub key: Option<String>,

    /// Additional root certificate (PEM)
    #[arg(long)]
    pub cacert: Option<String>,

    /// Verify server certificates and hostnames
    #[arg(long = "verify-tls")]
    pub verify_tls: bool,

    /// Per-request timeout (supports ms/s/m/h)
    #[arg(long = "timeout", value_parser = parse_duration_arg)]
    pub request_timeout: Option<Duration>,

    /// Connect timeout (supports ms/s/m/h)
    #[arg(long = "connect-timeout", default_value = "10s", value_parser = parse_duration_arg)]
    pub connect_timeout: Duration,

    /// Final report format
    #[arg(long = "output-format", default_value = "text", ignore_case = true)]
    pub output_format: OutputFormat,

    /// Also write every outcome as JSON lines to this file
    #[arg(long = "outcomes-jsonl")]
    pub outcomes_jsonl: Option<String>,

    /// Path to a TOML or JSON config file
    #[arg(long, short)]
    pub config: Option<String>,

    /// Enable debug logging
    #[arg(long, short)]
    pub verbose: bool,
}

impl ReqArgs {
    /// Method actually issued; `--head` overrides `--method`.
    #[must_use]
    pub const fn effective_method(&self) -> HttpMethod {
        if self.head {
            HttpMethod::Head
        } else {
            self.method
        }
    }

    #[must_use]
    pub fn queue_capacity(&self) -> PositiveUsize {
        self.queue_depth.unwrap_or(self.workers)
    }
}
