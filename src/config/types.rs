use std::time::Duration;

use serde::Deserialize;

use crate::args::parsers::parse_duration_value;
use crate::args::{HttpMethod, OutputFormat};
use crate::error::ValidationError;

/// Config file contents; every key mirrors a CLI flag.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub url: Option<String>,
    pub requests: Option<u64>,
    pub workers: Option<usize>,
    pub queue_depth: Option<usize>,
    pub cpus: Option<usize>,
    pub method: Option<HttpMethod>,
    pub head: Option<bool>,
    #[serde(alias = "fail_fast")]
    pub fail: Option<bool>,
    pub quiet: Option<bool>,
    pub cert: Option<String>,
    pub key: Option<String>,
    pub cacert: Option<String>,
    pub verify_tls: Option<bool>,
    pub timeout: Option<DurationValue>,
    pub connect_timeout: Option<DurationValue>,
    pub output_format: Option<OutputFormat>,
    pub outcomes_jsonl: Option<String>,
    pub verbose: Option<bool>,
}

/// Either whole seconds or a string such as `"500ms"`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DurationValue {
    Seconds(u64),
    Text(String),
}

impl DurationValue {
    pub(crate) fn to_duration(&self) -> Result<Duration, ValidationError> {
        match self {
            DurationValue::Seconds(secs) => {
                if *secs == 0 {
                    Err(ValidationError::DurationZero)
                } else {
                    Ok(Duration::from_secs(*secs))
                }
            }
            DurationValue::Text(text) => parse_duration_value(text),
        }
    }
}
