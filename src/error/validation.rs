use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Please actually provide a --url to run against (or set it in the config file).")]
    MissingUrl,
    #[error("--cert requires --key.")]
    CertRequiresKey,
    #[error("--key requires --cert.")]
    KeyRequiresCert,
    #[error("Duration must not be empty.")]
    DurationEmpty,
    #[error("Invalid duration '{value}'.")]
    InvalidDurationFormat { value: String },
    #[error("Invalid duration '{value}': {source}")]
    InvalidDurationNumber {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("Duration overflow.")]
    DurationOverflow,
    #[error("Invalid duration unit '{unit}'.")]
    InvalidDurationUnit { unit: String },
    #[error("Duration must be > 0.")]
    DurationZero,
    #[error("Value must be >= {min}.")]
    ValueTooSmall { min: u64 },
    #[error("Invalid value: {source}")]
    InvalidNumber {
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("Invalid HTTP method '{value}'. Use get or head.")]
    InvalidMethod { value: String },
    #[error("Invalid output format '{value}'. Use text or json.")]
    InvalidOutputFormat { value: String },
}
