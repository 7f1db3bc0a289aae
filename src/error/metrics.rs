use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("Histogram error during {context}: {source}")]
    Histogram {
        context: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("Failed to open outcome log '{path}': {source}")]
    OpenOutcomeLog {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
