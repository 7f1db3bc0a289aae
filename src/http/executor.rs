use async_trait::async_trait;
use reqwest::Client;

use crate::error::RequestError;

use super::RequestSpec;

/// What the engine needs to know about a received response.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Response {
    pub status_code: u16,
    /// `None` when the size is unknown.
    pub content_length: Option<u64>,
}

/// Sends one request and reports its response.
///
/// Implementations are shared by every worker and must not retry.
#[async_trait]
pub trait RequestExecutor: Send + Sync {
    async fn execute(&self, spec: &RequestSpec) -> Result<Response, RequestError>;
}

/// `reqwest`-backed executor; the client carries timeouts and TLS material.
#[derive(Clone, Debug)]
pub struct HttpExecutor {
    client: Client,
}

impl HttpExecutor {
    #[must_use]
    pub const fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RequestExecutor for HttpExecutor {
    async fn execute(&self, spec: &RequestSpec) -> Result<Response, RequestError> {
        let request = self
            .client
            .request(spec.method.to_reqwest(), spec.target.clone())
            .build()
            .map_err(|err| RequestError::Construction {
                message: err.to_string(),
            })?;

        let mut response = self.client.execute(request).await.map_err(classify_error)?;
        let status_code = response.status().as_u16();
        let declared = response.content_length();
        // Drain the body chunk by chunk so the connection goes back to the pool.
        let mut received: u64 = 0;
        while let Some(chunk) = response.chunk().await.map_err(|err| RequestError::Transport {
            message: err.to_string(),
        })? {
            received = received.saturating_add(u64::try_from(chunk.len()).unwrap_or(u64::MAX));
        }

        Ok(Response {
            status_code,
            content_length: declared.or(Some(received)),
        })
    }
}

fn classify_error(err: reqwest::Error) -> RequestError {
    if err.is_builder() {
        RequestError::Construction {
            message: err.to_string(),
        }
    } else {
        RequestError::Transport {
            message: err.to_string(),
        }
    }
}
