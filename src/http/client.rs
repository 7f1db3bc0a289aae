use std::path::PathBuf;
use std::time::Duration;

use reqwest::Client;
use tracing::{debug, error};

use crate::args::{DEFAULT_USER_AGENT, ReqArgs};
use crate::error::{AppError, AppResult, HttpError, ValidationError};

/// Everything the shared HTTP client is configured with.
#[derive(Clone, Debug, Default)]
pub struct ClientSettings {
    pub request_timeout: Option<Duration>,
    pub connect_timeout: Option<Duration>,
    pub cert: Option<PathBuf>,
    pub key: Option<PathBuf>,
    pub cacert: Option<PathBuf>,
    pub verify_tls: bool,
}

impl From<&ReqArgs> for ClientSettings {
    fn from(args: &ReqArgs) -> Self {
        Self {
            request_timeout: args.request_timeout,
            connect_timeout: Some(args.connect_timeout),
            cert: args.cert.as_ref().map(PathBuf::from),
            key: args.key.as_ref().map(PathBuf::from),
            cacert: args.cacert.as_ref().map(PathBuf::from),
            verify_tls: args.verify_tls,
        }
    }
}

/// Builds the client shared by all workers.
///
/// # Errors
///
/// Returns an error when cert/key are not given as a pair, when any
/// certificate file cannot be read or parsed, or when the client cannot be
/// built.
pub fn build_client(settings: &ClientSettings) -> AppResult<Client> {
    let mut client_builder = Client::builder().user_agent(DEFAULT_USER_AGENT);

    if let Some(timeout) = settings.request_timeout {
        client_builder = client_builder.timeout(timeout);
    }
    if let Some(timeout) = settings.connect_timeout {
        client_builder = client_builder.connect_timeout(timeout);
    }

    if let Some(path) = settings.cacert.as_ref() {
        let bytes = std::fs::read(path).map_err(|err| {
            AppError::http(HttpError::ReadCacert {
                path: path.clone(),
                source: err,
            })
        })?;
        let cert = reqwest::Certificate::from_pem(&bytes).map_err(|err| {
            AppError::http(HttpError::InvalidCacert {
                path: path.clone(),
                source: err,
            })
        })?;
        client_builder = client_builder.add_root_certificate(cert);
    }

    if settings.cert.is_some() || settings.key.is_some() {
        let cert_path = settings
            .cert
            .as_ref()
            .ok_or_else(|| AppError::validation(ValidationError::KeyRequiresCert))?;
        let key_path = settings
            .key
            .as_ref()
            .ok_or_else(|| AppError::validation(ValidationError::CertRequiresKey))?;
        let cert_bytes = std::fs::read(cert_path).map_err(|err| {
            AppError::http(HttpError::ReadCert {
                path: cert_path.clone(),
                source: err,
            })
        })?;
        let key_bytes = std::fs::read(key_path).map_err(|err| {
            AppError::http(HttpError::ReadKey {
                path: key_path.clone(),
                source: err,
            })
        })?;
        let identity = reqwest::Identity::from_pkcs8_pem(&cert_bytes, &key_bytes)
            .map_err(|err| AppError::http(HttpError::InvalidIdentity { source: err }))?;
        debug!("Loaded client identity from {}", cert_path.display());
        client_builder = client_builder.identity(identity);
    }

    if !settings.verify_tls {
        client_builder = client_builder
            .danger_accept_invalid_certs(true)
            .danger_accept_invalid_hostnames(true);
    }

    match client_builder.build() {
        Ok(client) => Ok(client),
        Err(e) => {
            error!("Failed to build HTTP client: {}", e);
            Err(AppError::http(HttpError::BuildClientFailed { source: e }))
        }
    }
}
