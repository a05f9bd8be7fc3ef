use std::path::{Path, PathBuf};
use std::time::Duration;

use ias_adapter_domain::{IasAdapterError, Result};
use reqwest::{Client as ReqwestClient, Identity, Method, RequestBuilder, Response};
use tracing::debug;

use crate::errors::InfraError;

/// Thin reqwest wrapper shared by the outbound integrations.
///
/// Requests are sent exactly once. Callers decide how to treat non-success
/// statuses; transport failures are mapped to domain errors here.
#[derive(Clone)]
pub struct HttpClient {
    client: ReqwestClient,
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Convenience constructor with default configuration.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// Create a request builder using the underlying reqwest client.
    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    /// Execute the provided request builder.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let request = builder.build().map_err(|err| IasAdapterError::from(InfraError::from(err)))?;

        let method = request.method().clone();
        let url = request.url().clone();
        debug!(%method, %url, "sending HTTP request");

        match self.client.execute(request).await {
            Ok(response) => {
                debug!(%method, %url, status = %response.status(), "received HTTP response");
                Ok(response)
            }
            Err(err) => {
                debug!(%method, %url, error = %err, "HTTP request failed");
                Err(InfraError::from(err).into())
            }
        }
    }
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    user_agent: String,
    default_headers: Option<reqwest::header::HeaderMap>,
    identity: Option<(PathBuf, PathBuf)>,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: concat!("ias-adapter/", env!("CARGO_PKG_VERSION")).to_string(),
            default_headers: None,
            identity: None,
        }
    }
}

impl HttpClientBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn default_headers(mut self, headers: reqwest::header::HeaderMap) -> Self {
        self.default_headers = Some(headers);
        self
    }

    /// Present a client certificate read from PEM files on every request.
    pub fn identity(mut self, cert_path: impl Into<PathBuf>, key_path: impl Into<PathBuf>) -> Self {
        self.identity = Some((cert_path.into(), key_path.into()));
        self
    }

    pub fn build(self) -> Result<HttpClient> {
        let mut builder =
            ReqwestClient::builder().timeout(self.timeout).user_agent(self.user_agent).no_proxy();

        if let Some(headers) = self.default_headers {
            builder = builder.default_headers(headers);
        }

        if let Some((cert_path, key_path)) = self.identity {
            builder = builder.identity(load_identity(&cert_path, &key_path)?);
        }

        let client = builder.build().map_err(|err| IasAdapterError::from(InfraError::from(err)))?;

        Ok(HttpClient { client })
    }
}

/// Concatenate certificate and key into the single PEM buffer reqwest expects.
fn load_identity(cert_path: &Path, key_path: &Path) -> Result<Identity> {
    let read = |path: &Path| {
        std::fs::read(path).map_err(|err| {
            IasAdapterError::from(InfraError::from(err))
                .context(format!("failed to read client identity '{}'", path.display()))
        })
    };

    let mut pem = read(cert_path)?;
    pem.push(b'\n');
    pem.extend(read(key_path)?);

    Identity::from_pem(&pem)
        .map_err(|err| IasAdapterError::Config(format!("invalid client identity: {err}")))
}
