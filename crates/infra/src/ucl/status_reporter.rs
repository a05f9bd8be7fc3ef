//! Status callback to UCL

use std::time::Duration;

use async_trait::async_trait;
use ias_adapter_core::StatusReporter;
use ias_adapter_domain::{IasAdapterError, Result, StatusReport, UclConfig};
use reqwest::Method;
use tracing::debug;

use crate::http::HttpClient;

/// Sends status reports with `PATCH <location>`.
#[derive(Clone)]
pub struct HttpStatusReporter {
    http: HttpClient,
}

impl HttpStatusReporter {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    pub fn from_config(config: &UclConfig) -> Result<Self> {
        let http = HttpClient::builder().timeout(Duration::from_secs(config.timeout_secs)).build()?;
        Ok(Self::new(http))
    }
}

#[async_trait]
impl StatusReporter for HttpStatusReporter {
    async fn report_status(&self, location: &str, report: &StatusReport) -> Result<()> {
        debug!(%location, state = %report.state, "reporting assignment status");

        let response =
            self.http.send(self.http.request(Method::PATCH, location).json(report)).await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(IasAdapterError::Network(format!(
            "status callback {location} responded with {status}: {body}"
        )))
    }
}
