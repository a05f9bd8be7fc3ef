//! IAS `Applications/v1` REST client
//!
//! Looks applications up by client id and rewrites their consumed API list
//! with a JSON patch `replace` operation. The patch is skipped when the
//! computed set has the same size as the current one.

use std::time::Duration;

use async_trait::async_trait;
use ias_adapter_core::IasClient;
use ias_adapter_domain::constants::{
    IAS_APPLICATIONS_PATH, IAS_CONSUMED_APIS_PATCH_PATH, JSON_PATCH_REPLACE,
};
use ias_adapter_domain::{
    Application, ApplicationsResponse, ConsumedApi, ConsumedApis, IasAdapterError, IasConfig,
    Result, UpdateConsumedApisData,
};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Method, Response};
use serde::Serialize;
use tracing::{debug, info};

use crate::errors::InfraError;
use crate::http::HttpClient;

#[derive(Debug, Serialize)]
struct PatchBody<'a> {
    operations: [PatchOperation<'a>; 1],
}

#[derive(Debug, Serialize)]
struct PatchOperation<'a> {
    op: &'static str,
    path: &'static str,
    value: &'a [ConsumedApi],
}

/// reqwest-backed [`IasClient`].
#[derive(Clone)]
pub struct IasRestClient {
    http: HttpClient,
}

impl IasRestClient {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// Build the client from configuration, presenting the configured client
    /// certificate when both PEM paths are set.
    pub fn from_config(config: &IasConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut builder = HttpClient::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers);

        match (&config.cert_path, &config.key_path) {
            (Some(cert), Some(key)) => builder = builder.identity(cert, key),
            (None, None) => {}
            _ => {
                return Err(IasAdapterError::Config(
                    "IAS client certificate and key must be configured together".into(),
                ))
            }
        }

        Ok(Self::new(builder.build()?))
    }

    async fn patch_consumed_apis(
        &self,
        ias_host: &str,
        application: &Application,
        apis: &ConsumedApis,
    ) -> Result<()> {
        let url = format!("{}{IAS_APPLICATIONS_PATH}/{}", base_url(ias_host), application.id);
        let body = PatchBody {
            operations: [PatchOperation {
                op: JSON_PATCH_REPLACE,
                path: IAS_CONSUMED_APIS_PATCH_PATH,
                value: apis.as_slice(),
            }],
        };

        let response = self.http.send(self.http.request(Method::PATCH, &url).json(&body)).await?;
        ensure_success(response).await?;
        Ok(())
    }
}

#[async_trait]
impl IasClient for IasRestClient {
    async fn get_application(&self, ias_host: &str, client_id: &str) -> Result<Application> {
        let url = format!("{}{IAS_APPLICATIONS_PATH}", base_url(ias_host));
        let filter = format!("clientId eq {client_id}");

        let request = self.http.request(Method::GET, &url).query(&[("filter", filter.as_str())]);
        let response = ensure_success(self.http.send(request).await?).await?;

        let applications = response
            .json::<ApplicationsResponse>()
            .await
            .map_err(|err| IasAdapterError::from(InfraError::from(err)))?
            .applications;

        match <[Application; 1]>::try_from(applications) {
            Ok([application]) => Ok(application),
            Err(applications) if applications.is_empty() => {
                Err(IasAdapterError::IasApplicationNotFound(format!(
                    "no application with client id '{client_id}' in IAS '{ias_host}'"
                )))
            }
            Err(applications) => Err(IasAdapterError::AmbiguousIasApplication(format!(
                "{} applications with client id '{client_id}' in IAS '{ias_host}'",
                applications.len()
            ))),
        }
    }

    async fn update_application_consumed_apis(&self, data: &UpdateConsumedApisData) -> Result<()> {
        let mut apis = ConsumedApis::new(data.consumer.authentication.consumed_apis.clone());
        let before = apis.len();
        apis.apply(data);

        if apis.len() == before {
            debug!(
                application = %data.consumer.id,
                operation = %data.operation,
                "consumed APIs unchanged, skipping IAS update"
            );
            return Ok(());
        }

        self.patch_consumed_apis(&data.ias_host, &data.consumer, &apis).await?;
        info!(
            application = %data.consumer.id,
            provider = %data.provider.id,
            operation = %data.operation,
            consumed_apis = apis.len(),
            "updated IAS consumed APIs"
        );
        Ok(())
    }
}

/// IAS hosts arrive without a scheme; anything that already has one is used
/// as given.
fn base_url(ias_host: &str) -> String {
    let host = ias_host.trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{host}")
    }
}

async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let url = response.url().clone();
    let body = response.text().await.unwrap_or_default();
    let message = format!("IAS responded with {status} for {url}: {body}");

    Err(match status.as_u16() {
        401 | 403 => IasAdapterError::Auth(message),
        404 => IasAdapterError::NotFound(message),
        _ => IasAdapterError::Network(message),
    })
}
