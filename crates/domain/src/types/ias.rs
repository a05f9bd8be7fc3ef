//! IAS application model
//!
//! Mirrors the parts of the IAS `Applications/v1` resource the adapter reads
//! and writes. Only `consumedApis` is ever mutated.

use serde::{Deserialize, Serialize};

use super::tenant_mapping::Operation;

/// IAS application record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub id: String,
    #[serde(
        rename = "urn:sap:identity:application:schemas:extension:sci:1.0:Authentication",
        default
    )]
    pub authentication: ApplicationAuthentication,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationAuthentication {
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub consumed_apis: Vec<ConsumedApi>,
    #[serde(default)]
    pub api_certificates: Vec<ApiCertificate>,
}

/// Grant allowing the owning application to call `app_id`'s API `api_name`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsumedApi {
    pub name: String,
    pub api_name: String,
    pub app_id: String,
    #[serde(default)]
    pub client_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiCertificate {
    #[serde(rename = "subjectDN", default)]
    pub subject_dn: String,
}

/// Response of `GET /Applications/v1`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApplicationsResponse {
    #[serde(default)]
    pub applications: Vec<Application>,
}

/// Input of a consumed APIs update for one direction of a formation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateConsumedApisData {
    pub ias_host: String,
    pub operation: Operation,
    /// Logical API names requested by the consuming side.
    pub requested_apis: Vec<String>,
    pub consumer: Application,
    pub provider: Application,
}

/// Consumed API set, unique by `api_name`.
///
/// Both mutations are idempotent: adding an existing API name and removing
/// an absent one leave the set untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsumedApis(Vec<ConsumedApi>);

impl ConsumedApis {
    /// Build a set from IAS data, dropping later duplicates of an API name.
    pub fn new(apis: Vec<ConsumedApi>) -> Self {
        let mut set = Self::default();
        for api in apis {
            set.add(api);
        }
        set
    }

    /// Add `api` unless an entry with the same `api_name` exists.
    ///
    /// Returns whether the set changed.
    pub fn add(&mut self, api: ConsumedApi) -> bool {
        if self.contains(&api.api_name) {
            return false;
        }
        self.0.push(api);
        true
    }

    /// Remove the entry named `api_name`. Order of the remaining entries is
    /// not preserved.
    ///
    /// Returns whether the set changed.
    pub fn remove(&mut self, api_name: &str) -> bool {
        match self.0.iter().position(|api| api.api_name == api_name) {
            Some(index) => {
                self.0.swap_remove(index);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, api_name: &str) -> bool {
        self.0.iter().any(|api| api.api_name == api_name)
    }

    pub fn get(&self, api_name: &str) -> Option<&ConsumedApi> {
        self.0.iter().find(|api| api.api_name == api_name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[ConsumedApi] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<ConsumedApi> {
        self.0
    }

    /// Apply `data.operation` for every requested API name, naming
    /// `data.provider` as the providing application.
    pub fn apply(&mut self, data: &UpdateConsumedApisData) {
        for api_name in &data.requested_apis {
            match data.operation {
                Operation::Assign => {
                    self.add(ConsumedApi {
                        name: api_name.clone(),
                        api_name: api_name.clone(),
                        app_id: data.provider.id.clone(),
                        client_id: data.provider.authentication.client_id.clone(),
                    });
                }
                Operation::Unassign => {
                    self.remove(api_name);
                }
            }
        }
    }
}
