//! Tenant mapping webhook model
//!
//! UCL sends one notification per application and operation. The wire payload
//! carries the subject as the first element of `assignedTenants`; the
//! validated [`TenantMapping`] exposes it as a single [`AssignedTenant`].
//!
//! [`TenantMappingPayload`] is the loose wire shape (every field defaults to
//! empty so that incomplete bodies reach validation instead of failing
//! deserialization). Converting it into a [`TenantMapping`] normalizes the
//! legacy `config` field and validates the structure.

use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::errors::{IasAdapterError, Result};
use crate::impl_wire_string_conversions;

/// Tenant mapping operation requested by UCL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Assign,
    Unassign,
}

impl_wire_string_conversions!(Operation {
    Assign => "assign",
    Unassign => "unassign",
});

/// Reverse assignment states that allow reconciliation to proceed.
const RECONCILABLE_REVERSE_STATES: [&str; 2] = ["INITIAL", "READY"];

// ============================================================================
// Wire payload
// ============================================================================

/// Raw tenant mapping body as sent by UCL.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantMappingPayload {
    #[serde(default)]
    pub formation_id: String,
    #[serde(default)]
    pub receiver_tenant: ReceiverTenant,
    #[serde(default)]
    pub assigned_tenants: Vec<AssignedTenantPayload>,
}

/// Raw assigned tenant entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignedTenantPayload {
    #[serde(default)]
    pub ucl_application_id: String,
    #[serde(default)]
    pub ucl_application_type: String,
    #[serde(default)]
    pub local_tenant_id: String,
    #[serde(default)]
    pub operation: String,
    #[serde(default)]
    pub parameters: AssignedTenantParameters,
    #[serde(default)]
    pub reverse_assignment_state: String,
    /// Legacy configuration field, either an object or a JSON encoded string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<serde_json::Value>,
    #[serde(default)]
    pub configuration: AssignedTenantConfiguration,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiverTenant {
    /// IAS host to use for this formation.
    #[serde(default)]
    pub application_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignedTenantParameters {
    /// IAS client identifier of the application.
    #[serde(rename = "technicalIntegrationId", default)]
    pub client_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignedTenantConfiguration {
    /// Logical API names this application wants to consume from its counterpart.
    #[serde(default)]
    pub consumed_apis: Vec<String>,
}

impl AssignedTenantConfiguration {
    pub fn is_empty(&self) -> bool {
        self.consumed_apis.is_empty()
    }
}

impl TenantMappingPayload {
    /// Copy the legacy `config` field into `configuration`.
    ///
    /// Only applies when `configuration` is empty. Failures are returned so
    /// the caller decides whether they matter; [`TenantMapping::try_from`]
    /// logs and ignores them.
    pub fn normalize_configuration(&mut self) -> Result<()> {
        for tenant in &mut self.assigned_tenants {
            if !tenant.configuration.is_empty() {
                continue;
            }
            let Some(legacy) = tenant.config.as_ref() else {
                continue;
            };

            let parsed = match legacy {
                serde_json::Value::Null => continue,
                serde_json::Value::String(raw) if raw.trim().is_empty() => continue,
                serde_json::Value::String(raw) => {
                    serde_json::from_str::<AssignedTenantConfiguration>(raw)
                }
                other => serde_json::from_value::<AssignedTenantConfiguration>(other.clone()),
            };

            tenant.configuration = parsed.map_err(|err| {
                IasAdapterError::Serialization(format!(
                    "failed to parse legacy config of application '{}': {err}",
                    tenant.ucl_application_id
                ))
            })?;
        }
        Ok(())
    }

    /// Structural validation of the payload.
    ///
    /// Collects every violation so a single response lists all of them.
    pub fn validate(&self) -> Result<()> {
        let mut violations = Vec::new();

        if Uuid::parse_str(&self.formation_id).is_err() {
            violations.push("formationId: must be a valid UUID".to_string());
        }
        if self.receiver_tenant.application_url.trim().is_empty() {
            violations.push("receiverTenant.applicationUrl: cannot be blank".to_string());
        }

        match self.assigned_tenants.first() {
            None => violations.push("assignedTenants: cannot be empty".to_string()),
            Some(tenant) => {
                if Uuid::parse_str(&tenant.ucl_application_id).is_err() {
                    violations.push(
                        "assignedTenants[0].uclApplicationId: must be a valid UUID".to_string(),
                    );
                }
                if tenant.operation.trim().is_empty() {
                    violations.push("assignedTenants[0].operation: cannot be blank".to_string());
                } else if tenant.operation.parse::<Operation>().is_err() {
                    violations.push(format!(
                        "assignedTenants[0].operation: must be one of '{}', '{}'",
                        Operation::Assign,
                        Operation::Unassign
                    ));
                }
                if tenant.parameters.client_id.trim().is_empty() {
                    violations.push(
                        "assignedTenants[0].parameters.technicalIntegrationId: cannot be blank"
                            .to_string(),
                    );
                }
            }
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(IasAdapterError::Validation(violations.join("; ")))
        }
    }
}

// ============================================================================
// Validated model
// ============================================================================

/// Validated tenant mapping notification for a single application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TenantMappingPayload", into = "TenantMappingPayload")]
pub struct TenantMapping {
    pub formation_id: Uuid,
    pub receiver_tenant: ReceiverTenant,
    pub assigned_tenant: AssignedTenant,
}

/// The application the notification is about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignedTenant {
    pub ucl_application_id: Uuid,
    pub ucl_application_type: String,
    pub local_tenant_id: String,
    pub operation: Operation,
    pub parameters: AssignedTenantParameters,
    /// Lifecycle state of the counterpart's own assignment.
    pub reverse_assignment_state: String,
    pub configuration: AssignedTenantConfiguration,
}

impl TenantMapping {
    pub fn operation(&self) -> Operation {
        self.assigned_tenant.operation
    }

    pub fn application_id(&self) -> Uuid {
        self.assigned_tenant.ucl_application_id
    }

    pub fn client_id(&self) -> &str {
        &self.assigned_tenant.parameters.client_id
    }

    pub fn ias_host(&self) -> &str {
        &self.receiver_tenant.application_url
    }

    pub fn consumed_apis(&self) -> &[String] {
        &self.assigned_tenant.configuration.consumed_apis
    }
}

impl AssignedTenant {
    /// Whether the counterpart is in a state that allows reconciliation.
    pub fn reverse_state_allows_reconciliation(&self) -> bool {
        RECONCILABLE_REVERSE_STATES
            .iter()
            .any(|state| self.reverse_assignment_state.eq_ignore_ascii_case(state))
    }
}

impl TryFrom<TenantMappingPayload> for TenantMapping {
    type Error = IasAdapterError;

    fn try_from(mut payload: TenantMappingPayload) -> Result<Self> {
        if let Err(err) = payload.normalize_configuration() {
            warn!(error = %err, "could not normalize legacy tenant configuration");
        }
        payload.validate()?;

        if payload.assigned_tenants.len() > 1 {
            warn!(
                count = payload.assigned_tenants.len(),
                "tenant mapping carries more than one assigned tenant, only the first is used"
            );
        }

        let formation_id = parse_uuid(&payload.formation_id, "formationId")?;
        let tenant = payload
            .assigned_tenants
            .into_iter()
            .next()
            .ok_or_else(|| IasAdapterError::Validation("assignedTenants: cannot be empty".into()))?;

        let assigned_tenant = AssignedTenant {
            ucl_application_id: parse_uuid(
                &tenant.ucl_application_id,
                "assignedTenants[0].uclApplicationId",
            )?,
            operation: tenant.operation.parse().map_err(IasAdapterError::Validation)?,
            ucl_application_type: tenant.ucl_application_type,
            local_tenant_id: tenant.local_tenant_id,
            parameters: tenant.parameters,
            reverse_assignment_state: tenant.reverse_assignment_state,
            configuration: tenant.configuration,
        };

        Ok(Self { formation_id, receiver_tenant: payload.receiver_tenant, assigned_tenant })
    }
}

impl From<TenantMapping> for TenantMappingPayload {
    fn from(mapping: TenantMapping) -> Self {
        let tenant = mapping.assigned_tenant;
        Self {
            formation_id: mapping.formation_id.to_string(),
            receiver_tenant: mapping.receiver_tenant,
            assigned_tenants: vec![AssignedTenantPayload {
                ucl_application_id: tenant.ucl_application_id.to_string(),
                ucl_application_type: tenant.ucl_application_type,
                local_tenant_id: tenant.local_tenant_id,
                operation: tenant.operation.to_string(),
                parameters: tenant.parameters,
                reverse_assignment_state: tenant.reverse_assignment_state,
                config: None,
                configuration: tenant.configuration,
            }],
        }
    }
}

fn parse_uuid(value: &str, field: &str) -> Result<Uuid> {
    Uuid::parse_str(value)
        .map_err(|err| IasAdapterError::Validation(format!("{field}: must be a valid UUID: {err}")))
}
