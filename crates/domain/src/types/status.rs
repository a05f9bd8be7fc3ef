//! Assignment status reported back to UCL

use serde::{Deserialize, Serialize};
use serde_json::json;

use super::tenant_mapping::Operation;
use crate::impl_wire_string_conversions;

/// Formation assignment lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssignmentState {
    Initial,
    Ready,
    ConfigPending,
    CreateReady,
    CreateError,
    DeleteReady,
    DeleteError,
}

impl_wire_string_conversions!(AssignmentState {
    Initial => "INITIAL",
    Ready => "READY",
    ConfigPending => "CONFIG_PENDING",
    CreateReady => "CREATE_READY",
    CreateError => "CREATE_ERROR",
    DeleteReady => "DELETE_READY",
    DeleteError => "DELETE_ERROR",
});

impl AssignmentState {
    /// Terminal success state of `operation`.
    pub const fn ready_for(operation: Operation) -> Self {
        match operation {
            Operation::Assign => Self::CreateReady,
            Operation::Unassign => Self::DeleteReady,
        }
    }

    /// Terminal failure state of `operation`.
    pub const fn error_for(operation: Operation) -> Self {
        match operation {
            Operation::Assign => Self::CreateError,
            Operation::Unassign => Self::DeleteError,
        }
    }
}

/// Body of the status callback `PATCH <location>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusReport {
    pub state: AssignmentState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configuration: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StatusReport {
    pub fn new(state: AssignmentState) -> Self {
        Self { state, configuration: None, error: None }
    }

    pub fn with_error(state: AssignmentState, error: impl Into<String>) -> Self {
        Self { state, configuration: None, error: Some(error.into()) }
    }

    pub fn with_configuration(state: AssignmentState, configuration: serde_json::Value) -> Self {
        Self { state, configuration: Some(configuration), error: None }
    }
}

/// Configuration returned with `CONFIG_PENDING` when an S4 participant has no
/// default credential yet. UCL forwards it to S4, which provisions an
/// OAuth2 mTLS credential and triggers a new notification.
pub fn s4_oauth2_mtls_configuration() -> serde_json::Value {
    json!({
        "credentials": {
            "outboundCommunication": {
                "oauth2mtls": {
                    "correlationIds": ["SAP_COM_1002"]
                }
            }
        }
    })
}
