use ias_adapter_domain::{
    ApiCertificate, Application, ApplicationAuthentication, AssignedTenant,
    AssignedTenantConfiguration, AssignedTenantParameters, Operation, ReceiverTenant,
    TenantMapping,
};
use uuid::Uuid;

pub const IAS_HOST: &str = "tenant.accounts.ondemand.com";
pub const S4_TYPE: &str = "SAP S/4HANA Cloud";

/// Builder for a single-participant notification.
#[derive(Clone)]
pub struct MappingBuilder {
    mapping: TenantMapping,
}

impl MappingBuilder {
    pub fn new(formation_id: Uuid, application_id: Uuid, client_id: &str) -> Self {
        Self {
            mapping: TenantMapping {
                formation_id,
                receiver_tenant: ReceiverTenant { application_url: IAS_HOST.into() },
                assigned_tenant: AssignedTenant {
                    ucl_application_id: application_id,
                    ucl_application_type: "SAP Business Network".into(),
                    local_tenant_id: format!("local-{client_id}"),
                    operation: Operation::Assign,
                    parameters: AssignedTenantParameters { client_id: client_id.into() },
                    reverse_assignment_state: "INITIAL".into(),
                    configuration: AssignedTenantConfiguration::default(),
                },
            },
        }
    }

    pub fn unassign(mut self) -> Self {
        self.mapping.assigned_tenant.operation = Operation::Unassign;
        self
    }

    pub fn consuming(mut self, apis: &[&str]) -> Self {
        self.mapping.assigned_tenant.configuration.consumed_apis =
            apis.iter().map(|api| (*api).to_string()).collect();
        self
    }

    pub fn application_type(mut self, application_type: &str) -> Self {
        self.mapping.assigned_tenant.ucl_application_type = application_type.into();
        self
    }

    pub fn reverse_state(mut self, state: &str) -> Self {
        self.mapping.assigned_tenant.reverse_assignment_state = state.into();
        self
    }

    pub fn build(self) -> TenantMapping {
        self.mapping
    }
}

pub fn application(id: &str, client_id: &str) -> Application {
    Application {
        id: id.into(),
        authentication: ApplicationAuthentication {
            client_id: client_id.into(),
            consumed_apis: Vec::new(),
            api_certificates: Vec::new(),
        },
    }
}

pub fn application_with_certificate(id: &str, client_id: &str) -> Application {
    let mut app = application(id, client_id);
    app.authentication.api_certificates.push(ApiCertificate { subject_dn: format!("CN={id}") });
    app
}
