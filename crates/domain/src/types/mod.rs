//! Domain types and models

pub mod ias;
pub mod status;
pub mod tenant_mapping;

pub use ias::{
    ApiCertificate, Application, ApplicationAuthentication, ApplicationsResponse, ConsumedApi,
    ConsumedApis, UpdateConsumedApisData,
};
pub use status::{s4_oauth2_mtls_configuration, AssignmentState, StatusReport};
pub use tenant_mapping::{
    AssignedTenant, AssignedTenantConfiguration, AssignedTenantParameters, AssignedTenantPayload,
    Operation, ReceiverTenant, TenantMapping, TenantMappingPayload,
};
