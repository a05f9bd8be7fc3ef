//! Adapter constants
//!
//! Centralized location for protocol-level constants shared by the crates.

// IAS
pub const IAS_APPLICATIONS_PATH: &str = "/Applications/v1";
pub const IAS_AUTHENTICATION_SCHEMA: &str =
    "urn:sap:identity:application:schemas:extension:sci:1.0:Authentication";
pub const IAS_CONSUMED_APIS_PATCH_PATH: &str =
    "/urn:sap:identity:application:schemas:extension:sci:1.0:Authentication/consumedApis";
pub const JSON_PATCH_REPLACE: &str = "replace";

// UCL
/// Application type of the participants that need a default credential in IAS.
pub const S4_APPLICATION_TYPE: &str = "SAP S/4HANA Cloud";
pub const REQUEST_ID_HEADER: &str = "x-request-id";

// Timeouts (seconds)
pub const DEFAULT_IAS_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_UCL_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_PROCESSING_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_DATABASE_POOL_SIZE: usize = 16;
