//! Port interface for the UCL status callback

use async_trait::async_trait;
use ias_adapter_domain::{Result, StatusReport};

/// Sends the final assignment state to the orchestrator.
#[async_trait]
pub trait StatusReporter: Send + Sync {
    /// `PATCH` the report to `location`, the callback URL UCL handed over
    /// with the notification.
    async fn report_status(&self, location: &str, report: &StatusReport) -> Result<()>;
}
