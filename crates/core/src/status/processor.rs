//! Async status processing
//!
//! In async mode UCL receives `202 Accepted` right away and learns the
//! outcome later through a status callback. This module decides which state
//! to report for a notification and sends it.

use std::sync::Arc;
use std::time::Duration;

use ias_adapter_domain::{
    s4_oauth2_mtls_configuration, AssignmentState, IasAdapterError, Operation, Result,
    StatusReport, TenantMapping,
};
use tracing::{error, info, instrument, warn};

use super::ports::StatusReporter;
use crate::tenant_mappings::ports::TenantMappingProcessor;

/// Reconciliation result reduced to what decides the reported state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconciliationOutcome {
    Success,
    IasApplicationNotFound(String),
    MissingDefaultCredential,
    Failed(String),
}

impl From<&Result<()>> for ReconciliationOutcome {
    fn from(result: &Result<()>) -> Self {
        match result {
            Ok(()) => Self::Success,
            Err(err @ IasAdapterError::IasApplicationNotFound(_)) => {
                Self::IasApplicationNotFound(err.to_string())
            }
            Err(IasAdapterError::MissingDefaultCredential(_)) => Self::MissingDefaultCredential,
            Err(err) => Self::Failed(err.to_string()),
        }
    }
}

/// Map a reconciliation outcome to the state reported for `operation`.
pub fn resolve_status(outcome: &ReconciliationOutcome, operation: Operation) -> StatusReport {
    match outcome {
        ReconciliationOutcome::Success => StatusReport::new(AssignmentState::ready_for(operation)),
        ReconciliationOutcome::IasApplicationNotFound(message)
        | ReconciliationOutcome::Failed(message) => {
            StatusReport::with_error(AssignmentState::error_for(operation), message.clone())
        }
        ReconciliationOutcome::MissingDefaultCredential => StatusReport::with_configuration(
            AssignmentState::ConfigPending,
            s4_oauth2_mtls_configuration(),
        ),
    }
}

/// Runs a notification through the processor and reports the outcome.
pub struct StatusProcessor {
    processor: Arc<dyn TenantMappingProcessor>,
    reporter: Arc<dyn StatusReporter>,
    timeout: Option<Duration>,
}

impl StatusProcessor {
    pub fn new(
        processor: Arc<dyn TenantMappingProcessor>,
        reporter: Arc<dyn StatusReporter>,
    ) -> Self {
        Self { processor, reporter, timeout: None }
    }

    /// Bound the reconciliation by `timeout`; an elapsed timeout is reported
    /// as an error state.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Decide the state for `mapping` without reporting it.
    ///
    /// On assign the counterpart has to be `INITIAL` or `READY`; any other
    /// reverse state waits in `CONFIG_PENDING` and reconciliation is skipped.
    pub async fn resolve(&self, mapping: &TenantMapping) -> StatusReport {
        let operation = mapping.operation();

        if operation == Operation::Assign
            && !mapping.assigned_tenant.reverse_state_allows_reconciliation()
        {
            info!(
                reverse_state = %mapping.assigned_tenant.reverse_assignment_state,
                "counterpart not ready, reporting config pending"
            );
            return StatusReport::new(AssignmentState::ConfigPending);
        }

        let result = self.run(mapping).await;
        if let Err(err) = &result {
            warn!(error = %err, "tenant mapping processing failed");
        }

        resolve_status(&ReconciliationOutcome::from(&result), operation)
    }

    /// Resolve the state for `mapping` and `PATCH` it to `location`.
    #[instrument(
        skip_all,
        fields(
            formation_id = %mapping.formation_id,
            application_id = %mapping.application_id(),
            operation = %mapping.operation(),
        )
    )]
    pub async fn process(&self, mapping: &TenantMapping, location: &str) -> Result<StatusReport> {
        let report = self.resolve(mapping).await;

        if let Err(err) = self.reporter.report_status(location, &report).await {
            error!(error = %err, state = %report.state, "failed to report assignment status");
            return Err(err.context("failed to report assignment status"));
        }

        info!(state = %report.state, "reported assignment status");
        Ok(report)
    }

    async fn run(&self, mapping: &TenantMapping) -> Result<()> {
        let processing = self.processor.process_tenant_mapping(mapping);
        match self.timeout {
            Some(timeout) => tokio::time::timeout(timeout, processing).await.map_err(|_| {
                IasAdapterError::Internal(format!(
                    "tenant mapping processing timed out after {}s",
                    timeout.as_secs()
                ))
            })?,
            None => processing.await,
        }
    }
}
