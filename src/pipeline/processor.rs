//! Event handler — runs each delivered record through the pipeline.
//!
//! Flow per record:
//! 1. Audit log (raw payload, before anything can fail to parse)
//! 2. Decode → typed event
//! 3. Classify → action plan
//! 4. Dispatch → suppression + alerts, per recipient
//!
//! An audit failure aborts the envelope so the transport redelivers it. A
//! record that fails to decode has no side effects; it is rejected on its
//! own and the rest of the envelope still runs. Recipient-level failures
//! never abort anything and are listed in the summary.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::error::HandlerError;
use crate::pipeline::dispatcher::Dispatcher;
use crate::pipeline::envelope::Envelope;
use crate::pipeline::event::{self, Event};
use crate::pipeline::rules::classify;
use crate::pipeline::types::{AuditLog, DispatchReport, Notifier, SuppressionRegistrar};

/// Error alert sent when the raw payload could not be written to the audit log.
const AUDIT_FAILURE_ALERT: &str = "Logging mail contents failure";

/// A record dropped because it could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedRecord {
    /// Position of the record in the envelope.
    pub record: usize,
    pub error: String,
}

/// A recipient action that failed while dispatching a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipientFailure {
    pub record: usize,
    pub event_type: String,
    pub address: String,
    pub error: String,
}

/// Totals for one envelope.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct EnvelopeSummary {
    pub records: usize,
    pub suppressed: usize,
    pub notified: usize,
    pub ignored: usize,
    pub rejected: Vec<RejectedRecord>,
    pub failures: Vec<RecipientFailure>,
}

impl EnvelopeSummary {
    fn absorb(&mut self, record: usize, report: DispatchReport) {
        self.suppressed += report.suppressed;
        self.notified += report.notified;
        self.ignored += report.ignored;

        if let Err(e) = report.into_result() {
            self.failures
                .extend(e.failures.iter().map(|failure| RecipientFailure {
                    record,
                    event_type: e.event_type.clone(),
                    address: failure.address().to_string(),
                    error: failure.to_string(),
                }));
        }
    }
}

pub struct EventHandler {
    audit: Arc<dyn AuditLog>,
    notifier: Arc<dyn Notifier>,
    dispatcher: Dispatcher,
}

impl EventHandler {
    pub fn new(
        audit: Arc<dyn AuditLog>,
        notifier: Arc<dyn Notifier>,
        registrar: Arc<dyn SuppressionRegistrar>,
    ) -> Self {
        let dispatcher = Dispatcher::new(Arc::clone(&notifier), registrar);
        Self {
            audit,
            notifier,
            dispatcher,
        }
    }

    /// Process a single raw event payload.
    pub async fn handle_record(&self, raw: &str) -> Result<DispatchReport, HandlerError> {
        if let Err(e) = self.audit.record(raw).await {
            error!(error = %e, "Failed to write raw event to audit log");
            if let Err(alert_err) = self.notifier.notify_error(AUDIT_FAILURE_ALERT).await {
                warn!(error = %alert_err, "Failed to send error alert");
            }
            return Err(e.into());
        }

        let event = event::decode(raw).inspect_err(|e| {
            error!(error = %e, "Failed to decode event payload");
        })?;

        if let Event::Unknown { event_type } = &event {
            info!(event_type = %event_type, "Ignoring unrecognized event type");
        }

        let plan = classify(&event);
        Ok(self.dispatcher.dispatch(&plan).await)
    }

    /// Process every record of an envelope, in order.
    ///
    /// Undecodable records are listed in the summary and skipped. An audit
    /// failure stops the envelope; earlier records have already been acted on.
    pub async fn handle_envelope(
        &self,
        envelope: &Envelope,
    ) -> Result<EnvelopeSummary, HandlerError> {
        let mut summary = EnvelopeSummary::default();

        let records = match envelope {
            Envelope::Records(records) => records,
            Envelope::SubscriptionConfirmation { subscribe_url } => {
                info!(%subscribe_url, "Subscription confirmation received; confirm it out of band");
                return Ok(summary);
            }
            Envelope::UnsubscribeConfirmation => {
                warn!("Unsubscribe confirmation received");
                return Ok(summary);
            }
        };

        debug!(count = records.len(), "Processing envelope");
        for (index, raw) in records.iter().enumerate() {
            summary.records += 1;
            match self.handle_record(raw).await {
                Ok(report) => summary.absorb(index, report),
                Err(HandlerError::Decode(e)) => summary.rejected.push(RejectedRecord {
                    record: index,
                    error: e.to_string(),
                }),
                Err(e) => return Err(e),
            }
        }

        Ok(summary)
    }
}
