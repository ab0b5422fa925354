//! Action dispatcher — applies a classified plan, one recipient at a time.
//!
//! Recipients are processed sequentially in payload order so alerts keep the
//! order of the event. A failure for one recipient never stops the next, and
//! every failure ends up in the returned [`DispatchReport`].

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::error::RecipientError;
use crate::pipeline::event::EventType;
use crate::pipeline::types::{
    Action, ActionPlan, DispatchReport, Notifier, RecipientPlan, SuppressionReason,
    SuppressionRegistrar,
};

/// Reason attached to every suppression this handler issues.
const SUPPRESSION_REASON: SuppressionReason = SuppressionReason::Bounce;

pub struct Dispatcher {
    notifier: Arc<dyn Notifier>,
    registrar: Arc<dyn SuppressionRegistrar>,
}

impl Dispatcher {
    pub fn new(notifier: Arc<dyn Notifier>, registrar: Arc<dyn SuppressionRegistrar>) -> Self {
        Self {
            notifier,
            registrar,
        }
    }

    /// Apply every recipient's actions and collect what happened.
    pub async fn dispatch(&self, plan: &ActionPlan) -> DispatchReport {
        let mut report = DispatchReport {
            event_type: plan.event_type,
            ..Default::default()
        };

        for entry in &plan.recipients {
            self.dispatch_recipient(plan.event_type, &plan.message, entry, &mut report)
                .await;
        }

        if !plan.recipients.is_empty() {
            info!(
                event_type = %plan.event_type,
                recipients = plan.recipients.len(),
                suppressed = report.suppressed,
                notified = report.notified,
                ignored = report.ignored,
                failures = report.errors.len(),
                "Dispatched event"
            );
        }

        report
    }

    async fn dispatch_recipient(
        &self,
        event_type: EventType,
        message: &str,
        entry: &RecipientPlan,
        report: &mut DispatchReport,
    ) {
        let address = entry.recipient.email_address.as_str();

        for action in entry.actions.actions() {
            match action {
                Action::Ignore => {
                    debug!(%event_type, address, alert = message, "No action for recipient");
                    report.ignored += 1;
                }
                Action::Suppress => self.suppress(address, report).await,
                Action::Notify => {
                    match self.notifier.notify_event(event_type, message, address).await {
                        Ok(()) => report.notified += 1,
                        Err(e) => {
                            warn!(address, error = %e, "Event alert failed");
                            report.errors.push(RecipientError::Notify {
                                address: address.to_string(),
                                source: e,
                            });
                        }
                    }
                }
            }
        }
    }

    /// Register the address; a failure raises an error alert but never
    /// prevents the recipient's notification.
    async fn suppress(&self, address: &str, report: &mut DispatchReport) {
        match self.registrar.register(address, SUPPRESSION_REASON).await {
            Ok(()) => {
                debug!(
                    address,
                    registrar = self.registrar.name(),
                    reason = %SUPPRESSION_REASON,
                    "Address suppressed"
                );
                report.suppressed += 1;
            }
            Err(e) => {
                warn!(
                    address,
                    registrar = self.registrar.name(),
                    error = %e,
                    "Suppression failed"
                );
                let alert = format!("Suppression registration failure: Message={e}");
                if let Err(alert_err) = self.notifier.notify_error(&alert).await {
                    warn!(address, error = %alert_err, "Error alert failed");
                    report.errors.push(RecipientError::ErrorAlert {
                        address: address.to_string(),
                        source: alert_err,
                    });
                }
                report.errors.push(RecipientError::Suppress {
                    address: address.to_string(),
                    source: e,
                });
            }
        }
    }
}
