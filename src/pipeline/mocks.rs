//! Recording collaborators shared by the pipeline unit tests.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{AuditError, NotifyError, RegistryError};
use crate::pipeline::event::EventType;
use crate::pipeline::types::{AuditLog, Notifier, SuppressionReason, SuppressionRegistrar};

/// Records every alert; optionally fails event alerts for chosen addresses.
#[derive(Default)]
pub struct RecordingNotifier {
    pub events: Mutex<Vec<(EventType, String, String)>>,
    pub errors: Mutex<Vec<String>>,
    pub fail_for: HashSet<String>,
    pub fail_errors: bool,
}

impl RecordingNotifier {
    pub fn failing_for(addresses: &[&str]) -> Self {
        Self {
            fail_for: addresses.iter().map(|a| a.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn event_addresses(&self) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .map(|(_, _, address)| address.clone())
            .collect()
    }

    pub fn error_messages(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify_event(
        &self,
        event_type: EventType,
        message: &str,
        address: &str,
    ) -> Result<(), NotifyError> {
        self.events
            .lock()
            .unwrap()
            .push((event_type, message.to_string(), address.to_string()));
        if self.fail_for.contains(address) {
            return Err(NotifyError::SendFailed {
                channel: "#mock".into(),
                reason: "mock failure".into(),
            });
        }
        Ok(())
    }

    async fn notify_error(&self, message: &str) -> Result<(), NotifyError> {
        self.errors.lock().unwrap().push(message.to_string());
        if self.fail_errors {
            return Err(NotifyError::SendFailed {
                channel: "#mock".into(),
                reason: "mock failure".into(),
            });
        }
        Ok(())
    }
}

/// Records every registration; optionally fails for chosen addresses.
#[derive(Default)]
pub struct RecordingRegistrar {
    pub calls: Mutex<Vec<(String, SuppressionReason)>>,
    pub fail_for: HashSet<String>,
}

impl RecordingRegistrar {
    pub fn failing_for(addresses: &[&str]) -> Self {
        Self {
            fail_for: addresses.iter().map(|a| a.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn addresses(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(address, _)| address.clone())
            .collect()
    }
}

#[async_trait]
impl SuppressionRegistrar for RecordingRegistrar {
    fn name(&self) -> &str {
        "recording"
    }

    async fn register(
        &self,
        address: &str,
        reason: SuppressionReason,
    ) -> Result<(), RegistryError> {
        self.calls
            .lock()
            .unwrap()
            .push((address.to_string(), reason));
        if self.fail_for.contains(address) {
            return Err(RegistryError::Request("mock registry down".into()));
        }
        Ok(())
    }
}

/// Keeps raw payloads in memory; optionally fails every write.
#[derive(Default)]
pub struct RecordingAuditLog {
    pub records: Mutex<Vec<String>>,
    pub fail: bool,
}

#[async_trait]
impl AuditLog for RecordingAuditLog {
    async fn record(&self, raw: &str) -> Result<(), AuditError> {
        if self.fail {
            return Err(AuditError::Io(std::io::Error::other("disk full")));
        }
        self.records.lock().unwrap().push(raw.to_string());
        Ok(())
    }
}
