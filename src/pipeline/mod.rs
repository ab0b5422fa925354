//! Delivery event pipeline.
//!
//! Every record delivered by the transport flows through:
//! 1. `AuditLog::record()` — raw payload persisted first
//! 2. `event::decode()` — typed event, unknown kinds tolerated
//! 3. `rules::classify()` — static decision table, no I/O
//! 4. `Dispatcher::dispatch()` — suppression and alerts, per recipient
//!
//! **Only permanent `General`/`NoEmail` bounces are suppressed automatically.**
//! Everything else is surfaced to a human through an alert.

pub mod dispatcher;
pub mod envelope;
pub mod event;
pub mod processor;
pub mod rules;
pub mod types;

#[cfg(test)]
pub(crate) mod mocks;
