//! Outbound alert channels.

pub mod slack;

pub use slack::{SlackConfig, SlackNotifier};
