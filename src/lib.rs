//! Mail event handler — bounce and complaint classification and dispatch.

pub mod audit;
pub mod channels;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod server;
pub mod suppression;
