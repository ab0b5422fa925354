//! Suppression registry adapters.

pub mod http;
pub mod memory;

pub use http::HttpSuppressionRegistrar;
pub use memory::InMemoryRegistrar;
