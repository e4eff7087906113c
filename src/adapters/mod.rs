// Adapters layer: concrete implementations of the domain ports for external systems.

#[cfg(feature = "cli")]
pub mod console;
pub mod http;
pub mod storage;
