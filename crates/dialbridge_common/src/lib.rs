// --- File: crates/dialbridge_common/src/lib.rs ---

// Declare modules within this crate
pub mod http; // Shared HTTP client
pub mod logging; // Logging utilities

// Re-export for easier access
pub use http::HTTP_CLIENT;
pub use logging::{init, init_with_level};
