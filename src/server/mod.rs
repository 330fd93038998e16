//! # HTTP Transport
//!
//! The server is split into:
//!
//! ## Service ([`service`])
//! Runs the codec on uploaded bytes: decode the image, hide or reveal the
//! token, encode the result as PNG.
//!
//! ## API ([`api`])
//! Routing, multipart parsing and response shaping.
//!
//! ## Errors ([`error`]) and metrics ([`metrics`])
//! Status code mapping and per-endpoint request counters.

pub mod api;
pub mod service;
pub mod error;
pub mod metrics;

// Re-export for convenience
pub use api::{router, AppState};
pub use error::ApiError;
pub use metrics::ServiceMetrics;
