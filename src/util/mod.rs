//! Utility types and helpers for the supervisor core.

pub mod ids;
pub mod serde_helpers;

pub use ids::WorkerId;
pub use serde_helpers::duration_serde;
