//! Domain models for the draw engine

pub mod audit;
pub mod draw;

// Re-exports
pub use audit::{AuditLog, AuditLogEntry};
pub use draw::{DrawRequest, DrawResult, PinnedHash};
