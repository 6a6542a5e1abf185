//! Warranty certificate engine.
//!
//! Turns a table of branch installation rows plus a pool of site photos into
//! one PDF warranty certificate per row. See `services::merge` for the bulk
//! driver and `services::certificates` for the per-row pipeline.

pub mod config;
pub mod error;
pub mod services;

pub use config::{EngineConfig, JobManifest};
pub use error::{EngineError, GenerationError, RenderError, RowError};
pub use services::certificates::pdf::{CertificateRenderer, PdfRenderer};
pub use services::merge::{BulkReport, CertificateEngine, RowOutcome};
