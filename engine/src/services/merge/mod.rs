//! Bulk generation: runs the certificate pipeline over every row and reports
//! a per-row outcome.

mod report;
mod start;

pub use report::{BulkReport, RowOutcome};
pub use start::{CertificateEngine, ComposedRow};
