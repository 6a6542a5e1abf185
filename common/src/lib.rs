//! Data model shared by the certificate engine and anything that drives it.
//!
//! Everything here is plain data: serde-serializable, free of I/O, and safe to
//! hand across crate boundaries.

pub mod jobs;
pub mod model;
