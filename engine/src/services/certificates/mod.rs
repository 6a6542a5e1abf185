//! # Certificates
//!
//! Everything needed to turn one data row into one warranty PDF.
//!
//! - `branch`: typed view of a row and its output file name.
//! - `variants`: which coverage variants a row qualifies for.
//! - `dates`: installation date parsing and the 36-month expiry.
//! - `markup`: the small inline markup allowed in terms text.
//! - `layout`: the font-independent certificate plan.
//! - `fonts`: locating a usable font family on the host.
//! - `pdf`: the `genpdf` renderer for that plan.

pub mod branch;
pub mod dates;
pub mod fonts;
pub mod layout;
pub mod markup;
pub mod pdf;
pub mod variants;
