pub mod branding;
pub mod document;
pub mod merge;
pub mod row;
pub mod validation;
pub mod variant;
