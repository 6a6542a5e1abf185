pub mod archive;
pub mod certificates;
pub mod data_sources;
pub mod merge;
pub mod photos;
