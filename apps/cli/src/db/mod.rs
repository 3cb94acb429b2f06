pub mod migrations;
pub mod models;
pub mod privacy;
pub mod queries;
pub mod split;

pub use migrations::open_stores;
pub use split::{SeparationReport, SplitStore};
