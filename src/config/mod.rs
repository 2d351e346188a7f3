//! Configuration for budget-grid
//!
//! - path resolution for the data directory
//! - user settings persistence

pub mod paths;
pub mod settings;

pub use paths::GridPaths;
pub use settings::Settings;
