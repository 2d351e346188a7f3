//! Service layer for budget-grid
//!
//! The transform engine and the editing session sit on top of the category
//! tree and the storage layer.

pub mod session;
pub mod transform;

pub use session::{save_dirty_cells, EditSession, SaveReport, SessionContext};
pub use transform::{Transform, TransformEngine};
