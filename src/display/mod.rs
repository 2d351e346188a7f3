//! Display formatting for terminal output

pub mod category;
pub mod grid;
pub mod transaction;

pub use category::format_category_tree;
pub use grid::{format_grid, format_row_details, format_transform_menu};
pub use transaction::format_transaction_register;
