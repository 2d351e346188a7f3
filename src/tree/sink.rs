//! Change notifications for a presentation layer
//!
//! The tree reports every cell it touches so a grid can repaint just those
//! cells. It never renders anything itself.

use crate::models::Column;

/// Receives `(row, column)` for every cell whose value changed
pub trait ChangeSink {
    fn cell_changed(&mut self, row: usize, column: Column);
}

/// Discards all notifications
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl ChangeSink for NullSink {
    fn cell_changed(&mut self, _row: usize, _column: Column) {}
}

/// Records notifications in arrival order
#[derive(Debug, Default, Clone)]
pub struct ChangeLog {
    cells: Vec<(usize, Column)>,
}

impl ChangeLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cells(&self) -> &[(usize, Column)] {
        &self.cells
    }

    pub fn contains(&self, row: usize, column: Column) -> bool {
        self.cells.contains(&(row, column))
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Rows touched at least once, ascending
    pub fn rows(&self) -> Vec<usize> {
        let mut rows: Vec<usize> = self.cells.iter().map(|(row, _)| *row).collect();
        rows.sort_unstable();
        rows.dedup();
        rows
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }
}

impl ChangeSink for ChangeLog {
    fn cell_changed(&mut self, row: usize, column: Column) {
        self.cells.push((row, column));
    }
}
