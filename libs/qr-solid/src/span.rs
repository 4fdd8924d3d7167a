//! # Row Run-Length Compression
//!
//! Collapses each matrix row into maximal horizontal runs of filled modules.
//! Rows are compressed independently; aligned runs in neighbouring rows are
//! never merged into taller rectangles.
//!
//! ## Example
//!
//! ```rust
//! use qr_solid::{compress_row, Span};
//!
//! let spans = compress_row(0, &[true, true, true, false, true]);
//! assert_eq!(spans, vec![
//!     Span { row: 0, start_col: 0, length: 3 },
//!     Span { row: 0, start_col: 4, length: 1 },
//! ]);
//! ```

use crate::matrix::ModuleMatrix;

/// Maximal run of filled modules within one row. `length >= 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub row: usize,
    pub start_col: usize,
    pub length: usize,
}

impl Span {
    /// Column one past the last module of the run.
    pub fn end_col(&self) -> usize {
        self.start_col + self.length
    }

    pub fn covers(&self, col: usize) -> bool {
        (self.start_col..self.end_col()).contains(&col)
    }
}

/// Lazy iterator over the spans of one row, left to right.
#[derive(Debug, Clone)]
pub struct RowSpans<'a> {
    row: usize,
    cells: &'a [bool],
    col: usize,
}

impl Iterator for RowSpans<'_> {
    type Item = Span;

    fn next(&mut self) -> Option<Span> {
        while self.col < self.cells.len() && !self.cells[self.col] {
            self.col += 1;
        }
        if self.col >= self.cells.len() {
            return None;
        }

        let start_col = self.col;
        while self.col < self.cells.len() && self.cells[self.col] {
            self.col += 1;
        }

        Some(Span {
            row: self.row,
            start_col,
            length: self.col - start_col,
        })
    }
}

/// Iterates the spans of one row without allocating.
pub fn row_spans(row: usize, cells: &[bool]) -> RowSpans<'_> {
    RowSpans { row, cells, col: 0 }
}

/// Compresses one row into its spans.
pub fn compress_row(row: usize, cells: &[bool]) -> Vec<Span> {
    row_spans(row, cells).collect()
}

/// All spans of a matrix in row-major order.
pub fn compress_matrix(matrix: &ModuleMatrix) -> Vec<Span> {
    matrix
        .rows()
        .enumerate()
        .flat_map(|(row, cells)| row_spans(row, cells))
        .collect()
}
