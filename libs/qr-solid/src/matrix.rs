//! # Module Matrix
//!
//! Validated, immutable N×N grid of QR modules. Row 0 is the top row and
//! column 0 the left column; `true` marks a filled (dark) module.
//!
//! A `ModuleMatrix` can only be built through [`ModuleMatrix::from_rows`] or
//! [`ModuleMatrix::parse`], so holding one proves the grid is non-empty,
//! square and within [`MAX_QR_MODULES`].

use std::fmt;

use config::constants::MAX_QR_MODULES;

use crate::error::InputError;

/// Square grid of filled/empty modules, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModuleMatrix {
    size: usize,
    cells: Vec<bool>,
}

impl ModuleMatrix {
    /// Builds a matrix from rows, rejecting empty, ragged or non-square input.
    ///
    /// # Example
    ///
    /// ```rust
    /// use qr_solid::{InputError, ModuleMatrix};
    ///
    /// let matrix = ModuleMatrix::from_rows(vec![vec![true, false], vec![false, true]]).unwrap();
    /// assert_eq!(matrix.size(), 2);
    ///
    /// let err = ModuleMatrix::from_rows(vec![vec![true, false]]).unwrap_err();
    /// assert!(matches!(err, InputError::NotSquare { .. }));
    /// ```
    pub fn from_rows(rows: Vec<Vec<bool>>) -> Result<Self, InputError> {
        let size = rows.len();
        if size == 0 {
            return Err(InputError::EmptyMatrix);
        }
        if size > MAX_QR_MODULES {
            return Err(InputError::TooManyModules {
                size,
                max: MAX_QR_MODULES,
            });
        }

        let mut cells = Vec::with_capacity(size * size);
        for (row, values) in rows.into_iter().enumerate() {
            if values.is_empty() {
                return Err(InputError::EmptyRow { row });
            }
            if values.len() != size {
                return Err(InputError::NotSquare {
                    row,
                    expected: size,
                    found: values.len(),
                });
            }
            cells.extend(values);
        }

        Ok(Self { size, cells })
    }

    /// Parses a text grid, one row per line.
    ///
    /// `#`, `1` and `X` are filled modules; `.`, `0` and `_` are empty.
    /// Blank lines and surrounding whitespace are ignored.
    ///
    /// # Example
    ///
    /// ```rust
    /// use qr_solid::ModuleMatrix;
    ///
    /// let matrix = ModuleMatrix::parse("
    ///     #.#
    ///     .#.
    ///     #.#
    /// ").unwrap();
    /// assert_eq!(matrix.filled_count(), 5);
    /// ```
    pub fn parse(text: &str) -> Result<Self, InputError> {
        let mut rows = Vec::new();
        for line in text.lines().map(str::trim).filter(|line| !line.is_empty()) {
            let row = rows.len();
            let values = line
                .chars()
                .enumerate()
                .map(|(col, c)| match c {
                    '#' | '1' | 'X' => Ok(true),
                    '.' | '0' | '_' => Ok(false),
                    found => Err(InputError::UnrecognizedCell { row, col, found }),
                })
                .collect::<Result<Vec<_>, _>>()?;
            rows.push(values);
        }
        Self::from_rows(rows)
    }

    /// Number of modules per side.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Whether the module at `(row, col)` is filled. Out-of-range cells are
    /// empty.
    pub fn is_filled(&self, row: usize, col: usize) -> bool {
        row < self.size && col < self.size && self.cells[row * self.size + col]
    }

    /// Modules of one row, left to right.
    ///
    /// # Panics
    ///
    /// Panics if `row >= self.size()`.
    pub fn row(&self, row: usize) -> &[bool] {
        let start = row * self.size;
        &self.cells[start..start + self.size]
    }

    /// Rows from top to bottom.
    pub fn rows(&self) -> impl ExactSizeIterator<Item = &[bool]> + '_ {
        self.cells.chunks_exact(self.size)
    }

    /// Total number of filled modules.
    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|&&filled| filled).count()
    }

    /// True when no module is filled.
    pub fn is_blank(&self) -> bool {
        !self.cells.iter().any(|&filled| filled)
    }

    /// Copies the matrix back into nested rows.
    pub fn to_rows(&self) -> Vec<Vec<bool>> {
        self.rows().map(<[bool]>::to_vec).collect()
    }
}

impl TryFrom<Vec<Vec<bool>>> for ModuleMatrix {
    type Error = InputError;

    fn try_from(rows: Vec<Vec<bool>>) -> Result<Self, Self::Error> {
        Self::from_rows(rows)
    }
}

impl fmt::Display for ModuleMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.rows().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            for &filled in row {
                f.write_str(if filled { "#" } else { "." })?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows_accepts_square() {
        let matrix = ModuleMatrix::from_rows(vec![
            vec![true, false, true],
            vec![false, true, false],
            vec![true, false, true],
        ])
        .unwrap();
        assert_eq!(matrix.size(), 3);
        assert!(matrix.is_filled(0, 0));
        assert!(!matrix.is_filled(0, 1));
        assert!(matrix.is_filled(1, 1));
        assert_eq!(matrix.filled_count(), 5);
    }

    #[test]
    fn test_from_rows_rejects_empty() {
        assert_eq!(ModuleMatrix::from_rows(vec![]), Err(InputError::EmptyMatrix));
        assert_eq!(
            ModuleMatrix::from_rows(vec![vec![]]),
            Err(InputError::EmptyRow { row: 0 })
        );
    }

    #[test]
    fn test_from_rows_rejects_ragged() {
        let err = ModuleMatrix::from_rows(vec![vec![true, true], vec![true]]).unwrap_err();
        assert_eq!(
            err,
            InputError::NotSquare {
                row: 1,
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn test_from_rows_rejects_oversized() {
        let n = MAX_QR_MODULES + 1;
        let err = ModuleMatrix::from_rows(vec![vec![false; n]; n]).unwrap_err();
        assert!(matches!(err, InputError::TooManyModules { size, .. } if size == n));
    }

    #[test]
    fn test_parse_ignores_blank_lines_and_indentation() {
        let matrix = ModuleMatrix::parse("\n  10\n\n  01  \n").unwrap();
        assert_eq!(matrix.size(), 2);
        assert!(matrix.is_filled(0, 0));
        assert!(matrix.is_filled(1, 1));
    }

    #[test]
    fn test_parse_rejects_unknown_character() {
        let err = ModuleMatrix::parse("#.\n#?").unwrap_err();
        assert_eq!(
            err,
            InputError::UnrecognizedCell {
                row: 1,
                col: 1,
                found: '?'
            }
        );
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        let matrix = ModuleMatrix::parse("#.\n.#").unwrap();
        assert_eq!(matrix.to_string(), "#.\n.#");
        assert_eq!(ModuleMatrix::parse(&matrix.to_string()).unwrap(), matrix);
    }

    #[test]
    fn test_out_of_range_is_empty() {
        let matrix = ModuleMatrix::parse("#").unwrap();
        assert!(!matrix.is_filled(0, 1));
        assert!(!matrix.is_filled(1, 0));
    }

    #[test]
    fn test_blank_matrix() {
        let matrix = ModuleMatrix::from_rows(vec![vec![false; 4]; 4]).unwrap();
        assert!(matrix.is_blank());
        assert_eq!(matrix.rows().len(), 4);
    }
}
