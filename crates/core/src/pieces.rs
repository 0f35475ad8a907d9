//! Pieces module - shape matrices and the static piece table
//!
//! A shape is a small boolean occupancy matrix whose top-left corner is the
//! piece's position on the board. Rotation replaces the whole matrix with its
//! clockwise rotation (transpose, then reverse each row); there is no pivot
//! and no wall-kick table.

use arrayvec::ArrayVec;
use serde::{Serialize, Serializer};

use crate::types::PieceKind;

/// Largest side of any shape matrix
pub const MAX_SHAPE_DIM: usize = 4;

/// Offset of a single occupied cell relative to the matrix's top-left corner
pub type CellOffset = (i8, i8);

/// Occupied offsets of a shape, at most `MAX_SHAPE_DIM * MAX_SHAPE_DIM`
pub type ShapeCells = ArrayVec<CellOffset, { MAX_SHAPE_DIM * MAX_SHAPE_DIM }>;

/// Boolean occupancy matrix of at most 4x4 cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShapeMatrix {
    rows: u8,
    cols: u8,
    /// Indexed `[row][col]`; cells outside `rows x cols` are always false
    bits: [[bool; MAX_SHAPE_DIM]; MAX_SHAPE_DIM],
}

impl ShapeMatrix {
    /// Build a matrix from text rows, `#` (or `1`) marking an occupied cell.
    ///
    /// Rows and columns beyond `MAX_SHAPE_DIM` are ignored; the column count
    /// is the longest row.
    ///
    /// ```
    /// use blockfall_core::ShapeMatrix;
    ///
    /// let t = ShapeMatrix::from_pattern(&[".#.", "###"]);
    /// assert_eq!((t.rows(), t.cols()), (2, 3));
    /// assert!(t.get(1, 0));
    /// assert!(!t.get(0, 0));
    /// ```
    pub fn from_pattern(pattern: &[&str]) -> Self {
        let mut bits = [[false; MAX_SHAPE_DIM]; MAX_SHAPE_DIM];
        let rows = pattern.len().min(MAX_SHAPE_DIM);
        let mut cols = 0;

        for (r, line) in pattern.iter().take(MAX_SHAPE_DIM).enumerate() {
            let line = &line.as_bytes()[..line.len().min(MAX_SHAPE_DIM)];
            cols = cols.max(line.len());
            for (c, &b) in line.iter().enumerate() {
                bits[r][c] = b == b'#' || b == b'1';
            }
        }

        Self {
            rows: rows as u8,
            cols: cols as u8,
            bits,
        }
    }

    pub fn rows(&self) -> u8 {
        self.rows
    }

    pub fn cols(&self) -> u8 {
        self.cols
    }

    /// Is the cell at column `dx`, row `dy` occupied?
    pub fn get(&self, dx: usize, dy: usize) -> bool {
        dy < self.rows as usize && dx < self.cols as usize && self.bits[dy][dx]
    }

    /// One row of the matrix, trimmed to `cols`
    pub fn row(&self, dy: usize) -> &[bool] {
        &self.bits[dy][..self.cols as usize]
    }

    /// Rotate 90° clockwise: transpose, then reverse every row.
    ///
    /// Row `i` of the result is column `i` of `self`, read bottom to top.
    pub fn rotated_cw(&self) -> Self {
        let rows = self.rows as usize;
        let cols = self.cols as usize;
        let mut bits = [[false; MAX_SHAPE_DIM]; MAX_SHAPE_DIM];

        for (i, out_row) in bits.iter_mut().enumerate().take(cols) {
            for (j, out) in out_row.iter_mut().enumerate().take(rows) {
                *out = self.bits[rows - 1 - j][i];
            }
        }

        Self {
            rows: self.cols,
            cols: self.rows,
            bits,
        }
    }

    /// Occupied offsets as `(dx, dy)`, row by row.
    pub fn cells(&self) -> ShapeCells {
        let mut out = ShapeCells::new();
        for dy in 0..self.rows as usize {
            for dx in 0..self.cols as usize {
                if self.bits[dy][dx] {
                    out.push((dx as i8, dy as i8));
                }
            }
        }
        out
    }
}

/// Serialized as a list of rows, each a list of booleans.
impl Serialize for ShapeMatrix {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq((0..self.rows as usize).map(|dy| self.row(dy)))
    }
}

/// Unrotated base shape of a piece kind
pub fn base_shape(kind: PieceKind) -> ShapeMatrix {
    let pattern: &[&str] = match kind {
        PieceKind::I => &["####"],
        PieceKind::O => &["##", "##"],
        PieceKind::T => &[".#.", "###"],
        PieceKind::L => &["#.", "#.", "##"],
        PieceKind::J => &[".#", ".#", "##"],
        PieceKind::S => &[".##", "##."],
        PieceKind::Z => &["##.", ".##"],
    };
    ShapeMatrix::from_pattern(pattern)
}
