//! Board module - the fixed 10x20 grid of locked cells
//!
//! Each cell is either empty or holds the kind of the piece that locked there.
//! Uses a flat array for cache locality and zero allocation.
//! Coordinates: (x, y) where x ranges 0..9 (left to right), y ranges 0..19 (top to bottom).

use crate::types::{Cell, PieceKind, BOARD_HEIGHT, BOARD_WIDTH};

/// Total number of cells on the board
const BOARD_SIZE: usize = (BOARD_WIDTH as usize) * (BOARD_HEIGHT as usize);

const WIDTH: usize = BOARD_WIDTH as usize;
const HEIGHT: usize = BOARD_HEIGHT as usize;

/// The game board - 10 columns x 20 rows using flat array storage
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    /// Flat array of cells, row-major order (y * WIDTH + x)
    cells: [Cell; BOARD_SIZE],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [None; BOARD_SIZE],
        }
    }

    /// Build a board from text rows, aligned to the bottom of the board.
    ///
    /// `.` or space is an empty cell, a piece letter (`I`, `O`, `T`, `L`, `J`,
    /// `S`, `Z`, any case) is a cell locked by that kind. Returns `None` if a
    /// row is not exactly `BOARD_WIDTH` wide, there are more than
    /// `BOARD_HEIGHT` rows, or a character is not recognised.
    ///
    /// ```
    /// use blockfall_core::Board;
    ///
    /// let board = Board::from_rows(&["IIIII.IIII"]).unwrap();
    /// assert!(board.is_occupied(0, 19));
    /// assert!(!board.is_occupied(5, 19));
    /// ```
    pub fn from_rows(rows: &[&str]) -> Option<Self> {
        if rows.len() > HEIGHT {
            return None;
        }

        let mut board = Self::new();
        let top = HEIGHT - rows.len();
        for (i, row) in rows.iter().enumerate() {
            if row.chars().count() != WIDTH {
                return None;
            }
            for (x, ch) in row.chars().enumerate() {
                let cell = match ch {
                    '.' | ' ' => None,
                    other => Some(PieceKind::from_str(other.encode_utf8(&mut [0u8; 4]))?),
                };
                board.cells[(top + i) * WIDTH + x] = cell;
            }
        }
        Some(board)
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(x: i8, y: i8) -> Option<usize> {
        if x < 0 || x >= BOARD_WIDTH as i8 || y < 0 || y >= BOARD_HEIGHT as i8 {
            return None;
        }
        Some((y as usize) * WIDTH + (x as usize))
    }

    pub fn width(&self) -> u8 {
        BOARD_WIDTH
    }

    pub fn height(&self) -> u8 {
        BOARD_HEIGHT
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i8, y: i8) -> Option<Cell> {
        Self::index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i8, y: i8, cell: Cell) -> bool {
        match Self::index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Check if position holds a locked piece.
    ///
    /// Out-of-range coordinates are never occupied; bounds are the caller's
    /// concern (see the engine's collision predicate).
    pub fn is_occupied(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(Some(_)))
    }

    pub fn is_out_of_bounds(&self, x: i8, y: i8) -> bool {
        Self::index(x, y).is_none()
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        self.row(y)
            .is_some_and(|row| row.iter().all(|cell| cell.is_some()))
    }

    /// Borrow one row of cells
    /// Returns None if `y` is below the floor
    pub fn row(&self, y: usize) -> Option<&[Cell]> {
        if y >= HEIGHT {
            return None;
        }
        let start = y * WIDTH;
        Some(&self.cells[start..start + WIDTH])
    }

    /// Iterate rows from top (y = 0) to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks_exact(WIDTH)
    }

    /// Mark each given cell as locked by `kind`.
    ///
    /// Cells above the visible top (y < 0) or otherwise out of bounds are
    /// skipped. Returns the number of cells written.
    pub fn lock_cells<I>(&mut self, cells: I) -> usize
    where
        I: IntoIterator<Item = (i8, i8, PieceKind)>,
    {
        let mut written = 0;
        for (x, y, kind) in cells {
            if y < 0 {
                continue;
            }
            if self.set(x, y, Some(kind)) {
                written += 1;
            }
        }
        written
    }

    /// Remove row `y` and shift every row above it down by one, leaving an
    /// empty row at the top.
    fn collapse_row(&mut self, y: usize) {
        // copy_within handles overlapping ranges safely
        for row in (1..=y).rev() {
            let src_start = (row - 1) * WIDTH;
            self.cells
                .copy_within(src_start..src_start + WIDTH, row * WIDTH);
        }
        self.cells[..WIDTH].fill(None);
    }

    /// Clear all full rows, collapsing the rows above each one.
    ///
    /// Scans bottom to top. After a collapse the row that slid into index `y`
    /// has not been examined yet, so the same index is checked again; the scan
    /// only moves up once the row at `y` is not full.
    ///
    /// Returns the number of rows cleared.
    pub fn clear_full_rows(&mut self) -> u32 {
        let mut cleared = 0;
        let mut y = HEIGHT - 1;

        loop {
            while self.is_row_full(y) {
                self.collapse_row(y);
                cleared += 1;
            }
            if y == 0 {
                break;
            }
            y -= 1;
        }

        cleared
    }

    /// Number of locked cells
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Copy the board into a row-major 2D grid (as used by snapshots).
    pub fn write_grid(&self, out: &mut [[Cell; WIDTH]; HEIGHT]) {
        for (dst, src) in out.iter_mut().zip(self.rows()) {
            dst.copy_from_slice(src);
        }
    }

    /// Clear the entire board
    pub fn clear(&mut self) {
        self.cells.fill(None);
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_index_calculation() {
        assert_eq!(Board::index(0, 0), Some(0));
        assert_eq!(Board::index(9, 0), Some(9));
        assert_eq!(Board::index(0, 1), Some(10));
        assert_eq!(Board::index(9, 19), Some(199));
        assert_eq!(Board::index(-1, 0), None);
        assert_eq!(Board::index(10, 0), None);
        assert_eq!(Board::index(0, 20), None);
    }

    #[test]
    fn test_from_rows_bottom_aligned() {
        let board = Board::from_rows(&["T.........", "IIIIIIIIII"]).unwrap();
        assert_eq!(board.get(0, 18), Some(Some(PieceKind::T)));
        assert!(board.is_row_full(19));
        assert!(!board.is_row_full(18));
        assert_eq!(board.occupied_count(), 11);
    }

    #[test]
    fn test_from_rows_rejects_bad_input() {
        assert!(Board::from_rows(&["III"]).is_none());
        assert!(Board::from_rows(&["IIIIIIIII#"]).is_none());
        let too_many = [".........."; 21];
        assert!(Board::from_rows(&too_many).is_none());
    }

    #[test]
    fn test_lock_cells_skips_rows_above_top() {
        let mut board = Board::new();
        let written = board.lock_cells([
            (4, -1, PieceKind::I),
            (4, 0, PieceKind::I),
            (4, 1, PieceKind::I),
        ]);
        assert_eq!(written, 2);
        assert!(board.is_occupied(4, 0));
        assert!(board.is_occupied(4, 1));
    }

    #[test]
    fn test_collapse_row_shifts_down() {
        let mut board = Board::from_rows(&["O.........", "IIIIIIIIII"]).unwrap();
        board.collapse_row(19);
        assert_eq!(board.get(0, 19), Some(Some(PieceKind::O)));
        assert_eq!(board.occupied_count(), 1);
    }

    #[test]
    fn test_clear_rechecks_same_index() {
        // Two adjacent full rows: the second slides into the index just cleared.
        let mut board = Board::from_rows(&["Z.........", "IIIIIIIIII", "JJJJJJJJJJ"]).unwrap();
        assert_eq!(board.clear_full_rows(), 2);
        assert_eq!(board.get(0, 19), Some(Some(PieceKind::Z)));
        assert_eq!(board.occupied_count(), 1);
    }

    #[test]
    fn test_row_out_of_range() {
        let board = Board::from_rows(&["LLLLLLLLLL"]).unwrap();
        assert_eq!(board.row(19).map(|r| r.len()), Some(WIDTH));
        assert!(board.row(HEIGHT).is_none());
        assert!(board.row(usize::MAX).is_none());
        assert!(!board.is_row_full(HEIGHT));
    }

    #[test]
    fn test_clear_entire_board_terminates() {
        let full = ["IIIIIIIIII"; 20];
        let mut board = Board::from_rows(&full).unwrap();
        assert_eq!(board.clear_full_rows(), 20);
        assert_eq!(board, Board::new());
    }
}
