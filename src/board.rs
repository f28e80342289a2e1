//! Playfield grid: 20 rows x 12 columns of palette indices (0 = empty).

use crate::piece::PALETTE_SIZE;

pub const ROWS: usize = 20;
pub const COLS: usize = 12;

/// One board cell: 0 is empty, 1..=7 names the piece kind that locked there.
pub type CellValue = u8;

pub const EMPTY: CellValue = 0;

/// Fixed-size grid. `rows[0]` is the top row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    rows: [[CellValue; COLS]; ROWS],
}

impl Board {
    pub fn new() -> Self {
        Self {
            rows: [[EMPTY; COLS]; ROWS],
        }
    }

    /// Reset every cell to empty.
    pub fn clear(&mut self) {
        self.rows = [[EMPTY; COLS]; ROWS];
    }

    /// Panics outside the grid; callers bounds-check through the collision engine.
    #[inline]
    pub fn is_occupied(&self, row: usize, col: usize) -> bool {
        self.cell(row, col) != EMPTY
    }

    #[inline]
    pub fn cell(&self, row: usize, col: usize) -> CellValue {
        self.rows[row][col]
    }

    pub fn set_cell(&mut self, row: usize, col: usize, value: CellValue) {
        debug_assert!(
            value as usize <= PALETTE_SIZE,
            "palette index {value} out of range"
        );
        self.rows[row][col] = value;
    }

    /// Rows top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[CellValue; COLS]> {
        self.rows.iter()
    }

    pub fn is_row_full(&self, row: usize) -> bool {
        self.rows[row].iter().all(|&c| c != EMPTY)
    }

    /// Removes every full row and returns their indices as they were before the clear,
    /// scanned bottom-up. Remaining rows slide down in order; fresh empty rows fill the top.
    pub fn clear_full_rows(&mut self) -> Vec<usize> {
        let cleared: Vec<usize> = (0..ROWS).rev().filter(|&r| self.is_row_full(r)).collect();
        if cleared.is_empty() {
            return cleared;
        }

        let mut write = ROWS;
        for read in (0..ROWS).rev() {
            if self.is_row_full(read) {
                continue;
            }
            write -= 1;
            if write != read {
                self.rows[write] = self.rows[read];
            }
        }
        for row in &mut self.rows[..write] {
            *row = [EMPTY; COLS];
        }
        cleared
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
