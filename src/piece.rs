//! Shape catalog and the falling piece.

use crate::board::{COLS, CellValue};

/// Number of piece kinds (and palette entries).
pub const PALETTE_SIZE: usize = 7;

/// Piece kinds in catalog order; palette index is position + 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    I,
    O,
    T,
    L,
    J,
    Z,
    S,
}

impl PieceKind {
    pub const ALL: [Self; PALETTE_SIZE] = [
        Self::I,
        Self::O,
        Self::T,
        Self::L,
        Self::J,
        Self::Z,
        Self::S,
    ];

    /// Spawn orientation, rows top to bottom.
    fn matrix(self) -> &'static [&'static [u8]] {
        match self {
            Self::I => &[&[1, 1, 1, 1]],
            Self::O => &[&[1, 1], &[1, 1]],
            Self::T => &[&[1, 1, 1], &[0, 1, 0]],
            Self::L => &[&[1, 1, 1], &[1, 0, 0]],
            Self::J => &[&[1, 1, 1], &[0, 0, 1]],
            Self::Z => &[&[1, 1, 0], &[0, 1, 1]],
            Self::S => &[&[0, 1, 1], &[1, 1, 0]],
        }
    }

    pub fn shape(self) -> Shape {
        Shape::from_rows(self.matrix())
    }

    /// Value written into the board when this kind locks (1..=7).
    pub fn palette_index(self) -> CellValue {
        Self::ALL.iter().position(|&k| k == self).map_or(0, |i| i as CellValue + 1)
    }
}

/// Rectangular occupancy matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shape {
    cells: Vec<Vec<bool>>,
}

impl Shape {
    fn from_rows(rows: &[&[u8]]) -> Self {
        Self {
            cells: rows
                .iter()
                .map(|r| r.iter().map(|&c| c != 0).collect())
                .collect(),
        }
    }

    pub fn width(&self) -> usize {
        self.cells.first().map_or(0, Vec::len)
    }

    pub fn height(&self) -> usize {
        self.cells.len()
    }

    /// Occupied sub-cells as (row, col) within the matrix.
    pub fn filled(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells.iter().enumerate().flat_map(|(r, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, filled)| **filled)
                .map(move |(c, _)| (r, c))
        })
    }

    /// Clockwise quarter turn: transpose with row order reversed. A w x h matrix becomes h x w.
    pub fn rotated_cw(&self) -> Self {
        let (h, w) = (self.height(), self.width());
        let cells = (0..w)
            .map(|c| (0..h).rev().map(|r| self.cells[r][c]).collect())
            .collect();
        Self { cells }
    }
}

/// The falling piece: shape, kind and top-left anchor in board coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    pub kind: PieceKind,
    pub shape: Shape,
    pub x: i32,
    pub y: i32,
}

impl Piece {
    /// New piece at the spawn anchor: horizontally centered, row 0.
    pub fn spawn(kind: PieceKind) -> Self {
        let shape = kind.shape();
        let x = (COLS / 2) as i32 - shape.width().div_ceil(2) as i32;
        Self { kind, shape, x, y: 0 }
    }

    /// Board coordinates (row, col) of each occupied cell, offset by (dx, dy).
    pub fn cells_at(&self, dx: i32, dy: i32) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.shape
            .filled()
            .map(move |(r, c)| (self.y + r as i32 + dy, self.x + c as i32 + dx))
    }

    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.cells_at(0, 0)
    }
}
