//! Placement checks against board bounds and occupancy.

use crate::board::{Board, COLS, ROWS};
use crate::piece::Piece;

/// True if any occupied cell of `piece`, offset by (dx, dy), leaves the side walls,
/// passes the floor, or lands on an occupied board cell. Cells above the top row never collide.
pub fn collides(board: &Board, piece: &Piece, dx: i32, dy: i32) -> bool {
    piece.cells_at(dx, dy).any(|(row, col)| {
        if col < 0 || col >= COLS as i32 || row >= ROWS as i32 {
            return true;
        }
        if row < 0 {
            return false;
        }
        board.is_occupied(row as usize, col as usize)
    })
}

/// Clockwise turn in place, no kicks. Returns false and leaves the piece untouched if the
/// turned shape collides at the current anchor.
pub fn rotate(board: &Board, piece: &mut Piece) -> bool {
    let rotated = piece.shape.rotated_cw();
    let previous = std::mem::replace(&mut piece.shape, rotated);
    if collides(board, piece, 0, 0) {
        piece.shape = previous;
        return false;
    }
    true
}

/// Rows the piece can fall before it would collide.
pub fn drop_distance(board: &Board, piece: &Piece) -> i32 {
    let mut d = 0;
    while !collides(board, piece, 0, d + 1) {
        d += 1;
    }
    d
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::PieceKind;

    #[test]
    fn test_spawn_on_empty_board_is_free() {
        let board = Board::new();
        for kind in PieceKind::ALL {
            assert!(!collides(&board, &Piece::spawn(kind), 0, 0), "{kind:?}");
        }
    }

    #[test]
    fn test_spawn_on_occupied_footprint_collides() {
        let mut board = Board::new();
        let piece = Piece::spawn(PieceKind::O);
        board.set_cell(0, piece.x as usize, 3);
        assert!(collides(&board, &piece, 0, 0));
    }

    #[test]
    fn test_walls_and_floor() {
        let board = Board::new();
        let mut piece = Piece::spawn(PieceKind::I);
        piece.x = 0;
        assert!(collides(&board, &piece, -1, 0));
        piece.x = (COLS - 4) as i32;
        assert!(collides(&board, &piece, 1, 0));
        piece.y = (ROWS - 1) as i32;
        assert!(collides(&board, &piece, 0, 1));
        assert!(!collides(&board, &piece, 0, 0));
    }

    #[test]
    fn test_above_board_is_passable() {
        let board = Board::new();
        let piece = Piece::spawn(PieceKind::T);
        assert!(!collides(&board, &piece, 0, -1));
    }

    #[test]
    fn test_rotation_rejected_at_wall_keeps_shape() {
        let board = Board::new();
        // Vertical I against the right wall cannot turn back to horizontal.
        let mut piece = Piece::spawn(PieceKind::I);
        piece.shape = piece.shape.rotated_cw();
        piece.x = (COLS - 1) as i32;
        piece.y = 5;
        let before = piece.clone();
        assert!(!rotate(&board, &mut piece));
        assert_eq!(piece, before);
    }

    #[test]
    fn test_rotation_accepted_in_open_space() {
        let board = Board::new();
        let mut piece = Piece::spawn(PieceKind::L);
        piece.y = 5;
        assert!(rotate(&board, &mut piece));
        assert_eq!((piece.shape.width(), piece.shape.height()), (2, 3));
    }

    #[test]
    fn test_drop_distance_on_empty_board() {
        let board = Board::new();
        let piece = Piece::spawn(PieceKind::I);
        assert_eq!(drop_distance(&board, &piece), (ROWS - 1) as i32);
        let o = Piece::spawn(PieceKind::O);
        assert_eq!(drop_distance(&board, &o), (ROWS - 2) as i32);
    }
}
