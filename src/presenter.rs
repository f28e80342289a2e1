//! What the simulation tells the outside world: draws, display counters and sound cues.

use crate::board::Board;
use crate::piece::Piece;

/// Sink for simulation output. Every hook defaults to a no-op so adapters implement only
/// what they draw or play.
pub trait Presenter {
    fn render(&mut self, _board: &Board, _current: Option<&Piece>) {}
    fn render_preview(&mut self, _next: Option<&Piece>) {}
    /// A new game began; any previous game-over state is stale.
    fn on_game_started(&mut self) {}

    fn on_score_changed(&mut self, _score: u32) {}
    fn on_level_changed(&mut self, _level: u32) {}
    fn on_lines_changed(&mut self, _lines: u32) {}

    fn on_move(&mut self) {}
    fn on_rotate(&mut self) {}
    fn on_lock(&mut self) {}
    /// Rows (pre-clear indices) that were just removed from the board.
    fn on_line_clear(&mut self, _rows: &[usize]) {}
    fn on_hard_drop(&mut self) {}
    fn on_game_over(&mut self, _final_score: u32) {}
}

/// Discrete sound events. Tones are cosmetic: (frequency Hz, duration ms) per note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    Move,
    Rotate,
    Lock,
    LineClear,
    HardDrop,
    GameOver,
}

impl SoundCue {
    pub fn tones(self) -> &'static [(f32, u32)] {
        match self {
            Self::Move => &[(220.0, 50)],
            Self::Rotate => &[(440.0, 50)],
            Self::Lock => &[(330.0, 100)],
            Self::LineClear => &[(660.0, 150)],
            Self::HardDrop => &[(880.0, 100)],
            Self::GameOver => &[(110.0, 300), (82.41, 300)],
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Move => "move",
            Self::Rotate => "rotate",
            Self::Lock => "lock",
            Self::LineClear => "clear",
            Self::HardDrop => "drop",
            Self::GameOver => "game over",
        }
    }
}
