//! Terminal-side presenter: keeps the last rendered snapshot and display counters for the UI,
//! and turns presenter hooks into sound cues, flash requests and bells.

use crate::board::Board;
use crate::piece::Piece;
use crate::presenter::{Presenter, SoundCue};
use tracing::trace;

#[derive(Debug, Default)]
pub struct TerminalPresenter {
    board: Board,
    current: Option<Piece>,
    preview: Option<Piece>,
    score: u32,
    level: u32,
    lines: u32,
    last_cue: Option<SoundCue>,
    final_score: Option<u32>,
    flash_rows: Vec<usize>,
    bell: bool,
    bell_pending: bool,
}

impl TerminalPresenter {
    pub fn new(bell: bool) -> Self {
        Self {
            level: 1,
            bell,
            ..Self::default()
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current(&self) -> Option<&Piece> {
        self.current.as_ref()
    }

    pub fn preview(&self) -> Option<&Piece> {
        self.preview.as_ref()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn last_cue(&self) -> Option<SoundCue> {
        self.last_cue
    }

    pub fn final_score(&self) -> Option<u32> {
        self.final_score
    }

    /// Rows cleared since the last call, for the flash effect.
    pub fn take_flash_rows(&mut self) -> Vec<usize> {
        std::mem::take(&mut self.flash_rows)
    }

    /// True once per bell-worthy event when bells are enabled.
    pub fn take_bell(&mut self) -> bool {
        std::mem::take(&mut self.bell_pending)
    }

    fn cue(&mut self, cue: SoundCue) {
        trace!(cue = cue.label(), tones = ?cue.tones(), "sound cue");
        self.last_cue = Some(cue);
    }

    fn ring(&mut self) {
        if self.bell {
            self.bell_pending = true;
        }
    }
}

impl Presenter for TerminalPresenter {
    fn render(&mut self, board: &Board, current: Option<&Piece>) {
        self.board.clone_from(board);
        self.current = current.cloned();
    }

    fn render_preview(&mut self, next: Option<&Piece>) {
        self.preview = next.cloned();
    }

    fn on_game_started(&mut self) {
        self.final_score = None;
    }

    fn on_score_changed(&mut self, score: u32) {
        self.score = score;
    }

    fn on_level_changed(&mut self, level: u32) {
        self.level = level;
    }

    fn on_lines_changed(&mut self, lines: u32) {
        self.lines = lines;
    }

    fn on_move(&mut self) {
        self.cue(SoundCue::Move);
    }

    fn on_rotate(&mut self) {
        self.cue(SoundCue::Rotate);
    }

    fn on_lock(&mut self) {
        self.cue(SoundCue::Lock);
    }

    fn on_line_clear(&mut self, rows: &[usize]) {
        self.cue(SoundCue::LineClear);
        self.flash_rows.extend_from_slice(rows);
        self.ring();
    }

    fn on_hard_drop(&mut self) {
        self.cue(SoundCue::HardDrop);
    }

    fn on_game_over(&mut self, final_score: u32) {
        self.cue(SoundCue::GameOver);
        self.final_score = Some(final_score);
        self.ring();
    }
}
