//! Game session: owns the board, the falling and queued pieces, counters and the drop timer,
//! and runs the NotStarted / Running / Paused / GameOver state machine.

use crate::HardDropSpawn;
use crate::board::Board;
use crate::collision::{self, collides};
use crate::generator::PieceGenerator;
use crate::piece::Piece;
use crate::presenter::Presenter;
use crate::scoring::ScoreKeeper;
use crate::timer::DropTimer;
use std::time::{Duration, Instant};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    NotStarted,
    Running,
    Paused,
    GameOver,
}

pub struct GameSession<P: Presenter> {
    board: Board,
    current: Option<Piece>,
    next: Option<Piece>,
    generator: PieceGenerator,
    scores: ScoreKeeper,
    state: GameState,
    timer: DropTimer,
    hard_drop_spawn: HardDropSpawn,
    presenter: P,
}

impl<P: Presenter> GameSession<P> {
    pub fn new(generator: PieceGenerator, hard_drop_spawn: HardDropSpawn, presenter: P) -> Self {
        let scores = ScoreKeeper::new();
        Self {
            board: Board::new(),
            current: None,
            next: None,
            generator,
            timer: DropTimer::new(scores.drop_interval()),
            scores,
            state: GameState::NotStarted,
            hard_drop_spawn,
            presenter,
        }
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current(&self) -> Option<&Piece> {
        self.current.as_ref()
    }

    pub fn next(&self) -> Option<&Piece> {
        self.next.as_ref()
    }

    pub fn score(&self) -> u32 {
        self.scores.score()
    }

    pub fn level(&self) -> u32 {
        self.scores.level()
    }

    pub fn lines(&self) -> u32 {
        self.scores.lines()
    }

    pub fn drop_interval(&self) -> Duration {
        self.scores.drop_interval()
    }

    pub fn timer(&self) -> &DropTimer {
        &self.timer
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    /// Where the current piece would land if hard-dropped now.
    pub fn ghost(&self) -> Option<Piece> {
        let piece = self.current.as_ref()?;
        let mut ghost = piece.clone();
        ghost.y += collision::drop_distance(&self.board, piece);
        Some(ghost)
    }

    fn is_running(&self) -> bool {
        self.state == GameState::Running
    }

    /// Fresh board and counters, new current and next pieces, timer running.
    /// Ignored while a game is in progress.
    pub fn start(&mut self, now: Instant) -> bool {
        if matches!(self.state, GameState::Running | GameState::Paused) {
            debug!(state = ?self.state, "start ignored");
            return false;
        }
        self.board.clear();
        self.scores.reset();
        self.current = Some(self.generator.next());
        self.next = Some(self.generator.next());

        self.presenter.on_game_started();
        self.presenter.on_score_changed(self.scores.score());
        self.presenter.on_level_changed(self.scores.level());
        self.presenter.on_lines_changed(self.scores.lines());
        self.presenter.render_preview(self.next.as_ref());

        self.state = GameState::Running;
        self.timer.start(self.scores.drop_interval(), now);
        info!(interval_ms = self.timer.interval().as_millis() as u64, "game started");
        true
    }

    /// GameOver back to NotStarted. The board stays as it was until the next start.
    pub fn restart(&mut self) -> bool {
        if self.state != GameState::GameOver {
            return false;
        }
        self.timer.stop();
        self.state = GameState::NotStarted;
        debug!("session reset to not started");
        true
    }

    /// Poll the drop timer and run one gravity step if it is due.
    pub fn update(&mut self, now: Instant) -> bool {
        if !self.is_running() {
            return false;
        }
        let interval = self.scores.drop_interval();
        if self.timer.interval() != interval {
            self.timer.reschedule(interval, now);
            debug!(interval_ms = interval.as_millis() as u64, "drop timer rescheduled");
        }
        if self.timer.poll(now) {
            self.tick();
            return true;
        }
        false
    }

    /// One gravity step: fall a row, or lock and bring in the next piece.
    pub fn tick(&mut self) {
        if self.is_running() {
            self.step_down();
        }
    }

    /// Manual one-row drop; same rules as a tick.
    pub fn soft_drop(&mut self) {
        self.tick();
    }

    pub fn move_left(&mut self) {
        self.shift(-1);
    }

    pub fn move_right(&mut self) {
        self.shift(1);
    }

    fn shift(&mut self, dx: i32) {
        if !self.is_running() {
            return;
        }
        let Some(piece) = self.current.as_mut() else {
            return;
        };
        if !collides(&self.board, piece, dx, 0) {
            piece.x += dx;
            self.presenter.on_move();
        }
    }

    pub fn rotate(&mut self) {
        if !self.is_running() {
            return;
        }
        let Some(piece) = self.current.as_mut() else {
            return;
        };
        if collision::rotate(&self.board, piece) {
            self.presenter.on_rotate();
        }
    }

    pub fn hard_drop(&mut self) {
        if !self.is_running() {
            return;
        }
        let Some(piece) = self.current.as_mut() else {
            return;
        };
        piece.y += collision::drop_distance(&self.board, piece);
        self.lock_current();
        match self.hard_drop_spawn {
            HardDropSpawn::PromoteNext => self.promote_next(),
            HardDropSpawn::Fresh => self.current = Some(self.generator.next()),
        }
        self.check_spawn();
        self.presenter.on_hard_drop();
    }

    pub fn pause(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        self.state = GameState::Paused;
        self.timer.stop();
        debug!("paused");
        true
    }

    pub fn resume(&mut self, now: Instant) -> bool {
        if self.state != GameState::Paused {
            return false;
        }
        self.state = GameState::Running;
        self.timer.start(self.scores.drop_interval(), now);
        debug!("resumed");
        true
    }

    pub fn toggle_pause(&mut self, now: Instant) -> bool {
        match self.state {
            GameState::Running => self.pause(),
            GameState::Paused => self.resume(now),
            _ => false,
        }
    }

    /// Draw the board and the falling piece.
    pub fn render(&mut self) {
        self.presenter.render(&self.board, self.current.as_ref());
    }

    fn step_down(&mut self) {
        let Some(piece) = self.current.as_mut() else {
            return;
        };
        if collides(&self.board, piece, 0, 1) {
            self.lock_current();
            self.promote_next();
            self.check_spawn();
        } else {
            piece.y += 1;
            self.presenter.on_move();
        }
    }

    /// Write the current piece into the board and clear any full rows.
    fn lock_current(&mut self) {
        let Some(piece) = self.current.take() else {
            return;
        };
        let value = piece.kind.palette_index();
        for (row, col) in piece.cells() {
            // Cells above the top row are dropped.
            if row >= 0 {
                self.board.set_cell(row as usize, col as usize, value);
            }
        }
        debug!(kind = ?piece.kind, x = piece.x, y = piece.y, "piece locked");
        self.presenter.on_lock();
        self.clear_lines();
    }

    fn clear_lines(&mut self) {
        let rows = self.board.clear_full_rows();
        let Some(outcome) = self.scores.apply_clear(rows.len() as u32) else {
            return;
        };
        debug!(rows = outcome.rows, points = outcome.points, "lines cleared");
        self.presenter.on_line_clear(&rows);
        self.presenter.on_lines_changed(self.scores.lines());
        self.presenter.on_score_changed(self.scores.score());
        if outcome.level_changed {
            info!(level = self.scores.level(), "level up");
            self.presenter.on_level_changed(self.scores.level());
        }
    }

    fn promote_next(&mut self) {
        let promoted = self.next.take().unwrap_or_else(|| self.generator.next());
        self.current = Some(promoted);
        self.next = Some(self.generator.next());
        self.presenter.render_preview(self.next.as_ref());
    }

    fn check_spawn(&mut self) {
        let blocked = self
            .current
            .as_ref()
            .is_some_and(|p| collides(&self.board, p, 0, 0));
        if blocked {
            self.game_over();
        }
    }

    fn game_over(&mut self) {
        self.state = GameState::GameOver;
        self.timer.stop();
        info!(score = self.scores.score(), lines = self.scores.lines(), "game over");
        self.presenter.on_game_over(self.scores.score());
    }
}
