//! Layout and drawing: intro rain, playfield, next preview, counters, pause and game-over overlays.

use crate::app::Screen;
use crate::board::{COLS, ROWS};
use crate::display::TerminalPresenter;
use crate::intro::Intro;
use crate::piece::Piece;
use crate::session::{GameSession, GameState};
use crate::theme::Theme;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use std::collections::HashSet;
use std::time::Instant;
use tachyonfx::{
    CellFilter, Duration as TfxDuration, Effect, EffectRenderer, Interpolation, fx, ref_count,
};

/// Each board cell is two terminal columns wide.
const CELL_WIDTH: u16 = 2;
const BOARD_OUTER_W: u16 = COLS as u16 * CELL_WIDTH + 2;
const BOARD_OUTER_H: u16 = ROWS as u16 + 2;
const SIDEBAR_WIDTH: u16 = 24;

/// Next preview is centered in a 4x4 cell box.
const PREVIEW_CELLS: u16 = 4;

/// Duration of the line-clear flash in ms.
const FLASH_MS: u32 = 250;

const FILLED: &str = "██";
const GHOST: &str = "░░";
const EMPTY: &str = "  ";

/// Line-clear flash: rows to highlight and the running effect.
#[derive(Default)]
pub struct Flash {
    rows: Vec<usize>,
    effect: Option<Effect>,
    last_process: Option<Instant>,
}

impl Flash {
    /// Begin flashing `rows`, replacing any flash still running.
    pub fn start(&mut self, rows: Vec<usize>) {
        self.rows = rows;
        self.effect = None;
        self.last_process = None;
    }

    pub fn is_active(&self) -> bool {
        !self.rows.is_empty()
    }

    /// Drop the effect once it has run to completion.
    pub fn finish_if_done(&mut self) {
        if self.effect.as_ref().is_some_and(|e| e.done()) {
            *self = Self::default();
        }
    }
}

/// What the game screen shows besides the session itself.
pub struct GameView<'a> {
    pub session: &'a GameSession<TerminalPresenter>,
    pub theme: &'a Theme,
    pub show_ghost: bool,
}

pub fn draw(
    frame: &mut Frame,
    screen: Screen,
    view: &GameView<'_>,
    intro: &Intro,
    flash: &mut Flash,
    now: Instant,
) {
    let area = frame.area();
    match screen {
        Screen::Intro => draw_intro(frame, view.theme, intro, area, now),
        Screen::Game => {
            let board_rect = draw_game(frame, view, area);
            match view.session.state() {
                GameState::NotStarted => draw_start_overlay(frame, view.theme, board_rect),
                GameState::Paused => draw_pause_overlay(frame, view.theme, board_rect),
                GameState::GameOver => draw_game_over(frame, view, board_rect),
                GameState::Running => {}
            }
            if flash.is_active() {
                apply_flash(frame, board_rect, flash, now);
            }
        }
    }
}

fn draw_intro(frame: &mut Frame, theme: &Theme, intro: &Intro, area: Rect, now: Instant) {
    frame.render_widget(
        Block::default().style(Style::default().bg(theme.bg)),
        area,
    );

    let buf = frame.buffer_mut();
    for block in intro.blocks() {
        let Some(progress) = block.progress(now) else {
            continue;
        };
        let color = theme.piece_color(block.color).unwrap_or(theme.main_fg);
        // Starts one row above the screen and ends one row below it.
        let y = (progress * f32::from(area.height + 1)) as i32 - 1;
        let x = (block.x * f32::from(area.width.saturating_sub(CELL_WIDTH))) as u16;
        if y < 0 || y >= i32::from(area.height) {
            continue;
        }
        buf.set_string(
            area.x + x,
            area.y + y as u16,
            FILLED,
            Style::default().fg(color).bg(theme.bg),
        );
    }

    let lines = vec![
        Line::from(Span::styled(
            " N E O N T R I S ",
            Style::default()
                .fg(theme.title)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "press any key",
            Style::default().fg(theme.main_fg),
        )),
    ];
    let banner = centered(area, 24, 3);
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), banner);
}

/// Draw board + sidebar centered in `area`; returns the board's inner rect.
fn draw_game(frame: &mut Frame, view: &GameView<'_>, area: Rect) -> Rect {
    let theme = view.theme;
    frame.render_widget(
        Block::default().style(Style::default().bg(theme.bg)),
        area,
    );

    let horiz = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(BOARD_OUTER_W + SIDEBAR_WIDTH),
            Constraint::Fill(1),
        ])
        .split(area);
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(BOARD_OUTER_H),
            Constraint::Fill(1),
        ])
        .split(horiz[1]);
    let inner = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(BOARD_OUTER_W),
            Constraint::Length(SIDEBAR_WIDTH),
        ])
        .split(vert[1]);

    let board_rect = draw_playfield(frame, view, inner[0]);
    draw_sidebar(frame, view, inner[1]);
    board_rect
}

fn draw_playfield(frame: &mut Frame, view: &GameView<'_>, area: Rect) -> Rect {
    let theme = view.theme;
    let presenter = view.session.presenter();
    let board = presenter.board();

    let mut ghost_cells = HashSet::new();
    if view.show_ghost && view.session.state() == GameState::Running {
        if let Some(ghost) = view.session.ghost() {
            ghost_cells.extend(ghost.cells());
        }
    }
    let falling: HashSet<(i32, i32)> = presenter
        .current()
        .map(|p| p.cells().collect())
        .unwrap_or_default();
    let falling_color = presenter
        .current()
        .and_then(|p| theme.piece_color(p.kind.palette_index()))
        .unwrap_or(theme.main_fg);

    let lines: Vec<Line> = board
        .rows()
        .enumerate()
        .map(|(r, row)| {
            let empty_bg = if r % 2 == 1 { theme.scanline } else { theme.bg };
            let spans: Vec<Span> = row
                .iter()
                .enumerate()
                .map(|(c, &value)| {
                    let pos = (r as i32, c as i32);
                    if falling.contains(&pos) {
                        Span::styled(FILLED, Style::default().fg(falling_color).bg(empty_bg))
                    } else if let Some(color) = theme.piece_color(value) {
                        Span::styled(FILLED, Style::default().fg(color).bg(empty_bg))
                    } else if ghost_cells.contains(&pos) {
                        Span::styled(GHOST, Style::default().fg(falling_color).bg(empty_bg))
                    } else {
                        Span::styled(EMPTY, Style::default().bg(empty_bg))
                    }
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.div_line).bg(theme.bg))
        .title(Span::styled(" neontris ", Style::default().fg(theme.title)));
    let inner = block.inner(area);
    frame.render_widget(Paragraph::new(lines).block(block), area);
    inner
}

fn draw_sidebar(frame: &mut Frame, view: &GameView<'_>, area: Rect) {
    let theme = view.theme;
    let presenter = view.session.presenter();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(PREVIEW_CELLS + 2),
            Constraint::Length(6),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(area);

    draw_preview(frame, theme, presenter.preview(), chunks[0]);

    let text = Style::default().fg(theme.main_fg);
    let stats = vec![
        Line::from(Span::styled(format!(" Score: {}", presenter.score()), text)),
        Line::from(Span::styled(format!(" Level: {}", presenter.level()), text)),
        Line::from(Span::styled(format!(" Lines: {}", presenter.lines()), text)),
        Line::from(Span::styled(
            format!(" Speed: {}ms", view.session.drop_interval().as_millis()),
            text,
        )),
    ];
    frame.render_widget(
        Paragraph::new(stats).block(sidebar_block(theme)),
        chunks[1],
    );

    let cue = presenter.last_cue().map_or("", |c| c.label());
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(format!(" ♪ {cue}"), text)))
            .block(sidebar_block(theme)),
        chunks[2],
    );

    let help = Style::default().fg(theme.div_line);
    let controls = vec![
        Line::from(Span::styled(" ←/→  move", help)),
        Line::from(Span::styled(" ↑    rotate", help)),
        Line::from(Span::styled(" ↓    soft drop", help)),
        Line::from(Span::styled(" SPC  hard drop", help)),
        Line::from(Span::styled(" P    pause", help)),
        Line::from(Span::styled(" Q    quit", help)),
    ];
    frame.render_widget(Paragraph::new(controls), chunks[3]);
}

fn sidebar_block(theme: &Theme) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.div_line).bg(theme.bg))
}

fn draw_preview(frame: &mut Frame, theme: &Theme, next: Option<&Piece>, area: Rect) {
    let block = sidebar_block(theme).title(Span::styled(" Next ", Style::default().fg(theme.title)));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(piece) = next else {
        return;
    };
    let color = theme.piece_color(piece.kind.palette_index()).unwrap_or(theme.main_fg);
    let off_x = PREVIEW_CELLS.saturating_sub(piece.shape.width() as u16) / 2;
    let off_y = PREVIEW_CELLS.saturating_sub(piece.shape.height() as u16) / 2;
    let left = inner.x + inner.width.saturating_sub(PREVIEW_CELLS * CELL_WIDTH) / 2;

    let buf = frame.buffer_mut();
    for (r, c) in piece.shape.filled() {
        let x = left + (off_x + c as u16) * CELL_WIDTH;
        let y = inner.y + off_y + r as u16;
        if y < inner.bottom() && x + CELL_WIDTH <= inner.right() {
            buf.set_string(x, y, FILLED, Style::default().fg(color));
        }
    }
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

fn draw_popup(frame: &mut Frame, theme: &Theme, area: Rect, lines: Vec<Line<'_>>) {
    let popup = centered(area, area.width, lines.len() as u16 + 2);
    frame.render_widget(Clear, popup);
    let p = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.div_line))
            .style(Style::default().bg(Color::Black)),
    );
    frame.render_widget(p, popup);
}

fn draw_start_overlay(frame: &mut Frame, theme: &Theme, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Press ENTER to start",
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    draw_popup(frame, theme, area, lines);
}

fn draw_pause_overlay(frame: &mut Frame, theme: &Theme, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "PAUSED",
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled("P to resume", Style::default().fg(theme.main_fg))),
    ];
    draw_popup(frame, theme, area, lines);
}

fn draw_game_over(frame: &mut Frame, view: &GameView<'_>, area: Rect) {
    let theme = view.theme;
    let presenter = view.session.presenter();
    let score = presenter.final_score().unwrap_or_else(|| presenter.score());
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Game Over",
            Style::default().fg(theme.title).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("Score: {score}"),
            Style::default().fg(theme.title),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "R restart   Q quit",
            Style::default().fg(theme.main_fg),
        )),
    ];
    draw_popup(frame, theme, area, lines);
}

/// Fade the cleared rows' screen positions to white. The board has already collapsed, so this
/// only marks where the lines were.
fn apply_flash(frame: &mut Frame, board_rect: Rect, flash: &mut Flash, now: Instant) {
    let delta = flash
        .last_process
        .map(|t| now.saturating_duration_since(t))
        .unwrap_or(std::time::Duration::ZERO);
    let delta_ms = delta.as_millis().min(u128::from(u32::MAX)) as u32;
    flash.last_process = Some(now);

    if flash.effect.is_none() {
        let screen_rows: HashSet<u16> = flash
            .rows
            .iter()
            .map(|&r| board_rect.y + r as u16)
            .collect();
        let filter = CellFilter::PositionFn(ref_count(move |pos: Position| {
            screen_rows.contains(&pos.y)
        }));
        let effect = fx::fade_to(Color::White, Color::White, (FLASH_MS, Interpolation::Linear))
            .with_filter(filter)
            .with_area(board_rect);
        flash.effect = Some(effect);
    }

    if let Some(effect) = flash.effect.as_mut() {
        frame.render_effect(effect, board_rect, TfxDuration::from_millis(delta_ms));
    }
}
