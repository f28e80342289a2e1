//! App: terminal init, main loop, drop timer polling and key handling.

use crate::GameConfig;
use crate::display::TerminalPresenter;
use crate::generator::PieceGenerator;
use crate::input::{Command, key_to_command};
use crate::intro::Intro;
use crate::session::{GameSession, GameState};
use crate::theme::Theme;
use crate::ui::{self, Flash, GameView};
use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::DefaultTerminal;
use std::io::Write;
use std::time::{Duration, Instant};
use tracing::{debug, info};

const DEFAULT_FRAME_RATE: f64 = 25.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Intro,
    Game,
}

pub struct App {
    config: GameConfig,
    theme: Theme,
    screen: Screen,
    session: GameSession<TerminalPresenter>,
    intro: Intro,
    flash: Flash,
}

impl App {
    pub fn new(config: GameConfig, theme: Theme) -> Self {
        let now = Instant::now();
        let generator = PieceGenerator::new(config.seed);
        let mut session = GameSession::new(
            generator,
            config.hard_drop,
            TerminalPresenter::new(config.bell),
        );
        session.render();
        let screen = if config.no_intro {
            Screen::Game
        } else {
            Screen::Intro
        };
        Self {
            intro: Intro::new(config.seed, now),
            config,
            theme,
            screen,
            session,
            flash: Flash::default(),
        }
    }

    pub fn run(&mut self) -> Result<()> {
        use crossterm::{
            execute,
            terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
        };

        enable_raw_mode()?;
        let mut stdout = std::io::stdout();
        execute!(stdout, EnterAlternateScreen)?;

        let mut terminal =
            ratatui::DefaultTerminal::new(ratatui::backend::CrosstermBackend::new(stdout))?;

        let result = self.run_loop(&mut terminal);

        // Restore
        execute!(std::io::stdout(), LeaveAlternateScreen)?;
        disable_raw_mode()?;

        result
    }

    /// Falls back to the default rate when the configured one gives no usable interval.
    fn frame_interval(&self) -> Duration {
        let fallback = Duration::from_secs_f64(1.0 / DEFAULT_FRAME_RATE);
        if self.config.frame_rate <= 0.0 {
            return fallback;
        }
        Duration::try_from_secs_f64(1.0 / self.config.frame_rate).unwrap_or(fallback)
    }

    fn run_loop(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        loop {
            let now = Instant::now();
            if self.screen == Screen::Intro {
                self.intro.update(now);
                if self.intro.is_finished(now) {
                    self.leave_intro();
                }
            }

            let view = GameView {
                session: &self.session,
                theme: &self.theme,
                show_ghost: self.config.ghost,
            };
            terminal.draw(|f| ui::draw(f, self.screen, &view, &self.intro, &mut self.flash, now))?;
            self.flash.finish_if_done();

            let mut timeout = self.frame_interval().saturating_sub(now.elapsed());
            let timer = self.session.timer();
            if timer.is_active() {
                let remaining = timer.remaining(Instant::now()).unwrap_or(timeout);
                timeout = timeout.min(remaining);
            }

            if event::poll(timeout)? {
                while event::poll(Duration::ZERO)? {
                    if let Event::Key(key) = event::read()? {
                        if key.kind != KeyEventKind::Press {
                            continue;
                        }
                        if !self.handle_command(key_to_command(key), Instant::now()) {
                            return Ok(());
                        }
                    }
                }
            }

            if self.session.update(Instant::now()) {
                self.session.render();
            }
            self.drain_presenter()?;
        }
    }

    /// Pick up flash rows and pending bells from the presenter.
    fn drain_presenter(&mut self) -> Result<()> {
        let presenter = self.session.presenter_mut();
        let rows = presenter.take_flash_rows();
        let bell = presenter.take_bell();
        if !rows.is_empty() && !self.config.no_animation {
            self.flash.start(rows);
        }
        if bell {
            let mut stdout = std::io::stdout();
            stdout.write_all(b"\x07")?;
            stdout.flush()?;
        }
        Ok(())
    }

    fn leave_intro(&mut self) {
        debug!("intro finished");
        self.screen = Screen::Game;
    }

    /// Apply one command. Returns false when the app should quit.
    fn handle_command(&mut self, command: Command, now: Instant) -> bool {
        if command == Command::Quit {
            info!(
                score = self.session.score(),
                level = self.session.level(),
                lines = self.session.lines(),
                "quit"
            );
            return false;
        }
        if self.screen == Screen::Intro {
            if command != Command::None {
                self.leave_intro();
            }
            return true;
        }

        let session = &mut self.session;
        match command {
            Command::Start => {
                if session.state() == GameState::GameOver {
                    session.restart();
                }
                if session.start(now) {
                    debug!(
                        first = ?session.current().map(|p| p.kind),
                        next = ?session.next().map(|p| p.kind),
                        "new game"
                    );
                }
            }
            Command::Restart => {
                session.restart();
            }
            Command::TogglePause => {
                session.toggle_pause(now);
            }
            Command::MoveLeft => session.move_left(),
            Command::MoveRight => session.move_right(),
            Command::SoftDrop => session.soft_drop(),
            Command::Rotate => session.rotate(),
            Command::HardDrop => session.hard_drop(),
            Command::Quit | Command::None => return true,
        }
        session.render();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HardDropSpawn;

    fn config(no_intro: bool) -> GameConfig {
        GameConfig {
            seed: Some(42),
            hard_drop: HardDropSpawn::PromoteNext,
            no_intro,
            no_animation: false,
            ghost: false,
            bell: false,
            frame_rate: 25.0,
        }
    }

    #[test]
    fn test_any_key_skips_intro() {
        let mut app = App::new(config(false), Theme::default());
        assert_eq!(app.screen, Screen::Intro);
        assert!(app.handle_command(Command::Rotate, Instant::now()));
        assert_eq!(app.screen, Screen::Game);
        assert_eq!(app.session.state(), GameState::NotStarted);
    }

    #[test]
    fn test_quit_from_anywhere() {
        let mut app = App::new(config(false), Theme::default());
        assert!(!app.handle_command(Command::Quit, Instant::now()));
        let mut app = App::new(config(true), Theme::default());
        assert!(!app.handle_command(Command::Quit, Instant::now()));
    }

    #[test]
    fn test_enter_starts_and_commands_render() {
        let mut app = App::new(config(true), Theme::default());
        let now = Instant::now();
        assert!(app.handle_command(Command::Start, now));
        assert_eq!(app.session.state(), GameState::Running);

        let before = app.session.current().map(|p| p.y);
        app.handle_command(Command::SoftDrop, now);
        let after = app.session.presenter().current().map(|p| p.y);
        assert_eq!(after, before.map(|y| y + 1));
    }

    #[test]
    fn test_pause_toggle_and_hard_drop_flash() {
        let mut app = App::new(config(true), Theme::default());
        let now = Instant::now();
        app.handle_command(Command::Start, now);
        app.handle_command(Command::TogglePause, now);
        assert_eq!(app.session.state(), GameState::Paused);
        assert!(!app.session.timer().is_active());
        app.handle_command(Command::TogglePause, now);
        assert_eq!(app.session.state(), GameState::Running);

        app.handle_command(Command::HardDrop, now);
        assert!(app.session.presenter().board().rows().any(|row| row.iter().any(|&c| c != 0)));
        app.drain_presenter().unwrap();
        assert!(!app.flash.is_active());
    }

    #[test]
    fn test_enter_after_game_over_starts_fresh() {
        let mut app = App::new(config(true), Theme::default());
        let now = Instant::now();
        app.handle_command(Command::Start, now);
        for _ in 0..200 {
            if app.session.state() == GameState::GameOver {
                break;
            }
            app.handle_command(Command::HardDrop, now);
        }
        assert_eq!(app.session.state(), GameState::GameOver);

        app.handle_command(Command::Start, now);
        assert_eq!(app.session.state(), GameState::Running);
        assert_eq!(app.session.score(), 0);
    }

    #[test]
    fn test_frame_interval_falls_back_on_bad_rate() {
        for rate in [0.0, -1.0, 1e-300, f64::NAN] {
            let mut cfg = config(true);
            cfg.frame_rate = rate;
            let app = App::new(cfg, Theme::default());
            assert_eq!(
                app.frame_interval(),
                Duration::from_secs_f64(1.0 / DEFAULT_FRAME_RATE),
                "{rate}"
            );
        }
    }
}
