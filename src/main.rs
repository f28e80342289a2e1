//! neontris: neon falling-block puzzle game in the terminal.

mod app;
mod board;
mod collision;
mod display;
mod generator;
mod input;
mod intro;
mod piece;
mod presenter;
mod scoring;
mod session;
mod theme;
mod timer;
mod ui;

use anyhow::{Context, Result};
use app::App;
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::Level;

/// Environment variable holding the log level, e.g. `NEONTRIS_LOG=debug`.
const LOG_ENV: &str = "NEONTRIS_LOG";

/// Options derived from CLI that affect the session and the terminal front end.
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub seed: Option<u64>,
    pub hard_drop: HardDropSpawn,
    pub no_intro: bool,
    pub no_animation: bool,
    pub ghost: bool,
    pub bell: bool,
    pub frame_rate: f64,
}

fn main() -> Result<()> {
    let args = Args::parse();
    if let Some(path) = args.log_file.as_deref() {
        init_logging(path)?;
    }
    let theme = theme::Theme::load(args.theme.as_deref())
        .with_context(|| format!("loading theme {:?}", args.theme))?;
    let config = GameConfig {
        seed: args.seed,
        hard_drop: args.hard_drop,
        no_intro: args.no_intro,
        no_animation: args.no_animation,
        ghost: args.ghost,
        bell: args.bell,
        frame_rate: args.frame_rate,
    };
    tracing::info!(?config, "starting");
    let mut app = App::new(config, theme);
    app.run()?;
    Ok(())
}

fn init_logging(path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_max_level(log_level(std::env::var(LOG_ENV).ok().as_deref()))
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("installing log subscriber: {e}"))
}

/// Unset or unparsable values log at info.
fn log_level(value: Option<&str>) -> Level {
    value
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(Level::INFO)
}

/// Neon falling-block puzzle in the terminal.
#[derive(Debug, Parser)]
#[command(
    name = "neontris",
    version,
    about = "Neon falling-block puzzle in the terminal. Fill whole rows to clear them.",
    long_about = "neontris is a terminal falling-block puzzle on a 12x20 board.\n\n\
        Move and rotate the falling piece; full rows are cleared for 100 points per row \
        times the level. Every 10 lines the level rises and pieces fall faster.\n\n\
        CONTROLS:\n  Left/Right or h/l  Move     Up or k    Rotate    Down or j  Soft drop\n  \
        Space  Hard drop   P  Pause   Enter  Start   R  Restart after game over   Q / Esc  Quit\n\n\
        Use --theme to load a btop-style theme file (theme[piece1]=\"#ff00ff\" ...)."
)]
pub struct Args {
    /// Seed for the piece generator (and intro rain). Random if not set.
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,

    /// What becomes the falling piece after a hard drop: promote the previewed piece, or draw a fresh one.
    #[arg(long, default_value = "promote-next")]
    pub hard_drop: HardDropSpawn,

    /// Path to theme file (btop-style theme[key]=\"value\"). Neon colours if not set.
    #[arg(short, long, value_name = "FILE")]
    pub theme: Option<PathBuf>,

    /// Skip the falling-blocks intro.
    #[arg(long)]
    pub no_intro: bool,

    /// Disable the line-clear flash.
    #[arg(long)]
    pub no_animation: bool,

    /// Show where the falling piece would land.
    #[arg(long)]
    pub ghost: bool,

    /// Ring the terminal bell on line clears and game over.
    #[arg(long)]
    pub bell: bool,

    /// Target render frames per second.
    #[arg(long, default_value = "25.0", value_name = "RATE", value_parser = parse_frame_rate)]
    pub frame_rate: f64,

    /// Write logs to this file (level from NEONTRIS_LOG, default info).
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,
}

/// Accepted render rates, in frames per second.
const FRAME_RATE_RANGE: std::ops::RangeInclusive<f64> = 1.0..=240.0;

fn parse_frame_rate(s: &str) -> Result<f64, String> {
    let rate: f64 = s.parse().map_err(|e| format!("{e}"))?;
    if FRAME_RATE_RANGE.contains(&rate) {
        Ok(rate)
    } else {
        Err(format!(
            "must be between {} and {}",
            FRAME_RATE_RANGE.start(),
            FRAME_RATE_RANGE.end()
        ))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum HardDropSpawn {
    /// The previewed piece falls next and a new preview is drawn.
    #[default]
    PromoteNext,
    /// A freshly generated piece falls next; the preview stays as it was.
    Fresh,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["neontris"]).unwrap();
        assert_eq!(args.hard_drop, HardDropSpawn::PromoteNext);
        assert_eq!(args.seed, None);
        assert!(!args.ghost);
        assert_eq!(args.frame_rate, 25.0);
    }

    #[test]
    fn test_flags() {
        let args = Args::try_parse_from([
            "neontris",
            "--seed",
            "7",
            "--hard-drop",
            "fresh",
            "--no-intro",
            "--ghost",
            "--bell",
        ])
        .unwrap();
        assert_eq!(args.seed, Some(7));
        assert_eq!(args.hard_drop, HardDropSpawn::Fresh);
        assert!(args.no_intro && args.ghost && args.bell);
    }

    #[test]
    fn test_frame_rate_bounds() {
        let args = Args::try_parse_from(["neontris", "--frame-rate", "60"]).unwrap();
        assert_eq!(args.frame_rate, 60.0);
        for bad in ["1e-300", "0", "-5", "NaN", "1000", "fast"] {
            assert!(
                Args::try_parse_from(["neontris", "--frame-rate", bad]).is_err(),
                "{bad}"
            );
        }
    }

    #[test]
    fn test_log_level_from_env_value() {
        assert_eq!(log_level(None), Level::INFO);
        assert_eq!(log_level(Some("debug")), Level::DEBUG);
        assert_eq!(log_level(Some("TRACE")), Level::TRACE);
        assert_eq!(log_level(Some("loud")), Level::INFO);
    }

    #[test]
    fn test_rejects_unknown_policy() {
        assert!(Args::try_parse_from(["neontris", "--hard-drop", "hold"]).is_err());
    }
}
