//! Theme loading: btop-style `theme[key]="value"` and hex → ratatui Color.

use crate::piece::PALETTE_SIZE;
use ratatui::style::Color;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Piece palette and UI colours.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Piece colours, indexed by board palette index - 1.
    pub pieces: [Color; PALETTE_SIZE],
    /// Playfield background.
    pub bg: Color,
    /// Border lines.
    pub div_line: Color,
    /// Text (score, level, lines).
    pub main_fg: Color,
    /// Titles and the game-over banner.
    pub title: Color,
    /// Pause banner.
    pub accent: Color,
    /// Dim stripe drawn on every other empty row.
    pub scanline: Color,
}

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid hex: {0}")]
    InvalidHex(String),
    #[error("theme[{key}]: {source}")]
    BadValue {
        key: String,
        #[source]
        source: Box<ThemeError>,
    },
}

impl Default for Theme {
    fn default() -> Self {
        Self::neon()
    }
}

impl Theme {
    pub const fn neon() -> Self {
        Self {
            pieces: [
                Color::Rgb(0xff, 0x00, 0xff),
                Color::Rgb(0x00, 0xff, 0xff),
                Color::Rgb(0xff, 0xff, 0x00),
                Color::Rgb(0xff, 0x80, 0x00),
                Color::Rgb(0x00, 0x80, 0xff),
                Color::Rgb(0x00, 0xff, 0x80),
                Color::Rgb(0xff, 0x00, 0x80),
            ],
            bg: Color::Rgb(0x0a, 0x0a, 0x14),
            div_line: Color::Rgb(0x3f, 0x44, 0x4f),
            main_fg: Color::Rgb(0xe0, 0xe0, 0xe0),
            title: Color::Rgb(0xff, 0x00, 0xde),
            accent: Color::Rgb(0x00, 0xff, 0xff),
            scanline: Color::Rgb(0x16, 0x16, 0x24),
        }
    }

    /// Neon defaults with any keys from `path` overriding them. Keys: `piece1`..`piece7`,
    /// `bg`, `div_line`, `main_fg`, `title`, `accent`, `scanline`. Unknown keys are ignored.
    pub fn load(path: Option<&Path>) -> Result<Self, ThemeError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let s = std::fs::read_to_string(path)?;
        Self::from_map(&parse_theme_file(&s))
    }

    fn from_map(map: &HashMap<String, String>) -> Result<Self, ThemeError> {
        let mut theme = Self::neon();
        for (key, value) in map {
            let slot = match key.as_str() {
                "bg" => &mut theme.bg,
                "div_line" => &mut theme.div_line,
                "main_fg" => &mut theme.main_fg,
                "title" => &mut theme.title,
                "accent" => &mut theme.accent,
                "scanline" => &mut theme.scanline,
                other => match other
                    .strip_prefix("piece")
                    .and_then(|n| n.parse::<usize>().ok())
                    .and_then(|n| n.checked_sub(1))
                    .and_then(|i| theme.pieces.get_mut(i))
                {
                    Some(slot) => slot,
                    None => continue,
                },
            };
            *slot = parse_hex(value).map_err(|e| ThemeError::BadValue {
                key: key.clone(),
                source: Box::new(e),
            })?;
        }
        Ok(theme)
    }

    /// Colour for a board cell value (1..=7). Empty cells have no piece colour.
    #[inline]
    pub fn piece_color(&self, palette_index: u8) -> Option<Color> {
        (palette_index as usize)
            .checked_sub(1)
            .and_then(|i| self.pieces.get(i))
            .copied()
    }
}

/// Parse btop-style theme file into key -> value map.
fn parse_theme_file(s: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for line in s.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some(stripped) = line.strip_prefix("theme[") {
            if let Some(end) = stripped.find(']') {
                let key = stripped[..end].trim();
                let rest = stripped[end + 1..].trim();
                if let Some(eq) = rest.find('=') {
                    let value = rest[eq + 1..]
                        .trim()
                        .trim_matches('"')
                        .trim_matches('\'')
                        .to_string();
                    if !value.is_empty() {
                        map.insert(key.to_string(), value);
                    }
                }
            }
        }
    }
    map
}

/// Parse hex colour "#RRGGBB" or "#RGB" into ratatui Color.
pub fn parse_hex(s: &str) -> Result<Color, ThemeError> {
    let s = s.trim().trim_start_matches('#');
    let invalid = || ThemeError::InvalidHex(s.to_string());
    let channel = |range: std::ops::Range<usize>| {
        s.get(range)
            .and_then(|d| u8::from_str_radix(d, 16).ok())
            .ok_or_else(invalid)
    };
    let (r, g, b) = match s.len() {
        6 => (channel(0..2)?, channel(2..4)?, channel(4..6)?),
        3 => (channel(0..1)? * 17, channel(1..2)? * 17, channel(2..3)? * 17),
        _ => return Err(invalid()),
    };
    Ok(Color::Rgb(r, g, b))
}
