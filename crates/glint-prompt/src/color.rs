//! xterm-256 palette helpers and the color formats accepted from users.
//!
//! Two user-facing notations exist. Background colors are CSS-style hex
//! triplets without the leading `#` (`"203"` or `"1e2a3f"`). Host colors are
//! three digits `0`-`5`, one per channel, addressing the 6x6x6 color cube.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

static HEX_COLOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:[0-9a-f]{3}){1,2}$").expect("hex color pattern should compile")
});

static RGB_DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-5]{3}$").expect("rgb digit pattern should compile"));

/// The gray ramp at 232-255 stops short of black and white, so both ends are
/// borrowed from the color cube. The 16 system colors are avoided since
/// terminals let users redefine them.
const GRAY_RAMP_LEN: u8 = 26;

/// Palette index of an RGB coordinate in the xterm color cube.
///
/// Each channel is `0..=5`; any channel outside that range yields `None`.
#[must_use]
pub fn xterm_rgb_index(r: u8, g: u8, b: u8) -> Option<u8> {
    if r > 5 || g > 5 || b > 5 {
        return None;
    }
    Some(36 * r + 6 * g + b + 16)
}

/// Palette index for a gray level, `0` being black and `25` white.
#[must_use]
pub fn xterm_gray_index(level: u8) -> Option<u8> {
    if level >= GRAY_RAMP_LEN {
        return None;
    }

    Some(match level {
        0 => 16,
        25 => 231,
        _ => level + 231,
    })
}

/// Parses a three digit host color such as `"512"` into a palette index.
///
/// Empty input means "not configured" and is silent; anything else that does
/// not match is reported at warn level and ignored.
#[must_use]
pub fn parse_rgb_digits(input: &str) -> Option<u8> {
    if input.is_empty() {
        return None;
    }

    if !RGB_DIGITS.is_match(input) {
        log::warn!("Ignoring invalid host color: {input:?}");
        return None;
    }

    let mut channels = input.bytes().map(|digit| digit - b'0');
    let r = channels.next()?;
    let g = channels.next()?;
    let b = channels.next()?;
    xterm_rgb_index(r, g, b)
}

/// SGR parameters selecting a foreground palette entry, without `ESC[` and
/// `m` so several can be joined with `;`. Empty when `index` is `None`.
#[must_use]
pub fn sgr_foreground(index: Option<u8>) -> String {
    index.map_or_else(String::new, |index| format!("38;5;{index}"))
}

/// Background counterpart of [`sgr_foreground`].
#[must_use]
pub fn sgr_background(index: Option<u8>) -> String {
    index.map_or_else(String::new, |index| format!("48;5;{index}"))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HexColor(String);

impl HexColor {
    /// Black, used when the background must be reset but no color is set.
    pub const FALLBACK: &'static str = "000";

    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        if HEX_COLOR.is_match(input) {
            Some(Self(input.to_string()))
        } else {
            log::warn!("Ignoring invalid background color: {input:?}");
            None
        }
    }

    #[must_use]
    pub fn fallback() -> Self {
        Self(Self::FALLBACK.to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The eight basic colors, addressable by name in zsh (`%F{red}`) and by SGR
/// code elsewhere.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NamedColor {
    Black,
    Red,
    Green,
    #[default]
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
}

impl NamedColor {
    #[must_use]
    pub fn zsh_name(self) -> &'static str {
        match self {
            Self::Black => "black",
            Self::Red => "red",
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Blue => "blue",
            Self::Magenta => "magenta",
            Self::Cyan => "cyan",
            Self::White => "white",
        }
    }

    #[must_use]
    pub fn sgr_code(self) -> u8 {
        match self {
            Self::Black => 30,
            Self::Red => 31,
            Self::Green => 32,
            Self::Yellow => 33,
            Self::Blue => 34,
            Self::Magenta => 35,
            Self::Cyan => 36,
            Self::White => 37,
        }
    }
}
