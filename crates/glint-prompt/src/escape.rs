//! Raw terminal control sequences.

use crate::color::HexColor;

pub const ESC: char = '\x1b';
pub const BEL: char = '\x07';

/// Resets every SGR attribute.
pub const SGR_RESET: &str = "\x1b[m";

#[must_use]
pub fn sgr(params: &str) -> String {
    format!("{ESC}[{params}m")
}

/// iTerm2 `SetColors` sequence changing the session background.
///
/// There is no way to return to the profile default afterwards, so callers
/// emit it on every prompt once they emit it at all.
#[must_use]
pub fn iterm_background(color: &HexColor) -> String {
    format!("{ESC}]1337;SetColors=bg=srgb:{}{BEL}", color.as_str())
}

/// Wraps a sequence so tmux forwards it to the outer terminal untouched.
#[must_use]
pub fn tmux_passthrough(seq: &str) -> String {
    format!("{ESC}Ptmux;{ESC}{seq}{ESC}\\")
}

#[must_use]
pub fn wrap_if_multiplexed(seq: String, multiplexed: bool) -> String {
    if multiplexed {
        tmux_passthrough(&seq)
    } else {
        seq
    }
}
