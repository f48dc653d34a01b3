mod commands;
mod paths;
mod terminal;
pub mod terminfo;

pub use commands::HideWindow;
pub use paths::{AppPaths, AppPathsError};
pub use terminal::{TerminalEnv, is_privileged};
pub use terminfo::{InstallOptions, InstallReport, TerminfoError};
