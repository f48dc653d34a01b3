use std::fmt;
use std::path::PathBuf;

use crate::color::NamedColor;

/// Version-control state of the working directory at display time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VcsState {
    pub branch: String,
    pub dirty: bool,
    /// In-progress operation such as `merge` or `rebase`.
    pub conflict_action: Option<String>,
}

impl fmt::Display for VcsState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.branch)?;
        if self.dirty {
            f.write_str("*")?;
        }
        if let Some(action) = &self.conflict_action {
            write!(f, "|{action}")?;
        }
        Ok(())
    }
}

/// Everything that shapes the prompt template, known before any prompt is
/// displayed. Colors are kept raw and validated when the template is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptStyle {
    pub is_remote_session: bool,
    pub supports_background: bool,
    pub is_multiplexed: bool,
    pub background_override_color: Option<String>,
    pub host_foreground_color: Option<String>,
    pub workdir_color: NamedColor,
    pub error_color: NamedColor,
    /// Include zsh `vcs_info` output in the deferred template.
    pub vcs_info: bool,
}

impl Default for PromptStyle {
    fn default() -> Self {
        Self {
            is_remote_session: false,
            supports_background: false,
            is_multiplexed: false,
            background_override_color: None,
            host_foreground_color: None,
            workdir_color: NamedColor::Yellow,
            error_color: NamedColor::Red,
            vcs_info: false,
        }
    }
}

/// Inputs for one prompt render. Rebuilt for every prompt and dropped once
/// the string has been produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptContext {
    pub style: PromptStyle,
    pub working_directory: PathBuf,
    pub user_at_host: String,
    pub last_exit_code: i32,
    pub vcs_state: Option<VcsState>,
    pub is_privileged: bool,
    pub home_dir: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vcs_state_display_marks_dirty_and_action() {
        let clean = VcsState {
            branch: "main".to_string(),
            dirty: false,
            conflict_action: None,
        };
        let busy = VcsState {
            branch: "feature/bg".to_string(),
            dirty: true,
            conflict_action: Some("rebase".to_string()),
        };

        assert_eq!(clean.to_string(), "main");
        assert_eq!(busy.to_string(), "feature/bg*|rebase");
    }

    #[test]
    fn default_style_uses_yellow_workdir_and_red_errors() {
        let style = PromptStyle::default();

        assert_eq!(style.workdir_color, NamedColor::Yellow);
        assert_eq!(style.error_color, NamedColor::Red);
        assert!(!style.is_remote_session);
    }
}
