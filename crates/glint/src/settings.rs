use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use glint_platform::AppPaths;
use glint_prompt::{NamedColor, PromptArgs};
use glint_runtime::RuntimeSpec;

use crate::error::AppError;

pub const BG_ENV_VAR: &str = "GLINT_PROMPT_BG";
pub const HOST_ENV_VAR: &str = "GLINT_PROMPT_HOST";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default)]
    pub debug_logging: bool,

    #[serde(default = "default_max_log_size_bytes")]
    pub max_log_size_bytes: u64,

    #[serde(default)]
    pub prompt: PromptSettings,

    #[serde(default)]
    pub runtimes: Vec<RuntimeSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptSettings {
    /// Background for ssh sessions, 3 or 6 hex digits.
    #[serde(default)]
    pub bgcolor: Option<String>,

    /// Host name color, three digits `0`-`5`.
    #[serde(default)]
    pub hostcolor: Option<String>,

    #[serde(default = "default_workdir_color")]
    pub workdir_color: NamedColor,

    #[serde(default = "default_error_color")]
    pub error_color: NamedColor,

    #[serde(default)]
    pub vcs_info: bool,

    /// Overrides keyed by short host name.
    #[serde(default)]
    pub hosts: HashMap<String, HostColors>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostColors {
    #[serde(default)]
    pub bgcolor: Option<String>,

    #[serde(default)]
    pub hostcolor: Option<String>,
}

fn default_max_log_size_bytes() -> u64 {
    5 * 1024 * 1024
}

fn default_workdir_color() -> NamedColor {
    NamedColor::Yellow
}

fn default_error_color() -> NamedColor {
    NamedColor::Red
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            debug_logging: false,
            max_log_size_bytes: default_max_log_size_bytes(),
            prompt: PromptSettings::default(),
            runtimes: Vec::new(),
        }
    }
}

impl Default for PromptSettings {
    fn default() -> Self {
        Self {
            bgcolor: None,
            hostcolor: None,
            workdir_color: default_workdir_color(),
            error_color: default_error_color(),
            vcs_info: false,
            hosts: HashMap::new(),
        }
    }
}

impl AppSettings {
    /// Reads the settings file. A missing file means defaults.
    ///
    /// # Errors
    /// Returns an error when the file exists but cannot be read or parsed.
    /// Callers fall back to defaults so a broken file never keeps a prompt
    /// from appearing.
    pub fn load() -> Result<Self, AppError> {
        let Ok(paths) = AppPaths::new() else {
            return Ok(Self::default());
        };
        Self::load_from(&paths.settings_file())
    }

    pub fn load_from(path: &Path) -> Result<Self, AppError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|source| AppError::ReadSettings {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| AppError::ParseSettings {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn save_to(&self, path: &Path) -> Result<(), AppError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

impl PromptSettings {
    /// Colors for `host`: the per-host entry, then the global values.
    pub fn colors_for(&self, host: Option<&str>) -> PromptArgs {
        let entry = host.and_then(|host| self.hosts.get(host));
        let pick = |from_host: Option<&String>, global: Option<&String>| {
            from_host
                .filter(|value| !value.is_empty())
                .or(global)
                .cloned()
        };

        PromptArgs {
            bgcolor: pick(
                entry.and_then(|e| e.bgcolor.as_ref()),
                self.bgcolor.as_ref(),
            ),
            hostcolor: pick(
                entry.and_then(|e| e.hostcolor.as_ref()),
                self.hostcolor.as_ref(),
            ),
        }
    }
}

/// Merges color sources, earlier ones winning: command line, environment
/// variables, settings.
pub fn resolve_colors<F>(cli: PromptArgs, lookup: F, configured: PromptArgs) -> PromptArgs
where
    F: Fn(&str) -> Option<String>,
{
    let from_env = |key: &str| lookup(key).filter(|value| !value.is_empty());

    PromptArgs {
        bgcolor: cli
            .bgcolor
            .or_else(|| from_env(BG_ENV_VAR))
            .or(configured.bgcolor),
        hostcolor: cli
            .hostcolor
            .or_else(|| from_env(HOST_ENV_VAR))
            .or(configured.hostcolor),
    }
}
