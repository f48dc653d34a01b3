use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::export::EnvExport;
use crate::locate::find_best_version;

/// Where one runtime is installed and what to export once it is found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeSpec {
    pub name: String,
    /// Directory holding one subdirectory per installed version. A leading
    /// `~` is expanded to the home directory.
    pub root: PathBuf,
    /// Required `major.minor` prefix, e.g. `3.12`.
    pub version: String,
    /// Executable path relative to a version directory.
    pub executable: PathBuf,
    #[serde(default)]
    pub env_var: Option<String>,
}

impl RuntimeSpec {
    /// Built-in layouts, by name.
    #[must_use]
    pub fn preset(name: &str, version: &str) -> Option<Self> {
        match name {
            "python" => Some(Self::python(version)),
            "node" => detect_fnm_dir().map(|fnm_dir| Self::node(&fnm_dir, version)),
            _ => None,
        }
    }

    /// pyenv: `~/.pyenv/versions/3.12.4/bin/python3`.
    #[must_use]
    pub fn python(version: &str) -> Self {
        Self {
            name: "python".to_string(),
            root: PathBuf::from("~/.pyenv/versions"),
            version: version.to_string(),
            executable: PathBuf::from("bin").join("python3"),
            env_var: Some("PIPX_DEFAULT_PYTHON".to_string()),
        }
    }

    /// fnm: `<fnm dir>/node-versions/v20.11.1/installation/bin/node`.
    #[must_use]
    pub fn node(fnm_dir: &Path, version: &str) -> Self {
        let version = if version.starts_with('v') {
            version.to_string()
        } else {
            format!("v{version}")
        };

        Self {
            name: "node".to_string(),
            root: fnm_dir.join("node-versions"),
            version,
            executable: PathBuf::from("installation").join("bin").join("node"),
            env_var: None,
        }
    }

    /// `root` with `~` expanded. `None` when it refers to the home
    /// directory and that cannot be determined.
    #[must_use]
    pub fn resolved_root(&self) -> Option<PathBuf> {
        expand_home(&self.root, dirs::home_dir().as_deref())
    }

    #[must_use]
    pub fn locate(&self) -> Option<PathBuf> {
        let root = self.resolved_root()?;
        let found = find_best_version(&root, &self.version, &self.executable);
        if found.is_none() {
            log::debug!("No {} {} found under {}", self.name, self.version, root.display());
        }
        found
    }

    /// The assignment for this runtime, if it has a variable and is installed.
    #[must_use]
    pub fn export(&self) -> Option<EnvExport> {
        let env_var = self.env_var.as_deref()?;
        let path = self.locate()?;
        Some(EnvExport::new(env_var, path.to_string_lossy()))
    }
}

fn expand_home(path: &Path, home: Option<&Path>) -> Option<PathBuf> {
    match path.strip_prefix("~") {
        Ok(rest) => home.map(|home| home.join(rest)),
        Err(_) => Some(path.to_path_buf()),
    }
}

/// fnm's data directory: `FNM_DIR` if it exists, otherwise the first
/// conventional location that has installed versions, otherwise the first
/// one that exists at all.
#[must_use]
pub fn detect_fnm_dir() -> Option<PathBuf> {
    let env_dir = std::env::var("FNM_DIR").ok().map(PathBuf::from);
    select_fnm_dir(env_dir, fnm_dir_candidates())
}

fn select_fnm_dir(env_dir: Option<PathBuf>, candidates: Vec<PathBuf>) -> Option<PathBuf> {
    if let Some(path) = env_dir.filter(|path| path.exists()) {
        return Some(path);
    }

    candidates
        .iter()
        .find(|candidate| candidate.join("node-versions").exists())
        .cloned()
        .or_else(|| candidates.into_iter().find(|candidate| candidate.exists()))
}

fn fnm_dir_candidates() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Ok(xdg_data) = std::env::var("XDG_DATA_HOME") {
        paths.push(PathBuf::from(xdg_data).join("fnm"));
    }

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".local").join("share").join("fnm"));
        paths.push(home.join(".fnm"));
    }

    if let Some(data_dir) = dirs::data_local_dir() {
        paths.push(data_dir.join("fnm"));
    }

    paths
}
