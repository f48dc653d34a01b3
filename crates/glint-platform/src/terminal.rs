use std::path::PathBuf;

/// Terminal and session signals read from the process environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TerminalEnv {
    /// `LC_TERMINAL` is `iTerm2`. Survives ssh when the client forwards `LC_*`.
    pub is_iterm: bool,
    /// `SSH_CONNECTION` is set and non-empty.
    pub is_ssh: bool,
    /// `TERM_PROGRAM` is `tmux`.
    pub is_tmux: bool,
    pub user: Option<String>,
    pub home: Option<PathBuf>,
}

impl TerminalEnv {
    #[must_use]
    pub fn detect() -> Self {
        let mut env = Self::from_lookup(|key| std::env::var(key).ok());
        env.home = dirs::home_dir();
        env
    }

    /// Build from an arbitrary variable lookup. `home` is left unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let is_iterm = lookup("LC_TERMINAL").is_some_and(|value| value == "iTerm2");
        let is_ssh = lookup("SSH_CONNECTION").is_some_and(|value| !value.is_empty());
        let is_tmux = lookup("TERM_PROGRAM").is_some_and(|value| value == "tmux");
        let user = lookup("USER")
            .filter(|value| !value.is_empty())
            .or_else(|| lookup("LOGNAME").filter(|value| !value.is_empty()));

        let env = Self {
            is_iterm,
            is_ssh,
            is_tmux,
            user,
            home: None,
        };
        log::debug!("Detected terminal environment: {env:?}");
        env
    }

    /// Whether the terminal understands the iTerm2 proprietary escapes.
    #[must_use]
    pub fn supports_background(&self) -> bool {
        self.is_iterm
    }
}

#[cfg(unix)]
#[must_use]
pub fn is_privileged() -> bool {
    nix::unistd::Uid::effective().is_root()
}

#[cfg(not(unix))]
#[must_use]
pub fn is_privileged() -> bool {
    false
}
