use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use glint_platform::terminfo::{DEFAULT_ENTRY, STOCK_TIC};

#[derive(Parser, Debug)]
#[command(name = "glint", version)]
#[command(about = "Shell prompt builder and installed-runtime locator")]
pub struct Cli {
    /// Write debug logs to the glint log file
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print a zsh PROMPT template
    Prompt {
        /// Color preferences as bgcolor=HEX or hostcolor=RGB
        #[arg(value_name = "KEY=VALUE")]
        assignments: Vec<String>,

        #[command(flatten)]
        colors: ColorArgs,

        /// Include zsh vcs_info output after the working directory.
        ///
        /// The template then expands `${vcs_info_msg_0_}`, which needs
        /// `setopt prompt_subst` and `vcs_info` in `precmd_functions`;
        /// `glint init zsh` sets both up.
        #[arg(long)]
        vcs_info: bool,
    },

    /// Print the prompt with every value filled in
    Render {
        /// Exit status of the previous command
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        exit_code: i32,

        /// Directory to show instead of the current one
        #[arg(long)]
        cwd: Option<PathBuf>,

        /// Skip the git status probe
        #[arg(long)]
        no_vcs: bool,

        #[command(flatten)]
        colors: ColorArgs,
    },

    /// Print the executable of the newest installed patch release
    Locate {
        /// Required version prefix, e.g. 3.12
        #[arg(value_name = "MAJOR.MINOR")]
        series: String,

        /// Directory containing one subdirectory per installed version
        #[arg(long, required_unless_present = "preset")]
        root: Option<PathBuf>,

        /// Executable path relative to a version directory
        #[arg(long, required_unless_present = "preset")]
        exe: Option<PathBuf>,

        /// Use a built-in layout instead of --root and --exe
        #[arg(long, value_enum, conflicts_with_all = ["root", "exe"])]
        preset: Option<Preset>,

        /// Print an export statement for this variable instead of the bare path
        #[arg(long, value_name = "NAME")]
        env: Option<String>,
    },

    /// Print export statements for the runtimes configured in settings
    Env,

    /// Print shell initialization code
    Init {
        #[arg(value_enum)]
        shell: InitShell,
    },

    /// Inspect or create the settings file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Compile a newer ncurses terminfo entry for the system tic
    Terminfo {
        /// Entry to export and recompile
        #[arg(default_value = DEFAULT_ENTRY)]
        entry: String,

        /// The tic to compile with
        #[arg(long, default_value = STOCK_TIC)]
        tic: PathBuf,

        /// Accept a tic of any version instead of the stock macOS one
        #[arg(long)]
        any_tic_version: bool,

        /// Export with this infocmp instead of searching MacPorts and Homebrew
        #[arg(long)]
        infocmp: Option<PathBuf>,

        /// Output directory [default: ~/.local/share/terminfo]
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
}

#[derive(Args, Debug, Default)]
pub struct ColorArgs {
    /// Background color for ssh sessions (3 or 6 hex digits)
    #[arg(long, value_name = "HEX")]
    pub bg: Option<String>,

    /// Host name color as three digits 0-5
    #[arg(long, value_name = "RGB")]
    pub host: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the settings file location
    Path,
    /// Print the effective settings
    Show,
    /// Write a default settings file if none exists
    Init,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Preset {
    Python,
    Node,
}

impl Preset {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Python => "python",
            Self::Node => "node",
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum InitShell {
    Zsh,
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use super::{Cli, Commands, Preset};

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn prompt_accepts_assignments_and_flags() {
        let cli = Cli::try_parse_from(["glint", "prompt", "bgcolor=203", "--host", "512"])
            .expect("prompt arguments should parse");

        let Commands::Prompt {
            assignments,
            colors,
            vcs_info,
        } = cli.command
        else {
            panic!("expected prompt command");
        };
        assert_eq!(assignments, vec!["bgcolor=203".to_string()]);
        assert_eq!(colors.host.as_deref(), Some("512"));
        assert!(!vcs_info);
    }

    #[test]
    fn vcs_info_help_mentions_prompt_subst() {
        let command = Cli::command();
        let prompt = command
            .find_subcommand("prompt")
            .expect("prompt subcommand should exist");
        let flag = prompt
            .get_arguments()
            .find(|arg| arg.get_id() == "vcs_info")
            .expect("vcs_info flag should exist");

        let help = flag
            .get_long_help()
            .map(ToString::to_string)
            .unwrap_or_default();
        assert!(help.contains("prompt_subst"));
    }

    #[test]
    fn locate_requires_root_and_exe_without_preset() {
        assert!(Cli::try_parse_from(["glint", "locate", "3.9"]).is_err());
        assert!(Cli::try_parse_from(["glint", "locate", "3.9", "--root", "/opt/py"]).is_err());
        assert!(
            Cli::try_parse_from(["glint", "locate", "3.9", "--root", "/r", "--exe", "bin/x"])
                .is_ok()
        );
    }

    #[test]
    fn locate_preset_conflicts_with_explicit_layout() {
        let cli = Cli::try_parse_from(["glint", "locate", "3.12", "--preset", "python"])
            .expect("preset alone should parse");
        assert!(matches!(
            cli.command,
            Commands::Locate {
                preset: Some(Preset::Python),
                ..
            }
        ));

        assert!(
            Cli::try_parse_from(["glint", "locate", "3.12", "--preset", "python", "--root", "/r"])
                .is_err()
        );
    }

    #[test]
    fn terminfo_defaults_to_tmux_entry_and_stock_tic() {
        let cli = Cli::try_parse_from(["glint", "terminfo"]).expect("terminfo should parse");

        let Commands::Terminfo {
            entry,
            tic,
            any_tic_version,
            infocmp,
            out_dir,
        } = cli.command
        else {
            panic!("expected terminfo command");
        };
        assert_eq!(entry, "tmux-256color");
        assert_eq!(tic, std::path::PathBuf::from("/usr/bin/tic"));
        assert!(!any_tic_version);
        assert!(infocmp.is_none());
        assert!(out_dir.is_none());
    }

    #[test]
    fn render_accepts_negative_exit_codes() {
        let cli = Cli::try_parse_from(["glint", "render", "--exit-code", "-1", "--no-vcs"])
            .expect("render arguments should parse");

        assert!(matches!(
            cli.command,
            Commands::Render {
                exit_code: -1,
                no_vcs: true,
                ..
            }
        ));
    }
}
