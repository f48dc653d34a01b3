use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use glint_platform::terminfo::{self, STOCK_TIC_VERSION};
use glint_platform::{
    AppPaths, AppPathsError, InstallOptions, InstallReport, TerminalEnv, is_privileged,
};
use glint_prompt::{PromptArgs, PromptContext, PromptStyle, PromptTemplate, build_prompt, vcs};
use glint_runtime::{EnvExport, RuntimeSpec, find_best_version, render_exports, shell_quote};

use crate::cli::{ColorArgs, ConfigAction, InitShell, Preset};
use crate::error::AppError;
use crate::settings::{AppSettings, resolve_colors};

/// What a command wants the process to report back to the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Done,
    /// Nothing matched; the caller keeps its environment as it is.
    NotFound,
}

pub fn prompt(
    settings: &AppSettings,
    assignments: &[String],
    colors: ColorArgs,
    vcs_info: bool,
) -> String {
    let mut cli = PromptArgs::parse(assignments);
    cli.bgcolor = colors.bg.or(cli.bgcolor);
    cli.hostcolor = colors.host.or(cli.hostcolor);

    let env = TerminalEnv::detect();
    let mut style = prompt_style(settings, &env, cli);
    style.vcs_info |= vcs_info;

    PromptTemplate::from_style(&style).render_zsh()
}

pub fn render(
    settings: &AppSettings,
    exit_code: i32,
    cwd: Option<PathBuf>,
    no_vcs: bool,
    colors: ColorArgs,
) -> Result<String, AppError> {
    let working_directory = match cwd {
        Some(dir) => dir,
        None => std::env::current_dir().map_err(AppError::CurrentDir)?,
    };

    let cli = PromptArgs {
        bgcolor: colors.bg,
        hostcolor: colors.host,
    };
    let env = TerminalEnv::detect();
    let style = prompt_style(settings, &env, cli);

    let user = env.user.clone().unwrap_or_else(|| "?".to_string());
    let host = short_hostname().unwrap_or_else(|| "localhost".to_string());
    let vcs_state = if no_vcs {
        None
    } else {
        vcs::probe(&working_directory)
    };

    let context = PromptContext {
        style,
        working_directory,
        user_at_host: format!("{user}@{host}"),
        last_exit_code: exit_code,
        vcs_state,
        is_privileged: is_privileged(),
        home_dir: env.home,
    };

    Ok(build_prompt(&context))
}

pub fn locate(
    series: &str,
    root: Option<PathBuf>,
    exe: Option<PathBuf>,
    preset: Option<Preset>,
    env_var: Option<String>,
) -> (Outcome, String) {
    let found = match (preset, root, exe) {
        (Some(preset), _, _) => {
            RuntimeSpec::preset(preset.name(), series).and_then(|spec| spec.locate())
        }
        (None, Some(root), Some(exe)) => find_best_version(&root, series, &exe),
        _ => None,
    };

    let Some(path) = found else {
        return (Outcome::NotFound, String::new());
    };

    let output = match env_var {
        Some(name) => render_exports(&[EnvExport::new(name, path.to_string_lossy())]),
        None => format!("{}\n", path.display()),
    };
    (Outcome::Done, output)
}

pub fn env(settings: &AppSettings) -> String {
    let exports: Vec<EnvExport> = settings
        .runtimes
        .iter()
        .filter_map(RuntimeSpec::export)
        .collect();
    render_exports(&exports)
}

pub fn init(settings: &AppSettings, shell: InitShell) -> String {
    match shell {
        InitShell::Zsh => init_zsh(settings),
    }
}

fn init_zsh(settings: &AppSettings) -> String {
    let mut out = String::from("# glint\n");

    if settings.prompt.vcs_info {
        out.push_str(
            "autoload -Uz vcs_info\n\
             setopt prompt_subst\n\
             zstyle ':vcs_info:*' check-for-changes true\n\
             zstyle ':vcs_info:*' unstagedstr '*'\n\
             zstyle ':vcs_info:*' formats ' (%b%u)'\n\
             zstyle ':vcs_info:*' actionformats ' (%b%u|%a)'\n\
             precmd_functions+=(vcs_info)\n",
        );
    }

    let template = prompt(settings, &[], ColorArgs::default(), false);
    let _ = writeln!(out, "PROMPT={}", shell_quote(&template));
    out.push_str(&env(settings));
    out
}

pub fn config(action: &ConfigAction, settings: &AppSettings) -> Result<String, AppError> {
    let path = AppPaths::new()?.settings_file();
    match action {
        ConfigAction::Path => Ok(format!("{}\n", path.display())),
        ConfigAction::Show => Ok(format!("{}\n", serde_json::to_string_pretty(settings)?)),
        ConfigAction::Init => init_settings_file(&path),
    }
}

fn init_settings_file(path: &Path) -> Result<String, AppError> {
    if path.exists() {
        return Ok(format!("Settings already exist at {}\n", path.display()));
    }

    AppSettings::default().save_to(path)?;
    log::info!("Wrote default settings to {}", path.display());
    Ok(format!("Wrote {}\n", path.display()))
}

pub fn terminfo(
    entry: String,
    tic: PathBuf,
    any_tic_version: bool,
    infocmp: Option<PathBuf>,
    out_dir: Option<PathBuf>,
) -> Result<String, AppError> {
    let out_dir = match out_dir {
        Some(dir) => dir,
        None => terminfo::user_terminfo_dir().ok_or(AppPathsError::HomeDirUnavailable)?,
    };

    let options = InstallOptions {
        entry,
        tic,
        expected_tic_version: (!any_tic_version).then(|| STOCK_TIC_VERSION.to_string()),
        infocmp,
        out_dir,
    };
    let report = terminfo::install(&options)?;
    Ok(describe_install(&options, &report))
}

fn describe_install(options: &InstallOptions, report: &InstallReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Exported {} with {} ({})",
        options.entry,
        report.infocmp.path.display(),
        report.infocmp.version.as_str()
    );
    if !report.patched {
        out.push_str("Warning: no capability needed clamping\n");
    }
    let _ = writeln!(
        out,
        "Compiled into {} with {} ({})",
        report.out_dir.display(),
        options.tic.display(),
        report.tic_version
    );

    if !report.in_terminfo_dirs {
        let _ = writeln!(
            out,
            "\n{} is not in TERMINFO_DIRS. Add this line to your shell startup file \
             and start a new shell:\n",
            report.out_dir.display()
        );
        let _ = writeln!(
            out,
            "export TERMINFO_DIRS=\"$TERMINFO_DIRS\":{}",
            shell_quote(&report.out_dir.to_string_lossy())
        );
    }
    out
}

fn prompt_style(settings: &AppSettings, env: &TerminalEnv, cli: PromptArgs) -> PromptStyle {
    let host = short_hostname();
    let configured = settings.prompt.colors_for(host.as_deref());
    let colors = resolve_colors(cli, |key| std::env::var(key).ok(), configured);

    PromptStyle {
        is_remote_session: env.is_ssh,
        supports_background: env.supports_background(),
        is_multiplexed: env.is_tmux,
        background_override_color: colors.bgcolor,
        host_foreground_color: colors.hostcolor,
        workdir_color: settings.prompt.workdir_color,
        error_color: settings.prompt.error_color,
        vcs_info: settings.prompt.vcs_info,
    }
}

/// Host name up to the first dot, as zsh shows it for `%m`.
fn short_hostname() -> Option<String> {
    let name = hostname::get().ok()?;
    let name = name.to_string_lossy();
    name.split('.')
        .next()
        .filter(|short| !short.is_empty())
        .map(str::to_string)
}
