mod cli;
mod commands;
mod error;
mod logging;
mod settings;

use std::io::Write as _;
use std::process::ExitCode;

use clap::Parser;

use crate::cli::{Cli, Commands};
use crate::commands::Outcome;
use crate::error::AppError;
use crate::settings::AppSettings;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let (settings, load_error) = match AppSettings::load() {
        Ok(settings) => (settings, None),
        Err(error) => (AppSettings::default(), Some(error)),
    };
    logging::init_logging(
        cli.debug || settings.debug_logging,
        settings.max_log_size_bytes,
    );
    if let Some(error) = load_error {
        log::warn!("Using default settings: {error}");
    }

    match run(cli.command, &settings) {
        Ok((Outcome::Done, output)) => {
            print_output(&output);
            ExitCode::SUCCESS
        }
        Ok((Outcome::NotFound, _)) => ExitCode::from(1),
        Err(error) => {
            log::error!("{error}");
            eprintln!("glint: {error}");
            ExitCode::from(2)
        }
    }
}

fn run(command: Commands, settings: &AppSettings) -> Result<(Outcome, String), AppError> {
    let output = match command {
        Commands::Prompt {
            assignments,
            colors,
            vcs_info,
        } => commands::prompt(settings, &assignments, colors, vcs_info),
        Commands::Render {
            exit_code,
            cwd,
            no_vcs,
            colors,
        } => commands::render(settings, exit_code, cwd, no_vcs, colors)?,
        Commands::Locate {
            series,
            root,
            exe,
            preset,
            env,
        } => return Ok(commands::locate(&series, root, exe, preset, env)),
        Commands::Env => commands::env(settings),
        Commands::Init { shell } => commands::init(settings, shell),
        Commands::Config { action } => commands::config(&action, settings)?,
        Commands::Terminfo {
            entry,
            tic,
            any_tic_version,
            infocmp,
            out_dir,
        } => commands::terminfo(entry, tic, any_tic_version, infocmp, out_dir)?,
    };
    Ok((Outcome::Done, output))
}

fn print_output(output: &str) {
    let mut stdout = std::io::stdout().lock();
    // A closed pipe is the reader's choice, not an error worth reporting.
    let _ = stdout.write_all(output.as_bytes());
    let _ = stdout.flush();
}
