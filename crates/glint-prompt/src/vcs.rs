//! Git state for the evaluated prompt.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use glint_platform::HideWindow;

use crate::context::VcsState;

/// Markers git leaves in its directory while an operation is paused, checked
/// in order.
const ACTION_MARKERS: &[(&str, &str)] = &[
    ("rebase-merge", "rebase"),
    ("rebase-apply", "rebase"),
    ("MERGE_HEAD", "merge"),
    ("CHERRY_PICK_HEAD", "cherry-pick"),
    ("REVERT_HEAD", "revert"),
    ("BISECT_LOG", "bisect"),
];

/// Reads the git state of `dir`. Anything going wrong, including git not
/// being installed, means "no state".
#[must_use]
pub fn probe(dir: &Path) -> Option<VcsState> {
    let git = which::which("git").ok()?;

    let status = run_git(&git, dir, &["status", "--porcelain=v2", "--branch"])?;
    let mut state = parse_porcelain(&status)?;

    if let Some(git_dir) = run_git(&git, dir, &["rev-parse", "--git-dir"]) {
        let git_dir = PathBuf::from(git_dir.trim());
        state.conflict_action = conflict_action(&dir.join(git_dir)).map(str::to_string);
    }

    log::debug!("Git state for {}: {state:?}", dir.display());
    Some(state)
}

fn run_git(git: &Path, dir: &Path, args: &[&str]) -> Option<String> {
    let output = Command::new(git)
        .args(args)
        .current_dir(dir)
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .hide_window()
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }
    String::from_utf8(output.stdout).ok()
}

/// Parses `git status --porcelain=v2 --branch` output. `None` when the
/// branch header is missing.
#[must_use]
pub fn parse_porcelain(output: &str) -> Option<VcsState> {
    let mut branch = None;
    let mut dirty = false;

    for line in output.lines() {
        if let Some(header) = line.strip_prefix("# ") {
            if let Some(head) = header.strip_prefix("branch.head ") {
                branch = Some(head.trim().to_string());
            }
        } else if !line.is_empty() {
            dirty = true;
        }
    }

    Some(VcsState {
        branch: branch?,
        dirty,
        conflict_action: None,
    })
}

#[must_use]
pub fn conflict_action(git_dir: &Path) -> Option<&'static str> {
    ACTION_MARKERS
        .iter()
        .find(|(marker, _)| git_dir.join(marker).exists())
        .map(|(_, action)| *action)
}
