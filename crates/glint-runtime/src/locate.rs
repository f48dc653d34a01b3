use std::path::{Path, PathBuf};

use crate::candidate::VersionCandidate;

/// All eligible installs of `major_minor` under `root`, in directory order.
///
/// A missing or unreadable `root` yields no candidates.
#[must_use]
pub fn scan_candidates(
    root: &Path,
    major_minor: &str,
    exe_relative_path: &Path,
) -> Vec<VersionCandidate> {
    let entries = match std::fs::read_dir(root) {
        Ok(entries) => entries,
        Err(error) => {
            log::debug!("Cannot scan {}: {error}", root.display());
            return Vec::new();
        }
    };

    let prefix = format!("{major_minor}.");

    entries
        .filter_map(Result::ok)
        .filter_map(|entry| {
            let name = entry.file_name().into_string().ok()?;
            VersionCandidate::probe(root, &name, &prefix, exe_relative_path)
        })
        .collect()
}

#[must_use]
pub fn best_candidate(
    root: &Path,
    major_minor: &str,
    exe_relative_path: &Path,
) -> Option<VersionCandidate> {
    scan_candidates(root, major_minor, exe_relative_path)
        .into_iter()
        .max()
}

/// Executable of the highest patch release of `major_minor` installed under
/// `root`, e.g. `root/3.9.20/bin/python3` for `"3.9"` and `bin/python3`.
#[must_use]
pub fn find_best_version(
    root: &Path,
    major_minor: &str,
    exe_relative_path: &Path,
) -> Option<PathBuf> {
    let best = best_candidate(root, major_minor, exe_relative_path)?;
    log::debug!(
        "Selected {} for {major_minor} under {}",
        best.directory_name,
        root.display()
    );
    Some(best.executable_path)
}

#[cfg(unix)]
#[must_use]
pub fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    std::fs::metadata(path)
        .is_ok_and(|metadata| metadata.is_file() && metadata.permissions().mode() & 0o111 != 0)
}

#[cfg(not(unix))]
#[must_use]
pub fn is_executable(path: &Path) -> bool {
    path.is_file()
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    #[cfg(unix)]
    fn install(root: &Path, version: &str, exe: &str, mode: u32) {
        use std::os::unix::fs::PermissionsExt;

        let path = root.join(version).join(exe);
        std::fs::create_dir_all(path.parent().expect("exe has a parent")).expect("create dirs");
        std::fs::write(&path, "#!/bin/sh\n").expect("write exe");
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(mode))
            .expect("set permissions");
    }

    #[cfg(unix)]
    #[test]
    fn non_executable_file_is_not_executable() {
        let root = tempfile::tempdir().expect("temporary directory should be created");
        install(root.path(), "3.9.1", "bin/python3", 0o644);

        assert!(!is_executable(&root.path().join("3.9.1/bin/python3")));
        assert!(best_candidate(root.path(), "3.9", Path::new("bin/python3")).is_none());
    }

    #[cfg(unix)]
    #[test]
    fn directories_are_not_executables() {
        let root = tempfile::tempdir().expect("temporary directory should be created");
        std::fs::create_dir_all(root.path().join("3.9.1/bin/python3")).expect("create dir");

        assert!(!is_executable(&root.path().join("3.9.1/bin/python3")));
    }

    #[cfg(unix)]
    #[test]
    fn scan_skips_unrelated_entries() {
        let root = tempfile::tempdir().expect("temporary directory should be created");
        install(root.path(), "3.9.4", "bin/python3", 0o755);
        install(root.path(), "3.10.2", "bin/python3", 0o755);
        install(root.path(), "3.9-dev", "bin/python3", 0o755);
        std::fs::write(root.path().join("3.9.9"), "not a directory").expect("write file");

        let candidates = scan_candidates(root.path(), "3.9", Path::new("bin/python3"));

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].directory_name, "3.9.4");
        assert_eq!(candidates[0].patch_level, 4);
    }

    #[test]
    fn missing_root_yields_nothing() {
        let root = tempfile::tempdir().expect("temporary directory should be created");
        let absent = root.path().join("absent");
        let exe = Path::new("bin/python3");

        assert!(scan_candidates(&absent, "3.9", exe).is_empty());
        assert!(find_best_version(&absent, "3.9", exe).is_none());
    }
}
