use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use crate::locate::is_executable;

/// An installed runtime directory that passed every eligibility check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionCandidate {
    pub directory_name: String,
    pub patch_level: u64,
    pub executable_path: PathBuf,
}

impl VersionCandidate {
    /// Checks one entry of `root`.
    ///
    /// `prefix` is the required `major.minor.` including the trailing dot.
    /// A name that does not parse and a missing executable are both just
    /// "not a candidate".
    #[must_use]
    pub fn probe(root: &Path, name: &str, prefix: &str, exe_relative_path: &Path) -> Option<Self> {
        if !name.starts_with(prefix) {
            return None;
        }

        let (_, patch) = name.rsplit_once('.')?;
        if patch.is_empty() || !patch.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let Ok(patch_level) = patch.parse() else {
            log::debug!("Skipping {name}: patch level out of range");
            return None;
        };

        let executable_path = root.join(name).join(exe_relative_path);
        if !is_executable(&executable_path) {
            log::debug!(
                "Skipping {name}: no executable at {}",
                executable_path.display()
            );
            return None;
        }

        Some(Self {
            directory_name: name.to_string(),
            patch_level,
            executable_path,
        })
    }
}

impl Ord for VersionCandidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.patch_level
            .cmp(&other.patch_level)
            .then_with(|| self.directory_name.cmp(&other.directory_name))
    }
}

impl PartialOrd for VersionCandidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use super::VersionCandidate;

    fn candidate(name: &str, patch_level: u64) -> VersionCandidate {
        VersionCandidate {
            directory_name: name.to_string(),
            patch_level,
            executable_path: PathBuf::from(name),
        }
    }

    #[test]
    fn ordering_is_numeric_not_lexical() {
        assert!(candidate("3.9.20", 20) > candidate("3.9.7", 7));
        assert!(candidate("3.9.12", 12) > candidate("3.9.7", 7));
    }

    #[test]
    fn equal_patch_levels_fall_back_to_name() {
        assert!(candidate("3.9.7", 7) > candidate("3.9.07", 7));
    }

    #[test]
    fn probe_rejects_other_prefixes_and_bad_patch_levels() {
        let root = Path::new("/nonexistent-runtime-root");
        let exe = Path::new("bin/python3");

        assert!(VersionCandidate::probe(root, "3.10.1", "3.1.", exe).is_none());
        assert!(VersionCandidate::probe(root, "3.9.0rc1", "3.9.", exe).is_none());
        assert!(VersionCandidate::probe(root, "3.9.", "3.9.", exe).is_none());
    }

    #[cfg(unix)]
    #[test]
    fn probe_accepts_only_plain_digit_patch_levels() {
        use std::os::unix::fs::PermissionsExt;

        let root = tempfile::tempdir().expect("temporary directory should be created");
        let exe = Path::new("bin/python3");
        for name in ["3.9.5", "3.9.+7", "3.9.99999999999999999999999", "3.9.-1"] {
            let path = root.path().join(name).join(exe);
            std::fs::create_dir_all(path.parent().expect("exe has a parent")).expect("create dirs");
            std::fs::write(&path, "#!/bin/sh\n").expect("write exe");
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
                .expect("set permissions");
        }

        assert!(VersionCandidate::probe(root.path(), "3.9.+7", "3.9.", exe).is_none());
        assert!(VersionCandidate::probe(root.path(), "3.9.-1", "3.9.", exe).is_none());
        assert!(
            VersionCandidate::probe(root.path(), "3.9.99999999999999999999999", "3.9.", exe)
                .is_none()
        );
        assert_eq!(
            VersionCandidate::probe(root.path(), "3.9.5", "3.9.", exe).map(|c| c.patch_level),
            Some(5)
        );
    }

    #[test]
    fn probe_requires_executable() {
        let root = Path::new("/nonexistent-runtime-root");

        assert!(VersionCandidate::probe(root, "3.9.1", "3.9.", Path::new("bin/python3")).is_none());
    }
}
