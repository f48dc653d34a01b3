//! Backports a terminfo entry from a newer ncurses to an older system `tic`.
//!
//! tmux built against a recent ncurses advertises `tmux-256color`, which the
//! stock macOS ncurses (5.7) does not ship. The entry is exported with the
//! newest `infocmp` a package manager provides, patched so that numbers the
//! old library stores as signed shorts do not wrap, and compiled into the
//! user terminfo directory with the stock `tic`.

use std::borrow::Cow;
use std::ffi::OsStr;
use std::num::IntErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::sync::LazyLock;

use regex::{Captures, Regex};
use thiserror::Error;

use crate::commands::HideWindow;

pub const DEFAULT_ENTRY: &str = "tmux-256color";
pub const STOCK_TIC: &str = "/usr/bin/tic";
pub const STOCK_TIC_VERSION: &str = "ncurses 5.7.20081102";

const NCURSES_PREFIX: &str = "ncurses ";
const NCURSES_PACKAGE: &str = "ncurses";
const INFOCMP_SUFFIX: &str = "/bin/infocmp";
const INFOCMP_FALLBACK: &str = "infocmp";

/// Largest value a signed short capability can hold.
pub const SHORT_MAX: u64 = 32767;

static PAIRS_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bpairs#(?:0[Xx][0-9A-Fa-f]+|0[0-7]+|[1-9][0-9]*)")
        .expect("pairs capability pattern should compile")
});

#[derive(Debug, Error)]
pub enum TerminfoError {
    #[error("Could not run {} -V", path.display())]
    TicUnavailable { path: PathBuf },

    #[error("{} reports {found:?}, expected {expected:?}", path.display())]
    UnexpectedTicVersion {
        path: PathBuf,
        expected: String,
        found: String,
    },

    #[error("No usable infocmp found")]
    InfocmpNotFound,

    #[error("infocmp could not export {entry}")]
    ExportFailed { entry: String },

    #[error("tic failed: {status}")]
    CompileFailed { status: ExitStatus },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Clamps one `name#number` capability to [`SHORT_MAX`].
///
/// The number is read the way terminfo source writes it: `0x` hex, a leading
/// `0` for octal, decimal otherwise. Anything that does not parse is left as
/// it is.
#[must_use]
pub fn clamp_number(capability: &str) -> Cow<'_, str> {
    let Some((name, digits)) = capability.split_once('#') else {
        return Cow::Borrowed(capability);
    };

    let parsed = if let Some(hex) = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        u64::from_str_radix(hex, 16)
    } else if digits.starts_with('0') {
        u64::from_str_radix(digits, 8)
    } else {
        digits.parse()
    };

    let too_large = match parsed {
        Ok(value) => value > SHORT_MAX,
        Err(error) => *error.kind() == IntErrorKind::PosOverflow,
    };

    if too_large {
        Cow::Owned(format!("{name}#{SHORT_MAX}"))
    } else {
        Cow::Borrowed(capability)
    }
}

/// Clamps every `pairs#` value in terminfo source.
#[must_use]
pub fn patch_shorts(source: &str) -> Cow<'_, str> {
    PAIRS_NUMBER.replace_all(source, |caps: &Captures| clamp_number(&caps[0]).into_owned())
}

/// Whether `dir` is one of the entries of a `TERMINFO_DIRS` style list.
#[must_use]
pub fn dir_in_path(dir: &Path, path_list: Option<&OsStr>) -> bool {
    path_list.is_some_and(|list| std::env::split_paths(list).any(|entry| entry == dir))
}

#[must_use]
pub fn user_terminfo_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".local").join("share").join("terminfo"))
}

/// An ncurses version string such as `ncurses 6.4.20230520`, ordered by its
/// dotted numbers.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct NcursesVersion {
    key: Vec<u64>,
    raw: String,
}

impl NcursesVersion {
    /// Parses `-V` output. `None` for anything that is not ncurses or has a
    /// non-numeric component.
    #[must_use]
    pub fn parse(output: &str) -> Option<Self> {
        let raw = output.trim_end().strip_prefix(NCURSES_PREFIX)?;
        let key = raw
            .split('.')
            .map(|part| part.parse().ok())
            .collect::<Option<Vec<u64>>>()?;

        Some(Self {
            key,
            raw: raw.to_string(),
        })
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfocmpCandidate {
    pub path: PathBuf,
    pub version: NcursesVersion,
}

/// The newest candidate. On equal versions the earlier one wins.
#[must_use]
pub fn best_infocmp<I>(candidates: I) -> Option<InfocmpCandidate>
where
    I: IntoIterator<Item = InfocmpCandidate>,
{
    candidates.into_iter().reduce(|best, candidate| {
        if candidate.version > best.version {
            candidate
        } else {
            best
        }
    })
}

/// Files listed by `port contents`, which exits successfully even for ports
/// that are not installed; only the header tells them apart.
#[must_use]
pub fn parse_macports_contents(report: &str, package: &str) -> Vec<PathBuf> {
    let expected_header = format!("Port {package} contains:");
    let mut lines = report.lines();

    match lines.next() {
        Some(header) if header == expected_header => lines
            .filter_map(|line| line.strip_prefix("  "))
            .map(PathBuf::from)
            .collect(),
        _ => Vec::new(),
    }
}

/// Keeps the `.../bin/infocmp` entries of package listings, or falls back to
/// whatever `infocmp` is on `PATH`.
#[must_use]
pub fn infocmp_paths<I>(package_files: I) -> Vec<PathBuf>
where
    I: IntoIterator<Item = PathBuf>,
{
    let found: Vec<PathBuf> = package_files
        .into_iter()
        .filter(|file| file.to_string_lossy().ends_with(INFOCMP_SUFFIX))
        .collect();

    if found.is_empty() {
        vec![PathBuf::from(INFOCMP_FALLBACK)]
    } else {
        found
    }
}

fn capture(cmd: &mut Command) -> Option<String> {
    let output = cmd
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

fn macports_files(package: &str) -> Vec<PathBuf> {
    capture(Command::new("port").args(["contents", package]))
        .map(|report| parse_macports_contents(&report, package))
        .unwrap_or_default()
}

fn homebrew_files(package: &str) -> Vec<PathBuf> {
    capture(
        Command::new("brew")
            .args(["ls", "--verbose", package])
            .env_remove("HOMEBREW_COLOR")
            .env("HOMEBREW_NO_COLOR", "1"),
    )
    .map(|report| report.lines().map(PathBuf::from).collect())
    .unwrap_or_default()
}

fn probe_infocmp(path: PathBuf) -> Option<InfocmpCandidate> {
    let output = capture(Command::new(&path).arg("-V"))?;
    let Some(version) = NcursesVersion::parse(&output) else {
        log::debug!("Skipping {}: unrecognised version {output:?}", path.display());
        return None;
    };

    log::debug!("Found {} {}", path.display(), version.as_str());
    Some(InfocmpCandidate { path, version })
}

/// Looks for `infocmp` in the MacPorts and Homebrew ncurses packages and
/// picks the newest one that runs.
#[must_use]
pub fn find_infocmp() -> Option<InfocmpCandidate> {
    let mut files = macports_files(NCURSES_PACKAGE);
    files.extend(homebrew_files(NCURSES_PACKAGE));

    best_infocmp(infocmp_paths(files).into_iter().filter_map(probe_infocmp))
}

#[derive(Debug, Clone)]
pub struct InstallOptions {
    pub entry: String,
    pub tic: PathBuf,
    /// `-V` output the `tic` must report; `None` accepts any version.
    pub expected_tic_version: Option<String>,
    /// Use this `infocmp` instead of searching package managers.
    pub infocmp: Option<PathBuf>,
    pub out_dir: PathBuf,
}

#[derive(Debug, Clone)]
pub struct InstallReport {
    pub infocmp: InfocmpCandidate,
    pub tic_version: String,
    pub out_dir: PathBuf,
    /// Whether any capability had to be clamped.
    pub patched: bool,
    pub in_terminfo_dirs: bool,
}

/// Exports, patches and recompiles `options.entry`. Running it again simply
/// rewrites the same compiled entry.
///
/// # Errors
/// Returns an error when `tic` is missing or has an unexpected version, no
/// `infocmp` works, the export fails, or `tic` rejects the patched source.
pub fn install(options: &InstallOptions) -> Result<InstallReport, TerminfoError> {
    let tic_version = capture(Command::new(&options.tic).arg("-V"))
        .map(|output| output.trim_end().to_string())
        .ok_or_else(|| TerminfoError::TicUnavailable {
            path: options.tic.clone(),
        })?;

    if let Some(expected) = &options.expected_tic_version
        && *expected != tic_version
    {
        return Err(TerminfoError::UnexpectedTicVersion {
            path: options.tic.clone(),
            expected: expected.clone(),
            found: tic_version,
        });
    }

    let infocmp = match &options.infocmp {
        Some(path) => probe_infocmp(path.clone()),
        None => find_infocmp(),
    }
    .ok_or(TerminfoError::InfocmpNotFound)?;
    log::info!(
        "Selected {} {}",
        infocmp.path.display(),
        infocmp.version.as_str()
    );

    let mut export = Command::new(&infocmp.path);
    export.arg("-x").arg(&options.entry);
    let source = capture(&mut export).ok_or_else(|| TerminfoError::ExportFailed {
        entry: options.entry.clone(),
    })?;

    let patched_source = patch_shorts(&source);
    let patched = patched_source != source;
    if !patched {
        log::warn!("No capability of {} needed clamping", options.entry);
    }

    std::fs::create_dir_all(&options.out_dir)?;
    let work_dir = tempfile::tempdir()?;
    let source_file = work_dir.path().join(format!("{}.src", options.entry));
    std::fs::write(&source_file, patched_source.as_bytes())?;

    let status = Command::new(&options.tic)
        .args(["-x", "-o"])
        .arg(&options.out_dir)
        .arg(&source_file)
        .stdin(Stdio::null())
        .hide_window()
        .status()?;
    if !status.success() {
        return Err(TerminfoError::CompileFailed { status });
    }

    let terminfo_dirs = std::env::var_os("TERMINFO_DIRS");
    Ok(InstallReport {
        infocmp,
        tic_version,
        in_terminfo_dirs: dir_in_path(&options.out_dir, terminfo_dirs.as_deref()),
        out_dir: options.out_dir.clone(),
        patched,
    })
}

#[cfg(test)]
mod tests {
    use std::ffi::OsString;
    use std::path::{Path, PathBuf};

    use super::*;

    fn candidate(path: &str, version: &str) -> InfocmpCandidate {
        InfocmpCandidate {
            path: PathBuf::from(path),
            version: NcursesVersion::parse(version).expect("valid version"),
        }
    }

    #[test]
    fn clamp_reads_hex_octal_and_decimal() {
        assert_eq!(clamp_number("pairs#0x10000"), "pairs#32767");
        assert_eq!(clamp_number("pairs#0X10000"), "pairs#32767");
        assert_eq!(clamp_number("pairs#0200000"), "pairs#32767");
        assert_eq!(clamp_number("pairs#65536"), "pairs#32767");
    }

    #[test]
    fn clamp_keeps_values_that_fit() {
        assert_eq!(clamp_number("pairs#32767"), "pairs#32767");
        assert_eq!(clamp_number("pairs#0x7fff"), "pairs#0x7fff");
        assert_eq!(clamp_number("pairs#077777"), "pairs#077777");
        assert!(matches!(clamp_number("pairs#256"), Cow::Borrowed("pairs#256")));
    }

    #[test]
    fn clamp_leaves_unparseable_input_alone() {
        assert_eq!(clamp_number("pairs"), "pairs");
        assert_eq!(clamp_number("pairs#0x"), "pairs#0x");
        assert_eq!(clamp_number("pairs#09"), "pairs#09");
        assert_eq!(clamp_number("pairs#-70000"), "pairs#-70000");
    }

    #[test]
    fn clamp_treats_overflowing_numbers_as_too_large() {
        assert_eq!(clamp_number("pairs#99999999999999999999999"), "pairs#32767");
    }

    #[test]
    fn patch_only_touches_pairs() {
        let source = "tmux-256color|tmux with 256 colors,\n\
                      \tcolors#0x100, pairs#0x10000, cols#80,\n\
                      \tmaxpairs#0x10000,\n";

        let patched = patch_shorts(source);

        assert_eq!(
            patched,
            "tmux-256color|tmux with 256 colors,\n\
             \tcolors#0x100, pairs#32767, cols#80,\n\
             \tmaxpairs#0x10000,\n"
        );
    }

    #[test]
    fn patch_without_large_pairs_changes_nothing() {
        let source = "xterm-256color|xterm,\n\tcolors#256, pairs#32767,\n";

        assert_eq!(patch_shorts(source), source);
    }

    #[test]
    fn ncurses_versions_compare_numerically() {
        let older = NcursesVersion::parse("ncurses 6.2.20200212\n").expect("valid version");
        let newer = NcursesVersion::parse("ncurses 6.10.20240101").expect("valid version");

        assert!(newer > older);
        assert_eq!(older.as_str(), "6.2.20200212");
        assert!(NcursesVersion::parse("ncurses 6.4-beta").is_none());
        assert!(NcursesVersion::parse("netbsd-curses 0.3.2").is_none());
    }

    #[test]
    fn best_infocmp_picks_newest_and_keeps_first_on_ties() {
        let best = best_infocmp([
            candidate("/opt/local/bin/infocmp", "ncurses 6.2.20200212"),
            candidate("/opt/homebrew/opt/ncurses/bin/infocmp", "ncurses 6.4.20230520"),
            candidate("/usr/local/opt/ncurses/bin/infocmp", "ncurses 6.4.20230520"),
        ])
        .expect("a candidate");

        assert_eq!(best.path, Path::new("/opt/homebrew/opt/ncurses/bin/infocmp"));
        assert!(best_infocmp(Vec::new()).is_none());
    }

    #[test]
    fn macports_listing_requires_header() {
        let report = "Port ncurses contains:\n  /opt/local/bin/infocmp\n  /opt/local/bin/tic\n";

        assert_eq!(
            parse_macports_contents(report, "ncurses"),
            vec![
                PathBuf::from("/opt/local/bin/infocmp"),
                PathBuf::from("/opt/local/bin/tic")
            ]
        );
        assert!(parse_macports_contents("Port ncurses is not installed.\n", "ncurses").is_empty());
    }

    #[test]
    fn infocmp_paths_filter_and_fall_back() {
        let files = vec![
            PathBuf::from("/opt/local/bin/infocmp"),
            PathBuf::from("/opt/local/bin/tic"),
            PathBuf::from("/opt/local/share/man/man1/infocmp.1.gz"),
        ];

        assert_eq!(
            infocmp_paths(files),
            vec![PathBuf::from("/opt/local/bin/infocmp")]
        );
        assert_eq!(infocmp_paths(Vec::new()), vec![PathBuf::from("infocmp")]);
    }

    #[test]
    fn terminfo_dirs_membership() {
        let dir = Path::new("/home/ada/.local/share/terminfo");
        let list = std::env::join_paths(["/usr/share/terminfo", "/home/ada/.local/share/terminfo"])
            .expect("paths should join");

        assert!(dir_in_path(dir, Some(list.as_os_str())));
        assert!(!dir_in_path(dir, Some(OsString::from("/usr/share/terminfo").as_os_str())));
        assert!(!dir_in_path(dir, None));
    }

    #[test]
    fn missing_tic_is_reported() {
        let out_dir = tempfile::tempdir().expect("temporary directory should be created");
        let options = InstallOptions {
            entry: DEFAULT_ENTRY.to_string(),
            tic: out_dir.path().join("no-such-tic"),
            expected_tic_version: Some(STOCK_TIC_VERSION.to_string()),
            infocmp: None,
            out_dir: out_dir.path().to_path_buf(),
        };

        assert!(matches!(
            install(&options),
            Err(TerminfoError::TicUnavailable { .. })
        ));
    }
}
