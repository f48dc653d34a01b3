mod candidate;
mod export;
mod locate;
mod preset;

pub use candidate::VersionCandidate;
pub use export::{EnvExport, render_exports, shell_quote};
pub use locate::{best_candidate, find_best_version, is_executable, scan_candidates};
pub use preset::{RuntimeSpec, detect_fnm_dir};
