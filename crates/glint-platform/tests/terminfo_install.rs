#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use glint_platform::terminfo::{self, STOCK_TIC_VERSION};
use glint_platform::{InstallOptions, TerminfoError};

fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}")).expect("write script");
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
        .expect("set permissions");
    path
}

// One test per binary: spawning a script while another thread still holds it
// open for writing fails with ETXTBSY.
#[test]
fn install_patches_and_compiles_entry() {
    let bin = tempfile::tempdir().expect("temporary directory should be created");
    let out = tempfile::tempdir().expect("temporary directory should be created");

    let tic = write_script(
        bin.path(),
        "tic",
        "if [ \"$1\" = \"-V\" ]; then echo 'ncurses 5.7.20081102'; exit 0; fi\n\
         cp \"$4\" \"$3/compiled.src\"\n",
    );
    let infocmp = write_script(
        bin.path(),
        "infocmp",
        "if [ \"$1\" = \"-V\" ]; then echo 'ncurses 6.4.20230520'; exit 0; fi\n\
         printf 'tmux-256color|tmux with 256 colors,\\n\\tcolors#0x100, pairs#0x10000,\\n'\n",
    );

    let mut options = InstallOptions {
        entry: terminfo::DEFAULT_ENTRY.to_string(),
        tic,
        expected_tic_version: Some(STOCK_TIC_VERSION.to_string()),
        infocmp: Some(infocmp.clone()),
        out_dir: out.path().join("terminfo"),
    };

    let report = terminfo::install(&options).expect("install should succeed");

    assert!(report.patched);
    assert_eq!(report.tic_version, STOCK_TIC_VERSION);
    assert_eq!(report.infocmp.path, infocmp);
    assert_eq!(report.infocmp.version.as_str(), "6.4.20230520");
    let compiled = std::fs::read_to_string(options.out_dir.join("compiled.src"))
        .expect("stub tic should copy the source");
    assert_eq!(
        compiled,
        "tmux-256color|tmux with 256 colors,\n\tcolors#0x100, pairs#32767,\n"
    );

    options.expected_tic_version = Some("ncurses 6.0".to_string());
    assert!(matches!(
        terminfo::install(&options),
        Err(TerminfoError::UnexpectedTicVersion { .. })
    ));
}
