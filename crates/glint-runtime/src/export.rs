use std::fmt::Write as _;

/// An environment assignment for the calling shell to apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvExport {
    pub name: String,
    pub value: String,
}

impl EnvExport {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Quotes `value` for POSIX shells using single quotes.
#[must_use]
pub fn shell_quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('\'');
    for ch in value.chars() {
        if ch == '\'' {
            quoted.push_str("'\\''");
        } else {
            quoted.push(ch);
        }
    }
    quoted.push('\'');
    quoted
}

/// One `export NAME='value'` line per assignment.
#[must_use]
pub fn render_exports(exports: &[EnvExport]) -> String {
    let mut out = String::new();
    for export in exports {
        let _ = writeln!(out, "export {}={}", export.name, shell_quote(&export.value));
    }
    out
}
