//! Prompt templates and their renderers.
//!
//! A [`PromptTemplate`] records *what* a prompt shows. Values that are only
//! known when the prompt is drawn (exit status, working directory, branch)
//! stay placeholders until a renderer runs. [`PromptTemplate::render_zsh`]
//! defers them to zsh prompt expansion, [`PromptTemplate::render`] evaluates
//! them against a [`PromptContext`].

use std::path::Path;

use crate::color::NamedColor;
use crate::context::PromptContext;
use crate::escape::{self, SGR_RESET};

const ZSH_VCS_INFO: &str = "${vcs_info_msg_0_}";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Style {
    Bold,
    Color(NamedColor),
    /// Raw SGR parameters, e.g. `38;5;204`. Empty parameters style nothing.
    Sgr(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    /// Zero-width control sequence.
    Control(String),
    UserAtHost,
    WorkingDirectory,
    ExitCode,
    /// `#` for privileged users, `%` otherwise.
    Glyph,
    Vcs,
    Newline,
    Styled { style: Style, body: Vec<Segment> },
    /// Shown only when the previous command exited nonzero.
    WhenFailed(Vec<Segment>),
}

impl Segment {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    #[must_use]
    pub fn styled(style: Style, body: Vec<Segment>) -> Self {
        Self::Styled { style, body }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptTemplate {
    pub segments: Vec<Segment>,
    pub vcs_info: bool,
}

impl PromptTemplate {
    #[must_use]
    pub fn new(segments: Vec<Segment>) -> Self {
        Self {
            segments,
            vcs_info: false,
        }
    }

    /// Renders the template as a zsh `PROMPT` value.
    #[must_use]
    pub fn render_zsh(&self) -> String {
        let mut out = String::new();
        self.write_zsh(&self.segments, false, &mut out);
        out
    }

    fn write_zsh(&self, segments: &[Segment], in_conditional: bool, out: &mut String) {
        for segment in segments {
            match segment {
                Segment::Text(text) => push_zsh_literal(text, in_conditional, out),
                Segment::Control(seq) => push_zsh_zero_width(seq, out),
                Segment::UserAtHost => out.push_str("%n@%m"),
                Segment::WorkingDirectory => out.push_str("%~"),
                Segment::ExitCode => out.push_str("%?"),
                Segment::Glyph => out.push_str("%#"),
                Segment::Vcs => {
                    if self.vcs_info {
                        out.push_str(ZSH_VCS_INFO);
                    }
                }
                Segment::Newline => out.push('\n'),
                Segment::Styled { style, body } => match style {
                    Style::Bold => {
                        out.push_str("%B");
                        self.write_zsh(body, in_conditional, out);
                        out.push_str("%b");
                    }
                    Style::Color(color) => {
                        out.push_str("%F{");
                        out.push_str(color.zsh_name());
                        out.push('}');
                        self.write_zsh(body, in_conditional, out);
                        out.push_str("%f");
                    }
                    Style::Sgr(params) if params.is_empty() => {
                        self.write_zsh(body, in_conditional, out);
                    }
                    Style::Sgr(params) => {
                        push_zsh_zero_width(&escape::sgr(params), out);
                        self.write_zsh(body, in_conditional, out);
                        push_zsh_zero_width(SGR_RESET, out);
                    }
                },
                // %(0?.true.false) with tabs as separators, so '.' in the
                // branches needs no escaping.
                Segment::WhenFailed(body) => {
                    out.push_str("%(0?\t\t");
                    self.write_zsh(body, true, out);
                    out.push(')');
                }
            }
        }
    }

    /// Renders the template with every placeholder resolved from `context`.
    #[must_use]
    pub fn render(&self, context: &PromptContext) -> String {
        let mut out = String::new();
        write_ansi(&self.segments, context, &mut out);
        out
    }
}

fn push_zsh_literal(text: &str, in_conditional: bool, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '%' => out.push_str("%%"),
            ')' if in_conditional => out.push_str("%)"),
            _ => out.push(ch),
        }
    }
}

fn push_zsh_zero_width(seq: &str, out: &mut String) {
    out.push_str("%{");
    out.push_str(seq);
    out.push_str("%}");
}

fn write_ansi(segments: &[Segment], context: &PromptContext, out: &mut String) {
    for segment in segments {
        match segment {
            Segment::Text(text) | Segment::Control(text) => out.push_str(text),
            Segment::UserAtHost => out.push_str(&context.user_at_host),
            Segment::WorkingDirectory => out.push_str(&abbreviate_home(
                &context.working_directory,
                context.home_dir.as_deref(),
            )),
            Segment::ExitCode => out.push_str(&context.last_exit_code.to_string()),
            Segment::Glyph => out.push(if context.is_privileged { '#' } else { '%' }),
            Segment::Vcs => {
                if let Some(vcs) = &context.vcs_state {
                    out.push_str(" (");
                    out.push_str(&vcs.to_string());
                    out.push(')');
                }
            }
            Segment::Newline => out.push('\n'),
            Segment::Styled { style, body } => match style {
                Style::Bold => {
                    out.push_str(&escape::sgr("1"));
                    write_ansi(body, context, out);
                    out.push_str(&escape::sgr("22"));
                }
                Style::Color(color) => {
                    out.push_str(&escape::sgr(&color.sgr_code().to_string()));
                    write_ansi(body, context, out);
                    out.push_str(&escape::sgr("39"));
                }
                Style::Sgr(params) if params.is_empty() => write_ansi(body, context, out),
                Style::Sgr(params) => {
                    out.push_str(&escape::sgr(params));
                    write_ansi(body, context, out);
                    out.push_str(SGR_RESET);
                }
            },
            Segment::WhenFailed(body) => {
                if context.last_exit_code != 0 {
                    write_ansi(body, context, out);
                }
            }
        }
    }
}

/// Collapses the home directory prefix to `~`, as zsh does for `%~`.
#[must_use]
pub fn abbreviate_home(path: &Path, home: Option<&Path>) -> String {
    let Some(home) = home.filter(|home| !home.as_os_str().is_empty()) else {
        return path.display().to_string();
    };

    match path.strip_prefix(home) {
        Ok(rest) if rest.as_os_str().is_empty() => "~".to_string(),
        Ok(rest) => format!("~/{}", rest.display()),
        Err(_) => path.display().to_string(),
    }
}
