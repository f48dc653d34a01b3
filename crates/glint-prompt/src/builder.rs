use crate::color::{self, HexColor};
use crate::context::{PromptContext, PromptStyle};
use crate::escape;
use crate::template::{PromptTemplate, Segment, Style};

impl PromptTemplate {
    /// Builds the two line prompt:
    ///
    /// ```text
    /// [background]user@host ~/dir[vcs]
    /// [exit code ]%
    /// ```
    ///
    /// Invalid colors never fail the build; the affected fragment is left
    /// out instead.
    #[must_use]
    pub fn from_style(style: &PromptStyle) -> Self {
        let mut segments = Vec::new();

        if let Some(background) = background_sequence(style) {
            segments.push(Segment::Control(background));
        }

        let host_index = style
            .host_foreground_color
            .as_deref()
            .and_then(color::parse_rgb_digits);
        segments.push(Segment::styled(
            Style::Sgr(color::sgr_foreground(host_index)),
            vec![Segment::UserAtHost],
        ));
        segments.push(Segment::text(" "));
        segments.push(Segment::styled(
            Style::Bold,
            vec![Segment::styled(
                Style::Color(style.workdir_color),
                vec![Segment::WorkingDirectory],
            )],
        ));
        segments.push(Segment::Vcs);
        segments.push(Segment::Newline);

        segments.push(Segment::WhenFailed(vec![
            Segment::styled(Style::Color(style.error_color), vec![Segment::ExitCode]),
            Segment::text(" "),
        ]));
        segments.push(Segment::styled(Style::Bold, vec![Segment::Glyph]));
        segments.push(Segment::text(" "));

        Self {
            segments,
            vcs_info: style.vcs_info,
        }
    }
}

/// Background escape for remote sessions in a terminal that supports it.
///
/// Once any prompt has changed the background, every prompt must set it
/// again, so sessions without an override get black rather than nothing.
fn background_sequence(style: &PromptStyle) -> Option<String> {
    if !style.is_remote_session || !style.supports_background {
        return None;
    }

    let color = match style
        .background_override_color
        .as_deref()
        .filter(|raw| !raw.is_empty())
    {
        Some(raw) => HexColor::parse(raw)?,
        None => HexColor::fallback(),
    };

    Some(escape::wrap_if_multiplexed(
        escape::iterm_background(&color),
        style.is_multiplexed,
    ))
}

/// Builds and immediately renders the prompt for `context`.
#[must_use]
pub fn build_prompt(context: &PromptContext) -> String {
    PromptTemplate::from_style(&context.style).render(context)
}
