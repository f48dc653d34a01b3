/// Color preferences passed as `key=value` words, e.g.
/// `glint prompt bgcolor=$GLINT_PROMPT_BG hostcolor=$GLINT_PROMPT_HOST`.
///
/// Shell variables that are unset expand to an empty value, which counts as
/// "not given".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptArgs {
    pub bgcolor: Option<String>,
    pub hostcolor: Option<String>,
}

impl PromptArgs {
    /// Bad words, unknown keys and repeated keys are skipped with a warning;
    /// the first non-empty value of a key wins.
    pub fn parse<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut args = Self::default();

        for word in words {
            let word = word.as_ref();
            let Some((key, value)) = word.split_once('=').filter(|(key, _)| !key.is_empty())
            else {
                log::warn!("Ignoring bad parameter {word:?}");
                continue;
            };

            let slot = match key {
                "bgcolor" => &mut args.bgcolor,
                "hostcolor" => &mut args.hostcolor,
                _ => {
                    log::warn!("Ignoring unknown parameter {key:?}");
                    continue;
                }
            };

            if slot.is_some() {
                log::warn!("Duplicate parameter {key:?}");
            } else if !value.is_empty() {
                *slot = Some(value.to_string());
            }
        }

        args
    }
}
