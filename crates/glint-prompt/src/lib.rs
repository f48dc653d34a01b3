#![allow(clippy::module_name_repetitions)]

mod args;
mod builder;
mod context;
mod template;

pub mod color;
pub mod escape;
pub mod vcs;

pub use args::PromptArgs;
pub use builder::build_prompt;
pub use color::{HexColor, NamedColor};
pub use context::{PromptContext, PromptStyle, VcsState};
pub use template::{PromptTemplate, Segment, Style, abbreviate_home};
