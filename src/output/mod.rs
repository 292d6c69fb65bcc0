pub mod json;
pub mod table;

use std::io::IsTerminal;

use crate::cli::OutputFlags;

pub use table::TableOptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Pretty,
    Markdown,
    Json,
}

pub fn select_format(flags: &OutputFlags) -> OutputFormat {
    if flags.json {
        return OutputFormat::Json;
    }
    if flags.markdown {
        return OutputFormat::Markdown;
    }
    if flags.pretty {
        return OutputFormat::Pretty;
    }

    if std::io::stdout().is_terminal() {
        OutputFormat::Pretty
    } else {
        OutputFormat::Markdown
    }
}
