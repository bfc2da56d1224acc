//! Terminal palette
//!
//! Styles are keyed by what they paint in kinship output: record names,
//! SQL statements and their bound values, table names and status lines.

use owo_colors::{OwoColorize, Style};
use std::sync::OnceLock;

static THEME: OnceLock<Theme> = OnceLock::new();

#[derive(Debug, Clone)]
pub struct Theme {
    /// Section and command titles
    pub title: Style,
    pub ok: Style,
    pub failure: Style,
    pub caution: Style,
    /// Left-hand side of `label: value` lines
    pub label: Style,
    /// Separators and placeholder text
    pub faint: Style,
    /// Atom and compound names
    pub record: Style,
    /// Table names
    pub table: Style,
    /// Serialized SQL text
    pub statement: Style,
    /// Values bound to statement placeholders
    pub binding: Style,
}

impl Theme {
    /// Colored when stdout is a terminal and `CLICOLOR` allows it
    pub fn detect() -> Self {
        Self::new(console::colors_enabled())
    }

    pub fn new(colored: bool) -> Self {
        let pick = |style: Style| if colored { style } else { Style::new() };
        Self {
            title: pick(Style::new().bright_cyan().bold()),
            ok: pick(Style::new().green()),
            failure: pick(Style::new().bright_red().bold()),
            caution: pick(Style::new().yellow()),
            label: pick(Style::new().bright_black()),
            faint: pick(Style::new().dimmed()),
            record: pick(Style::new().bold()),
            table: pick(Style::new().cyan()),
            statement: pick(Style::new().bright_blue()),
            binding: pick(Style::new().magenta()),
        }
    }

    pub fn paint(&self, style: &Style, text: &str) -> String {
        text.style(style.clone()).to_string()
    }
}

pub fn theme() -> &'static Theme {
    THEME.get_or_init(Theme::detect)
}
