/*!
 * Freightyard CLI Style System
 *
 * Toned messages and key-value tables for terminal output. Results go to
 * stdout; warnings and errors go to stderr.
 */

use comfy_table::{presets, Attribute, Cell, Color, ContentArrangement, Table};
use console::{style, StyledObject};
use std::fmt::Display;

/// Message tone, each with its own color and icon
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Info,
    Success,
    Warning,
    Error,
    Muted,
}

impl Tone {
    pub fn icon(self) -> &'static str {
        match self {
            Tone::Info => "ℹ",
            Tone::Success => "✓",
            Tone::Warning => "⚠",
            Tone::Error => "✗",
            Tone::Muted => "→",
        }
    }

    /// Apply this tone's color to `text`
    pub fn paint<D: Display>(self, text: D) -> StyledObject<D> {
        let styled = style(text);
        match self {
            Tone::Info => styled.cyan(),
            Tone::Success => styled.green(),
            Tone::Warning => styled.yellow(),
            Tone::Error => styled.red().bold(),
            Tone::Muted => styled.dim(),
        }
    }

    fn line(self, message: &str) -> String {
        match self {
            Tone::Info => format!("{} {}", self.paint(self.icon()), message),
            _ => format!("{} {}", self.paint(self.icon()), self.paint(message)),
        }
    }
}

/// Two-column table of labels and values, without outer borders
pub fn details_table(items: &[(&str, String)]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_NO_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic);

    for (label, value) in items {
        table.add_row(vec![
            Cell::new(label).fg(Color::Cyan),
            Cell::new(value).add_attribute(Attribute::Bold),
        ]);
    }
    table
}

/// Print an error to stderr, with an optional hint on the next line
pub fn print_error(message: &str, hint: Option<&str>) {
    eprintln!("{} {}", Tone::Error.paint(format!("{} error:", Tone::Error.icon())), message);
    if let Some(hint) = hint {
        eprintln!("  {}", Tone::Muted.line(hint));
    }
}

pub fn print_warning(message: &str) {
    eprintln!("{}", Tone::Warning.line(message));
}

pub fn print_success(message: &str) {
    println!("{}", Tone::Success.line(message));
}

pub fn print_info(message: &str) {
    println!("{}", Tone::Info.line(message));
}
