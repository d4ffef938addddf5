use anyhow::Result;
use crossterm::{
    style::{Attribute, SetAttribute},
    ExecutableCommand,
};
use inquire::ui::RenderConfig;
use inquire::Confirm;
use std::io::{self, IsTerminal, Write};

/// Width used when stdout is not a terminal.
pub const DEFAULT_WIDTH: usize = 160;

/// Terminal width, falling back to [`DEFAULT_WIDTH`] for pipes/non-TTY.
pub fn term_width() -> usize {
    if !io::stdout().is_terminal() {
        return DEFAULT_WIDTH;
    }
    crossterm::terminal::size()
        .map(|(w, _)| w as usize)
        .unwrap_or(DEFAULT_WIDTH)
}

/// Truncate a string to max_chars, adding ellipsis if needed.
/// Result will be at most max_chars characters (including ellipsis if truncated).
pub fn truncate(s: &str, max_chars: usize) -> String {
    if max_chars == 0 {
        return String::new();
    }

    let truncate_at = max_chars.saturating_sub(1); // Leave room for ellipsis
    let mut truncate_idx = 0;

    for (count, (idx, _)) in s.char_indices().enumerate() {
        if count == truncate_at {
            truncate_idx = idx;
        }
        if count + 1 > max_chars {
            // String exceeds max, truncate at truncate_at position
            return format!("{}…", &s[..truncate_idx]);
        }
    }

    s.to_string()
}

/// Print a line in reverse video when stdout is a terminal.
pub fn print_highlighted(line: &str) -> Result<()> {
    let mut stdout = io::stdout();
    if stdout.is_terminal() {
        stdout.execute(SetAttribute(Attribute::Reverse))?;
        write!(stdout, "{}", line)?;
        stdout.execute(SetAttribute(Attribute::Reset))?;
        writeln!(stdout)?;
    } else {
        writeln!(stdout, "> {}", line)?;
    }
    Ok(())
}

pub fn minimal_render_config() -> RenderConfig<'static> {
    RenderConfig::default_colored()
        .with_prompt_prefix(inquire::ui::Styled::new(""))
        .with_answered_prompt_prefix(inquire::ui::Styled::new(""))
}

/// Ask a yes/no question, defaulting to no. Anything other than an explicit
/// yes (including a closed stdin) counts as no.
pub fn confirm(prompt: &str) -> bool {
    Confirm::new(prompt)
        .with_render_config(minimal_render_config())
        .with_default(false)
        .prompt()
        .unwrap_or(false)
}

/// Print a status message to stdout
#[inline]
pub fn status(msg: &str) {
    println!("{}", msg);
}

/// Print a warning message to stderr
#[inline]
pub fn warning(msg: &str) {
    eprintln!("Warning: {}", msg);
}
