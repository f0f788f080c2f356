//! Styling helpers for terminal output.
//!
//! The [`GameStyle`] trait provides a set of convenience methods for applying
//! ANSI styling via the `colored` crate. Implementations for `&str` and
//! `String` are provided so string literals can be styled directly.

use colored::{ColoredString, Colorize};

/// Convenience trait for applying color and style to text output.
pub trait GameStyle {
    fn narration_style(&self) -> ColoredString;
    fn title_style(&self) -> ColoredString;
    fn prompt_style(&self) -> ColoredString;
    fn hint_style(&self) -> ColoredString;
    fn error_style(&self) -> ColoredString;
    fn farewell_style(&self) -> ColoredString;
}

impl GameStyle for &str {
    fn narration_style(&self) -> ColoredString {
        self.truecolor(102, 208, 250)
    }
    fn title_style(&self) -> ColoredString {
        self.truecolor(223, 77, 10).bold().underline()
    }
    fn prompt_style(&self) -> ColoredString {
        self.truecolor(75, 180, 255).bold()
    }
    fn hint_style(&self) -> ColoredString {
        self.italic().truecolor(110, 220, 110)
    }
    fn error_style(&self) -> ColoredString {
        self.truecolor(230, 30, 30)
    }
    fn farewell_style(&self) -> ColoredString {
        self.italic().truecolor(220, 180, 40)
    }
}

impl GameStyle for String {
    fn narration_style(&self) -> ColoredString {
        self.as_str().narration_style()
    }
    fn title_style(&self) -> ColoredString {
        self.as_str().title_style()
    }
    fn prompt_style(&self) -> ColoredString {
        self.as_str().prompt_style()
    }
    fn hint_style(&self) -> ColoredString {
        self.as_str().hint_style()
    }
    fn error_style(&self) -> ColoredString {
        self.as_str().error_style()
    }
    fn farewell_style(&self) -> ColoredString {
        self.as_str().farewell_style()
    }
}
