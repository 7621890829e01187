//! Terminal colours
//!
//! Wraps crossterm styling so colour can be switched off in one place.

use crossterm::style::{style, StyledContent, Stylize};

/// Colour scheme for terminal output; a disabled palette returns text as-is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    enabled: bool,
}

impl Palette {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn plain() -> Self {
        Self::new(false)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Successful outcomes and balances
    pub fn success(&self, text: &str) -> String {
        self.apply(text, |s| s.green())
    }

    /// Rejections and failures
    pub fn error(&self, text: &str) -> String {
        self.apply(text, |s| s.red())
    }

    /// Questions asked of the user
    pub fn prompt(&self, text: &str) -> String {
        self.apply(text, |s| s.yellow())
    }

    /// Informational lines and deposited amounts
    pub fn info(&self, text: &str) -> String {
        self.apply(text, |s| s.blue())
    }

    pub fn notice(&self, text: &str) -> String {
        self.apply(text, |s| s.cyan())
    }

    pub fn farewell(&self, text: &str) -> String {
        self.apply(text, |s| s.magenta().bold())
    }

    pub fn banner(&self, text: &str) -> String {
        self.apply(text, |s| s.bold().white().on_blue())
    }

    fn apply(
        &self,
        text: &str,
        paint: impl FnOnce(StyledContent<&str>) -> StyledContent<&str>,
    ) -> String {
        if self.enabled {
            paint(style(text)).to_string()
        } else {
            text.to_string()
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::new(true)
    }
}
