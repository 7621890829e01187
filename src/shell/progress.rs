//! Progress bar shown while an operation is "processing"
//!
//! Purely cosmetic: five steps of 20%, redrawn in place on one line.

use std::io::{self, Write};
use std::thread;
use std::time::Duration;

use crossterm::cursor::MoveToColumn;
use crossterm::queue;
use crossterm::style::Print;
use crossterm::terminal::{Clear, ClearType};

use crate::display::Palette;

const STEP_PERCENT: usize = 20;
const BAR_WIDTH: usize = 40;

/// Renders a single-line progress bar
#[derive(Debug, Clone, Copy)]
pub struct ProgressBar {
    step_delay: Duration,
}

impl ProgressBar {
    pub fn new(step_delay: Duration) -> Self {
        Self { step_delay }
    }

    /// Print `description`, animate the bar to 100% and print a completion line
    pub fn run<W: Write>(&self, out: &mut W, description: &str, palette: &Palette) -> io::Result<()> {
        writeln!(out, "{}", description)?;

        for percent in (0..=100).step_by(STEP_PERCENT) {
            queue!(
                out,
                MoveToColumn(0),
                Clear(ClearType::CurrentLine),
                Print(render(percent))
            )?;
            out.flush()?;

            if percent < 100 && !self.step_delay.is_zero() {
                thread::sleep(self.step_delay);
            }
        }

        writeln!(out)?;
        writeln!(out, "{}", palette.notice("Operation complete!"))?;
        writeln!(out)?;
        Ok(())
    }
}

fn render(percent: usize) -> String {
    let filled = BAR_WIDTH * percent / 100;
    format!(
        "{}{} {}% | {}/100",
        "█".repeat(filled),
        "░".repeat(BAR_WIDTH - filled),
        percent,
        percent
    )
}
