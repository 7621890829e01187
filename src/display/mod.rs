//! Display formatting for terminal output
//!
//! Provides utilities for formatting ledger results for terminal display,
//! including colours and the transcript layout.

pub mod account;
pub mod style;

pub use account::Formatter;
pub use style::Palette;
