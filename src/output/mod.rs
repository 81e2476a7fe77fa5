//! Output formatters for Aranet readings.
//!
//! Every family is handled by an exhaustive match, so a new device family
//! cannot be added without deciding how it is written out.

pub mod influxdb;

use crate::reading::Reading;

/// Trait for formatting readings into output lines.
pub trait OutputFormatter: Send + Sync {
    /// Format a reading as a single line, without the trailing newline.
    fn format(&self, reading: &Reading) -> String;
}
