//! Session result history and its consumers.
//!
//! The history is append-only: entry `i` is the `i`-th successful calculation
//! of the session. Chart renderers and the CSV exporter only ever read it.

use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

use crate::compute::FloatValue;
use crate::errors::GhgResult;

/// Header row of the CSV export.
pub const CSV_HEADER: [&str; 2] = ["Calculation #", "Value (t CO2-eq)"];

/// Ordered, append-only sequence of computed results.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResultHistory {
    values: Vec<FloatValue>,
}

impl ResultHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only the dispatcher appends, after a fully successful computation.
    pub(crate) fn push(&mut self, value: FloatValue) {
        self.values.push(value);
    }

    pub fn values(&self) -> &[FloatValue] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn last(&self) -> Option<FloatValue> {
        self.values.last().copied()
    }

    /// Write the history as CSV: one header row, then one 1-indexed row per entry.
    pub fn write_csv<W: Write>(&self, mut writer: W) -> GhgResult<()> {
        writeln!(writer, "{}", CSV_HEADER.join(","))?;
        for (i, value) in self.values.iter().enumerate() {
            writeln!(writer, "{},{}", i + 1, value)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Export the history to a CSV file, replacing any existing file.
    pub fn export_csv(&self, path: impl AsRef<Path>) -> GhgResult<()> {
        let path = path.as_ref();
        let file = File::create(path)?;
        self.write_csv(BufWriter::new(file))?;
        info!(path = %path.display(), rows = self.len(), "Exported result history");
        Ok(())
    }
}

/// Receives the full history after every successful calculation.
///
/// This is the seam for chart renderers: the slice is a snapshot taken right
/// after the append and is never handed out on a failed calculation.
pub trait HistoryObserver: Send {
    fn history_changed(&mut self, values: &[FloatValue]);
}
