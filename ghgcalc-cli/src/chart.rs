//! Text bar chart of the result history.

use std::io::Write;

use ghgcalc_core::compute::FloatValue;
use ghgcalc_core::history::HistoryObserver;
use tracing::warn;

/// Redraws the whole history as horizontal bars after every calculation.
pub struct TextChart {
    width: usize,
    out: Box<dyn Write + Send>,
}

impl TextChart {
    pub fn new(width: usize, out: Box<dyn Write + Send>) -> Self {
        Self { width, out }
    }

    pub fn stdout(width: usize) -> Self {
        Self::new(width, Box::new(std::io::stdout()))
    }
}

impl HistoryObserver for TextChart {
    fn history_changed(&mut self, values: &[FloatValue]) {
        let chart = render(values, self.width);
        if let Err(e) = self.out.write_all(chart.as_bytes()).and_then(|_| self.out.flush()) {
            warn!(error = %e, "Could not draw the history chart");
        }
    }
}

/// One line per calculation, bar length proportional to the magnitude.
///
/// Negative values are drawn with `-`, the largest magnitude spans `width`.
pub fn render(values: &[FloatValue], width: usize) -> String {
    let max = values.iter().fold(0.0, |m: FloatValue, v| m.max(v.abs()));
    let digits = values.len().to_string().len();
    let mut out = String::new();
    for (i, value) in values.iter().enumerate() {
        let len = if max > 0.0 {
            (value.abs() / max * width as FloatValue).round() as usize
        } else {
            0
        };
        let mark = if *value < 0.0 { "-" } else { "#" };
        out.push_str(&format!(
            "{:>digits$} | {} {}\n",
            i + 1,
            mark.repeat(len),
            value
        ));
    }
    out
}
