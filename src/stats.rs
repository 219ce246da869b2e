//! Execution-time statistics for generation runs.

use std::fs;
use std::io;
use std::time::Duration;

/// Collects per-iteration wall-clock timings and derives summary statistics
/// for external aggregation.
#[derive(Default)]
pub struct RunStatistics {
    durations: Vec<Duration>,
}

/// Summary of one batch of runs, in milliseconds (variance in ms^2).
#[derive(Clone, Copy, Debug)]
pub struct TimingSummary {
    pub iterations: usize,
    pub max_ms: f64,
    pub mean_ms: f64,
    pub min_ms: f64,
    pub variance_ms: f64,
    pub std_dev_ms: f64,
}

impl RunStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, duration: Duration) {
        self.durations.push(duration);
    }

    pub fn is_empty(&self) -> bool {
        self.durations.is_empty()
    }

    /// Compute the summary over all recorded runs. None if nothing was
    /// recorded.
    pub fn summary(&self) -> Option<TimingSummary> {
        if self.durations.is_empty() {
            return None;
        }

        let millis: Vec<f64> = self
            .durations
            .iter()
            .map(|d| d.as_secs_f64() * 1000.0)
            .collect();

        let max_ms = millis.iter().cloned().fold(f64::MIN, f64::max);
        let min_ms = millis.iter().cloned().fold(f64::MAX, f64::min);
        let mean_ms = mean(&millis);
        let variance_ms = variance(&millis, mean_ms);

        Some(TimingSummary {
            iterations: millis.len(),
            max_ms,
            mean_ms,
            min_ms,
            variance_ms,
            std_dev_ms: variance_ms.sqrt(),
        })
    }

    /// Write the statistics file: a header row plus one summary row, values
    /// rounded to five decimal places.
    pub fn write_csv(&self, path: &str) -> io::Result<()> {
        let mut contents = String::from("Iteration,Max,Mean,Min,Variance,Std Deviation\n");
        if let Some(summary) = self.summary() {
            contents.push_str(&format!(
                "{},{:.5},{:.5},{:.5},{:.5},{:.5}\n",
                summary.iterations,
                summary.max_ms,
                summary.mean_ms,
                summary.min_ms,
                summary.variance_ms,
                summary.std_dev_ms,
            ));
        }
        fs::write(path, contents)
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn variance(values: &[f64], mean: f64) -> f64 {
    values
        .iter()
        .map(|v| {
            let diff = v - mean;
            diff * diff
        })
        .sum::<f64>()
        / values.len() as f64
}
