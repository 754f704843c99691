//! Run Summary
//!
//! End-of-run accounting: how many units succeeded or failed, how long the
//! run took, and the first error detail per failure class. Rendered as
//! human-readable text for the terminal or as JSON for tooling.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Failure classes tracked by the summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureClass {
    /// Invalid run configuration.
    Config,
    /// A unit executor failed.
    Execution,
    /// Units disagreed on measure names or series lengths.
    Consistency,
    /// A result table could not be read or written.
    Io,
}

/// First error detail recorded for one failure class.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureDetail {
    /// The failure class.
    pub class: FailureClass,
    /// Human-readable detail of the first failure in this class.
    pub detail: String,
}

/// Overall run status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    /// Every unit succeeded and all outputs were written.
    Passed,
    /// At least one unit or output failed.
    Failed,
}

/// Accounting for one run or sweep.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// When the run finished.
    pub timestamp: DateTime<Utc>,
    /// Total units submitted.
    pub total_units: usize,
    /// Units that produced a sample.
    pub succeeded_units: usize,
    /// Units that failed (or were abandoned in a failed chunk).
    pub failed_units: usize,
    /// Wall-clock duration of the whole run, seconds.
    pub elapsed_seconds: f64,
    /// Average wall-clock execution time per unit, seconds (diagnostic).
    pub mean_unit_seconds: Option<f64>,
    /// First error detail per failure class, in occurrence order.
    pub failures: Vec<FailureDetail>,
}

impl RunSummary {
    /// Fresh summary for a run of `total_units` units.
    pub fn new(total_units: usize) -> RunSummary {
        RunSummary {
            timestamp: Utc::now(),
            total_units,
            succeeded_units: 0,
            failed_units: 0,
            elapsed_seconds: 0.0,
            mean_unit_seconds: None,
            failures: Vec::new(),
        }
    }

    /// Record a failure, keeping only the first detail per class.
    pub fn record_failure(&mut self, class: FailureClass, detail: impl Into<String>) {
        if !self.failures.iter().any(|f| f.class == class) {
            self.failures.push(FailureDetail {
                class,
                detail: detail.into(),
            });
        }
    }

    /// Overall status.
    pub fn status(&self) -> RunStatus {
        if self.failed_units == 0 && self.failures.is_empty() {
            RunStatus::Passed
        } else {
            RunStatus::Failed
        }
    }
}

/// Render a summary for terminal display.
pub fn format_human_summary(summary: &RunSummary) -> String {
    let mut output = String::new();

    output.push('\n');
    output.push_str("Dockstat Run Summary\n");
    output.push_str(&"=".repeat(60));
    output.push('\n');

    let status_icon = match summary.status() {
        RunStatus::Passed => "✓",
        RunStatus::Failed => "✗",
    };
    output.push_str(&format!(
        "  {} {} of {} units succeeded, {} failed\n",
        status_icon, summary.succeeded_units, summary.total_units, summary.failed_units
    ));
    output.push_str(&format!("  elapsed: {:.3} s\n", summary.elapsed_seconds));
    if let Some(mean) = summary.mean_unit_seconds {
        output.push_str(&format!("  mean per unit: {:.3} s\n", mean));
    }

    for failure in &summary.failures {
        let class = match failure.class {
            FailureClass::Config => "config",
            FailureClass::Execution => "execution",
            FailureClass::Consistency => "consistency",
            FailureClass::Io => "i/o",
        };
        output.push_str(&format!("  first {class} error: {}\n", failure.detail));
    }

    output
}

/// Serialize a summary as prettified JSON.
pub fn generate_json_summary(summary: &RunSummary) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(summary)
}
