/// One failed batch item.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BatchFailure {
    /// Asset name, file or directory the failure belongs to.
    pub item: String,
    /// Error message.
    pub message: String,
}

/// Aggregated outcome of a batch job. Items are listed in processing order.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BatchReport {
    /// Items completed.
    pub succeeded: Vec<String>,
    /// Items with nothing to produce (for example images without content).
    pub skipped: Vec<String>,
    /// Items that failed.
    pub failed: Vec<BatchFailure>,
}

impl BatchReport {
    /// Record a completed item.
    pub fn record_success(&mut self, item: impl Into<String>) {
        self.succeeded.push(item.into());
    }

    /// Record a skipped item.
    pub fn record_skip(&mut self, item: impl Into<String>) {
        self.skipped.push(item.into());
    }

    /// Record a failed item.
    pub fn record_failure(&mut self, item: impl Into<String>, message: impl Into<String>) {
        self.failed.push(BatchFailure {
            item: item.into(),
            message: message.into(),
        });
    }

    /// Append every entry of `other`.
    pub fn merge(&mut self, other: BatchReport) {
        self.succeeded.extend(other.succeeded);
        self.skipped.extend(other.skipped);
        self.failed.extend(other.failed);
    }

    /// Number of items seen.
    pub fn total(&self) -> usize {
        self.succeeded.len() + self.skipped.len() + self.failed.len()
    }

    /// Return `true` when nothing failed.
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

impl std::fmt::Display for BatchReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} succeeded, {} skipped, {} failed",
            self.succeeded.len(),
            self.skipped.len(),
            self.failed.len()
        )?;
        for failure in &self.failed {
            write!(f, "\n  {}: {}", failure.item, failure.message)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/batch/report.rs"]
mod tests;
