use crate::logging::{LogEvent, LogFields, LogLevel};
use serde_json::json;
use std::time::Duration;

/// Counters gathered while compiling one grid.
#[derive(Debug, Default, Clone)]
pub struct CompileMetrics {
    labels: u64,
    splits: u64,
    leaves: u64,
    blanks: u64,
    cuts_examined: u64,
    max_depth: u64,
}

impl CompileMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_labels(&mut self, count: usize) {
        self.labels = count as u64;
    }

    pub fn record_split(&mut self, depth: usize) {
        self.splits = self.splits.saturating_add(1);
        self.max_depth = self.max_depth.max(depth as u64);
    }

    pub fn record_leaf(&mut self, depth: usize) {
        self.leaves = self.leaves.saturating_add(1);
        self.max_depth = self.max_depth.max(depth as u64);
    }

    pub fn record_blank(&mut self) {
        self.blanks = self.blanks.saturating_add(1);
    }

    pub fn record_cuts_examined(&mut self, count: usize) {
        self.cuts_examined = self.cuts_examined.saturating_add(count as u64);
    }

    pub fn snapshot(&self, elapsed: Duration) -> MetricSnapshot {
        MetricSnapshot {
            elapsed_us: elapsed.as_micros() as u64,
            labels: self.labels,
            splits: self.splits,
            leaves: self.leaves,
            blanks: self.blanks,
            cuts_examined: self.cuts_examined,
            max_depth: self.max_depth,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricSnapshot {
    pub elapsed_us: u64,
    pub labels: u64,
    pub splits: u64,
    pub leaves: u64,
    pub blanks: u64,
    pub cuts_examined: u64,
    pub max_depth: u64,
}

impl MetricSnapshot {
    pub fn to_log_event(&self, target: &str) -> LogEvent {
        LogEvent::with_fields(LogLevel::Info, target, "compile_metrics", self.as_fields())
    }

    pub fn as_fields(&self) -> LogFields {
        let mut map = LogFields::new();
        map.insert("elapsed_us".to_string(), json!(self.elapsed_us));
        map.insert("labels".to_string(), json!(self.labels));
        map.insert("splits".to_string(), json!(self.splits));
        map.insert("leaves".to_string(), json!(self.leaves));
        map.insert("blanks".to_string(), json!(self.blanks));
        map.insert("cuts_examined".to_string(), json!(self.cuts_examined));
        map.insert("max_depth".to_string(), json!(self.max_depth));
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_tracks_depth_and_counts() {
        let mut metrics = CompileMetrics::new();
        metrics.record_labels(3);
        metrics.record_split(0);
        metrics.record_split(1);
        metrics.record_leaf(2);
        metrics.record_leaf(1);
        metrics.record_cuts_examined(4);

        let snapshot = metrics.snapshot(Duration::from_micros(7));
        assert_eq!(snapshot.splits, 2);
        assert_eq!(snapshot.leaves, 2);
        assert_eq!(snapshot.max_depth, 2);
        assert_eq!(snapshot.cuts_examined, 4);

        let event = snapshot.to_log_event("ascii_layout::compile");
        assert_eq!(event.message, "compile_metrics");
        assert_eq!(event.fields["labels"], json!(3));
    }
}
