use std::collections::HashMap;
use std::time::Instant;

/// Per-tick events worth counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TickEvent {
    /// A frame went out to the classifier.
    Dispatched,
    /// The tick fired while a classification was still in flight.
    Skipped,
    /// A result arrived after the loop was stopped and was dropped.
    Discarded,
}

impl TickEvent {
    fn name(self) -> &'static str {
        match self {
            TickEvent::Dispatched => "dispatched",
            TickEvent::Skipped => "skipped",
            TickEvent::Discarded => "discarded",
        }
    }
}

/// Observer for capture loop behavior, so each shell can report it its own
/// way without touching the loop.
pub trait CaptureLogger: Send {
    /// Record how long a named stage (`capture`, `encode`, `classify`) took.
    fn timing(&mut self, stage: &str, duration_ms: f64);

    fn event(&mut self, event: TickEvent);

    /// Emit an end-of-run summary. Default: no-op.
    fn summary(&self) {}
}

/// Discards everything. Used by the desktop app and by tests.
pub struct NullCaptureLogger;

impl CaptureLogger for NullCaptureLogger {
    fn timing(&mut self, _stage: &str, _duration_ms: f64) {}
    fn event(&mut self, _event: TickEvent) {}
}

/// CLI logger: keeps stage timings and event counts for a closing summary.
pub struct StdoutCaptureLogger {
    timings: HashMap<String, Vec<f64>>,
    counts: HashMap<TickEvent, usize>,
    start_time: Instant,
}

impl StdoutCaptureLogger {
    pub fn new() -> Self {
        Self {
            timings: HashMap::new(),
            counts: HashMap::new(),
            start_time: Instant::now(),
        }
    }

    pub fn count(&self, event: TickEvent) -> usize {
        self.counts.get(&event).copied().unwrap_or(0)
    }

    pub fn timings_for(&self, stage: &str) -> Option<&[f64]> {
        self.timings.get(stage).map(|v| v.as_slice())
    }

    /// Returns the formatted summary, or `None` if nothing happened.
    pub fn summary_string(&self) -> Option<String> {
        if self.timings.is_empty() && self.counts.is_empty() {
            return None;
        }

        let elapsed_s = self.start_time.elapsed().as_secs_f64();
        let mut lines = vec![format!(
            "Capture summary ({} dispatched, {} skipped, {} discarded, {elapsed_s:.1}s total):",
            self.count(TickEvent::Dispatched),
            self.count(TickEvent::Skipped),
            self.count(TickEvent::Discarded),
        )];

        let mut stages: Vec<_> = self.timings.keys().collect();
        stages.sort();
        for stage in stages {
            let durations = &self.timings[stage];
            let total_ms: f64 = durations.iter().sum();
            let avg_ms = total_ms / durations.len().max(1) as f64;
            let max_ms = durations.iter().copied().fold(0.0, f64::max);
            lines.push(format!(
                "  {stage:10}: avg {avg_ms:7.1}ms  max {max_ms:7.1}ms  ({} samples)",
                durations.len()
            ));
        }

        Some(lines.join("\n"))
    }
}

impl Default for StdoutCaptureLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptureLogger for StdoutCaptureLogger {
    fn timing(&mut self, stage: &str, duration_ms: f64) {
        self.timings
            .entry(stage.to_string())
            .or_default()
            .push(duration_ms);
    }

    fn event(&mut self, event: TickEvent) {
        *self.counts.entry(event).or_default() += 1;
        log::debug!("Tick {}", event.name());
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n\n{text}");
        }
    }
}
