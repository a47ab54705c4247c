use std::collections::HashMap;
use std::time::Instant;

/// Observer for overlay session events.
///
/// Keeps the session loop free of output concerns; the CLI logs through the
/// `log` facade while tests use [`NullSessionLogger`].
pub trait SessionLogger {
    /// Called once per processed frame with the running frame count.
    fn progress(&mut self, frames: usize);

    /// Record how long a named stage took for one frame.
    fn timing(&mut self, stage: &str, duration_ms: f64);

    /// Record a per-frame metric such as the number of faces.
    fn metric(&mut self, name: &str, value: f64);

    fn info(&mut self, message: &str);

    /// Emit an end-of-session summary. Default: no-op.
    fn summary(&self) {}
}

/// Discards all events.
pub struct NullSessionLogger;

impl SessionLogger for NullSessionLogger {
    fn progress(&mut self, _frames: usize) {}
    fn timing(&mut self, _stage: &str, _duration_ms: f64) {}
    fn metric(&mut self, _name: &str, _value: f64) {}
    fn info(&mut self, _message: &str) {}
}

/// Accumulates stage timings and metrics and reports through `log`.
///
/// Progress lines are throttled to one every `throttle_frames` frames.
pub struct LogSessionLogger {
    throttle_frames: usize,
    timings: HashMap<String, Vec<f64>>,
    metrics: HashMap<String, Vec<f64>>,
    start_time: Instant,
    frames: usize,
}

impl LogSessionLogger {
    pub fn new(throttle_frames: usize) -> Self {
        Self {
            throttle_frames: throttle_frames.max(1),
            timings: HashMap::new(),
            metrics: HashMap::new(),
            start_time: Instant::now(),
            frames: 0,
        }
    }

    /// Returns the formatted summary, or `None` if nothing was recorded.
    pub fn summary_string(&self) -> Option<String> {
        if self.timings.is_empty() && self.metrics.is_empty() {
            return None;
        }

        let elapsed_ms = self.start_time.elapsed().as_secs_f64() * 1000.0;
        let frames = self.frames;
        let mut lines = vec![format!(
            "Session summary ({frames} frames, {:.1}s):",
            elapsed_ms / 1000.0
        )];

        let mut stages: Vec<_> = self.timings.keys().collect();
        stages.sort();
        for stage in stages {
            let durations = &self.timings[stage];
            let total_ms: f64 = durations.iter().sum();
            let avg_ms = mean(durations);
            lines.push(format!(
                "  {stage:10}: avg {avg_ms:6.1}ms  total {total_ms:7.0}ms"
            ));
        }

        let mut names: Vec<_> = self.metrics.keys().collect();
        names.sort();
        for name in names {
            lines.push(format!("  {name}: avg {:.1}", mean(&self.metrics[name])));
        }

        if frames > 0 && elapsed_ms > 0.0 {
            let fps = frames as f64 / (elapsed_ms / 1000.0);
            lines.push(format!("  Throughput: {fps:.1} fps"));
        }

        Some(lines.join("\n"))
    }

    pub fn timings_for(&self, stage: &str) -> Option<&[f64]> {
        self.timings.get(stage).map(|v| v.as_slice())
    }

    pub fn metrics_for(&self, name: &str) -> Option<&[f64]> {
        self.metrics.get(name).map(|v| v.as_slice())
    }
}

impl Default for LogSessionLogger {
    fn default() -> Self {
        Self::new(100)
    }
}

impl SessionLogger for LogSessionLogger {
    fn progress(&mut self, frames: usize) {
        self.frames = frames;
        if frames % self.throttle_frames == 0 {
            log::info!("Processed {frames} frames");
        }
    }

    fn timing(&mut self, stage: &str, duration_ms: f64) {
        self.timings
            .entry(stage.to_string())
            .or_default()
            .push(duration_ms);
    }

    fn metric(&mut self, name: &str, value: f64) {
        self.metrics
            .entry(name.to_string())
            .or_default()
            .push(value);
    }

    fn info(&mut self, message: &str) {
        log::info!("{message}");
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n\n{text}");
        }
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_null_logger_is_noop() {
        let mut logger = NullSessionLogger;
        logger.progress(1);
        logger.timing("detect", 5.0);
        logger.metric("faces", 2.0);
        logger.info("hello");
        logger.summary();
    }

    #[test]
    fn test_timing_records_values() {
        let mut logger = LogSessionLogger::new(10);
        logger.timing("detect", 20.0);
        logger.timing("detect", 30.0);
        logger.timing("composite", 5.0);

        assert_eq!(logger.timings_for("detect").unwrap(), &[20.0, 30.0]);
        assert_eq!(logger.timings_for("composite").unwrap().len(), 1);
        assert!(logger.timings_for("display").is_none());
    }

    #[test]
    fn test_metric_average_in_summary() {
        let mut logger = LogSessionLogger::new(10);
        logger.progress(2);
        logger.metric("faces", 1.0);
        logger.metric("faces", 2.0);

        assert_relative_eq!(mean(logger.metrics_for("faces").unwrap()), 1.5);
        let summary = logger.summary_string().unwrap();
        assert!(summary.contains("faces: avg 1.5"));
        assert!(summary.contains("Session summary (2 frames"));
    }

    #[test]
    fn test_summary_lists_stages_and_throughput() {
        let mut logger = LogSessionLogger::new(10);
        for frame in 1..=5 {
            logger.progress(frame);
            logger.timing("capture", 3.0);
            logger.timing("display", 1.0);
        }
        let summary = logger.summary_string().unwrap();
        assert!(summary.contains("capture"));
        assert!(summary.contains("display"));
        assert!(summary.contains("fps"));
    }

    #[test]
    fn test_empty_summary_returns_none() {
        assert!(LogSessionLogger::default().summary_string().is_none());
    }

    #[test]
    fn test_zero_throttle_clamped() {
        let mut logger = LogSessionLogger::new(0);
        logger.progress(7);
        assert_eq!(logger.throttle_frames, 1);
        assert_eq!(logger.frames, 7);
    }
}
