//! Run statistics for the bucket fill pass

use std::time::{Duration, Instant};

/// Common timing information for a run
#[derive(Debug, Clone)]
pub struct TimingInfo {
    pub start_time: Instant,
    pub processing_duration: Duration,
}

impl Default for TimingInfo {
    fn default() -> Self {
        Self::new()
    }
}

impl TimingInfo {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            processing_duration: Duration::default(),
        }
    }

    pub fn finish(&mut self) {
        self.processing_duration = self.start_time.elapsed();
    }

    pub fn elapsed(&self) -> Duration {
        if self.processing_duration.is_zero() {
            self.start_time.elapsed()
        } else {
            self.processing_duration
        }
    }
}

/// Counters for one fill pass (one or more collections into one skeleton)
#[derive(Debug, Clone, Default)]
pub struct FillStats {
    pub collections_filled: usize,
    pub buckets_filled: u64,
    pub queries_issued: u64,
    pub timing: TimingInfo,
}

impl FillStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_bucket(&mut self, queries: u64) {
        self.buckets_filled += 1;
        self.queries_issued += queries;
    }

    pub fn buckets_per_second(&self) -> f64 {
        let elapsed = self.timing.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.buckets_filled as f64 / elapsed
        } else {
            0.0
        }
    }

    pub fn finish(&mut self) {
        self.timing.finish();
    }

    pub fn summary(&self) -> String {
        format!(
            "{} collection(s), {} buckets, {} queries in {:.1}s ({:.1} buckets/sec)",
            self.collections_filled,
            self.buckets_filled,
            self.queries_issued,
            self.timing.elapsed().as_secs_f64(),
            self.buckets_per_second()
        )
    }
}
