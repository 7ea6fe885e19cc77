use requirements::StageTimings;
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

pub struct Metrics {
    // Counters
    total_requests: AtomicUsize,
    successful_requests: AtomicUsize,
    failed_requests: AtomicUsize,
    uploads_stored: AtomicUsize,

    // Timing (in microseconds)
    total_ocr_time_us: AtomicU64,
    total_extract_time_us: AtomicU64,
    total_generate_time_us: AtomicU64,
    total_trace_time_us: AtomicU64,
    total_process_time_us: AtomicU64,

    // Counts
    documents_processed: AtomicUsize,
    requirements_generated: AtomicUsize,
}

impl Metrics {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            total_requests: AtomicUsize::new(0),
            successful_requests: AtomicUsize::new(0),
            failed_requests: AtomicUsize::new(0),
            uploads_stored: AtomicUsize::new(0),
            total_ocr_time_us: AtomicU64::new(0),
            total_extract_time_us: AtomicU64::new(0),
            total_generate_time_us: AtomicU64::new(0),
            total_trace_time_us: AtomicU64::new(0),
            total_process_time_us: AtomicU64::new(0),
            documents_processed: AtomicUsize::new(0),
            requirements_generated: AtomicUsize::new(0),
        })
    }

    pub fn record_request(&self, success: bool) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
        if success {
            self.successful_requests.fetch_add(1, Ordering::Relaxed);
        } else {
            self.failed_requests.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_upload(&self) {
        self.uploads_stored.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_pipeline(&self, timings: &StageTimings, total: Duration, requirements: usize) {
        add_micros(&self.total_ocr_time_us, timings.ocr);
        add_micros(&self.total_extract_time_us, timings.extract);
        add_micros(&self.total_generate_time_us, timings.generate);
        add_micros(&self.total_trace_time_us, timings.trace);
        add_micros(&self.total_process_time_us, total);
        self.documents_processed.fetch_add(1, Ordering::Relaxed);
        self.requirements_generated.fetch_add(requirements, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let documents = &self.documents_processed;
        MetricsSnapshot {
            total_requests: self.total_requests.load(Ordering::Relaxed),
            successful_requests: self.successful_requests.load(Ordering::Relaxed),
            failed_requests: self.failed_requests.load(Ordering::Relaxed),
            uploads_stored: self.uploads_stored.load(Ordering::Relaxed),
            avg_ocr_time_ms: self.avg_time_ms(&self.total_ocr_time_us, documents),
            avg_extract_time_ms: self.avg_time_ms(&self.total_extract_time_us, documents),
            avg_generate_time_ms: self.avg_time_ms(&self.total_generate_time_us, documents),
            avg_trace_time_ms: self.avg_time_ms(&self.total_trace_time_us, documents),
            avg_process_time_ms: self.avg_time_ms(&self.total_process_time_us, documents),
            documents_processed: documents.load(Ordering::Relaxed),
            requirements_generated: self.requirements_generated.load(Ordering::Relaxed),
        }
    }

    fn avg_time_ms(&self, total_us: &AtomicU64, count: &AtomicUsize) -> f64 {
        let total = total_us.load(Ordering::Relaxed) as f64;
        let cnt = count.load(Ordering::Relaxed) as f64;
        if cnt > 0.0 {
            total / cnt / 1000.0 // Convert to ms
        } else {
            0.0
        }
    }
}

fn add_micros(counter: &AtomicU64, duration: Duration) {
    counter.fetch_add(duration.as_micros() as u64, Ordering::Relaxed);
}

#[derive(Debug, Serialize)]
pub struct MetricsSnapshot {
    pub total_requests: usize,
    pub successful_requests: usize,
    pub failed_requests: usize,
    pub uploads_stored: usize,
    pub avg_ocr_time_ms: f64,
    pub avg_extract_time_ms: f64,
    pub avg_generate_time_ms: f64,
    pub avg_trace_time_ms: f64,
    pub avg_process_time_ms: f64,
    pub documents_processed: usize,
    pub requirements_generated: usize,
}

pub struct TimedOperation {
    start: Instant,
}

impl TimedOperation {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}
