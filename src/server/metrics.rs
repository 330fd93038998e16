use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Which endpoint a request hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Hide,
    Reveal,
    Capacity,
}

#[derive(Debug, Clone, Default)]
pub struct ServiceMetrics {
    hide_requests: Arc<AtomicU64>,
    reveal_requests: Arc<AtomicU64>,
    capacity_requests: Arc<AtomicU64>,
    successful_requests: Arc<AtomicU64>,
    failed_requests: Arc<AtomicU64>,
    avg_response_time: Arc<AtomicU64>, // In microseconds
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MetricsSnapshot {
    pub total_requests: u64,
    pub hide_requests: u64,
    pub reveal_requests: u64,
    pub capacity_requests: u64,
    pub successful_requests: u64,
    pub failed_requests: u64,
    pub avg_response_time_ms: f64,
}

impl ServiceMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, operation: Operation, success: bool, elapsed_micros: u64) {
        let counter = match operation {
            Operation::Hide => &self.hide_requests,
            Operation::Reveal => &self.reveal_requests,
            Operation::Capacity => &self.capacity_requests,
        };
        counter.fetch_add(1, Ordering::Relaxed);

        if success {
            self.successful_requests.fetch_add(1, Ordering::Relaxed);
        } else {
            self.failed_requests.fetch_add(1, Ordering::Relaxed);
        }

        self.update_response_time(elapsed_micros);
    }

    fn update_response_time(&self, new_time: u64) {
        let current = self.avg_response_time.load(Ordering::Relaxed);
        let updated = if current == 0 {
            new_time
        } else {
            (current as f64 * 0.9 + new_time as f64 * 0.1).round() as u64 // Exponential moving average
        };
        self.avg_response_time.store(updated, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let hide = self.hide_requests.load(Ordering::Relaxed);
        let reveal = self.reveal_requests.load(Ordering::Relaxed);
        let capacity = self.capacity_requests.load(Ordering::Relaxed);

        MetricsSnapshot {
            total_requests: hide + reveal + capacity,
            hide_requests: hide,
            reveal_requests: reveal,
            capacity_requests: capacity,
            successful_requests: self.successful_requests.load(Ordering::Relaxed),
            failed_requests: self.failed_requests.load(Ordering::Relaxed),
            avg_response_time_ms: self.avg_response_time.load(Ordering::Relaxed) as f64 / 1000.0,
        }
    }
}
