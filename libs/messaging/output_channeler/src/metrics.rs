//! Counters for monitoring a channeler's connection lifecycle
//!
//! The actor is the only writer; callers get a shared read-only handle from
//! [`OutputChanneler::metrics`](crate::OutputChanneler::metrics).

use std::sync::atomic::{AtomicU64, Ordering};

/// Lifecycle counters updated by the channeler actor
#[derive(Debug, Default)]
pub struct ChannelerMetrics {
    /// Total `connect()` calls
    pub connect_attempts: AtomicU64,
    /// `connect()` calls that failed
    pub failed_connects: AtomicU64,
    /// Reconnect cycles entered after a delivery failure
    pub reconnects: AtomicU64,
    /// Records delivered by a successful `output()`
    pub records_delivered: AtomicU64,
    /// Records discarded because `output()` failed
    pub records_dropped: AtomicU64,
    /// Bytes reported by successful `output()` calls
    pub bytes_delivered: AtomicU64,
}

/// Point-in-time copy of [`ChannelerMetrics`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub connect_attempts: u64,
    pub failed_connects: u64,
    pub reconnects: u64,
    pub records_delivered: u64,
    pub records_dropped: u64,
    pub bytes_delivered: u64,
}

impl ChannelerMetrics {
    pub(crate) fn record_connect_attempt(&self, success: bool) {
        self.connect_attempts.fetch_add(1, Ordering::Relaxed);
        if !success {
            self.failed_connects.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub(crate) fn record_delivered(&self, bytes: usize) {
        self.records_delivered.fetch_add(1, Ordering::Relaxed);
        self.bytes_delivered
            .fetch_add(bytes as u64, Ordering::Relaxed);
    }

    pub(crate) fn record_dropped(&self) {
        self.records_dropped.fetch_add(1, Ordering::Relaxed);
        self.reconnects.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            connect_attempts: self.connect_attempts.load(Ordering::Relaxed),
            failed_connects: self.failed_connects.load(Ordering::Relaxed),
            reconnects: self.reconnects.load(Ordering::Relaxed),
            records_delivered: self.records_delivered.load(Ordering::Relaxed),
            records_dropped: self.records_dropped.load(Ordering::Relaxed),
            bytes_delivered: self.bytes_delivered.load(Ordering::Relaxed),
        }
    }

    /// Share of delivery attempts that succeeded
    pub fn delivery_success_rate(&self) -> f64 {
        let delivered = self.records_delivered.load(Ordering::Relaxed);
        let dropped = self.records_dropped.load(Ordering::Relaxed);
        let total = delivered + dropped;
        if total == 0 {
            return 1.0;
        }
        delivered as f64 / total as f64
    }

    /// Share of connect attempts that succeeded
    pub fn connection_success_rate(&self) -> f64 {
        let total = self.connect_attempts.load(Ordering::Relaxed);
        if total == 0 {
            return 1.0;
        }
        let failed = self.failed_connects.load(Ordering::Relaxed);
        (total - failed) as f64 / total as f64
    }
}
