use std::collections::HashMap;
use std::net::IpAddr;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use crate::config::FleetConfig;
use crate::fleet::worker::{PerformanceSnapshot, WorkerRecord};

/// In-memory directory of judge nodes keyed by network address.
///
/// All access goes through a single lock. Expired records are swept before
/// every [`list_active`](Self::list_active), and opportunistically whenever a
/// new record brings the population to a power of two, so no background timer
/// is needed.
///
/// Every operation has an `_at` variant taking the current time explicitly.
#[derive(Debug)]
pub struct FleetRegistry {
    workers: Mutex<HashMap<IpAddr, WorkerRecord>>,
    expiration: chrono::Duration,
}

impl Default for FleetRegistry {
    fn default() -> Self {
        Self::new(FleetConfig::default())
    }
}

impl FleetRegistry {
    pub fn new(config: FleetConfig) -> Self {
        Self::with_expiration(config.expiration)
    }

    pub fn with_expiration(expiration: Duration) -> Self {
        Self {
            workers: Mutex::new(HashMap::new()),
            expiration: chrono::Duration::from_std(expiration)
                .unwrap_or(chrono::Duration::MAX),
        }
    }

    /// Store a heartbeat, creating the record on first contact.
    pub fn record_heartbeat(&self, address: IpAddr, performance: PerformanceSnapshot) {
        self.record_heartbeat_at(address, performance, Utc::now());
    }

    pub fn record_heartbeat_at(
        &self,
        address: IpAddr,
        performance: PerformanceSnapshot,
        now: DateTime<Utc>,
    ) {
        self.upsert(address, now, |record| {
            record.last_heartbeat = now;
            record.last_seen = now;
            record.performance = Some(performance);
        });
        tracing::debug!(worker = %address, "Heartbeat recorded");
    }

    /// Mark the node as reachable without touching its load report.
    pub fn touch_last_seen(&self, address: IpAddr) {
        self.touch_last_seen_at(address, Utc::now());
    }

    pub fn touch_last_seen_at(&self, address: IpAddr, now: DateTime<Utc>) {
        self.upsert(address, now, |record| record.last_seen = now);
    }

    /// Returns false if the address is unknown.
    pub fn set_blocked(&self, address: IpAddr, blocked: bool) -> bool {
        let mut workers = self.workers.lock();
        match workers.get_mut(&address) {
            Some(record) => {
                record.blocked = blocked;
                tracing::info!(worker = %address, blocked, "Judge node access updated");
                true
            }
            None => false,
        }
    }

    /// Unknown addresses count as blocked so unregistered nodes never see job data.
    pub fn is_blocked(&self, address: IpAddr) -> bool {
        self.workers
            .lock()
            .get(&address)
            .map_or(true, |record| record.blocked)
    }

    /// Add `delta` to the node's queued job count, flooring at zero.
    /// Returns false if the address is unknown.
    pub fn adjust_queue_depth(&self, address: IpAddr, delta: i64) -> bool {
        let mut workers = self.workers.lock();
        match workers.get_mut(&address) {
            Some(record) => {
                let depth = (i64::from(record.queued_jobs) + delta).clamp(0, i64::from(u32::MAX));
                record.queued_jobs = depth as u32;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, address: IpAddr) -> Option<WorkerRecord> {
        self.workers.lock().get(&address).cloned()
    }

    /// Sweep expired records and return a snapshot of the rest.
    pub fn list_active(&self) -> Vec<WorkerRecord> {
        self.list_active_at(Utc::now())
    }

    pub fn list_active_at(&self, now: DateTime<Utc>) -> Vec<WorkerRecord> {
        let mut workers = self.workers.lock();
        self.sweep(&mut workers, now);
        workers.values().cloned().collect()
    }

    /// Number of records currently held, expired or not.
    pub fn len(&self) -> usize {
        self.workers.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn upsert(&self, address: IpAddr, now: DateTime<Utc>, update: impl FnOnce(&mut WorkerRecord)) {
        let mut workers = self.workers.lock();
        let inserted = !workers.contains_key(&address);
        update(
            workers
                .entry(address)
                .or_insert_with(|| WorkerRecord::new(address, now)),
        );

        if inserted {
            tracing::info!(worker = %address, "Judge node registered");
            if workers.len().is_power_of_two() {
                self.sweep(&mut workers, now);
            }
        }
    }

    fn sweep(&self, workers: &mut HashMap<IpAddr, WorkerRecord>, now: DateTime<Utc>) {
        let before = workers.len();
        workers.retain(|_, record| !record.is_expired(now, self.expiration));
        let removed = before - workers.len();
        if removed > 0 {
            tracing::debug!(removed, remaining = workers.len(), "Expired judge nodes swept");
        }
    }
}
