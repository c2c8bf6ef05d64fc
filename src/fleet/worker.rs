use std::net::IpAddr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{BoardError, Result};

/// Load report sent with every heartbeat. Memory figures are in megabytes.
///
/// The registry stores it as-is and replaces it on each heartbeat.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceSnapshot {
    pub cpu_usage: f64,
    pub cores: u32,
    pub total_physical_memory: u64,
    pub free_physical_memory: u64,
    pub swap_file_size: u64,
    pub cached_swap_space: u64,
}

impl PerformanceSnapshot {
    /// Check the ranges a worker is allowed to report.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::InvalidArgument`] naming the first field out of range.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.cpu_usage) {
            return Err(BoardError::InvalidArgument(format!(
                "cpuUsage must be within [0, 1], got {}",
                self.cpu_usage
            )));
        }
        if self.cores < 1 {
            return Err(BoardError::InvalidArgument(
                "cores must be at least 1".to_string(),
            ));
        }
        if self.total_physical_memory < 1 {
            return Err(BoardError::InvalidArgument(
                "totalPhysicalMemory must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Everything the board knows about one judge node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerRecord {
    pub address: IpAddr,
    /// Last time the node reported its load.
    pub last_heartbeat: DateTime<Utc>,
    /// Last time the node made any request.
    pub last_seen: DateTime<Utc>,
    pub queued_jobs: u32,
    pub blocked: bool,
    pub performance: Option<PerformanceSnapshot>,
}

impl WorkerRecord {
    pub fn new(address: IpAddr, now: DateTime<Utc>) -> Self {
        Self {
            address,
            last_heartbeat: now,
            last_seen: now,
            queued_jobs: 0,
            blocked: false,
            performance: None,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>, expiration: chrono::Duration) -> bool {
        now - self.last_seen > expiration
    }
}
