//! Judge node bookkeeping.
//!
//! Nodes are identified by the IP address they connect from. A record is
//! created on first contact (heartbeat or any other request), updated in place
//! afterwards, and removed only when it has not been seen for longer than the
//! configured expiration window.

pub mod registry;
pub mod worker;

pub use registry::FleetRegistry;
pub use worker::{PerformanceSnapshot, WorkerRecord};
