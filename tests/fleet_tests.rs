use std::net::IpAddr;
use std::time::Duration;

use chrono::{Duration as ChronoDuration, Utc};

use judge_board::fleet::{FleetRegistry, PerformanceSnapshot};

fn snapshot(cpu_usage: f64) -> PerformanceSnapshot {
    PerformanceSnapshot {
        cpu_usage,
        cores: 4,
        total_physical_memory: 8 << 30,
        free_physical_memory: 4 << 30,
        swap_file_size: 0,
        cached_swap_space: 0,
    }
}

fn addr(last: u8) -> IpAddr {
    IpAddr::from([10, 0, 0, last])
}

#[test]
fn unknown_node_is_treated_as_blocked() {
    let registry = FleetRegistry::default();
    assert!(registry.is_blocked(addr(1)));

    registry.record_heartbeat(addr(1), snapshot(0.2));
    assert!(!registry.is_blocked(addr(1)));
}

#[test]
fn blocking_survives_heartbeats() {
    let registry = FleetRegistry::default();
    registry.record_heartbeat(addr(1), snapshot(0.2));

    assert!(registry.set_blocked(addr(1), true));
    registry.record_heartbeat(addr(1), snapshot(0.4));
    assert!(registry.is_blocked(addr(1)));

    assert!(registry.set_blocked(addr(1), false));
    assert!(!registry.is_blocked(addr(1)));
}

#[test]
fn set_blocked_on_unknown_node_reports_missing() {
    let registry = FleetRegistry::default();
    assert!(!registry.set_blocked(addr(9), true));
    assert!(registry.is_empty());
}

#[test]
fn touch_registers_a_node_without_load_report() {
    let registry = FleetRegistry::default();
    registry.touch_last_seen(addr(1));

    let record = registry.get(addr(1)).unwrap();
    assert!(record.performance.is_none());
    assert!(!record.blocked);
    assert_eq!(record.queued_jobs, 0);
}

#[test]
fn expiry_window_edges() {
    let registry = FleetRegistry::with_expiration(Duration::from_secs(300));
    let start = Utc::now();
    registry.record_heartbeat_at(addr(1), snapshot(0.1), start);

    let at_limit = start + ChronoDuration::seconds(300);
    assert_eq!(registry.list_active_at(at_limit).len(), 1);

    let past_limit = at_limit + ChronoDuration::milliseconds(1);
    assert!(registry.list_active_at(past_limit).is_empty());
}

#[test]
fn touch_keeps_a_node_alive() {
    let registry = FleetRegistry::with_expiration(Duration::from_secs(300));
    let start = Utc::now();
    registry.record_heartbeat_at(addr(1), snapshot(0.1), start);
    registry.touch_last_seen_at(addr(1), start + ChronoDuration::seconds(200));

    let later = start + ChronoDuration::seconds(450);
    let active = registry.list_active_at(later);
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].last_heartbeat, start);
}

#[test]
fn stale_records_are_swept_as_the_registry_grows() {
    let registry = FleetRegistry::with_expiration(Duration::from_secs(60));
    let start = Utc::now();
    registry.record_heartbeat_at(addr(1), snapshot(0.1), start);
    registry.record_heartbeat_at(addr(2), snapshot(0.1), start);
    registry.record_heartbeat_at(addr(3), snapshot(0.1), start);

    // The fourth insert brings the count to a power of two and triggers a sweep.
    let later = start + ChronoDuration::seconds(120);
    registry.record_heartbeat_at(addr(4), snapshot(0.1), later);

    assert_eq!(registry.len(), 1);
    assert!(registry.get(addr(4)).is_some());
}

#[test]
fn queue_depth_never_goes_negative() {
    let registry = FleetRegistry::default();
    registry.record_heartbeat(addr(1), snapshot(0.1));

    assert!(registry.adjust_queue_depth(addr(1), 2));
    assert!(registry.adjust_queue_depth(addr(1), -5));
    assert_eq!(registry.get(addr(1)).unwrap().queued_jobs, 0);
    assert!(!registry.adjust_queue_depth(addr(2), 1));
}

#[test]
fn snapshot_validation() {
    assert!(snapshot(0.5).validate().is_ok());
    assert!(snapshot(1.5).validate().is_err());
    assert!(snapshot(f64::NAN).validate().is_err());

    let mut no_cores = snapshot(0.5);
    no_cores.cores = 0;
    assert!(no_cores.validate().is_err());
}
