//! Unit tests for the LOOP registry.

use std::sync::Arc;
use std::thread;

use loop_config::{EnvConfig, LogLevel, LoggingConfig};
use rstest::{fixture, rstest};

use super::*;

#[fixture]
fn logging() -> LoggingSnapshot {
    LoggingSnapshot::new(LogLevel::Info, false, true)
}

#[fixture]
fn registry() -> LoopRegistry {
    LoopRegistry::new(9300)
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

#[test]
fn new_registry_is_empty() {
    let registry = LoopRegistry::new(9300);
    assert!(registry.is_empty());
    assert_eq!(registry.len(), 0);
    assert_eq!(registry.base_port(), 9300);
}

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

#[rstest]
fn register_assigns_sequential_ports(registry: LoopRegistry, logging: LoggingSnapshot) {
    let median = registry.register("median", &logging).expect("register median");
    let feeds = registry.register("feeds", &logging).expect("register feeds");
    assert_eq!(median.env_config().prometheus_port(), 9301);
    assert_eq!(feeds.env_config().prometheus_port(), 9302);
    assert_eq!(feeds.env_config().logging(), logging);
}

#[rstest]
fn register_is_idempotent(registry: LoopRegistry, logging: LoggingSnapshot) {
    let first = registry.register("median", &logging).expect("first");
    let second = registry.register("median", &logging).expect("second");
    assert_eq!(first, second);
    assert_eq!(registry.len(), 1);

    // The repeat must not have consumed a port.
    let next = registry.register("feeds", &logging).expect("feeds");
    assert_eq!(next.env_config().prometheus_port(), 9302);
}

#[rstest]
fn register_rejects_inconsistent_logging(registry: LoopRegistry, logging: LoggingSnapshot) {
    registry.register("median", &logging).expect("first");
    let louder = LoggingSnapshot::new(LogLevel::Debug, false, true);
    let error = registry
        .register("median", &louder)
        .expect_err("conflicting registration");
    assert!(matches!(error, RegistrationError::Inconsistent { .. }));
    let stored = registry.get("median").expect("original record kept");
    assert_eq!(stored.env_config().level(), LogLevel::Info);
}

#[rstest]
#[case::empty("")]
#[case::blank("   ")]
#[case::control("median\n")]
fn register_rejects_invalid_ids(
    registry: LoopRegistry,
    logging: LoggingSnapshot,
    #[case] loop_id: &str,
) {
    let error = registry
        .register(loop_id, &logging)
        .expect_err("invalid id must fail");
    assert!(matches!(error, RegistrationError::InvalidId { .. }));
    assert!(registry.is_empty(), "failed registration left a record");
}

#[rstest]
fn zero_base_port_disables_metrics(logging: LoggingSnapshot) {
    let registry = LoopRegistry::new(0);
    for loop_id in ["median", "feeds", "mercury"] {
        let record = registry.register(loop_id, &logging).expect("register");
        assert_eq!(record.env_config().prometheus_port(), 0);
    }
    assert_eq!(registry.len(), 3);
}

#[rstest]
fn exhausted_ports_are_reported(logging: LoggingSnapshot) {
    let registry = LoopRegistry::new(i64::MAX);
    let error = registry
        .register("median", &logging)
        .expect_err("no port above i64::MAX");
    assert!(matches!(error, RegistrationError::PortsExhausted { .. }));
    assert!(registry.is_empty());
}

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

#[rstest]
fn list_is_ordered_by_id(registry: LoopRegistry, logging: LoggingSnapshot) {
    for loop_id in ["mercury", "feeds", "median"] {
        registry.register(loop_id, &logging).expect("register");
    }
    let names: Vec<String> = registry
        .list()
        .iter()
        .map(|record| record.name().to_owned())
        .collect();
    assert_eq!(names, ["feeds", "median", "mercury"]);
}

#[rstest]
fn get_returns_none_for_unknown(registry: LoopRegistry) {
    assert!(registry.get("nonexistent").is_none());
}

// ---------------------------------------------------------------------------
// Concurrency
// ---------------------------------------------------------------------------

#[rstest]
fn concurrent_registration_yields_one_record(logging: LoggingSnapshot) {
    let registry = Arc::new(LoopRegistry::new(9300));
    let records: Vec<Result<RegisteredLoop, RegistrationError>> = thread::scope(|scope| {
        let handles: Vec<_> = (0..16)
            .map(|_| {
                let shared = Arc::clone(&registry);
                scope.spawn(move || shared.register("median", &logging))
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().expect("registration thread panicked"))
            .collect()
    });

    assert_eq!(registry.len(), 1);
    let expected = registry.get("median").expect("record stored");
    for record in records {
        assert_eq!(record.expect("no race-induced failure"), expected);
    }
    assert_eq!(expected.env_config().prometheus_port(), 9301);
}
