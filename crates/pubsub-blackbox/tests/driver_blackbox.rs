// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! End-to-end driver scenarios against the scripted mock runtime.
//!
//! These mirror how a real blackbox suite uses the driver: configure
//! QoS, initialize, synchronize on discovery, push a backlog through
//! the endpoint and assert on what remains queued.

use pubsub_blackbox::testing::{MockRuntime, Sample};
use pubsub_blackbox::{DriverConfig, MatchEvent, PubDriver, Reliability};
use std::collections::VecDeque;
use std::thread;
use std::time::{Duration, Instant};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn unique_token() -> String {
    format!("{:08x}", fastrand::u32(..))
}

fn reliable_config() -> DriverConfig {
    DriverConfig::builder("BlackboxTopic")
        .reliability(Reliability::Reliable)
        .unique_token(unique_token())
        .build()
}

#[test]
fn reliable_writer_discovers_then_drains_backlog() {
    init_logging();

    let runtime = MockRuntime::<Sample>::new();
    let mut writer = PubDriver::new(runtime.clone(), reliable_config());
    writer.init();
    assert!(writer.is_initialized());
    assert_eq!(writer.matched(), 0);

    // Discovery notification arrives from another thread, as it would
    // from the runtime's discovery machinery.
    let listener = runtime.listener().expect("listener installed at init");
    let discovery = thread::spawn(move || {
        thread::sleep(Duration::from_millis(50));
        listener.on_publication_matched(MatchEvent::Matched);
    });

    let start = Instant::now();
    assert!(writer.wait_matched(Duration::from_secs(10)));
    assert!(start.elapsed() < Duration::from_secs(5));
    discovery.join().expect("discovery thread panicked");

    let mut backlog = Sample::backlog(5);
    writer.send(&mut backlog).expect("initialized writer");

    assert!(backlog.is_empty());
    assert_eq!(runtime.written(), (0..5).map(Sample::new).collect::<Vec<_>>());
}

#[test]
fn backpressured_writer_leaves_tail_queued_in_order() {
    init_logging();

    let runtime = MockRuntime::<Sample>::new();
    let config = DriverConfig::builder("BlackboxTopic")
        .reliability(Reliability::Reliable)
        .max_samples(2)
        .allocated_samples(2)
        .unique_token(unique_token())
        .build();

    let mut writer = PubDriver::new(runtime.clone(), config);
    writer.init();
    assert!(writer.is_initialized());

    // Two-sample cache: third write is rejected.
    runtime.push_write_verdicts([true, true, false]);

    let mut backlog = Sample::backlog(5);
    writer.send(&mut backlog).expect("initialized writer");

    // The rejected message and the two after it, original order.
    assert_eq!(backlog, (2..5).map(Sample::new).collect::<VecDeque<_>>());
    assert_eq!(runtime.written(), vec![Sample::new(0), Sample::new(1)]);

    // A later pass resumes exactly where the first one stopped.
    writer.send(&mut backlog).expect("initialized writer");
    assert!(backlog.is_empty());
    assert_eq!(runtime.written(), (0..5).map(Sample::new).collect::<Vec<_>>());
}

#[test]
fn wait_matched_times_out_without_discovery() {
    init_logging();

    let runtime = MockRuntime::<Sample>::new();
    let mut writer = PubDriver::new(runtime, reliable_config());
    writer.init();

    let timeout = Duration::from_millis(100);
    let start = Instant::now();
    assert!(!writer.wait_matched(timeout));
    assert!(start.elapsed() >= timeout);
    assert_eq!(writer.matched(), 0);
}

#[test]
fn writer_observes_subscriber_removal() {
    init_logging();

    let runtime = MockRuntime::<Sample>::new();
    let mut writer = PubDriver::new(runtime.clone(), reliable_config());
    writer.init();

    let listener = runtime.listener().expect("listener installed at init");
    listener.on_publication_matched(MatchEvent::Matched);
    assert!(writer.wait_matched(Duration::from_secs(10)));

    let removal = thread::spawn(move || {
        thread::sleep(Duration::from_millis(50));
        listener.on_publication_matched(MatchEvent::Unmatched);
    });

    assert!(writer.wait_unmatched(Duration::from_secs(10)));
    assert_eq!(writer.matched(), 0);
    removal.join().expect("removal thread panicked");
}

#[test]
fn initialization_failure_is_observable_not_fatal() {
    init_logging();

    let runtime = MockRuntime::<Sample>::new();
    runtime.fail_endpoint();

    let mut writer = PubDriver::new(runtime.clone(), reliable_config());
    writer.init();

    assert!(!writer.is_initialized());
    // The half-created participant was cleaned up.
    assert_eq!(runtime.removed_participants(), 1);

    // The same driver can be initialized once the runtime cooperates.
    writer.init();
    assert!(writer.is_initialized());
}

#[test]
fn destroy_is_idempotent_across_lifecycle() {
    init_logging();

    let runtime = MockRuntime::<Sample>::new();
    let mut writer = PubDriver::new(runtime.clone(), reliable_config());

    // Never initialized: destroy is a no-op.
    writer.destroy();
    assert_eq!(runtime.removed_participants(), 0);

    writer.init();
    writer.destroy();
    writer.destroy();
    assert_eq!(runtime.removed_participants(), 1);
    assert!(!writer.is_initialized());
}

#[test]
fn acked_wait_passes_through_to_runtime() {
    init_logging();

    let runtime = MockRuntime::<Sample>::new();
    runtime.set_acked(false);

    let mut writer = PubDriver::new(runtime.clone(), reliable_config());
    writer.init();

    let mut backlog = Sample::backlog(3);
    writer.send(&mut backlog).expect("initialized writer");

    assert!(!writer.wait_for_all_acked(Duration::from_millis(10)));
    runtime.set_acked(true);
    assert!(writer.wait_for_all_acked(Duration::from_millis(10)));
}

#[test]
fn topic_names_are_unique_per_injected_token() {
    init_logging();

    let token_a = unique_token();
    let token_b = unique_token();
    if token_a == token_b {
        // One-in-four-billion collision; nothing to assert.
        return;
    }

    let config_a = DriverConfig::builder("BlackboxTopic")
        .unique_token(&token_a)
        .build();
    let config_b = DriverConfig::builder("BlackboxTopic")
        .unique_token(&token_b)
        .build();

    assert_ne!(config_a.topic_name(), config_b.topic_name());

    let runtime = MockRuntime::<Sample>::new();
    let mut writer = PubDriver::new(runtime.clone(), config_a);
    writer.init();
    assert_eq!(
        runtime.endpoint_topics(),
        vec![format!("BlackboxTopic_{}", token_a)]
    );
}
