// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # pubsub-blackbox - publish-side black-box test driver
//!
//! A test-driver library for exercising the publish side of a DDS-style
//! publish/subscribe endpoint under configurable QoS, from black-box
//! integration tests. It validates discovery, reliability and
//! flow-control behavior of a messaging runtime by driving and
//! observing it - never by reimplementing it: the runtime (participant
//! and endpoint creation, discovery, the reliability protocol, the
//! non-blocking write primitive) stays behind the [`PubRuntime`] trait.
//!
//! ## Quick Start
//!
//! ```
//! use pubsub_blackbox::{DriverConfig, PubDriver, Reliability};
//! use pubsub_blackbox::testing::{MockRuntime, Sample};
//! use std::time::Duration;
//!
//! let runtime = MockRuntime::<Sample>::new();
//! let config = DriverConfig::builder("StringTopic")
//!     .reliability(Reliability::Reliable)
//!     .unique_token("run42")
//!     .build();
//!
//! let mut writer = PubDriver::new(runtime.clone(), config);
//! writer.init();
//! assert!(writer.is_initialized());
//!
//! // A subscriber shows up (here: simulated through the mock).
//! use pubsub_blackbox::MatchEvent;
//! runtime.listener().unwrap().on_publication_matched(MatchEvent::Matched);
//! assert!(writer.wait_matched(Duration::from_secs(10)));
//!
//! // Drain a backlog; whatever the endpoint rejects stays queued.
//! let mut backlog = Sample::backlog(5);
//! writer.send(&mut backlog).unwrap();
//! assert!(backlog.is_empty());
//! ```
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`PubDriver`] | Lifecycle, synchronization and sending over one endpoint |
//! | [`MatchTracker`] | Blocking rendezvous over asynchronous match notifications |
//! | [`DriverConfig`] | Frozen QoS/transport/identity configuration, built fluently |
//! | [`PubRuntime`] | Contract the middleware under test is driven through |
//! | [`testing::MockRuntime`] | Scripted in-process runtime for the driver's own tests |
//!
//! ## Design Notes
//!
//! - Waits are level-triggered predicates over current state, so match
//!   notifications arriving before a wait begins are never missed.
//! - A rejected write is backpressure, not an error; retry policy (when
//!   and how often to call [`PubDriver::send`] again) belongs to the
//!   calling scenario.
//! - Initialization failure is an observable state
//!   ([`PubDriver::is_initialized`]), not a panic, so scenarios can
//!   assert on it.

/// Driver configuration: frozen value plus fluent builder.
pub mod config;
/// The publish-side driver and its lifecycle.
pub mod driver;
/// QoS policy model for the driven endpoint.
pub mod qos;
/// Contract between the driver and the external messaging runtime.
pub mod runtime;
/// Single-pass backlog draining through a non-blocking write.
pub mod sender;
/// Scripted mock runtime for tests.
pub mod testing;
/// Match-state synchronization.
pub mod tracker;

pub use config::{
    DriverConfig, DriverConfigBuilder, EndpointIdentity, Locator, ThroughputController,
    TransportConfig,
};
pub use driver::PubDriver;
pub use qos::{
    Durability, History, PublishMode, QosProfile, ReliableTimings, Reliability, ResourceLimits,
};
pub use runtime::{EndpointListener, MatchEvent, PubRuntime, TypeSupport};
pub use tracker::MatchTracker;

/// Errors returned by driver operations.
///
/// Expected blackbox conditions - unmatched endpoints, rejected writes,
/// wait timeouts, initialization failure - are observable states or
/// return values, never errors. Only API misuse lands here.
#[derive(Debug)]
pub enum Error {
    /// Operation requires a successfully initialized driver.
    NotInitialized,
    /// QoS profile is structurally invalid (e.g. zero-depth history).
    InvalidQos(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::NotInitialized => write!(f, "driver is not initialized"),
            Error::InvalidQos(msg) => write!(f, "invalid QoS: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

/// Convenient alias for results using the public [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;
