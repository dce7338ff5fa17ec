// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Contract between the driver and the messaging runtime under test.
//!
//! The driver never talks to a concrete middleware; it goes through
//! [`PubRuntime`], which mirrors the creation/write/ack surface of a
//! DDS-style publish stack. Production suites implement it over the
//! real middleware bindings; [`crate::testing::MockRuntime`] implements
//! it in-process for this crate's own tests.
//!
//! # Failure conventions
//!
//! Nothing panics across this boundary:
//!
//! - creation returns `None` on failure,
//! - `write` returns `false` on backpressure (retry later, not an error),
//! - `wait_for_all_acked` returns whether everything was acknowledged
//!   within the bound.
//!
//! # Thread safety
//!
//! [`EndpointListener`] callbacks are invoked from runtime background
//! threads (discovery, reader proxies). Implementations must be
//! `Send + Sync` and should not block.

use crate::config::DriverConfig;
use std::sync::Arc;
use std::time::Duration;

/// Type-support hook: the name the sample type is registered under.
pub trait TypeSupport: Send + Sync + 'static {
    /// Registered type name, announced during discovery.
    fn type_name() -> &'static str;
}

/// Publication match status delivered by the runtime's callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchEvent {
    /// A remote subscribing endpoint became matched.
    Matched,
    /// A previously matched endpoint went away or became incompatible.
    Unmatched,
}

/// Callback object installed at endpoint creation.
///
/// The runtime invokes it for every publication match status change.
/// Installed explicitly and captured by the runtime at registration
/// time, so the driver stays decoupled from any particular listener
/// interface the middleware may define.
pub trait EndpointListener: Send + Sync {
    /// Called by the runtime on every match status change.
    fn on_publication_matched(&self, event: MatchEvent);
}

/// The external publish-side runtime the driver exercises.
///
/// Generic over the sample type so typed write stays typed all the way
/// to the middleware binding.
pub trait PubRuntime<T: TypeSupport> {
    /// Opaque participant handle owned by the driver after creation.
    type Participant;
    /// Opaque publish endpoint handle.
    type Endpoint;

    /// Create a participant from the transport attributes in `config`.
    ///
    /// `None` signals creation failure.
    fn create_participant(&self, config: &DriverConfig) -> Option<Self::Participant>;

    /// Register `T` (under [`TypeSupport::type_name`]) with the participant.
    fn register_type(&self, participant: &Self::Participant);

    /// Create the publish endpoint with the given QoS/identity attributes,
    /// installing `listener` for match notifications.
    ///
    /// `None` signals creation failure.
    fn create_endpoint(
        &self,
        participant: &Self::Participant,
        config: &DriverConfig,
        listener: Arc<dyn EndpointListener>,
    ) -> Option<Self::Endpoint>;

    /// Tear down the participant and every endpoint it owns.
    fn remove_participant(&self, participant: Self::Participant);

    /// Non-blocking write. `true` means accepted for transmission,
    /// `false` means rejected (resource limits / flow control) and must
    /// be retried by the caller.
    fn write(&self, endpoint: &Self::Endpoint, sample: &T) -> bool;

    /// Block until every written sample is acknowledged or `max_wait`
    /// elapses; returns whether full acknowledgment was reached.
    fn wait_for_all_acked(&self, endpoint: &Self::Endpoint, max_wait: Duration) -> bool;
}
