// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! The publish-side driver: lifecycle, synchronization and sending.
//!
//! [`PubDriver`] owns the participant and endpoint handles created by
//! the runtime and walks them through `Configured -> Initialized ->
//! Destroyed`. Initialization failure is a valid, observable state
//! (query [`PubDriver::is_initialized`]), not a panic and not an `Err`:
//! blackbox scenarios assert on it like on any other observed behavior.
//!
//! Typical scenario shape:
//!
//! ```ignore
//! let config = DriverConfig::builder("StringTopic")
//!     .reliability(Reliability::Reliable)
//!     .unique_token(run_id)
//!     .build();
//!
//! let mut writer = PubDriver::new(runtime, config);
//! writer.init();
//! assert!(writer.is_initialized());
//!
//! assert!(writer.wait_matched(Duration::from_secs(10)));
//! writer.send(&mut backlog)?;
//! assert!(backlog.is_empty());
//! ```

use crate::config::DriverConfig;
use crate::runtime::{PubRuntime, TypeSupport};
use crate::sender;
use crate::tracker::MatchTracker;
use crate::{Error, Result};
use std::collections::VecDeque;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

/// Test driver for a publish endpoint of the runtime `R` with sample
/// type `T`.
///
/// Construction leaves the driver configured but inert; [`init`]
/// creates the external entities; [`destroy`] (or drop) releases them.
///
/// [`init`]: PubDriver::init
/// [`destroy`]: PubDriver::destroy
pub struct PubDriver<T: TypeSupport, R: PubRuntime<T>> {
    runtime: R,
    config: DriverConfig,
    topic_name: String,
    tracker: Arc<MatchTracker>,
    participant: Option<R::Participant>,
    endpoint: Option<R::Endpoint>,
    initialized: bool,
    _sample: PhantomData<fn(T)>,
}

impl<T: TypeSupport, R: PubRuntime<T>> PubDriver<T, R> {
    /// Create a driver over `runtime` with a frozen configuration.
    pub fn new(runtime: R, config: DriverConfig) -> Self {
        let topic_name = config.topic_name();
        Self {
            runtime,
            config,
            topic_name,
            tracker: Arc::new(MatchTracker::new()),
            participant: None,
            endpoint: None,
            initialized: false,
            _sample: PhantomData,
        }
    }

    /// Create the participant, register the type and create the endpoint
    /// with the match tracker installed as listener.
    ///
    /// On any failure the driver stays un-initialized (a participant
    /// created before an endpoint failure is removed again) and the
    /// outcome is observable via [`is_initialized`]. Calling `init` on
    /// an already initialized driver is a no-op.
    ///
    /// [`is_initialized`]: PubDriver::is_initialized
    pub fn init(&mut self) {
        if self.initialized {
            return;
        }

        if let Err(e) = self.config.validate() {
            log::warn!("init of '{}' aborted: {}", self.topic_name, e);
            return;
        }

        let Some(participant) = self.runtime.create_participant(&self.config) else {
            log::warn!("participant creation failed for '{}'", self.topic_name);
            return;
        };

        self.runtime.register_type(&participant);

        // Unsized coercion to Arc<dyn EndpointListener> happens at the
        // argument; annotating the local would break Arc::clone inference.
        let listener = Arc::clone(&self.tracker);
        match self
            .runtime
            .create_endpoint(&participant, &self.config, listener)
        {
            Some(endpoint) => {
                log::debug!(
                    "publish endpoint '{}' created (type '{}')",
                    self.topic_name,
                    T::type_name()
                );
                self.participant = Some(participant);
                self.endpoint = Some(endpoint);
                self.initialized = true;
            }
            None => {
                log::warn!("endpoint creation failed for '{}'", self.topic_name);
                self.runtime.remove_participant(participant);
            }
        }
    }

    /// Whether `init` completed successfully.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Release the participant and every endpoint it owns.
    ///
    /// Idempotent: destroying twice, or a driver that never reached the
    /// initialized state, is a no-op. Also runs on drop.
    pub fn destroy(&mut self) {
        self.endpoint = None;
        if let Some(participant) = self.participant.take() {
            log::debug!("destroying publish endpoint '{}'", self.topic_name);
            self.runtime.remove_participant(participant);
        }
        self.initialized = false;
    }

    /// Drain `queue` through the endpoint's non-blocking write, stopping
    /// at the first rejected write.
    ///
    /// Messages whose write was accepted are removed from the front;
    /// the rejected message and everything behind it remain queued, in
    /// order, for a later `send` call. The remaining queue length is
    /// the outcome - a partial drain under backpressure is not an error.
    ///
    /// # Errors
    ///
    /// [`Error::NotInitialized`] when called before a successful `init`.
    pub fn send(&self, queue: &mut VecDeque<T>) -> Result<()> {
        let endpoint = self.endpoint.as_ref().ok_or(Error::NotInitialized)?;

        let accepted = sender::drain(queue, |sample| self.runtime.write(endpoint, sample));
        log::debug!(
            "sent {} sample(s) on '{}', {} still queued",
            accepted,
            self.topic_name,
            queue.len()
        );
        Ok(())
    }

    /// Block until at least one remote endpoint is matched or `timeout`
    /// elapses; returns whether a match is present at wake time.
    pub fn wait_matched(&self, timeout: Duration) -> bool {
        log::debug!("waiting for discovery on '{}'", self.topic_name);
        let matched = self.tracker.wait_matched(timeout);
        log::debug!(
            "discovery wait on '{}' finished: {} endpoint(s)",
            self.topic_name,
            self.tracker.matched()
        );
        matched
    }

    /// Block until no remote endpoint is matched or `timeout` elapses;
    /// returns whether the count is zero at wake time.
    pub fn wait_unmatched(&self, timeout: Duration) -> bool {
        log::debug!("waiting for removal on '{}'", self.topic_name);
        self.tracker.wait_unmatched(timeout)
    }

    /// Current number of matched remote endpoints.
    #[must_use]
    pub fn matched(&self) -> usize {
        self.tracker.matched()
    }

    /// Block until every written sample is acknowledged or `max_wait`
    /// elapses. Returns `false` on an un-initialized driver.
    pub fn wait_for_all_acked(&self, max_wait: Duration) -> bool {
        match self.endpoint.as_ref() {
            Some(endpoint) => self.runtime.wait_for_all_acked(endpoint, max_wait),
            None => false,
        }
    }

    /// Resolved topic name the endpoint was (or will be) created with.
    #[must_use]
    pub fn topic_name(&self) -> &str {
        &self.topic_name
    }

    /// The frozen configuration this driver was built from.
    #[must_use]
    pub fn config(&self) -> &DriverConfig {
        &self.config
    }
}

impl<T: TypeSupport, R: PubRuntime<T>> Drop for PubDriver<T, R> {
    fn drop(&mut self) {
        self.destroy();
    }
}
