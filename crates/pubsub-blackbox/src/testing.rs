// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Scripted in-process runtime for exercising the driver itself.
//!
//! [`MockRuntime`] implements [`PubRuntime`] entirely in memory so
//! driver behavior (lifecycle, drain semantics, discovery sync) can be
//! tested without a live middleware. Scenarios script it up front:
//! creation failures, per-write accept/reject verdicts, the
//! acknowledgment outcome. The listener installed at endpoint creation
//! is captured and can be fired from any thread, exactly as a real
//! discovery thread would.
//!
//! Cloning a `MockRuntime` shares its state, so a test can hand one
//! clone to the driver and keep another for scripting and assertions.

use crate::config::DriverConfig;
use crate::runtime::{EndpointListener, PubRuntime, TypeSupport};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

/// Opaque participant handle produced by [`MockRuntime`].
#[derive(Debug, PartialEq, Eq)]
pub struct MockParticipant {
    id: u64,
}

impl MockParticipant {
    /// Creation-order id of this participant.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }
}

/// Opaque endpoint handle produced by [`MockRuntime`].
#[derive(Debug, PartialEq, Eq)]
pub struct MockEndpoint {
    topic: String,
}

impl MockEndpoint {
    /// Topic name this endpoint was created with.
    #[must_use]
    pub fn topic(&self) -> &str {
        &self.topic
    }
}

struct MockState<T> {
    fail_participant: bool,
    fail_endpoint: bool,
    acked: bool,
    write_verdicts: VecDeque<bool>,
    written: Vec<T>,
    listener: Option<Arc<dyn EndpointListener>>,
    registered_types: Vec<&'static str>,
    endpoint_topics: Vec<String>,
    participants_created: u64,
    participants_removed: usize,
}

impl<T> Default for MockState<T> {
    fn default() -> Self {
        Self {
            fail_participant: false,
            fail_endpoint: false,
            acked: true,
            write_verdicts: VecDeque::new(),
            written: Vec::new(),
            listener: None,
            registered_types: Vec::new(),
            endpoint_topics: Vec::new(),
            participants_created: 0,
            participants_removed: 0,
        }
    }
}

/// Scripted [`PubRuntime`] implementation.
pub struct MockRuntime<T> {
    state: Arc<Mutex<MockState<T>>>,
}

impl<T> Clone for MockRuntime<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<T> Default for MockRuntime<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> MockRuntime<T> {
    /// A runtime where every operation succeeds and every write is
    /// accepted, until scripted otherwise.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState::default())),
        }
    }

    /// Make the next `create_participant` call fail.
    pub fn fail_participant(&self) {
        self.state.lock().fail_participant = true;
    }

    /// Make the next `create_endpoint` call fail.
    pub fn fail_endpoint(&self) {
        self.state.lock().fail_endpoint = true;
    }

    /// Script per-write verdicts, consumed front-to-back; once the
    /// script runs out, writes are accepted again.
    pub fn push_write_verdicts(&self, verdicts: impl IntoIterator<Item = bool>) {
        self.state.lock().write_verdicts.extend(verdicts);
    }

    /// Script the outcome of `wait_for_all_acked`.
    pub fn set_acked(&self, acked: bool) {
        self.state.lock().acked = acked;
    }

    /// The listener captured at endpoint creation, if any. Fire
    /// [`crate::MatchEvent`]s through it from any thread to simulate
    /// discovery notifications.
    #[must_use]
    pub fn listener(&self) -> Option<Arc<dyn EndpointListener>> {
        self.state.lock().listener.clone()
    }

    /// Type names registered so far.
    #[must_use]
    pub fn registered_types(&self) -> Vec<&'static str> {
        self.state.lock().registered_types.clone()
    }

    /// Topic names of endpoints created so far.
    #[must_use]
    pub fn endpoint_topics(&self) -> Vec<String> {
        self.state.lock().endpoint_topics.clone()
    }

    /// Number of `remove_participant` calls observed.
    #[must_use]
    pub fn removed_participants(&self) -> usize {
        self.state.lock().participants_removed
    }
}

impl<T: Clone> MockRuntime<T> {
    /// Samples whose writes were accepted, in transmission order.
    #[must_use]
    pub fn written(&self) -> Vec<T> {
        self.state.lock().written.clone()
    }
}

impl<T: TypeSupport + Clone> PubRuntime<T> for MockRuntime<T> {
    type Participant = MockParticipant;
    type Endpoint = MockEndpoint;

    fn create_participant(&self, _config: &DriverConfig) -> Option<MockParticipant> {
        let mut state = self.state.lock();
        if state.fail_participant {
            state.fail_participant = false;
            return None;
        }
        state.participants_created += 1;
        Some(MockParticipant {
            id: state.participants_created,
        })
    }

    fn register_type(&self, _participant: &MockParticipant) {
        self.state.lock().registered_types.push(T::type_name());
    }

    fn create_endpoint(
        &self,
        _participant: &MockParticipant,
        config: &DriverConfig,
        listener: Arc<dyn EndpointListener>,
    ) -> Option<MockEndpoint> {
        let mut state = self.state.lock();
        if state.fail_endpoint {
            state.fail_endpoint = false;
            return None;
        }
        let topic = config.topic_name();
        state.endpoint_topics.push(topic.clone());
        state.listener = Some(listener);
        Some(MockEndpoint { topic })
    }

    fn remove_participant(&self, _participant: MockParticipant) {
        let mut state = self.state.lock();
        state.participants_removed += 1;
        state.listener = None;
    }

    fn write(&self, _endpoint: &MockEndpoint, sample: &T) -> bool {
        let mut state = self.state.lock();
        let accepted = state.write_verdicts.pop_front().unwrap_or(true);
        if accepted {
            state.written.push(sample.clone());
        }
        accepted
    }

    fn wait_for_all_acked(&self, _endpoint: &MockEndpoint, _max_wait: Duration) -> bool {
        self.state.lock().acked
    }
}

/// Minimal sample type for driver tests.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sample {
    /// Payload discriminator, enough to assert on ordering.
    pub value: u32,
}

impl Sample {
    /// Sample carrying `value`.
    #[must_use]
    pub fn new(value: u32) -> Self {
        Self { value }
    }

    /// A backlog of `n` samples numbered `0..n`.
    #[must_use]
    pub fn backlog(n: u32) -> VecDeque<Self> {
        (0..n).map(Self::new).collect()
    }
}

impl TypeSupport for Sample {
    fn type_name() -> &'static str {
        "Sample"
    }
}
