// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Driver configuration - frozen value built by a fluent builder.
//!
//! The runtime binds attributes at endpoint creation time and ignores
//! later changes; this module makes that binding structural instead of
//! conventional. [`DriverConfigBuilder`] accumulates QoS, transport and
//! identity attributes through self-consuming setters and produces an
//! immutable [`DriverConfig`] that [`crate::PubDriver`] consumes exactly
//! once at `init()`. There is no mutation path after `build()`.
//!
//! No validation happens in the builder: structurally impossible QoS is
//! rejected at `init()` (see [`QosProfile::validate`]), everything else
//! is the runtime's call.

use crate::qos::{
    Durability, History, PublishMode, QosProfile, Reliability, ResourceLimits,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// A transport locator the endpoint announces or sends through.
pub type Locator = SocketAddr;

/// Outbound throughput throttle installed on the participant.
///
/// Caps transmission at `bytes_per_period` bytes every `period`,
/// the knob flow-control scenarios use to provoke backpressure on an
/// otherwise healthy link.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ThroughputController {
    /// Bytes allowed per period.
    pub bytes_per_period: u32,
    /// Length of the throttling period.
    pub period: Duration,
}

/// Transport-level attributes for the participant and endpoint.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransportConfig {
    /// Replace the runtime's builtin transports with user-supplied ones.
    pub disable_builtin_transports: bool,
    /// Names of user transport descriptors to install, in order.
    pub user_transports: Vec<String>,
    /// Unicast locators announced for this endpoint.
    pub unicast_locators: Vec<Locator>,
    /// Multicast locators announced for this endpoint.
    pub multicast_locators: Vec<Locator>,
    /// Locators used for outbound traffic.
    pub out_locators: Vec<Locator>,
    /// Static endpoint discovery file. Setting this switches the
    /// participant from simple endpoint discovery to static discovery.
    pub static_endpoint_file: Option<PathBuf>,
    /// Outbound throughput throttle, unlimited when unset.
    pub throughput_controller: Option<ThroughputController>,
}

impl TransportConfig {
    /// Whether simple endpoint discovery is in use (no static file).
    #[must_use]
    pub fn uses_simple_discovery(&self) -> bool {
        self.static_endpoint_file.is_none()
    }
}

/// Identity attributes of the driven endpoint.
///
/// Topic-name uniqueness comes from `unique_token`, an explicitly
/// injected value (test-run id, UUID, counter) rather than anything
/// derived from the host or process environment, so the resolved name
/// is a deterministic function of the configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EndpointIdentity {
    /// User-defined endpoint id (static discovery matching).
    pub user_id: u8,
    /// Entity id (static discovery matching).
    pub entity_id: u8,
    /// Manual topic name; overrides the generated one when set.
    pub manual_topic_name: Option<String>,
    /// Caller-injected uniqueness token appended to the base topic name.
    pub unique_token: Option<String>,
}

/// Frozen driver configuration.
///
/// Plain data with no interior mutability: once built, attribute changes
/// are impossible, which is exactly the create-time binding contract of
/// the runtime.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DriverConfig {
    /// Base topic name, decorated by the unique token unless a manual
    /// name is set.
    pub base_topic: String,
    /// QoS the endpoint is created with.
    pub qos: QosProfile,
    /// Transport attributes.
    pub transport: TransportConfig,
    /// Identity attributes.
    pub identity: EndpointIdentity,
}

impl DriverConfig {
    /// Start building a configuration for the given base topic.
    #[must_use]
    pub fn builder(base_topic: impl Into<String>) -> DriverConfigBuilder {
        DriverConfigBuilder {
            base_topic: base_topic.into(),
            qos: QosProfile::default(),
            transport: TransportConfig::default(),
            identity: EndpointIdentity::default(),
        }
    }

    /// Validate the configuration before handing it to the runtime.
    ///
    /// Only structural QoS rules are checked locally (see
    /// [`QosProfile::validate`]); compatibility with remote endpoints is
    /// the runtime's business.
    ///
    /// # Errors
    ///
    /// [`crate::Error::InvalidQos`] naming the violated rule.
    pub fn validate(&self) -> crate::Result<()> {
        self.qos.validate().map_err(crate::Error::InvalidQos)
    }

    /// Resolve the topic name the endpoint will be created with.
    ///
    /// Manual name wins; otherwise `"{base}_{token}"`, or the bare base
    /// name when no token was injected.
    #[must_use]
    pub fn topic_name(&self) -> String {
        if let Some(ref manual) = self.identity.manual_topic_name {
            return manual.clone();
        }
        match self.identity.unique_token {
            Some(ref token) => format!("{}_{}", self.base_topic, token),
            None => self.base_topic.clone(),
        }
    }
}

/// Fluent builder for [`DriverConfig`].
///
/// Each setter consumes and returns the builder, so a configuration
/// reads as one chained expression:
///
/// ```
/// use pubsub_blackbox::config::DriverConfig;
/// use pubsub_blackbox::qos::{History, Reliability};
///
/// let config = DriverConfig::builder("StringTopic")
///     .reliability(Reliability::Reliable)
///     .history(History::KeepLast(100))
///     .unique_token("run42")
///     .build();
///
/// assert_eq!(config.topic_name(), "StringTopic_run42");
/// ```
#[derive(Clone, Debug)]
pub struct DriverConfigBuilder {
    base_topic: String,
    qos: QosProfile,
    transport: TransportConfig,
    identity: EndpointIdentity,
}

impl DriverConfigBuilder {
    /// Set the reliability kind.
    #[must_use]
    pub fn reliability(mut self, kind: Reliability) -> Self {
        self.qos.reliability = kind;
        self
    }

    /// Set the durability kind.
    #[must_use]
    pub fn durability(mut self, kind: Durability) -> Self {
        self.qos.durability = kind;
        self
    }

    /// Set the history policy (kind and depth).
    #[must_use]
    pub fn history(mut self, history: History) -> Self {
        self.qos.history = history;
        self
    }

    /// Set the publish mode.
    #[must_use]
    pub fn publish_mode(mut self, mode: PublishMode) -> Self {
        self.qos.publish_mode = mode;
        self
    }

    /// Replace the resource limits wholesale.
    #[must_use]
    pub fn resource_limits(mut self, limits: ResourceLimits) -> Self {
        self.qos.resource_limits = limits;
        self
    }

    /// Set the maximum sample count of the endpoint cache.
    #[must_use]
    pub fn max_samples(mut self, max: u32) -> Self {
        self.qos.resource_limits.max_samples = max;
        self
    }

    /// Set the preallocated sample count of the endpoint cache.
    #[must_use]
    pub fn allocated_samples(mut self, initial: u32) -> Self {
        self.qos.resource_limits.allocated_samples = initial;
        self
    }

    /// Set the reliable-protocol heartbeat period.
    #[must_use]
    pub fn heartbeat_period(mut self, period: Duration) -> Self {
        self.qos.timings.heartbeat_period = period;
        self
    }

    /// Set the reliable-protocol NACK response delay.
    #[must_use]
    pub fn nack_response_delay(mut self, delay: Duration) -> Self {
        self.qos.timings.nack_response_delay = delay;
        self
    }

    /// Disable the runtime's builtin transports.
    #[must_use]
    pub fn disable_builtin_transports(mut self) -> Self {
        self.transport.disable_builtin_transports = true;
        self
    }

    /// Append a user transport descriptor.
    #[must_use]
    pub fn add_user_transport(mut self, descriptor: impl Into<String>) -> Self {
        self.transport.user_transports.push(descriptor.into());
        self
    }

    /// Set the unicast locator list.
    #[must_use]
    pub fn unicast_locators(mut self, locators: Vec<Locator>) -> Self {
        self.transport.unicast_locators = locators;
        self
    }

    /// Set the multicast locator list.
    #[must_use]
    pub fn multicast_locators(mut self, locators: Vec<Locator>) -> Self {
        self.transport.multicast_locators = locators;
        self
    }

    /// Set the outbound locator list.
    #[must_use]
    pub fn out_locators(mut self, locators: Vec<Locator>) -> Self {
        self.transport.out_locators = locators;
        self
    }

    /// Throttle outbound throughput to `bytes_per_period` per `period`.
    #[must_use]
    pub fn throughput_controller(mut self, bytes_per_period: u32, period: Duration) -> Self {
        self.transport.throughput_controller = Some(ThroughputController {
            bytes_per_period,
            period,
        });
        self
    }

    /// Switch to static endpoint discovery driven by the given file.
    #[must_use]
    pub fn static_discovery(mut self, file: impl Into<PathBuf>) -> Self {
        self.transport.static_endpoint_file = Some(file.into());
        self
    }

    /// Force an exact topic name instead of the generated one.
    #[must_use]
    pub fn manual_topic_name(mut self, name: impl Into<String>) -> Self {
        self.identity.manual_topic_name = Some(name.into());
        self
    }

    /// Set the user-defined and entity ids used by static discovery.
    #[must_use]
    pub fn endpoint_ids(mut self, user_id: u8, entity_id: u8) -> Self {
        self.identity.user_id = user_id;
        self.identity.entity_id = entity_id;
        self
    }

    /// Inject the uniqueness token appended to the base topic name.
    #[must_use]
    pub fn unique_token(mut self, token: impl Into<String>) -> Self {
        self.identity.unique_token = Some(token.into());
        self
    }

    /// Freeze the accumulated attributes into a [`DriverConfig`].
    #[must_use]
    pub fn build(self) -> DriverConfig {
        DriverConfig {
            base_topic: self.base_topic,
            qos: self.qos,
            transport: self.transport,
            identity: self.identity,
        }
    }
}
