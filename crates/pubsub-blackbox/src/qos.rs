// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! QoS (Quality of Service) policies offered by the driven endpoint.
//!
//! These mirror the policy dimensions a publish-side endpoint is created
//! with: reliability, durability, history, resource limits, publish mode
//! and the reliable-protocol timing knobs. The driver does not interpret
//! them beyond structural validation; it hands them to the runtime at
//! endpoint creation and observes the resulting behavior from outside.

use std::time::Duration;

/// Reliability policy.
///
/// Determines delivery guarantees offered by the endpoint under test.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Reliability {
    /// Fire-and-forget (no ACKs, no retransmission).
    #[default]
    BestEffort,
    /// Reliable delivery with NACK-driven retransmission.
    Reliable,
}

/// Durability policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Durability {
    /// No persistence (samples lost on writer teardown).
    #[default]
    Volatile,
    /// Writer caches samples for late-joining readers.
    TransientLocal,
    /// Writer persists samples across restarts.
    Persistent,
}

/// History policy.
///
/// Encodes both the history kind and its depth: `KeepLast(n)` is a
/// bounded queue of depth `n`, `KeepAll` keeps everything within
/// resource limits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum History {
    /// Keep last N samples (bounded queue, drops oldest).
    KeepLast(u32),
    /// Keep all samples within resource limits.
    KeepAll,
}

impl Default for History {
    fn default() -> Self {
        Self::KeepLast(10)
    }
}

/// Publish mode policy.
///
/// Synchronous writes publish on the calling thread; asynchronous writes
/// hand the sample to a flow-controlled background path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PublishMode {
    /// Publish on the calling thread.
    #[default]
    Synchronous,
    /// Publish through the runtime's asynchronous flow controller.
    Asynchronous,
}

/// Resource limits for the endpoint's sample cache.
///
/// `max_samples` is the knob blackbox flow-control scenarios turn down
/// to force write rejections.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResourceLimits {
    /// Maximum total samples across all instances.
    pub max_samples: u32,
    /// Samples preallocated at endpoint creation.
    pub allocated_samples: u32,
    /// Maximum instances.
    pub max_instances: u32,
    /// Maximum samples per instance.
    pub max_samples_per_instance: u32,
}

impl Default for ResourceLimits {
    fn default() -> Self {
        Self {
            max_samples: 5000,
            allocated_samples: 100,
            max_instances: 1,
            max_samples_per_instance: 5000,
        }
    }
}

/// Timing parameters of the reliable protocol.
///
/// Defaults to 100 ms for both, the conventional blackbox setting that
/// keeps reliable-mode tests fast without flooding the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReliableTimings {
    /// Period between HEARTBEAT announcements.
    pub heartbeat_period: Duration,
    /// Delay before answering a NACK with retransmissions.
    pub nack_response_delay: Duration,
}

impl Default for ReliableTimings {
    fn default() -> Self {
        Self {
            heartbeat_period: Duration::from_millis(100),
            nack_response_delay: Duration::from_millis(100),
        }
    }
}

/// QoS profile - collection of policies the endpoint is created with.
///
/// Validated at driver initialization (fail-fast on structurally
/// impossible configurations); policy *compatibility* with remote
/// endpoints remains the runtime's business.
///
/// # Examples
///
/// ```
/// use pubsub_blackbox::qos::{QosProfile, History, Reliability};
///
/// let qos = QosProfile {
///     reliability: Reliability::Reliable,
///     history: History::KeepLast(100),
///     ..Default::default()
/// };
/// assert!(qos.validate().is_ok());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct QosProfile {
    /// Reliability policy.
    pub reliability: Reliability,
    /// Durability policy.
    pub durability: Durability,
    /// History policy (KeepLast or KeepAll).
    pub history: History,
    /// Publish mode (synchronous or asynchronous).
    pub publish_mode: PublishMode,
    /// Resource limits (sample cache sizing).
    pub resource_limits: ResourceLimits,
    /// Reliable-protocol timing parameters.
    pub timings: ReliableTimings,
}

impl QosProfile {
    /// Profile with reliable delivery, the default for blackbox
    /// reliability scenarios.
    #[must_use]
    pub fn reliable() -> Self {
        Self {
            reliability: Reliability::Reliable,
            ..Default::default()
        }
    }

    /// Profile with best-effort delivery.
    #[must_use]
    pub fn best_effort() -> Self {
        Self {
            reliability: Reliability::BestEffort,
            ..Default::default()
        }
    }

    /// Validate the profile.
    ///
    /// # Validation Rules
    ///
    /// - `History::KeepLast(n)` requires n > 0
    /// - `History::KeepAll` requires `ResourceLimits.max_samples` > 0
    /// - `max_samples >= max_samples_per_instance * max_instances`
    ///
    /// # Errors
    ///
    /// Returns a human-readable message naming the violated rule.
    pub fn validate(&self) -> Result<(), String> {
        match self.history {
            History::KeepLast(0) => {
                return Err("History::KeepLast(n) requires n > 0".to_string());
            }
            History::KeepAll => {
                if self.resource_limits.max_samples == 0 {
                    return Err(
                        "History::KeepAll requires ResourceLimits.max_samples > 0".to_string()
                    );
                }
            }
            History::KeepLast(_) => {}
        }

        let rl = &self.resource_limits;
        // An overflowing product necessarily exceeds any u32 max_samples.
        let required = rl
            .max_samples_per_instance
            .checked_mul(rl.max_instances);
        if required.map_or(true, |required| rl.max_samples < required) {
            return Err(format!(
                "max_samples ({}) must be >= max_samples_per_instance ({}) * max_instances ({})",
                rl.max_samples, rl.max_samples_per_instance, rl.max_instances
            ));
        }

        Ok(())
    }
}
