// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Reliable bounded-retry send loop, one pass at a time.
//!
//! [`drain`] pushes a caller-owned backlog through a non-blocking write
//! primitive until the first rejection, preserving order and never
//! dropping data. A message leaves the queue if and only if its write
//! was accepted; everything from the rejected message onward stays
//! queued, untouched and in order, for a later pass.
//!
//! Retry policy deliberately lives with the caller: this function makes
//! no timing assumptions (how long to wait for flow-control release,
//! how many attempts), it just reports how far one best-effort pass got.
//! The remaining queue length is the signal tests assert on.

use std::collections::VecDeque;

/// Drain `queue` front-to-back through `write`, stopping at the first
/// rejected write. Returns the number of messages accepted.
///
/// Never blocks and never sleeps; a partial drain is a normal outcome
/// under backpressure, not an error.
pub fn drain<T>(queue: &mut VecDeque<T>, mut write: impl FnMut(&T) -> bool) -> usize {
    let mut accepted = 0;

    while let Some(front) = queue.front() {
        if !write(front) {
            log::trace!(
                "write rejected, stopping drain with {} message(s) left",
                queue.len()
            );
            break;
        }
        queue.pop_front();
        accepted += 1;
    }

    accepted
}
