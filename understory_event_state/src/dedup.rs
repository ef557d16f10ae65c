// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Filtering of duplicate event delivery.
//!
//! Some hosts deliver the same physical pointer event twice: once while a
//! container gets a chance to intercept it, and again through normal dispatch.
//! [`EventDedup`] remembers the `(timestamp, action)` key of the last processed
//! event together with the answer that was given, so the second delivery can be
//! answered without being processed again.
//!
//! ```
//! use understory_event_state::dedup::EventDedup;
//!
//! let mut dedup: EventDedup<u8> = EventDedup::new();
//! assert_eq!(dedup.lookup(1000, 0), None);
//! dedup.record(1000, 0, true);
//!
//! // Same event seen through a second dispatch phase.
//! assert_eq!(dedup.lookup(1000, 0), Some(true));
//! // A different action at the same timestamp is a different event.
//! assert_eq!(dedup.lookup(1000, 1), None);
//! ```
//!
//! ## Limitations
//!
//! Two genuinely distinct events with the same timestamp and action are
//! indistinguishable here, and the second one is dropped. Hosts that
//! synthesize events with identical timestamps should reset the filter with
//! [`EventDedup::clear`] between them.

/// Remembers the last processed `(timestamp, action)` pair and its result.
#[derive(Clone, Debug)]
pub struct EventDedup<A, R = bool> {
    last: Option<(u64, A, R)>,
}

impl<A: PartialEq + Copy, R: Copy> EventDedup<A, R> {
    /// Create an empty filter.
    pub const fn new() -> Self {
        Self { last: None }
    }

    /// If `(timestamp, action)` matches the last recorded event, return the
    /// result given for it.
    pub fn lookup(&self, timestamp: u64, action: A) -> Option<R> {
        match self.last {
            Some((t, a, result)) if t == timestamp && a == action => Some(result),
            _ => None,
        }
    }

    /// Record the result of processing `(timestamp, action)`.
    pub fn record(&mut self, timestamp: u64, action: A, result: R) {
        self.last = Some((timestamp, action, result));
    }

    /// Forget the last recorded event.
    pub fn clear(&mut self) {
        self.last = None;
    }
}

impl<A: PartialEq + Copy, R: Copy> Default for EventDedup<A, R> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::EventDedup;

    #[test]
    fn repeated_delivery_returns_recorded_result() {
        let mut dedup: EventDedup<u8> = EventDedup::new();
        dedup.record(10, 2, false);
        assert_eq!(dedup.lookup(10, 2), Some(false));
        assert_eq!(dedup.lookup(10, 2), Some(false));
    }

    #[test]
    fn newer_event_replaces_key() {
        let mut dedup: EventDedup<u8> = EventDedup::new();
        dedup.record(10, 2, true);
        dedup.record(11, 2, false);
        assert_eq!(dedup.lookup(10, 2), None);
        assert_eq!(dedup.lookup(11, 2), Some(false));
    }

    #[test]
    fn clear_forgets_last_event() {
        let mut dedup: EventDedup<u8, u32> = EventDedup::default();
        dedup.record(1, 1, 7);
        dedup.clear();
        assert_eq!(dedup.lookup(1, 1), None);
    }
}
