//! Detector events and the polled event queue
//!
//! ## Overview
//!
//! The detector announces state transitions through a small bounded queue
//! the caller drains once per loop iteration, instead of invoking
//! registered callbacks from inside `process_sample`. This keeps the hot
//! path free of foreign code and replaces the free-standing mutable flags
//! the callback style tends to grow.
//!
//! At-most-one-consumer semantics come from ownership: the queue lives
//! inside the [`FallDetector`](crate::detector::FallDetector) and
//! `poll_event` borrows it mutably, so exactly one caller can drain it.
//!
//! ## Overflow
//!
//! The queue is bounded ([`EVENT_QUEUE_CAPACITY`](crate::constants::buffers))
//! and drops the newest event when full, counting the drops. A caller that
//! polls once per tick will never see the queue more than a few entries
//! deep; the counter exists to surface a stalled caller during bring-up.

use heapless::Deque;

use crate::constants::buffers::EVENT_QUEUE_CAPACITY;
use crate::detector::DetectionState;
use crate::time::Timestamp;

/// State-machine event announced to the caller
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DetectorEvent {
    /// The machine moved between states
    StateChanged {
        /// State before the transition
        from: DetectionState,
        /// State after the transition
        to: DetectionState,
        /// Sample timestamp at which the transition happened
        at: Timestamp,
    },
    /// The full stage sequence completed; the scorer should run now
    PotentialFall {
        /// Sample timestamp of the promotion
        at: Timestamp,
    },
    /// The detection window elapsed mid-sequence; machine auto-reset
    SequenceTimeout {
        /// Sample timestamp of the forced reset
        at: Timestamp,
    },
    /// Movement resumed during inactivity; the wearer recovered
    Recovered {
        /// Sample timestamp of the recovery
        at: Timestamp,
    },
}

/// Bounded FIFO of detector events, drained by the caller
pub(crate) struct EventQueue {
    queue: Deque<DetectorEvent, EVENT_QUEUE_CAPACITY>,
    dropped: u32,
}

impl EventQueue {
    pub(crate) const fn new() -> Self {
        Self {
            queue: Deque::new(),
            dropped: 0,
        }
    }

    /// Enqueue an event; drops it (and counts) when full
    pub(crate) fn push(&mut self, event: DetectorEvent) {
        if self.queue.push_back(event).is_err() {
            self.dropped = self.dropped.saturating_add(1);
        }
    }

    /// Dequeue the oldest pending event
    pub(crate) fn pop(&mut self) -> Option<DetectorEvent> {
        self.queue.pop_front()
    }

    /// Events dropped because the caller stopped polling
    pub(crate) fn dropped(&self) -> u32 {
        self.dropped
    }

    pub(crate) fn clear(&mut self) {
        self.queue.clear();
    }
}
