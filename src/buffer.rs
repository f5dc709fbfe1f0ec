//! Fixed-capacity sample history for diagnostics and replay
//!
//! ## Overview
//!
//! The detector keeps the most recent samples in a circular (ring) buffer
//! so that a confirmed fall can be shipped to the emergency collaborator
//! with a second of leading context. The buffer is independent of the
//! stage timers: it keeps filling in every state and survives `reset()`.
//!
//! ## Design
//!
//! Capacity is a const generic fixed at compile time, so the buffer uses
//! fixed memory with no heap allocation:
//! - O(1) insertion, overwriting the oldest sample when full
//! - O(1) access to the most recent sample
//! - Bounded chronological iteration, oldest first
//!
//! When full we always overwrite rather than error: for a crash replay the
//! newest data is strictly more valuable than the oldest. The write index
//! wraps with `% N`; the oldest element sits at the write index once the
//! buffer has wrapped.
//!
//! No raw indices or pointers are exposed - collaborators only get the
//! bounded iterator and `last()`.

use crate::sample::SensorSample;

/// Fixed-size circular buffer of recent sensor samples
///
/// Maintains these invariants:
/// - `write_pos < N`
/// - `len <= N`
/// - iteration yields samples in chronological order
///
/// Not thread-safe; the detection core is single-writer single-reader by
/// contract (the caller serializes access).
#[derive(Clone)]
pub struct SampleHistory<const N: usize> {
    /// Storage using Option for not-yet-written slots; avoids unsafe code
    data: [Option<SensorSample>; N],
    /// Index of the next write, wraps at N
    write_pos: usize,
    /// Number of valid samples, saturates at N
    len: usize,
}

impl<const N: usize> SampleHistory<N> {
    /// Create an empty history buffer
    pub const fn new() -> Self {
        Self {
            data: [None; N],
            write_pos: 0,
            len: 0,
        }
    }

    /// Append a sample, overwriting the oldest when full
    pub fn push(&mut self, sample: SensorSample) {
        self.data[self.write_pos] = Some(sample);
        self.write_pos = (self.write_pos + 1) % N;

        if self.len < N {
            self.len += 1;
        }
    }

    /// Number of stored samples
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the buffer holds no samples
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether the buffer is at capacity (and overwriting)
    pub fn is_full(&self) -> bool {
        self.len == N
    }

    /// Most recent sample, if any
    pub fn last(&self) -> Option<&SensorSample> {
        if self.is_empty() {
            return None;
        }

        let idx = if self.write_pos == 0 { N - 1 } else { self.write_pos - 1 };
        self.data[idx].as_ref()
    }

    /// Iterate from oldest to newest
    pub fn iter(&self) -> SampleHistoryIter<'_, N> {
        SampleHistoryIter {
            buffer: self,
            count: 0,
        }
    }

    /// Drop all samples
    pub fn clear(&mut self) {
        self.write_pos = 0;
        self.len = 0;
    }

    /// Sample by logical index (0 = oldest)
    ///
    /// Before the first wrap, logical and physical indices match; after
    /// wrapping, the oldest sample sits at `write_pos` and the logical
    /// index is offset from there.
    fn get(&self, index: usize) -> Option<&SensorSample> {
        if index >= self.len {
            return None;
        }

        let actual = if self.len < N {
            index
        } else {
            (self.write_pos + index) % N
        };

        self.data[actual].as_ref()
    }
}

impl<const N: usize> Default for SampleHistory<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over history contents, oldest first
pub struct SampleHistoryIter<'a, const N: usize> {
    buffer: &'a SampleHistory<N>,
    count: usize,
}

impl<'a, const N: usize> Iterator for SampleHistoryIter<'a, N> {
    type Item = &'a SensorSample;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.buffer.get(self.count)?;
        self.count += 1;
        Some(item)
    }
}
