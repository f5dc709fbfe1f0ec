//! Time handling for the detection core
//!
//! All timing decisions are driven by the caller-supplied monotonic
//! millisecond clock carried on each sample. The detector never reads a
//! hardware timer itself, which keeps every stage decision deterministic
//! and testable, and makes the state machine tolerant of caller jitter:
//! thresholds are expressed as durations, not sample counts.

/// Timestamp in milliseconds since device boot (monotonic, non-decreasing
/// within a detection session)
pub type Timestamp = u64;

/// Elapsed milliseconds between two timestamps, saturating at zero if the
/// clock appears to step backwards
pub fn elapsed_ms(earlier: Timestamp, later: Timestamp) -> u64 {
    later.saturating_sub(earlier)
}
