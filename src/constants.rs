//! Constants for the FallGuard detection core
//!
//! Centralized, documented numeric values used across the detector and
//! scorer. Use these instead of magic numbers; when adding new ones,
//! document the source (field tuning, physics, or protocol).
//!
//! Organization:
//! - **detection**: stage thresholds and temporal windows
//! - **scoring**: category caps and confidence-level cut lines
//! - **time**: sampling cadence
//! - **buffers**: fixed memory sizes

/// Stage thresholds and temporal windows for the detection state machine.
pub mod detection {
    /// Acceleration magnitude below which free fall is suspected (g).
    ///
    /// A worn device in unsupported motion reads well under 1g; 0.5g
    /// tolerates arm swing and sensor noise while still triggering on
    /// genuine falls.
    pub const FREEFALL_THRESHOLD_G: f32 = 0.5;

    /// Acceleration magnitude above which impact is suspected (g).
    pub const IMPACT_THRESHOLD_G: f32 = 3.0;

    /// Angular rate above which post-impact rotation is suspected (deg/s).
    pub const ROTATION_THRESHOLD_DPS: f32 = 250.0;

    /// Minimum stillness after impact to suggest incapacitation (ms).
    pub const INACTIVITY_THRESHOLD_MS: u32 = 2000;

    /// Altitude-change threshold used by the external pressure filter (m).
    pub const PRESSURE_CHANGE_THRESHOLD_M: f32 = 1.0;

    /// Sustained free fall required before the stage is confirmed (ms).
    ///
    /// Rejects momentary sub-threshold dips from gestures or bumps.
    pub const FREEFALL_CONFIRM_MS: u32 = 200;

    /// Maximum free-fall-onset to impact-onset offset still linked to the
    /// same fall (ms). Roughly a 5m drop; anything later is unrelated.
    pub const IMPACT_LINK_WINDOW_MS: u32 = 1000;

    /// Inactivity qualifies when acceleration rests near gravity in a new
    /// orientation: magnitude within (min, max) g.
    pub const INACTIVE_ACCEL_MIN_G: f32 = 0.8;
    /// Upper bound of the resting-acceleration band (g).
    pub const INACTIVE_ACCEL_MAX_G: f32 = 1.2;
    /// Angular rate below which the body is considered still (deg/s).
    pub const INACTIVE_ROTATION_DPS: f32 = 50.0;

    /// Maximum wall-clock duration for a full stage sequence before the
    /// machine force-resets to monitoring (ms).
    pub const DETECTION_WINDOW_MS: u32 = 10_000;
}

/// Category caps and confidence-level cut lines for the scorer.
pub mod scoring {
    /// Cap for the Stage 1 (free fall) category.
    pub const STAGE1_CAP: u8 = 25;
    /// Cap for the Stage 2 (impact) category.
    pub const STAGE2_CAP: u8 = 25;
    /// Cap for the Stage 3 (rotation) category.
    pub const STAGE3_CAP: u8 = 20;
    /// Cap for the Stage 4 (inactivity) category.
    pub const STAGE4_CAP: u8 = 20;
    /// Cap for the auxiliary filter category.
    pub const FILTER_CAP: u8 = 15;

    /// Maximum achievable total (sum of all category caps).
    pub const MAX_CONFIDENCE_SCORE: u8 =
        STAGE1_CAP + STAGE2_CAP + STAGE3_CAP + STAGE4_CAP + FILTER_CAP;

    /// Total at or above which confidence is High.
    pub const HIGH_CONFIDENCE_THRESHOLD: u8 = 80;
    /// Total at or above which confidence is Confirmed.
    pub const CONFIRMED_THRESHOLD: u8 = 70;
    /// Total at or above which confidence is Potential.
    pub const POTENTIAL_THRESHOLD: u8 = 50;
    /// Total at or above which confidence is Suspicious.
    pub const SUSPICIOUS_THRESHOLD: u8 = 30;

    /// Minimum Stage 1 score for a sequence to be considered genuine.
    pub const MIN_STAGE1_SCORE: u8 = 5;
    /// Minimum Stage 2 score for a sequence to be considered genuine.
    pub const MIN_STAGE2_SCORE: u8 = 8;
    /// Minimum total for a sequence to be considered genuine.
    pub const MIN_VALID_TOTAL: u8 = 30;
}

/// Sampling cadence of the host loop.
pub mod time {
    /// Milliseconds per second.
    pub const MS_PER_SECOND: u32 = 1000;

    /// Nominal sensor sampling rate of the caller loop (Hz).
    pub const SAMPLE_RATE_HZ: u32 = 100;

    /// Nominal interval between samples (ms).
    pub const SAMPLE_INTERVAL_MS: u32 = MS_PER_SECOND / SAMPLE_RATE_HZ;
}

/// Fixed buffer sizes.
pub mod buffers {
    /// Samples retained for diagnostics/replay (1s at the nominal rate).
    pub const HISTORY_CAPACITY: usize = 100;

    /// Detector events buffered between caller polls.
    pub const EVENT_QUEUE_CAPACITY: usize = 16;
}
