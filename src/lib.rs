//! Staged fall-detection engine for FallGuard
//!
//! Classifies a stream of inertial/environmental sensor samples into a
//! fall-detection state and a 0-105 confidence score for a body-worn
//! safety device.
//!
//! Key constraints:
//! - Runs on ESP32-class hardware (no heap allocation in the hot path)
//! - Sub-millisecond per-sample latency at a 100Hz caller loop
//! - All timing driven by sample timestamps, tolerant of jitter
//!
//! Two engines make up the core:
//! - [`FallDetector`]: temporal state machine recognizing the physical
//!   signature of a fall (free fall -> impact -> rotation -> inactivity)
//! - [`ConfidenceScorer`]: weighted accumulator gating the emergency alert
//!
//! ```no_run
//! use fallguard_core::{FallDetector, ConfidenceScorer, DetectionState, SensorSample};
//!
//! let mut detector = FallDetector::new();
//! let mut scorer = ConfidenceScorer::new();
//!
//! # let sample = SensorSample::default();
//! detector.process_sample(&sample);
//!
//! if detector.state() == DetectionState::PotentialFall {
//!     let m = detector.measurements();
//!     scorer.reset_score();
//!     scorer.add_stage1_score(m.freefall_ms as f32, m.min_fall_accel_g);
//!     scorer.add_stage2_score(m.max_impact_g, m.impact_offset_ms as f32, false);
//!     scorer.add_stage3_score(m.max_rotation_dps, 0.0);
//!     scorer.add_stage4_score(m.inactivity_ms as f32, m.position_stable);
//!     // Escalate when scorer.confidence_level() is high enough
//! }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod alert;
pub mod buffer;
pub mod config;
pub mod constants;
pub mod detector;
pub mod errors;
pub mod events;
pub mod sample;
pub mod scorer;
pub mod time;

// Public API
pub use config::DetectionThresholds;
pub use detector::{DetectionState, FallDetector, StageMeasurements};
pub use errors::{ConfigError, ConfigResult};
pub use events::DetectorEvent;
pub use sample::SensorSample;
pub use scorer::{ConfidenceLevel, ConfidenceScorer, ScoreBreakdown};

/// Crate version string
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
