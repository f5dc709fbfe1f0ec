//! Weighted confidence scoring for a completed stage sequence
//!
//! ## Overview
//!
//! Invoked once per detection cycle, after the stage detector reaches
//! `POTENTIAL_FALL`. Each `add_*_score` call takes raw physical
//! measurements, maps them through a fixed bucketed table, and stores the
//! capped category contribution. Calling the same category again
//! overwrites its prior contribution (idempotent per category, never
//! additive across repeated calls).
//!
//! ## Score budget
//!
//! | Category            | Components                      | Cap |
//! |---------------------|---------------------------------|-----|
//! | Stage 1 (free fall) | duration + magnitude            | 25  |
//! | Stage 2 (impact)    | magnitude + timing + FSR        | 25  |
//! | Stage 3 (rotation)  | angular + orientation           | 20  |
//! | Stage 4 (inactivity)| duration + stability            | 20  |
//! | Filters             | pressure + heart rate + FSR     | 15  |
//!
//! The total is implicitly capped at 105. Category caps are clamped
//! before aggregation even though the raw bucket sums cannot exceed them
//! except through the stage 2 FSR bonus; the clamp is an invariant, not a
//! normal-path correction.
//!
//! The validity gate [`ConfidenceScorer::is_valid_fall_sequence`] is
//! independent of the level mapping: it rejects sequences that score
//! moderately high through filter bonuses alone, without genuine
//! free-fall and impact evidence.

use crate::constants::scoring;

/// Discrete confidence classification derived from the total score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ConfidenceLevel {
    /// Total below every cut line; not a fall
    NoFall = 0,
    /// Weak evidence; worth watching, not alerting
    Suspicious = 1,
    /// Plausible fall; alert with user-cancel countdown
    Potential = 2,
    /// Strong evidence; alert
    Confirmed = 3,
    /// Overwhelming evidence; alert immediately
    High = 4,
}

impl ConfidenceLevel {
    /// Map a total score onto the fixed cut lines
    pub const fn from_score(total: u8) -> Self {
        if total >= scoring::HIGH_CONFIDENCE_THRESHOLD {
            ConfidenceLevel::High
        } else if total >= scoring::CONFIRMED_THRESHOLD {
            ConfidenceLevel::Confirmed
        } else if total >= scoring::POTENTIAL_THRESHOLD {
            ConfidenceLevel::Potential
        } else if total >= scoring::SUSPICIOUS_THRESHOLD {
            ConfidenceLevel::Suspicious
        } else {
            ConfidenceLevel::NoFall
        }
    }

    /// Human-readable level name
    pub const fn name(&self) -> &'static str {
        match self {
            ConfidenceLevel::NoFall => "NO_FALL",
            ConfidenceLevel::Suspicious => "SUSPICIOUS",
            ConfidenceLevel::Potential => "POTENTIAL",
            ConfidenceLevel::Confirmed => "CONFIRMED",
            ConfidenceLevel::High => "HIGH",
        }
    }
}

/// Capped per-category totals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScoreBreakdown {
    /// Stage 1 (free fall) category, capped at 25
    pub stage1: u8,
    /// Stage 2 (impact) category, capped at 25
    pub stage2: u8,
    /// Stage 3 (rotation) category, capped at 20
    pub stage3: u8,
    /// Stage 4 (inactivity) category, capped at 20
    pub stage4: u8,
    /// Auxiliary filter category, capped at 15
    pub filters: u8,
}

/// Named components of the Stage 1 category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stage1Breakdown {
    /// Free-fall duration component
    pub duration: u8,
    /// Minimum-magnitude (weightlessness depth) component
    pub magnitude: u8,
}

/// Named components of the Stage 2 category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stage2Breakdown {
    /// Impact-magnitude component
    pub impact: u8,
    /// Free-fall-to-impact timing component
    pub timing: u8,
    /// Force-sensor confirmation bonus
    pub fsr: u8,
}

/// Named components of the Stage 3 category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stage3Breakdown {
    /// Peak angular-rate component
    pub angular: u8,
    /// Orientation-change component
    pub orientation: u8,
}

/// Named components of the Stage 4 category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stage4Breakdown {
    /// Inactivity-duration component
    pub inactivity: u8,
    /// Position-stability component
    pub stability: u8,
}

/// Named components of the filter category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FilterBreakdown {
    /// Barometric altitude-change component
    pub pressure: u8,
    /// Heart-rate-change component
    pub heart_rate: u8,
    /// Device-attachment (FSR) component
    pub fsr: u8,
}

/// Stateful confidence accumulator, used once per detection cycle
#[derive(Debug, Clone, Default)]
pub struct ConfidenceScorer {
    stage1: Stage1Breakdown,
    stage2: Stage2Breakdown,
    stage3: Stage3Breakdown,
    stage4: Stage4Breakdown,
    filters: FilterBreakdown,
}

impl ConfidenceScorer {
    /// Create a zeroed scorer
    pub fn new() -> Self {
        Self::default()
    }

    /// Zero all categories; call at the start of each detection cycle
    pub fn reset_score(&mut self) {
        *self = Self::default();
    }

    /// Score the free-fall stage from its duration and minimum magnitude
    pub fn add_stage1_score(&mut self, duration_ms: f32, min_magnitude_g: f32) {
        self.stage1 = Stage1Breakdown {
            duration: duration_score(duration_ms),
            magnitude: magnitude_score(min_magnitude_g),
        };

        #[cfg(feature = "log")]
        log::debug!(
            "stage 1 score: {}/{} (duration {}, magnitude {})",
            self.breakdown().stage1,
            scoring::STAGE1_CAP,
            self.stage1.duration,
            self.stage1.magnitude,
        );
    }

    /// Score the impact stage from its magnitude, timing offset, and the
    /// force-sensor impact flag
    pub fn add_stage2_score(&mut self, impact_g: f32, timing_ms: f32, fsr_detected: bool) {
        self.stage2 = Stage2Breakdown {
            impact: impact_score(impact_g),
            timing: timing_score(timing_ms),
            fsr: if fsr_detected { 7 } else { 0 },
        };

        #[cfg(feature = "log")]
        log::debug!(
            "stage 2 score: {}/{} (impact {}, timing {}, fsr {})",
            self.breakdown().stage2,
            scoring::STAGE2_CAP,
            self.stage2.impact,
            self.stage2.timing,
            self.stage2.fsr,
        );
    }

    /// Score the rotation stage from the peak angular rate and the total
    /// orientation change
    pub fn add_stage3_score(&mut self, angular_dps: f32, orientation_deg: f32) {
        self.stage3 = Stage3Breakdown {
            angular: angular_score(angular_dps),
            orientation: orientation_score(orientation_deg),
        };

        #[cfg(feature = "log")]
        log::debug!(
            "stage 3 score: {}/{} (angular {}, orientation {})",
            self.breakdown().stage3,
            scoring::STAGE3_CAP,
            self.stage3.angular,
            self.stage3.orientation,
        );
    }

    /// Score the inactivity stage from its duration and stability flag
    pub fn add_stage4_score(&mut self, inactivity_ms: f32, stable: bool) {
        self.stage4 = Stage4Breakdown {
            inactivity: inactivity_score(inactivity_ms),
            stability: if stable { 5 } else { 0 },
        };

        #[cfg(feature = "log")]
        log::debug!(
            "stage 4 score: {}/{} (inactivity {}, stability {})",
            self.breakdown().stage4,
            scoring::STAGE4_CAP,
            self.stage4.inactivity,
            self.stage4.stability,
        );
    }

    /// Score the barometric filter from the absolute altitude change
    pub fn add_pressure_filter_score(&mut self, altitude_change_m: f32) {
        self.filters.pressure = pressure_score(libm::fabsf(altitude_change_m));
    }

    /// Score the heart-rate filter from the rate change (either direction)
    pub fn add_heart_rate_filter_score(&mut self, hr_change_bpm: f32) {
        self.filters.heart_rate = heart_rate_score(libm::fabsf(hr_change_bpm));
    }

    /// Score the device-attachment filter from the force-sensor flags
    pub fn add_fsr_filter_score(&mut self, impact_detected: bool, strap_secure: bool) {
        let mut score = 0;
        if strap_secure {
            score += 2; // device attached throughout the sequence
        }
        if impact_detected {
            score += 3; // impact spike on the strap sensor
        }
        self.filters.fsr = score;
    }

    /// Capped per-category totals
    pub fn breakdown(&self) -> ScoreBreakdown {
        ScoreBreakdown {
            stage1: cap(self.stage1.duration + self.stage1.magnitude, scoring::STAGE1_CAP),
            stage2: cap(
                self.stage2.impact + self.stage2.timing + self.stage2.fsr,
                scoring::STAGE2_CAP,
            ),
            stage3: cap(
                self.stage3.angular + self.stage3.orientation,
                scoring::STAGE3_CAP,
            ),
            stage4: cap(
                self.stage4.inactivity + self.stage4.stability,
                scoring::STAGE4_CAP,
            ),
            filters: cap(
                self.filters.pressure + self.filters.heart_rate + self.filters.fsr,
                scoring::FILTER_CAP,
            ),
        }
    }

    /// Sum of the five capped category scores (0-105)
    pub fn total_score(&self) -> u8 {
        let b = self.breakdown();
        b.stage1 + b.stage2 + b.stage3 + b.stage4 + b.filters
    }

    /// Discrete confidence classification of the current total
    pub fn confidence_level(&self) -> ConfidenceLevel {
        ConfidenceLevel::from_score(self.total_score())
    }

    /// Gate rejecting sequences without genuine free-fall/impact evidence
    ///
    /// Independent of the level mapping: filter bonuses alone can push the
    /// total past SUSPICIOUS, but never past this gate.
    pub fn is_valid_fall_sequence(&self) -> bool {
        let b = self.breakdown();
        b.stage1 >= scoring::MIN_STAGE1_SCORE
            && b.stage2 >= scoring::MIN_STAGE2_SCORE
            && self.total_score() >= scoring::MIN_VALID_TOTAL
    }

    /// Stage 1 component detail
    pub fn stage1_breakdown(&self) -> Stage1Breakdown {
        self.stage1
    }

    /// Stage 2 component detail
    pub fn stage2_breakdown(&self) -> Stage2Breakdown {
        self.stage2
    }

    /// Stage 3 component detail
    pub fn stage3_breakdown(&self) -> Stage3Breakdown {
        self.stage3
    }

    /// Stage 4 component detail
    pub fn stage4_breakdown(&self) -> Stage4Breakdown {
        self.stage4
    }

    /// Filter component detail
    pub fn filter_breakdown(&self) -> FilterBreakdown {
        self.filters
    }
}

fn cap(score: u8, max: u8) -> u8 {
    score.min(max)
}

// Bucketed scoring tables. Deterministic piecewise functions; thresholds
// come from wear-trial tuning on the reference hardware.

fn duration_score(duration_ms: f32) -> u8 {
    if duration_ms >= 500.0 {
        15 // extended fall
    } else if duration_ms >= 200.0 {
        10 // typical fall
    } else if duration_ms >= 100.0 {
        5 // brief drop
    } else {
        0
    }
}

fn magnitude_score(magnitude_g: f32) -> u8 {
    if magnitude_g <= 0.1 {
        10 // true free fall
    } else if magnitude_g <= 0.3 {
        8 // significant weightlessness
    } else if magnitude_g <= 0.5 {
        5 // partial weightlessness
    } else {
        0
    }
}

fn impact_score(impact_g: f32) -> u8 {
    if impact_g >= 6.0 {
        15 // severe impact
    } else if impact_g >= 4.0 {
        12 // significant impact
    } else if impact_g >= 3.0 {
        8 // moderate impact
    } else {
        0
    }
}

fn timing_score(timing_ms: f32) -> u8 {
    if timing_ms <= 500.0 {
        5 // immediate impact
    } else if timing_ms <= 1000.0 {
        3 // delayed impact
    } else {
        0
    }
}

fn angular_score(angular_dps: f32) -> u8 {
    if angular_dps >= 600.0 {
        15 // severe rotation
    } else if angular_dps >= 400.0 {
        12 // significant rotation
    } else if angular_dps >= 250.0 {
        8 // moderate rotation
    } else {
        0
    }
}

fn orientation_score(orientation_deg: f32) -> u8 {
    if orientation_deg >= 90.0 {
        5
    } else if orientation_deg >= 45.0 {
        3
    } else {
        0
    }
}

fn inactivity_score(duration_ms: f32) -> u8 {
    if duration_ms >= 10_000.0 {
        15 // extended incapacitation
    } else if duration_ms >= 5000.0 {
        12 // moderate incapacitation
    } else if duration_ms >= 2000.0 {
        8 // brief incapacitation
    } else {
        0
    }
}

fn pressure_score(altitude_change_m: f32) -> u8 {
    if altitude_change_m >= 2.0 {
        5 // significant fall height
    } else if altitude_change_m >= 1.0 {
        3
    } else if altitude_change_m >= 0.5 {
        2
    } else {
        0
    }
}

fn heart_rate_score(hr_change_bpm: f32) -> u8 {
    if hr_change_bpm >= 30.0 {
        5 // major stress response
    } else if hr_change_bpm >= 10.0 {
        3
    } else if hr_change_bpm >= 2.0 {
        2
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn reset_yields_zero_and_no_fall() {
        let mut scorer = ConfidenceScorer::new();
        scorer.add_stage1_score(400.0, 0.1);
        scorer.reset_score();

        assert_eq!(scorer.total_score(), 0);
        assert_eq!(scorer.confidence_level(), ConfidenceLevel::NoFall);
        assert!(!scorer.is_valid_fall_sequence());
    }

    #[test]
    fn maxed_inputs_reach_full_score() {
        let mut scorer = ConfidenceScorer::new();
        scorer.add_stage1_score(800.0, 0.05);
        scorer.add_stage2_score(8.0, 100.0, true);
        scorer.add_stage3_score(800.0, 150.0);
        scorer.add_stage4_score(15_000.0, true);
        scorer.add_pressure_filter_score(3.0);
        scorer.add_heart_rate_filter_score(50.0);
        scorer.add_fsr_filter_score(true, true);

        assert_eq!(scorer.total_score(), 105);
        assert_eq!(scorer.confidence_level(), ConfidenceLevel::High);
        assert!(scorer.is_valid_fall_sequence());

        // Stage 2 raw sum is 15+5+7 = 27; the cap clamps it to 25
        assert_eq!(scorer.breakdown().stage2, 25);
    }

    #[test]
    fn typical_fall_confirms() {
        let mut scorer = ConfidenceScorer::new();
        scorer.add_stage1_score(350.0, 0.15);
        scorer.add_stage2_score(4.2, 300.0, true);
        scorer.add_stage3_score(420.0, 85.0);
        scorer.add_stage4_score(3500.0, true);
        scorer.add_pressure_filter_score(1.5);
        scorer.add_heart_rate_filter_score(20.0);
        scorer.add_fsr_filter_score(true, true);

        let total = scorer.total_score();
        assert!((75..=90).contains(&total), "total was {total}");
        assert!(scorer.confidence_level() >= ConfidenceLevel::Confirmed);
        assert!(scorer.is_valid_fall_sequence());
    }

    #[test]
    fn device_drop_stays_low() {
        let mut scorer = ConfidenceScorer::new();
        scorer.add_stage1_score(150.0, 0.3);
        scorer.add_stage2_score(2.8, 600.0, false);
        scorer.add_stage3_score(180.0, 25.0);
        scorer.add_stage4_score(800.0, false);

        assert!(scorer.total_score() < 50);
        assert!(scorer.confidence_level() <= ConfidenceLevel::Potential);
    }

    #[test]
    fn filter_bonuses_alone_never_validate() {
        let mut scorer = ConfidenceScorer::new();
        scorer.add_stage3_score(800.0, 150.0);
        scorer.add_stage4_score(15_000.0, true);
        scorer.add_pressure_filter_score(3.0);
        scorer.add_heart_rate_filter_score(50.0);
        scorer.add_fsr_filter_score(true, true);

        // 20 + 20 + 15 = 55, past the POTENTIAL cut line
        assert!(scorer.total_score() >= 30);
        assert!(!scorer.is_valid_fall_sequence());
    }

    #[test]
    fn categories_overwrite_not_accumulate() {
        let mut scorer = ConfidenceScorer::new();
        scorer.add_stage1_score(800.0, 0.05); // 25
        scorer.add_stage1_score(150.0, 0.4); // 5 + 5 = 10
        assert_eq!(scorer.breakdown().stage1, 10);

        scorer.add_fsr_filter_score(true, true);
        scorer.add_fsr_filter_score(false, false);
        assert_eq!(scorer.filter_breakdown().fsr, 0);
    }

    #[test]
    fn heart_rate_change_direction_is_ignored() {
        let mut scorer = ConfidenceScorer::new();
        scorer.add_heart_rate_filter_score(-35.0); // bradycardic response
        assert_eq!(scorer.filter_breakdown().heart_rate, 5);
    }

    #[test]
    fn bucket_edges() {
        assert_eq!(duration_score(500.0), 15);
        assert_eq!(duration_score(499.9), 10);
        assert_eq!(duration_score(99.9), 0);

        assert_eq!(magnitude_score(0.1), 10);
        assert_eq!(magnitude_score(0.5), 5);
        assert_eq!(magnitude_score(0.51), 0);

        assert_eq!(impact_score(6.0), 15);
        assert_eq!(impact_score(3.0), 8);
        assert_eq!(impact_score(2.99), 0);

        assert_eq!(timing_score(500.0), 5);
        assert_eq!(timing_score(1000.0), 3);
        assert_eq!(timing_score(1000.1), 0);

        assert_eq!(angular_score(250.0), 8);
        assert_eq!(inactivity_score(2000.0), 8);
        assert_eq!(pressure_score(0.5), 2);
        assert_eq!(heart_rate_score(2.0), 2);
    }

    #[test]
    fn level_cut_lines() {
        assert_eq!(ConfidenceLevel::from_score(105), ConfidenceLevel::High);
        assert_eq!(ConfidenceLevel::from_score(80), ConfidenceLevel::High);
        assert_eq!(ConfidenceLevel::from_score(79), ConfidenceLevel::Confirmed);
        assert_eq!(ConfidenceLevel::from_score(70), ConfidenceLevel::Confirmed);
        assert_eq!(ConfidenceLevel::from_score(69), ConfidenceLevel::Potential);
        assert_eq!(ConfidenceLevel::from_score(50), ConfidenceLevel::Potential);
        assert_eq!(ConfidenceLevel::from_score(49), ConfidenceLevel::Suspicious);
        assert_eq!(ConfidenceLevel::from_score(30), ConfidenceLevel::Suspicious);
        assert_eq!(ConfidenceLevel::from_score(29), ConfidenceLevel::NoFall);
        assert_eq!(ConfidenceLevel::from_score(0), ConfidenceLevel::NoFall);
    }

    proptest! {
        #[test]
        fn caps_hold_for_arbitrary_inputs(
            duration in -1000.0f32..20_000.0,
            min_mag in -1.0f32..5.0,
            impact in -1.0f32..20.0,
            timing in -100.0f32..5000.0,
            fsr in any::<bool>(),
            angular in -10.0f32..2000.0,
            orientation in -10.0f32..360.0,
            inactivity in -100.0f32..60_000.0,
            stable in any::<bool>(),
            altitude in -10.0f32..10.0,
            hr in -100.0f32..100.0,
            fsr_impact in any::<bool>(),
            strap in any::<bool>(),
        ) {
            let mut scorer = ConfidenceScorer::new();
            scorer.add_stage1_score(duration, min_mag);
            scorer.add_stage2_score(impact, timing, fsr);
            scorer.add_stage3_score(angular, orientation);
            scorer.add_stage4_score(inactivity, stable);
            scorer.add_pressure_filter_score(altitude);
            scorer.add_heart_rate_filter_score(hr);
            scorer.add_fsr_filter_score(fsr_impact, strap);

            let b = scorer.breakdown();
            prop_assert!(b.stage1 <= 25);
            prop_assert!(b.stage2 <= 25);
            prop_assert!(b.stage3 <= 20);
            prop_assert!(b.stage4 <= 20);
            prop_assert!(b.filters <= 15);
            prop_assert!(scorer.total_score() <= 105);
        }
    }
}
