//! Multi-stage temporal fall-detection state machine
//!
//! ## Overview
//!
//! The [`FallDetector`] consumes one [`SensorSample`] per tick and walks a
//! strictly-forward stage sequence matching the physical signature of a
//! fall:
//!
//! ```text
//! MONITORING ─► STAGE1_FREEFALL ─► STAGE2_IMPACT ─► STAGE3_ROTATION
//!                                                        │
//!     ▲                                                  ▼
//!     └────── recovery / window timeout ◄──── STAGE4_INACTIVITY
//!                                                        │
//!                                                        ▼
//!                                                 POTENTIAL_FALL
//! ```
//!
//! Each stage requires *sustained* evidence, not a momentary spike, so a
//! single noisy reading never advances the machine. A global detection
//! window bounds the whole sequence: if `POTENTIAL_FALL` is not reached
//! within 10 seconds of entering stage 1, the machine force-resets to
//! monitoring. Nothing in this component is fatal - worst case it returns
//! to monitoring and resumes listening.
//!
//! ## Timing model
//!
//! All timers are driven by the timestamps carried on the samples, never
//! by a hardware clock. Thresholds are durations, so irregular caller
//! intervals shift nothing except measurement granularity.
//!
//! `FALL_DETECTED` and `EMERGENCY_ACTIVE` are terminal states owned by
//! collaborators: the machine never enters them on its own, only through
//! [`FallDetector::confirm_fall`] (scorer said yes) and
//! [`FallDetector::trigger_emergency`] (SOS override).

use crate::{
    buffer::SampleHistory,
    config::DetectionThresholds,
    constants::{buffers::HISTORY_CAPACITY, detection},
    errors::ConfigResult,
    events::{DetectorEvent, EventQueue},
    sample::SensorSample,
    time::{elapsed_ms, Timestamp},
};

/// Sentinel for "no free fall observed yet"; above any worn-device reading
/// so it scores zero if ever read before stage 1 triggers.
const NO_FREEFALL_ACCEL_G: f32 = 10.0;

/// Detection state of the stage machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum DetectionState {
    /// Watching the stream, no fall evidence yet
    Monitoring = 0,
    /// Sustained sub-gravity acceleration observed
    Stage1FreeFall = 1,
    /// Impact spike linked to the free fall
    Stage2Impact = 2,
    /// Post-impact body rotation observed
    Stage3Rotation = 3,
    /// Resting near gravity in a new orientation
    Stage4Inactivity = 4,
    /// Full sequence completed; scorer should run now
    PotentialFall = 5,
    /// Confirmed by the confidence scorer (collaborator-set)
    FallDetected = 6,
    /// Emergency escalation active (collaborator-set / SOS)
    EmergencyActive = 7,
}

impl DetectionState {
    /// Human-readable state name
    pub const fn name(&self) -> &'static str {
        match self {
            DetectionState::Monitoring => "MONITORING",
            DetectionState::Stage1FreeFall => "STAGE1_FREEFALL",
            DetectionState::Stage2Impact => "STAGE2_IMPACT",
            DetectionState::Stage3Rotation => "STAGE3_ROTATION",
            DetectionState::Stage4Inactivity => "STAGE4_INACTIVITY",
            DetectionState::PotentialFall => "POTENTIAL_FALL",
            DetectionState::FallDetected => "FALL_DETECTED",
            DetectionState::EmergencyActive => "EMERGENCY_ACTIVE",
        }
    }

    /// Whether the detection window timeout applies in this state
    ///
    /// The window bounds the stage sequence only; once `POTENTIAL_FALL`
    /// is reached the hand-off to the scorer is the caller's business.
    const fn in_stage_sequence(&self) -> bool {
        matches!(
            self,
            DetectionState::Stage1FreeFall
                | DetectionState::Stage2Impact
                | DetectionState::Stage3Rotation
                | DetectionState::Stage4Inactivity
        )
    }
}

/// Measurements accumulated across the stage sequence
///
/// Read by the caller once [`DetectionState::PotentialFall`] is reached
/// and handed to the confidence scorer. Values for stages that have not
/// triggered yet are zero (the free-fall minimum holds a high sentinel).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StageMeasurements {
    /// Accumulated free-fall duration (ms)
    pub freefall_ms: u32,
    /// Minimum acceleration magnitude during free fall (g)
    pub min_fall_accel_g: f32,
    /// Maximum acceleration magnitude during impact (g)
    pub max_impact_g: f32,
    /// Free-fall onset to impact onset offset (ms)
    pub impact_offset_ms: u32,
    /// Maximum angular magnitude during rotation (deg/s)
    pub max_rotation_dps: f32,
    /// Accumulated inactivity duration (ms)
    pub inactivity_ms: u32,
    /// Whether the resting position held steady throughout stage 4
    pub position_stable: bool,
}

/// Stateful multi-stage fall detector
///
/// Single-writer, single-reader: the caller serializes all calls (no
/// internal locking, mirroring the single-core cooperative-loop host).
pub struct FallDetector {
    state: DetectionState,
    thresholds: DetectionThresholds,
    monitoring: bool,
    history: SampleHistory<HISTORY_CAPACITY>,
    events: EventQueue,

    /// Detection window anchor, set on entering stage 1
    window_start: Option<Timestamp>,

    // Stage 1: free fall
    freefall_onset: Option<Timestamp>,
    freefall_ms: u32,
    min_fall_accel: f32,

    // Stage 2: impact
    impact_onset: Option<Timestamp>,
    impact_offset_ms: u32,
    max_impact_g: f32,

    // Stage 3: rotation
    rotation_seen: bool,
    max_rotation_dps: f32,

    // Stage 4: inactivity
    inactivity_onset: Option<Timestamp>,
    inactivity_ms: u32,
    position_stable: bool,
}

impl FallDetector {
    /// Create a detector in `MONITORING` with default thresholds,
    /// monitoring enabled
    pub fn new() -> Self {
        Self {
            state: DetectionState::Monitoring,
            thresholds: DetectionThresholds::default(),
            monitoring: true,
            history: SampleHistory::new(),
            events: EventQueue::new(),
            window_start: None,
            freefall_onset: None,
            freefall_ms: 0,
            min_fall_accel: NO_FREEFALL_ACCEL_G,
            impact_onset: None,
            impact_offset_ms: 0,
            max_impact_g: 0.0,
            rotation_seen: false,
            max_rotation_dps: 0.0,
            inactivity_onset: None,
            inactivity_ms: 0,
            position_stable: false,
        }
    }

    /// Feed one sample into the state machine
    ///
    /// Invalid samples (flagged or non-finite) and samples arriving while
    /// monitoring is disabled are dropped without any state change.
    pub fn process_sample(&mut self, sample: &SensorSample) {
        if !self.monitoring || !sample.is_usable() {
            return;
        }

        self.history.push(*sample);
        let now = sample.timestamp;

        if self.window_elapsed(now) {
            #[cfg(feature = "log")]
            log::debug!("fall detector: detection window elapsed, resetting");
            self.events.push(DetectorEvent::SequenceTimeout { at: now });
            self.reset();
            return;
        }

        let accel = sample.total_accel_g();
        let angular = sample.angular_rate_dps();

        match self.state {
            DetectionState::Monitoring => {
                if self.track_free_fall(accel, now) {
                    // Confirmed: 200ms of sustained sub-threshold readings
                    self.window_start = Some(now);
                    self.transition(DetectionState::Stage1FreeFall, now);
                }
            }

            DetectionState::Stage1FreeFall => {
                // Keep accumulating duration and the minimum magnitude
                self.track_free_fall(accel, now);

                if self.track_impact(accel, now) {
                    self.transition(DetectionState::Stage2Impact, now);
                }
            }

            DetectionState::Stage2Impact => {
                if self.track_rotation(angular, now) {
                    self.transition(DetectionState::Stage3Rotation, now);
                }
            }

            DetectionState::Stage3Rotation => {
                // Rotation maximum keeps updating while in this state
                self.track_rotation(angular, now);

                if self.track_inactivity(accel, angular, now) {
                    self.transition(DetectionState::Stage4Inactivity, now);
                }
            }

            DetectionState::Stage4Inactivity => {
                if self.track_inactivity(accel, angular, now) {
                    if let Some(onset) = self.inactivity_onset {
                        let held = elapsed_ms(onset, now);
                        if held >= u64::from(self.thresholds.inactivity_ms) {
                            self.inactivity_ms = held as u32;
                            self.transition(DetectionState::PotentialFall, now);
                            self.events.push(DetectorEvent::PotentialFall { at: now });
                        }
                    }
                } else {
                    // Movement resumed before the threshold: the wearer
                    // recovered, this is not a fall
                    #[cfg(feature = "log")]
                    log::debug!("fall detector: wearer recovered, resetting");
                    self.events.push(DetectorEvent::Recovered { at: now });
                    self.reset();
                }
            }

            // Owned by collaborators; never self-transitioned
            DetectionState::PotentialFall
            | DetectionState::FallDetected
            | DetectionState::EmergencyActive => {}
        }
    }

    /// Current detection state (side-effect-free)
    pub fn state(&self) -> DetectionState {
        self.state
    }

    /// Snapshot of the accumulated stage measurements
    pub fn measurements(&self) -> StageMeasurements {
        StageMeasurements {
            freefall_ms: self.freefall_ms,
            min_fall_accel_g: self.min_fall_accel,
            max_impact_g: self.max_impact_g,
            impact_offset_ms: self.impact_offset_ms,
            max_rotation_dps: self.max_rotation_dps,
            inactivity_ms: self.inactivity_ms,
            position_stable: self.position_stable,
        }
    }

    /// Unconditionally return to `MONITORING`, clearing all stage flags,
    /// timers, and extrema
    ///
    /// The sample history is diagnostic context and is left intact.
    pub fn reset(&mut self) {
        self.state = DetectionState::Monitoring;
        self.window_start = None;
        self.freefall_onset = None;
        self.freefall_ms = 0;
        self.min_fall_accel = NO_FREEFALL_ACCEL_G;
        self.impact_onset = None;
        self.impact_offset_ms = 0;
        self.max_impact_g = 0.0;
        self.rotation_seen = false;
        self.max_rotation_dps = 0.0;
        self.inactivity_onset = None;
        self.inactivity_ms = 0;
        self.position_stable = false;
    }

    /// Replace the detection thresholds, effective on the next sample
    ///
    /// An invalid set is rejected wholesale and the previous configuration
    /// stays in force.
    pub fn set_thresholds(&mut self, thresholds: &DetectionThresholds) -> ConfigResult<()> {
        thresholds.validate()?;
        self.thresholds = *thresholds;
        #[cfg(feature = "log")]
        log::debug!("fall detector: thresholds updated");
        Ok(())
    }

    /// Current detection thresholds
    pub fn thresholds(&self) -> &DetectionThresholds {
        &self.thresholds
    }

    /// Enable or disable monitoring; disabling also resets the machine
    pub fn set_monitoring(&mut self, enabled: bool) {
        if !enabled {
            self.reset();
        }
        self.monitoring = enabled;
    }

    /// Whether samples are currently being consumed
    pub fn is_monitoring(&self) -> bool {
        self.monitoring
    }

    /// Recent samples for diagnostics/replay, oldest first
    pub fn history(&self) -> &SampleHistory<HISTORY_CAPACITY> {
        &self.history
    }

    /// Dequeue the oldest pending detector event
    pub fn poll_event(&mut self) -> Option<DetectorEvent> {
        self.events.pop()
    }

    /// Events dropped because the caller stopped polling
    pub fn events_dropped(&self) -> u32 {
        self.events.dropped()
    }

    /// Collaborator confirmation: `POTENTIAL_FALL` -> `FALL_DETECTED`
    ///
    /// Returns false (and does nothing) from any other state.
    pub fn confirm_fall(&mut self, now: Timestamp) -> bool {
        if self.state == DetectionState::PotentialFall {
            self.transition(DetectionState::FallDetected, now);
            true
        } else {
            false
        }
    }

    /// SOS override: force `EMERGENCY_ACTIVE` from any state
    pub fn trigger_emergency(&mut self, now: Timestamp) {
        if self.state != DetectionState::EmergencyActive {
            self.transition(DetectionState::EmergencyActive, now);
        }
    }

    /// Whether the detection window has elapsed mid-sequence
    fn window_elapsed(&self, now: Timestamp) -> bool {
        if !self.state.in_stage_sequence() {
            return false;
        }

        match self.window_start {
            Some(start) => {
                elapsed_ms(start, now) > u64::from(detection::DETECTION_WINDOW_MS)
            }
            None => false,
        }
    }

    /// Track free-fall evidence; true once the stage is confirmed
    ///
    /// The trigger (onset timestamp, minimum magnitude) starts on the
    /// first sub-threshold sample; confirmation requires the accumulated
    /// duration to reach [`detection::FREEFALL_CONFIRM_MS`]. A shorter dip
    /// that ends is cleared silently.
    fn track_free_fall(&mut self, accel: f32, now: Timestamp) -> bool {
        if accel < self.thresholds.freefall_g {
            let onset = *self.freefall_onset.get_or_insert(now);

            if accel < self.min_fall_accel {
                self.min_fall_accel = accel;
            }
            self.freefall_ms = elapsed_ms(onset, now) as u32;

            self.freefall_ms >= detection::FREEFALL_CONFIRM_MS
        } else {
            // Free fall ended; a confirmed phase stays confirmed
            if self.freefall_onset.is_some()
                && self.freefall_ms >= detection::FREEFALL_CONFIRM_MS
            {
                return true;
            }

            self.freefall_onset = None;
            self.freefall_ms = 0;
            self.min_fall_accel = NO_FREEFALL_ACCEL_G;
            false
        }
    }

    /// Track impact evidence; true while the impact is linked to the fall
    ///
    /// The onset offset is measured from the free-fall onset. Beyond
    /// [`detection::IMPACT_LINK_WINDOW_MS`] the evidence is not linked to
    /// the free fall and the sequence is left to die by window timeout.
    fn track_impact(&mut self, accel: f32, now: Timestamp) -> bool {
        if accel > self.thresholds.impact_g {
            if self.impact_onset.is_none() {
                self.impact_onset = Some(now);
                let fall_onset = self.freefall_onset.unwrap_or(now);
                self.impact_offset_ms = elapsed_ms(fall_onset, now) as u32;
            }

            if accel > self.max_impact_g {
                self.max_impact_g = accel;
            }

            return self.impact_offset_ms <= detection::IMPACT_LINK_WINDOW_MS;
        }

        self.impact_onset.is_some()
            && self.impact_offset_ms <= detection::IMPACT_LINK_WINDOW_MS
    }

    /// Track rotation evidence; true once any qualifying sample was seen
    fn track_rotation(&mut self, angular: f32, _now: Timestamp) -> bool {
        if angular > self.thresholds.rotation_dps {
            self.rotation_seen = true;

            if angular > self.max_rotation_dps {
                self.max_rotation_dps = angular;
            }

            return true;
        }

        self.rotation_seen
    }

    /// Track inactivity; true while the wearer qualifies as inactive
    ///
    /// Inactive means resting near gravity in a new orientation (accel
    /// magnitude inside the resting band) with near-zero angular rate.
    /// Movement before the inactivity threshold clears the trigger: the
    /// wearer is recovering.
    fn track_inactivity(&mut self, accel: f32, angular: f32, now: Timestamp) -> bool {
        let inactive = accel > detection::INACTIVE_ACCEL_MIN_G
            && accel < detection::INACTIVE_ACCEL_MAX_G
            && angular < detection::INACTIVE_ROTATION_DPS;

        if inactive {
            let onset = *self.inactivity_onset.get_or_insert(now);
            self.inactivity_ms = elapsed_ms(onset, now) as u32;
            self.position_stable = true;
            return true;
        }

        if let Some(onset) = self.inactivity_onset {
            if elapsed_ms(onset, now) < u64::from(self.thresholds.inactivity_ms) {
                self.inactivity_onset = None;
                self.inactivity_ms = 0;
                self.position_stable = false;
                return false;
            }
        }

        self.inactivity_onset.is_some()
    }

    fn transition(&mut self, to: DetectionState, now: Timestamp) {
        let from = self.state;
        self.state = to;
        self.events.push(DetectorEvent::StateChanged { from, to, at: now });

        #[cfg(feature = "log")]
        log::debug!("fall detector: {} -> {}", from.name(), to.name());
    }
}

impl Default for FallDetector {
    fn default() -> Self {
        Self::new()
    }
}
