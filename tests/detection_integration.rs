//! End-to-end scenarios across the detector and scorer
//!
//! Drives the full detection chain the way the device main loop does:
//! samples in, state out, measurements handed to the scorer once the
//! machine reports a potential fall, alert gated on the resulting level.

mod common;

use common::*;
use fallguard_core::{
    ConfidenceLevel, ConfidenceScorer, DetectionState, DetectorEvent, FallDetector,
};

/// Score a completed sequence the way the escalation loop does,
/// including the auxiliary filter signals.
fn score_sequence(detector: &FallDetector, scorer: &mut ConfidenceScorer) {
    let m = detector.measurements();

    scorer.reset_score();
    scorer.add_stage1_score(m.freefall_ms as f32, m.min_fall_accel_g);
    scorer.add_stage2_score(m.max_impact_g, m.impact_offset_ms as f32, true);
    scorer.add_stage3_score(m.max_rotation_dps, 85.0);
    scorer.add_stage4_score(m.inactivity_ms as f32, m.position_stable);
    scorer.add_pressure_filter_score(1.5);
    scorer.add_heart_rate_filter_score(20.0);
    scorer.add_fsr_filter_score(true, true);
}

#[test]
fn typical_fall_end_to_end() {
    let mut detector = FallDetector::new();
    let mut scorer = ConfidenceScorer::new();

    let promoted_at = run_typical_fall(&mut detector);
    assert_eq!(detector.state(), DetectionState::PotentialFall);

    let m = detector.measurements();
    assert_eq!(m.freefall_ms, 400);
    assert!(m.min_fall_accel_g < 0.3);
    assert!((m.max_impact_g - 4.2).abs() < 1e-3);
    assert_eq!(m.impact_offset_ms, 410);
    assert!((m.max_rotation_dps - 420.0).abs() < 1e-3);
    assert_eq!(m.inactivity_ms, 2000);
    assert!(m.position_stable);

    score_sequence(&detector, &mut scorer);

    assert!(scorer.is_valid_fall_sequence());
    assert!(scorer.confidence_level() >= ConfidenceLevel::Confirmed);

    // Escalation path: scorer said yes, collaborator confirms
    assert!(detector.confirm_fall(promoted_at + STEP_MS));
    assert_eq!(detector.state(), DetectionState::FallDetected);
}

#[test]
fn stage_sequence_is_announced_in_order() {
    let mut detector = FallDetector::new();
    run_typical_fall(&mut detector);

    let states: Vec<DetectionState> = std::iter::from_fn(|| detector.poll_event())
        .filter_map(|e| match e {
            DetectorEvent::StateChanged { to, .. } => Some(to),
            _ => None,
        })
        .collect();

    assert_eq!(
        states,
        vec![
            DetectionState::Stage1FreeFall,
            DetectionState::Stage2Impact,
            DetectionState::Stage3Rotation,
            DetectionState::Stage4Inactivity,
            DetectionState::PotentialFall,
        ]
    );
}

#[test]
fn device_drop_never_reaches_potential_fall() {
    let mut detector = FallDetector::new();

    // 150ms partial free fall: never confirmed, never advances
    feed_range(&mut detector, 1000, 1150, free_fall);
    assert_eq!(detector.state(), DetectionState::Monitoring);

    // Sub-threshold 2.8g bump on the table
    detector.process_sample(&impact(1160, 2.8));
    assert_eq!(detector.state(), DetectionState::Monitoring);

    // Lying still on the table afterwards changes nothing
    feed_range(&mut detector, 1170, 4000, at_rest);
    assert_eq!(detector.state(), DetectionState::Monitoring);
}

#[test]
fn walking_never_triggers() {
    let mut detector = FallDetector::new();
    feed_range(&mut detector, 1000, 31_000, walking);

    assert_eq!(detector.state(), DetectionState::Monitoring);
    assert!(detector.poll_event().is_none());
}

#[test]
fn recovery_resets_and_allows_a_later_fall() {
    let mut detector = FallDetector::new();

    // Reach stage 4, then get up after 500ms
    feed_range(&mut detector, 1000, 1400, free_fall);
    detector.process_sample(&impact(1410, 4.2));
    detector.process_sample(&rotating(1420, 420.0));
    feed_range(&mut detector, 1430, 1930, at_rest);
    assert_eq!(detector.state(), DetectionState::Stage4Inactivity);

    detector.process_sample(&rotating(1940, 150.0));
    assert_eq!(detector.state(), DetectionState::Monitoring);

    let recovered = std::iter::from_fn(|| detector.poll_event())
        .any(|e| matches!(e, DetectorEvent::Recovered { .. }));
    assert!(recovered);

    // The machine is fully rearmed: a real fall afterwards still detects
    feed_range(&mut detector, 10_000, 10_400, free_fall);
    detector.process_sample(&impact(10_410, 4.2));
    detector.process_sample(&rotating(10_420, 420.0));
    feed_range(&mut detector, 10_430, 12_430, at_rest);
    assert_eq!(detector.state(), DetectionState::PotentialFall);
}

#[test]
fn stalled_sequence_times_out() {
    let mut detector = FallDetector::new();

    // Free fall confirms at t=1200, then an impact never comes
    feed_range(&mut detector, 1000, 1400, free_fall);
    assert_eq!(detector.state(), DetectionState::Stage1FreeFall);

    feed_range(&mut detector, 1410, 11_300, at_rest);
    assert_eq!(detector.state(), DetectionState::Monitoring);

    let timed_out = std::iter::from_fn(|| detector.poll_event())
        .any(|e| matches!(e, DetectorEvent::SequenceTimeout { .. }));
    assert!(timed_out);
}

#[test]
fn history_keeps_trailing_context_through_the_fall() {
    let mut detector = FallDetector::new();
    run_typical_fall(&mut detector);

    // Buffer is bounded at 100 and holds the newest samples
    assert_eq!(detector.history().len(), 100);
    let newest = detector.history().iter().last().unwrap();
    assert_eq!(newest.timestamp, 3430);

    // Reset rearms detection without losing the replay context
    detector.reset();
    assert_eq!(detector.history().len(), 100);
}

#[test]
fn filter_only_evidence_is_rejected_by_the_gate() {
    let mut scorer = ConfidenceScorer::new();

    scorer.reset_score();
    scorer.add_stage4_score(15_000.0, true);
    scorer.add_pressure_filter_score(3.0);
    scorer.add_heart_rate_filter_score(50.0);
    scorer.add_fsr_filter_score(true, true);

    assert!(scorer.total_score() >= 30);
    assert!(!scorer.is_valid_fall_sequence());
}
