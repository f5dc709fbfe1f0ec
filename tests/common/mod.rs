//! Synthetic sample-stream builders shared by the integration tests
//!
//! Streams are generated at the nominal 100Hz caller cadence (10ms steps)
//! with idealized noise-free values; the detector's thresholds are all
//! duration-based, so the cadence only affects measurement granularity.

use fallguard_core::SensorSample;
use fallguard_core::FallDetector;

/// Nominal caller tick (ms)
pub const STEP_MS: u64 = 10;

/// Baseline environment carried on every synthetic sample
pub fn sample(ts: u64, accel: (f32, f32, f32), gyro: (f32, f32, f32)) -> SensorSample {
    SensorSample {
        accel_x: accel.0,
        accel_y: accel.1,
        accel_z: accel.2,
        gyro_x: gyro.0,
        gyro_y: gyro.1,
        gyro_z: gyro.2,
        pressure: 1013.25,
        heart_rate: 70.0,
        force_raw: 100,
        timestamp: ts,
        valid: true,
    }
}

/// Device worn upright, wearer still (gravity on Z)
pub fn at_rest(ts: u64) -> SensorSample {
    sample(ts, (0.0, 0.0, 1.0), (0.0, 0.0, 0.0))
}

/// Deep weightlessness during a fall
pub fn free_fall(ts: u64) -> SensorSample {
    sample(ts, (0.05, 0.05, 0.1), (0.0, 0.0, 0.0))
}

/// Ground-contact spike of the given magnitude
pub fn impact(ts: u64, g: f32) -> SensorSample {
    sample(ts, (0.0, 0.0, g), (0.0, 0.0, 0.0))
}

/// Body rotation at the given rate, otherwise resting accel
pub fn rotating(ts: u64, dps: f32) -> SensorSample {
    sample(ts, (0.0, 0.0, 1.0), (dps, 0.0, 0.0))
}

/// Light ambulatory noise: accel wobbling around 1g, slow wrist motion
pub fn walking(ts: u64) -> SensorSample {
    // Deterministic wobble keyed off the timestamp
    let phase = (ts % 40) as f32 / 40.0;
    let accel_z = 0.85 + 0.4 * phase; // 0.85..1.25g
    sample(ts, (0.1, 0.05, accel_z), (30.0 * phase, 10.0, 0.0))
}

/// Feed samples for [from, to] inclusive at the nominal cadence
pub fn feed_range(
    detector: &mut FallDetector,
    from: u64,
    to: u64,
    f: fn(u64) -> SensorSample,
) {
    let mut ts = from;
    while ts <= to {
        detector.process_sample(&f(ts));
        ts += STEP_MS;
    }
}

/// A typical fall: 400ms free fall from t=1000, 4.2g impact, 420 deg/s
/// rotation, then stillness until promotion. Returns the promotion
/// timestamp.
pub fn run_typical_fall(detector: &mut FallDetector) -> u64 {
    feed_range(detector, 1000, 1400, free_fall);
    detector.process_sample(&impact(1410, 4.2));
    detector.process_sample(&rotating(1420, 420.0));

    // Inactivity onset at t=1430; default threshold is 2000ms
    feed_range(detector, 1430, 3430, at_rest);
    3430
}
