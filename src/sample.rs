//! Normalized sensor samples
//!
//! One [`SensorSample`] per tick, produced by the sensor-acquisition
//! collaborators with all fields already unit-converted (g, deg/s, hPa,
//! BPM) and validity-flagged. Raw register reads, I2C plumbing, and
//! calibration are out of scope here.
//!
//! Two derived scalars drive every stage comparison in the detector:
//! the Euclidean norm of the acceleration axes and of the angular-rate
//! axes. Both use `libm` so they are available in `no_std` builds.

use crate::time::Timestamp;

/// One normalized sensor reading
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SensorSample {
    /// Acceleration, X axis (g)
    pub accel_x: f32,
    /// Acceleration, Y axis (g)
    pub accel_y: f32,
    /// Acceleration, Z axis (g)
    pub accel_z: f32,
    /// Angular velocity, X axis (deg/s)
    pub gyro_x: f32,
    /// Angular velocity, Y axis (deg/s)
    pub gyro_y: f32,
    /// Angular velocity, Z axis (deg/s)
    pub gyro_z: f32,
    /// Barometric pressure (hPa)
    pub pressure: f32,
    /// Heart rate (BPM)
    pub heart_rate: f32,
    /// Raw force-sensor reading (ADC counts)
    pub force_raw: u16,
    /// Monotonic timestamp (ms)
    pub timestamp: Timestamp,
    /// Validity flag set by the acquisition layer
    pub valid: bool,
}

impl SensorSample {
    /// Total acceleration magnitude: Euclidean norm of the three axes (g)
    pub fn total_accel_g(&self) -> f32 {
        libm::sqrtf(
            self.accel_x * self.accel_x
                + self.accel_y * self.accel_y
                + self.accel_z * self.accel_z,
        )
    }

    /// Angular magnitude: Euclidean norm of the three gyro axes (deg/s)
    pub fn angular_rate_dps(&self) -> f32 {
        libm::sqrtf(
            self.gyro_x * self.gyro_x
                + self.gyro_y * self.gyro_y
                + self.gyro_z * self.gyro_z,
        )
    }

    /// Whether the sample may enter the detector at all
    ///
    /// The validity flag comes from the acquisition layer; on top of it,
    /// non-finite inertial components (NaN/Inf from a glitched bus read)
    /// are dropped the same way.
    pub fn is_usable(&self) -> bool {
        self.valid
            && self.accel_x.is_finite()
            && self.accel_y.is_finite()
            && self.accel_z.is_finite()
            && self.gyro_x.is_finite()
            && self.gyro_y.is_finite()
            && self.gyro_z.is_finite()
    }
}
