//! Tunable detection thresholds
//!
//! Field-tunable parameters for the stage detector. Defaults come from
//! wear trials on the reference hardware; deployments adjust them per
//! user profile (e.g. a frailer wearer gets a lower impact threshold).
//!
//! All thresholds must be strictly positive. [`DetectionThresholds::validate`]
//! enforces the invariant, and the detector rejects invalid sets wholesale
//! rather than applying them partially.

use crate::{
    constants::detection,
    errors::{ConfigError, ConfigResult},
};

/// Tunable parameters for the stage detector
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DetectionThresholds {
    /// Acceleration magnitude below which free fall is suspected (g)
    pub freefall_g: f32,
    /// Acceleration magnitude above which impact is suspected (g)
    pub impact_g: f32,
    /// Angular rate above which rotation is suspected (deg/s)
    pub rotation_dps: f32,
    /// Minimum stillness after impact to confirm incapacitation (ms)
    pub inactivity_ms: u32,
    /// Altitude-change threshold for the external pressure filter (m)
    ///
    /// Not consumed by the stage detector itself; carried here so one
    /// configuration block covers the whole detection chain.
    pub pressure_change_m: f32,
}

impl Default for DetectionThresholds {
    fn default() -> Self {
        Self {
            freefall_g: detection::FREEFALL_THRESHOLD_G,
            impact_g: detection::IMPACT_THRESHOLD_G,
            rotation_dps: detection::ROTATION_THRESHOLD_DPS,
            inactivity_ms: detection::INACTIVITY_THRESHOLD_MS,
            pressure_change_m: detection::PRESSURE_CHANGE_THRESHOLD_M,
        }
    }
}

impl DetectionThresholds {
    /// Check the positive-thresholds invariant
    pub fn validate(&self) -> ConfigResult<()> {
        Self::check_positive("freefall_g", self.freefall_g)?;
        Self::check_positive("impact_g", self.impact_g)?;
        Self::check_positive("rotation_dps", self.rotation_dps)?;
        if self.inactivity_ms == 0 {
            return Err(ConfigError::NonPositiveThreshold {
                name: "inactivity_ms",
                value: 0.0,
            });
        }
        Self::check_positive("pressure_change_m", self.pressure_change_m)?;
        Ok(())
    }

    fn check_positive(name: &'static str, value: f32) -> ConfigResult<()> {
        if value.is_finite() && value > 0.0 {
            Ok(())
        } else {
            Err(ConfigError::NonPositiveThreshold { name, value })
        }
    }
}
