//! Error types for detector configuration
//!
//! The detection core itself is non-fatal by design: invalid samples are
//! dropped, sequence timeouts auto-reset to monitoring, and nothing is
//! retried. The only fallible surface is configuration, where a rejected
//! threshold set must be reported to the caller instead of silently
//! corrupting the tuning.
//!
//! Errors follow the same constraints as the rest of the crate:
//! - Small, Copy, no heap - only `&'static str` and inline floats
//! - Usable from `no_std` builds via `thiserror-no-std`

use thiserror_no_std::Error;

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration errors - kept small for embedded use
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// A threshold that must be strictly positive was not
    #[error("Threshold {name} must be positive, got {value}")]
    NonPositiveThreshold {
        /// Which threshold failed validation
        name: &'static str,
        /// The rejected value
        value: f32,
    },
}

#[cfg(feature = "defmt")]
impl defmt::Format for ConfigError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::NonPositiveThreshold { name, value } => {
                defmt::write!(fmt, "Threshold {} must be positive, got {}", name, value)
            }
        }
    }
}
