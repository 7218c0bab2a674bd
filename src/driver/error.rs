//! Error types for the SAI driver
//!
//! Errors are organized by domain for better diagnostics:
//! - [`ConfigError`]: Transfer format validation failures
//! - [`Error`]: Queue, state, argument and hardware failures
//!
//! The unified [`Error`] enum wraps [`ConfigError`] and is returned
//! by most driver methods.

use super::interrupt::StatusFlags;

// =============================================================================
// Configuration Errors
// =============================================================================

/// Transfer format validation errors
///
/// These errors occur when a [`TransferFormat`](super::config::TransferFormat)
/// cannot be applied to a transceiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Watermark is zero or larger than the FIFO
    InvalidWatermark,
    /// Channel mask selects no data line
    NoChannels,
    /// Sample rate is zero
    InvalidSampleRate,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ConfigError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ConfigError::InvalidWatermark => "watermark out of FIFO range",
            ConfigError::NoChannels => "no channel enabled",
            ConfigError::InvalidSampleRate => "invalid sample rate",
        }
    }
}

// =============================================================================
// Unified Error Type
// =============================================================================

/// Driver error.
///
/// Queue and state errors are returned synchronously by the call that detected
/// them. Hardware faults raised while draining are reported through the
/// transfer callback instead; [`Error::HardwareFault`] is only returned by the
/// blocking helpers and the async wrappers.
///
/// ```ignore
/// match sai.send(transfer) {
///     Err(e) if e.error() == Error::QueueFull => { /* retry later */ }
///     Err(e) => { /* caller bug */ }
///     Ok(()) => {}
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Transfer queue is full (producer overrun)
    QueueFull,
    /// Operation not allowed in the current direction state
    InvalidState,
    /// Underrun, overrun or sync error signaled by the port
    HardwareFault(StatusFlags),
    /// Zero-length, null or read-only-for-receive buffer
    InvalidArgument,
    /// Blocking operation timed out
    Timeout,
    /// Transfer format rejected
    Config(ConfigError),
}

impl Error {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Error::QueueFull => "transfer queue full",
            Error::InvalidState => "invalid state for operation",
            Error::HardwareFault(_) => "hardware fault",
            Error::InvalidArgument => "invalid argument",
            Error::Timeout => "operation timed out",
            Error::Config(e) => e.as_str(),
        }
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Config(e) => write!(f, "config: {}", e.as_str()),
            Error::HardwareFault(flags) => write!(f, "hardware fault: {:#010x}", flags.to_raw()),
            other => f.write_str(other.as_str()),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

/// Result type alias for driver operations
pub type Result<T> = core::result::Result<T, Error>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = core::result::Result<T, ConfigError>;

// =============================================================================
// Unit Tests
// =============================================================================
