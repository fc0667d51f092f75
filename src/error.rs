//! Error types for LIN frame operations.
//!
//! This module defines the [`Error`] enum which represents every outcome of a
//! send or receive other than success. Polling loops should treat
//! [`Error::NoData`] as "nothing on the bus yet" and everything else as a
//! real failure.
//!
//! # Example
//!
//! ```no_run
//! use lin_stack::{Error, FrameEngine, Result, SerialTransport};
//! use embedded_hal::{delay::DelayNs, digital::OutputPin};
//!
//! fn poll<T, P, D>(engine: &mut FrameEngine<T, P, D>) -> Result<Option<Vec<u8>>>
//! where
//!     T: SerialTransport,
//!     P: OutputPin,
//!     D: DelayNs,
//! {
//!     match engine.receive_frame(4) {
//!         Ok(data) => Ok(Some(data)),
//!         Err(Error::NoData) => Ok(None),
//!         Err(e) => Err(e),
//!     }
//! }
//! ```

use core::fmt;

use alloc::string::String;
use embedded_hal::digital::ErrorKind;

/// Errors that can occur while driving the LIN bus.
#[derive(Debug)]
pub enum Error {
    /// No byte was pending when a receive was attempted.
    ///
    /// This is the normal outcome of polling an idle bus.
    NoData,

    /// The received identifier byte did not match the configured identifier.
    IdentifierMismatch {
        /// The identifier this node answers to
        expected: u8,
        /// The identifier byte found on the wire
        actual: u8,
    },

    /// The checksum computed over the received data disagrees with the
    /// checksum byte that terminated the frame.
    ChecksumMismatch {
        /// Checksum computed locally
        expected: u8,
        /// Checksum byte received
        actual: u8,
    },

    /// The transport could not deliver the requested number of bytes in time.
    TransportTimeout {
        /// Number of bytes the engine asked for
        requested: usize,
        /// Number of bytes actually delivered
        received: usize,
    },

    /// The transport was used while it was not configured.
    ///
    /// Every send configures and closes the transport itself. Receives need a
    /// prior call to `prepare_receive`.
    TransportClosed,

    /// An I/O error reported by a `std` based transport.
    ///
    /// Only available with the `std` feature.
    #[cfg(feature = "std")]
    IOError(std::io::Error),

    /// A write operation failed (no_std version).
    ///
    /// Only available without the `std` feature.
    #[cfg(not(feature = "std"))]
    WriteError,

    /// A GPIO collaborator (break pin or transceiver control pin) failed.
    Pin(ErrorKind),

    /// More data bytes than a single frame can carry.
    PayloadTooLong {
        /// Requested length
        len: usize,
        /// Maximum supported length
        max: usize,
    },

    /// A buffer handed to the frame decoder was too small.
    TooShortBuffer {
        /// Actual number of bytes available
        actual: usize,
        /// Minimum number of bytes required
        expected: usize,
    },

    /// The operation needs the node's own identifier but none was configured.
    ///
    /// Master-only engines cannot validate received frames.
    MissingIdentifier,

    /// The byte is neither a 6-bit frame id nor a protected identifier with
    /// correct parity bits.
    InvalidIdentifier(u8),

    /// The engine configuration was rejected.
    InvalidConfig(String),
}

impl Error {
    /// Returns `true` if this is the "nothing pending" polling outcome.
    pub fn is_no_data(&self) -> bool {
        matches!(self, Error::NoData)
    }

    /// Returns `true` if a frame was received but failed validation.
    pub fn is_invalid_frame(&self) -> bool {
        matches!(
            self,
            Error::IdentifierMismatch { .. } | Error::ChecksumMismatch { .. }
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NoData => write!(f, "No data pending on the LIN bus"),
            Error::IdentifierMismatch { expected, actual } => write!(
                f,
                "Identifier mismatch: expected {expected:#04x}, got {actual:#04x}"
            ),
            Error::ChecksumMismatch { expected, actual } => write!(
                f,
                "Checksum mismatch: computed {expected:#04x}, received {actual:#04x}"
            ),
            Error::TransportTimeout {
                requested,
                received,
            } => write!(
                f,
                "Transport timeout: requested {requested} bytes, received {received}"
            ),
            Error::TransportClosed => write!(f, "Transport used while closed"),
            #[cfg(feature = "std")]
            Error::IOError(e) => write!(f, "I/O error: {e}"),
            #[cfg(not(feature = "std"))]
            Error::WriteError => write!(f, "Write error"),
            Error::Pin(kind) => write!(f, "GPIO error: {kind:?}"),
            Error::PayloadTooLong { len, max } => {
                write!(f, "Payload too long: {len} bytes, at most {max} allowed")
            }
            Error::TooShortBuffer { actual, expected } => write!(
                f,
                "Buffer too small: need at least {expected} bytes, got {actual}"
            ),
            Error::MissingIdentifier => write!(f, "No node identifier configured"),
            Error::InvalidIdentifier(id) => write!(f, "Invalid LIN identifier {id:#04x}"),
            Error::InvalidConfig(s) => write!(f, "Invalid configuration: {s}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::IOError(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(feature = "std")]
impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::TimedOut {
            return Error::TransportTimeout {
                requested: 0,
                received: 0,
            };
        }
        Error::IOError(err)
    }
}

/// Maps a GPIO collaborator error into [`Error::Pin`].
pub(crate) fn pin_error<E: embedded_hal::digital::Error>(err: E) -> Error {
    Error::Pin(err.kind())
}

/// A specialized Result type for LIN operations.
///
/// This is defined as `core::result::Result<T, Error>` for convenience.
pub type Result<T> = core::result::Result<T, Error>;
