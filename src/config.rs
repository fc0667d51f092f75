//! Engine configuration.
//!
//! [`EngineConfig`] is fixed when a [`FrameEngine`](crate::FrameEngine) is
//! built and never changes afterwards. With the `serde` feature it can be
//! stored alongside other application settings; with `std` it can be loaded
//! straight from JSON:
//!
//! ```
//! # #[cfg(feature = "std")]
//! # fn main() -> lin_stack::Result<()> {
//! use lin_stack::{EngineConfig, IdentifierCheck};
//!
//! let config = EngineConfig::from_json(
//!     r#"{ "baud_rate": 19200, "identifier": 16, "identifier_check": "strict" }"#,
//! )?;
//! assert_eq!(config.baud_rate, 19_200);
//! assert_eq!(config.identifier_check, IdentifierCheck::Strict);
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "std"))]
//! # fn main() {}
//! ```

use alloc::format;
use alloc::string::String;

use crate::frame::ChecksumModel;
use crate::identifier::IdentifierCheck;
use crate::timing::{DEFAULT_BAUD_RATE, SYNCH_BREAK_BITS, bit_period_us};
use crate::{Error, Result};

/// Fixed configuration of a LIN frame engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    /// Serial baud rate.
    pub baud_rate: u32,
    /// This node's identifier. `None` for master-only engines, which can send
    /// but cannot validate received frames.
    pub identifier: Option<u8>,
    /// How identifier bytes are encoded and validated.
    pub identifier_check: IdentifierCheck,
    /// Checksum model for generation and verification.
    pub checksum: ChecksumModel,
    /// Length of the synch break in bit times.
    pub break_bits: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            baud_rate: DEFAULT_BAUD_RATE,
            identifier: None,
            identifier_check: IdentifierCheck::default(),
            checksum: ChecksumModel::default(),
            break_bits: SYNCH_BREAK_BITS,
        }
    }
}

impl EngineConfig {
    /// Configuration for a master node at `baud_rate`.
    pub fn master(baud_rate: u32) -> Self {
        Self {
            baud_rate,
            ..Self::default()
        }
    }

    /// Configuration for a slave node answering to `identifier`.
    pub fn slave(identifier: u8, baud_rate: u32) -> Self {
        Self::master(baud_rate).with_identifier(identifier)
    }

    /// Set the node identifier.
    pub fn with_identifier(mut self, identifier: u8) -> Self {
        self.identifier = Some(identifier);
        self
    }

    /// Set the identifier validation mode.
    pub fn with_identifier_check(mut self, check: IdentifierCheck) -> Self {
        self.identifier_check = check;
        self
    }

    /// Set the checksum model.
    pub fn with_checksum(mut self, checksum: ChecksumModel) -> Self {
        self.checksum = checksum;
        self
    }

    /// Set the synch break length in bit times.
    pub fn with_break_bits(mut self, bits: u32) -> Self {
        self.break_bits = bits;
        self
    }

    /// Check that the configuration is usable.
    ///
    /// The baud rate must give a bit period of at least one microsecond, the
    /// break must be at least one bit long, and in strict mode the identifier
    /// must be a valid frame id or protected identifier.
    pub fn validate(&self) -> Result<()> {
        if bit_period_us(self.baud_rate) == 0 {
            return Err(Error::InvalidConfig(format!(
                "baud rate {} is too low to derive a bit period",
                self.baud_rate
            )));
        }
        if self.break_bits == 0 {
            return Err(Error::InvalidConfig(String::from(
                "synch break must be at least one bit long",
            )));
        }
        if let Some(identifier) = self.identifier {
            self.identifier_check.wire_identifier(identifier).map_err(|_| {
                Error::InvalidConfig(format!(
                    "identifier {identifier:#04x} has invalid LIN parity"
                ))
            })?;
        }
        Ok(())
    }

    /// The identifier as it appears on the wire, if one is configured.
    pub fn wire_identifier(&self) -> Result<Option<u8>> {
        self.identifier
            .map(|id| self.identifier_check.wire_identifier(id))
            .transpose()
    }

    /// Parse and validate a configuration from JSON.
    ///
    /// Missing fields take their default values.
    #[cfg(feature = "std")]
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| Error::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to JSON.
    #[cfg(feature = "std")]
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::InvalidConfig(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.baud_rate, 10_416);
        assert_eq!(config.identifier, None);
        assert_eq!(config.identifier_check, IdentifierCheck::Exact);
        assert_eq!(config.checksum, ChecksumModel::Legacy);
        assert_eq!(config.break_bits, 13);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builders() {
        let config = EngineConfig::slave(0x22, 9_600)
            .with_checksum(ChecksumModel::Classic)
            .with_break_bits(14);
        assert_eq!(config.identifier, Some(0x22));
        assert_eq!(config.baud_rate, 9_600);
        assert_eq!(config.checksum, ChecksumModel::Classic);
        assert_eq!(config.break_bits, 14);
    }

    #[test]
    fn test_rejects_unusable_baud_rates() {
        assert!(matches!(
            EngineConfig::master(0).validate(),
            Err(Error::InvalidConfig(_))
        ));
        assert!(EngineConfig::master(54).validate().is_err());
        assert!(EngineConfig::master(55).validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_length_break() {
        assert!(
            EngineConfig::master(9_600)
                .with_break_bits(0)
                .validate()
                .is_err()
        );
    }

    #[test]
    fn test_strict_identifier_validation() {
        let strict = EngineConfig::slave(0x10, 9_600).with_identifier_check(IdentifierCheck::Strict);
        assert!(strict.validate().is_ok());
        assert_eq!(strict.wire_identifier().unwrap(), Some(0x50));

        let bad = EngineConfig::slave(0x90, 9_600).with_identifier_check(IdentifierCheck::Strict);
        assert!(bad.validate().is_err());

        // Exact mode accepts any byte.
        assert!(EngineConfig::slave(0x90, 9_600).validate().is_ok());
    }

    #[cfg(feature = "std")]
    #[test]
    fn test_json_roundtrip_and_defaults() {
        let config = EngineConfig::from_json(r#"{ "identifier": 34 }"#).unwrap();
        assert_eq!(config, EngineConfig::default().with_identifier(34));

        let json = EngineConfig::slave(0x22, 19_200)
            .with_checksum(ChecksumModel::Enhanced)
            .to_json()
            .unwrap();
        assert!(json.contains("\"enhanced\""));
        let parsed = EngineConfig::from_json(&json).unwrap();
        assert_eq!(parsed.checksum, ChecksumModel::Enhanced);
        assert_eq!(parsed.baud_rate, 19_200);
    }

    #[cfg(feature = "std")]
    #[test]
    fn test_json_errors_are_config_errors() {
        assert!(matches!(
            EngineConfig::from_json("{ not json"),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            EngineConfig::from_json(r#"{ "baud_rate": 0 }"#),
            Err(Error::InvalidConfig(_))
        ));
    }
}
