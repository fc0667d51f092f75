//! LIN identifier handling.
//!
//! A LIN 2.x protected identifier carries a 6-bit frame id (bits 0-5) and two
//! parity bits:
//!
//! - P0 (bit 6) = ID0 ^ ID1 ^ ID2 ^ ID4
//! - P1 (bit 7) = !(ID1 ^ ID3 ^ ID4 ^ ID5)
//!
//! Nodes built against older stacks compare the identifier byte for plain
//! equality and never look at the parity bits. [`IdentifierCheck::Exact`]
//! keeps that behaviour and is the default; [`IdentifierCheck::Strict`] adds
//! real parity validation.

use crate::{Error, Result};

/// Largest 6-bit frame id.
pub const MAX_FRAME_ID: u8 = 0x3F;

/// Compute the protected identifier (frame id plus parity bits).
///
/// Bits 6 and 7 of `id` are ignored.
pub fn protected_id(id: u8) -> u8 {
    let id = id & MAX_FRAME_ID;
    let p0 = (id ^ (id >> 1) ^ (id >> 2) ^ (id >> 4)) & 0x01;
    let p1 = !((id >> 1) ^ (id >> 3) ^ (id >> 4) ^ (id >> 5)) & 0x01;
    id | (p0 << 6) | (p1 << 7)
}

/// Strip the parity bits from a protected identifier.
#[inline]
pub fn frame_id(identifier: u8) -> u8 {
    identifier & MAX_FRAME_ID
}

/// Check whether the parity bits of `identifier` are correct.
pub fn has_valid_parity(identifier: u8) -> bool {
    protected_id(identifier) == identifier
}

/// How an identifier byte is interpreted and validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum IdentifierCheck {
    /// Identifier bytes go on the wire unchanged and received identifiers are
    /// compared for equality only.
    #[default]
    Exact,
    /// Identifiers are LIN 2.x protected identifiers.
    ///
    /// A 6-bit frame id (0-63) is expanded to its protected form before it is
    /// sent. A full byte must already carry correct parity. Received bytes
    /// with wrong parity are rejected.
    Strict,
}

impl IdentifierCheck {
    /// Resolve the byte that goes on the wire for `identifier`.
    pub fn wire_identifier(self, identifier: u8) -> Result<u8> {
        match self {
            IdentifierCheck::Exact => Ok(identifier),
            IdentifierCheck::Strict if identifier <= MAX_FRAME_ID => Ok(protected_id(identifier)),
            IdentifierCheck::Strict if has_valid_parity(identifier) => Ok(identifier),
            IdentifierCheck::Strict => Err(Error::InvalidIdentifier(identifier)),
        }
    }

    /// Validate a received identifier byte against the expected wire byte.
    pub fn validate(self, expected: u8, actual: u8) -> Result<()> {
        let parity_ok = match self {
            IdentifierCheck::Exact => true,
            IdentifierCheck::Strict => has_valid_parity(actual),
        };
        if parity_ok && actual == expected {
            Ok(())
        } else {
            Err(Error::IdentifierMismatch { expected, actual })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protected_id_known_values() {
        assert_eq!(protected_id(0x00), 0x80);
        assert_eq!(protected_id(0x10), 0x50);
        assert_eq!(protected_id(0x3C), 0x3C);
        assert_eq!(protected_id(0x3D), 0x7D);
        assert_eq!(protected_id(0x3F), 0xBF);
    }

    #[test]
    fn test_protected_id_keeps_frame_id() {
        for id in 0..=MAX_FRAME_ID {
            let pid = protected_id(id);
            assert_eq!(frame_id(pid), id);
            assert!(has_valid_parity(pid));
        }
    }

    #[test]
    fn test_parity_rejects_flipped_parity_bits() {
        let pid = protected_id(0x10);
        assert!(!has_valid_parity(pid ^ 0x40));
        assert!(!has_valid_parity(pid ^ 0x80));
    }

    #[test]
    fn test_exact_mode_passes_bytes_through() {
        assert_eq!(IdentifierCheck::Exact.wire_identifier(0xFF).unwrap(), 0xFF);
        assert!(IdentifierCheck::Exact.validate(0xFF, 0xFF).is_ok());
        assert!(matches!(
            IdentifierCheck::Exact.validate(0x10, 0x11),
            Err(Error::IdentifierMismatch {
                expected: 0x10,
                actual: 0x11
            })
        ));
    }

    #[test]
    fn test_strict_mode_expands_frame_ids() {
        assert_eq!(IdentifierCheck::Strict.wire_identifier(0x10).unwrap(), 0x50);
        assert_eq!(IdentifierCheck::Strict.wire_identifier(0x50).unwrap(), 0x50);
        assert!(matches!(
            IdentifierCheck::Strict.wire_identifier(0x90),
            Err(Error::InvalidIdentifier(0x90))
        ));
    }

    #[test]
    fn test_strict_mode_rejects_bad_parity() {
        // Exact mode accepts any equal byte, strict mode also wants parity.
        assert!(IdentifierCheck::Exact.validate(0x10, 0x10).is_ok());
        assert!(IdentifierCheck::Strict.validate(0x10, 0x10).is_err());
        assert!(IdentifierCheck::Strict.validate(0x50, 0x50).is_ok());
    }
}
