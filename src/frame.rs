//! LIN frame layout, checksums and wire encoding.
//!
//! # Wire format
//!
//! ```text
//!  ___________ __________ _______ ____________ __________
//! |           |          |       |            |          |
//! |Synch Break|Synch Byte|ID byte| Data Bytes | Checksum |
//! |___________|__________|_______|____________|__________|
//! ```
//!
//! - Synch break: 13 bit times dominant, produced by the engine on a GPIO pin
//! - Synch byte: always `0x55`
//! - Identifier byte
//! - 0-8 data bytes (raw paths accept up to 255)
//! - Checksum byte
//!
//! The break is not a byte, so [`Frame::to_wire_bytes`] starts at the synch
//! byte.

use alloc::vec::Vec;

use crate::identifier::protected_id;
use crate::{Error, Result};

/// Synch byte used for baud rate synchronization.
pub const SYNC_BYTE: u8 = 0x55;

/// Maximum data length of a standard LIN frame (8 bytes).
pub const MAX_LIN_DATA_LEN: usize = 8;

/// Longest payload the engine accepts on any send or receive path.
pub const MAX_PAYLOAD_LEN: usize = 255;

/// Bytes around the data on the wire: synch, identifier and checksum.
pub const FRAME_OVERHEAD: usize = 3;

/// Checksum model used to protect the data bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[repr(u8)]
pub enum ChecksumModel {
    /// `255 - ((sum(data) + 1) mod 256)`, data bytes only.
    ///
    /// The formula used by the deployed TJA1021/MCP2004 LIN stacks. It differs
    /// from the LIN 1.x classic checksum whenever the data sum carries.
    #[default]
    Legacy = 0,
    /// Classic checksum (LIN 1.x): inverted sum with carry of the data bytes.
    Classic = 1,
    /// Enhanced checksum (LIN 2.x): inverted sum with carry of the protected
    /// identifier and the data bytes.
    Enhanced = 2,
}

impl ChecksumModel {
    /// Create from raw byte value.
    pub fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::Classic,
            2 => Self::Enhanced,
            _ => Self::Legacy,
        }
    }

    /// Whether the identifier byte takes part in the checksum.
    pub fn covers_identifier(self) -> bool {
        self == Self::Enhanced
    }

    /// Compute the checksum for `data` sent under `identifier`.
    ///
    /// `identifier` is only read by [`ChecksumModel::Enhanced`].
    pub fn compute(self, identifier: u8, data: &[u8]) -> u8 {
        match self {
            Self::Legacy => legacy_checksum(data),
            Self::Classic => carry_sum_checksum(0, data),
            Self::Enhanced => carry_sum_checksum(identifier as u16, data),
        }
    }

    /// Check a received checksum byte.
    pub fn verify(self, identifier: u8, data: &[u8], received: u8) -> Result<()> {
        let expected = self.compute(identifier, data);
        if expected == received {
            Ok(())
        } else {
            Err(Error::ChecksumMismatch {
                expected,
                actual: received,
            })
        }
    }
}

/// Checksum used on the wire by default: `255 - ((sum(data) + 1) mod 256)`.
pub fn legacy_checksum(data: &[u8]) -> u8 {
    let sum = data.iter().fold(0u8, |acc, &b| acc.wrapping_add(b));
    255u8.wrapping_sub(sum.wrapping_add(1))
}

/// Inverted 8-bit sum with end-around carry, seeded with `seed`.
fn carry_sum_checksum(seed: u16, data: &[u8]) -> u8 {
    let mut sum = seed;
    for &byte in data {
        sum += byte as u16;
        if sum > 0xFF {
            sum = (sum & 0xFF) + 1;
        }
    }
    !sum as u8
}

/// A LIN frame as it travels on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    identifier: u8,
    data: Vec<u8>,
    checksum: u8,
}

impl Frame {
    /// Create a frame with the default [`ChecksumModel::Legacy`] checksum.
    pub fn new(identifier: u8, data: &[u8]) -> Result<Self> {
        Self::with_checksum_model(identifier, data, ChecksumModel::Legacy)
    }

    /// Create a frame with an explicit checksum model.
    pub fn with_checksum_model(identifier: u8, data: &[u8], model: ChecksumModel) -> Result<Self> {
        check_payload_len(data.len())?;
        Ok(Self {
            identifier,
            data: data.to_vec(),
            checksum: model.compute(identifier, data),
        })
    }

    /// Create a LIN 2.x frame: the 6-bit `id` is turned into a protected
    /// identifier and the enhanced checksum is applied.
    pub fn with_enhanced_checksum(id: u8, data: &[u8]) -> Result<Self> {
        Self::with_checksum_model(protected_id(id), data, ChecksumModel::Enhanced)
    }

    /// The identifier byte.
    pub fn identifier(&self) -> u8 {
        self.identifier
    }

    /// The data bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// The checksum byte.
    pub fn checksum(&self) -> u8 {
        self.checksum
    }

    /// Whether this frame fits the 8 byte limit of standard LIN.
    pub fn is_standard_length(&self) -> bool {
        self.data.len() <= MAX_LIN_DATA_LEN
    }

    /// Number of bytes on the wire after the synch break.
    pub fn wire_len(&self) -> usize {
        self.data.len() + FRAME_OVERHEAD
    }

    /// Append the wire image (synch byte onwards) to `out`.
    pub fn encode(&self, out: &mut Vec<u8>) {
        out.reserve(self.wire_len());
        out.push(SYNC_BYTE);
        out.push(self.identifier);
        out.extend_from_slice(&self.data);
        out.push(self.checksum);
    }

    /// Serialize the frame to its wire image.
    pub fn to_wire_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.wire_len());
        self.encode(&mut bytes);
        bytes
    }

    /// Parse a wire image and verify its checksum.
    ///
    /// The layout is synch, identifier, data, checksum; the data length is
    /// `bytes.len() - 3`. The synch byte is not inspected; a receiver that
    /// got this far has already locked onto it.
    pub fn decode(bytes: &[u8], model: ChecksumModel) -> Result<Self> {
        let (identifier, data, checksum) = split_wire(bytes)?;
        model.verify(identifier, data, checksum)?;
        Ok(Self {
            identifier,
            data: data.to_vec(),
            checksum,
        })
    }
}

/// Split a wire image into identifier, data and checksum.
pub(crate) fn split_wire(bytes: &[u8]) -> Result<(u8, &[u8], u8)> {
    if bytes.len() < FRAME_OVERHEAD {
        return Err(Error::TooShortBuffer {
            actual: bytes.len(),
            expected: FRAME_OVERHEAD,
        });
    }
    let last = bytes.len() - 1;
    Ok((bytes[1], &bytes[2..last], bytes[last]))
}

pub(crate) fn check_payload_len(len: usize) -> Result<()> {
    if len > MAX_PAYLOAD_LEN {
        return Err(Error::PayloadTooLong {
            len,
            max: MAX_PAYLOAD_LEN,
        });
    }
    Ok(())
}
