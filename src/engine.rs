//! The LIN frame engine.
//!
//! [`FrameEngine`] encodes outgoing frames, validates incoming ones and
//! produces the synch break. It owns three collaborators, injected once at
//! construction:
//!
//! - a [`SerialTransport`] carrying the bytes
//! - an [`OutputPin`] used to hold the bus dominant during the synch break
//!   (usually the UART TX line, temporarily driven as a GPIO)
//! - a [`DelayNs`] busy-wait used to time the break
//!
//! # Transport lifecycle
//!
//! Every send is self-contained: break, `configure`, write, `close`. Nothing
//! stays open after a send returns. Receives need the line to be listening, so
//! call [`FrameEngine::prepare_receive`] after the last send and before
//! polling.
//!
//! # Threading
//!
//! All operations take `&mut self` and run to completion: the break is a
//! busy-wait and reads block on the transport's own timeout. The engine is
//! meant for a single control loop. Do not share it with an interrupt handler
//! or an async executor that could re-enter it mid-frame.

use alloc::vec;
use alloc::vec::Vec;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::config::EngineConfig;
use crate::error::pin_error;
use crate::frame::{
    FRAME_OVERHEAD, MAX_PAYLOAD_LEN, SYNC_BYTE, check_payload_len, split_wire,
};
use crate::timing::{bit_period_us, hold_duration_us};
use crate::transport::SerialTransport;
use crate::{Error, Result};

/// LIN master/slave frame engine.
///
/// ## Send operations
///
/// | Operation | Break | Synch + ID | Data | Checksum |
/// |-----------|-------|------------|------|----------|
/// | [`send_frame`](Self::send_frame) | yes | yes | yes | yes |
/// | [`send_header`](Self::send_header) | yes | yes | no | no |
/// | [`send_response`](Self::send_response) | no | no | yes | yes |
/// | [`send_raw`](Self::send_raw) | yes | no | yes | no |
///
/// ## Receive operations
///
/// [`receive_frame`](Self::receive_frame) and
/// [`receive_raw`](Self::receive_raw) return [`Error::NoData`] at once when
/// nothing is pending; they never wait for a frame to start.
pub struct FrameEngine<T, P, D> {
    transport: T,
    break_pin: P,
    delay: D,
    config: EngineConfig,
    bit_period_us: u32,
    /// The configured identifier as it appears on the wire.
    identifier: Option<u8>,
}

impl<T, P, D> FrameEngine<T, P, D>
where
    T: SerialTransport,
    P: OutputPin,
    D: DelayNs,
{
    /// Build an engine from its collaborators and a configuration.
    pub fn new(transport: T, break_pin: P, delay: D, config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let identifier = config.wire_identifier()?;
        let bit_period_us = bit_period_us(config.baud_rate);
        log::debug!(
            "LIN engine: {} baud, bit period {} us, identifier {:02X?}, {:?} checksum",
            config.baud_rate,
            bit_period_us,
            identifier,
            config.checksum
        );
        Ok(Self {
            transport,
            break_pin,
            delay,
            config,
            bit_period_us,
            identifier,
        })
    }

    /// Build a master-only engine. It can send but not validate received
    /// frames.
    pub fn master(transport: T, break_pin: P, delay: D, baud_rate: u32) -> Result<Self> {
        Self::new(transport, break_pin, delay, EngineConfig::master(baud_rate))
    }

    /// Build a slave engine that answers to `identifier`.
    pub fn slave(
        transport: T,
        break_pin: P,
        delay: D,
        identifier: u8,
        baud_rate: u32,
    ) -> Result<Self> {
        Self::new(
            transport,
            break_pin,
            delay,
            EngineConfig::slave(identifier, baud_rate),
        )
    }

    /// The configuration this engine was built with.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Bit period in microseconds derived from the baud rate.
    pub fn bit_period_us(&self) -> u32 {
        self.bit_period_us
    }

    /// Synch break hold time in microseconds for `bits` bit times.
    pub fn hold_duration_us(&self, bits: u32) -> u32 {
        hold_duration_us(self.config.baud_rate, bits)
    }

    /// The configured identifier as it appears on the wire.
    pub fn identifier(&self) -> Option<u8> {
        self.identifier
    }

    /// Shared access to the transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Exclusive access to the transport.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Give back the collaborators.
    pub fn release(self) -> (T, P, D) {
        (self.transport, self.break_pin, self.delay)
    }

    /// Send a complete frame: break, synch, identifier, data, checksum.
    pub fn send_frame(&mut self, identifier: u8, data: &[u8]) -> Result<()> {
        check_payload_len(data.len())?;
        let identifier = self.config.identifier_check.wire_identifier(identifier)?;
        let checksum = self.config.checksum.compute(identifier, data);
        log::trace!(
            "LIN TX frame: id {:02X} data {:02X?} checksum {:02X}",
            identifier,
            data,
            checksum
        );

        self.synch_break()?;
        self.session(|transport| {
            transport.write_byte(SYNC_BYTE)?;
            transport.write_byte(identifier)?;
            transport.write_bytes(data)?;
            transport.write_byte(checksum)
        })
    }

    /// Send a header only: break, synch, identifier.
    ///
    /// Used by a master to request a response from a slave.
    pub fn send_header(&mut self, identifier: u8) -> Result<()> {
        let identifier = self.config.identifier_check.wire_identifier(identifier)?;
        log::trace!("LIN TX header: id {:02X}", identifier);

        self.synch_break()?;
        self.session(|transport| transport.write_bytes(&[SYNC_BYTE, identifier]))
    }

    /// Send a response only: data and checksum, no break or identifier.
    ///
    /// Used by a slave answering a header the master already put on the bus.
    /// The caller is responsible for response timing.
    pub fn send_response(&mut self, data: &[u8]) -> Result<()> {
        check_payload_len(data.len())?;
        let identifier = if self.config.checksum.covers_identifier() {
            self.identifier.ok_or(Error::MissingIdentifier)?
        } else {
            self.identifier.unwrap_or_default()
        };
        let checksum = self.config.checksum.compute(identifier, data);
        log::trace!(
            "LIN TX response: data {:02X?} checksum {:02X}",
            data,
            checksum
        );

        self.session(|transport| {
            transport.write_bytes(data)?;
            transport.write_byte(checksum)
        })
    }

    /// Send a break followed by `data` as-is, with no checksum.
    pub fn send_raw(&mut self, data: &[u8]) -> Result<()> {
        check_payload_len(data.len())?;
        log::trace!("LIN TX raw: {:02X?}", data);

        self.synch_break()?;
        self.session(|transport| transport.write_bytes(data))
    }

    /// Configure the transport for listening at the engine's baud rate.
    ///
    /// Sends close the transport when they finish, so call this before
    /// polling for frames.
    pub fn prepare_receive(&mut self) -> Result<()> {
        self.transport.configure(self.config.baud_rate)
    }

    /// Receive and validate a frame carrying `expected_data_size` data bytes.
    ///
    /// Returns [`Error::NoData`] without reading anything if no byte is
    /// pending. Otherwise reads synch, identifier, data and checksum, checks
    /// the identifier first and then the checksum. A frame that fails
    /// validation has still been consumed.
    pub fn receive_frame(&mut self, expected_data_size: usize) -> Result<Vec<u8>> {
        check_payload_len(expected_data_size)?;
        let mut data = vec![0u8; expected_data_size];
        self.receive_frame_into(&mut data)?;
        Ok(data)
    }

    /// Allocation-free form of [`receive_frame`](Self::receive_frame).
    ///
    /// Expects exactly `buf.len()` data bytes and returns that count.
    pub fn receive_frame_into(&mut self, buf: &mut [u8]) -> Result<usize> {
        check_payload_len(buf.len())?;
        if !self.transport.bytes_available() {
            return Err(Error::NoData);
        }

        let mut frame = [0u8; MAX_PAYLOAD_LEN + FRAME_OVERHEAD];
        let frame = &mut frame[..buf.len() + FRAME_OVERHEAD];
        self.transport.read_bytes(frame)?;
        log::trace!("LIN RX frame: {:02X?}", frame);

        let (identifier, data, checksum) = split_wire(frame)?;
        let expected = self.identifier.ok_or(Error::MissingIdentifier)?;
        if let Err(e) = self.config.identifier_check.validate(expected, identifier) {
            log::warn!("LIN RX dropped: {}", e);
            return Err(e);
        }
        if let Err(e) = self.config.checksum.verify(identifier, data, checksum) {
            log::warn!("LIN RX dropped: {}", e);
            return Err(e);
        }

        buf.copy_from_slice(data);
        Ok(buf.len())
    }

    /// Receive `expected_data_size` bytes without any validation.
    ///
    /// Returns [`Error::NoData`] without reading anything if no byte is
    /// pending.
    pub fn receive_raw(&mut self, expected_data_size: usize) -> Result<Vec<u8>> {
        check_payload_len(expected_data_size)?;
        let mut data = vec![0u8; expected_data_size];
        self.receive_raw_into(&mut data)?;
        Ok(data)
    }

    /// Allocation-free form of [`receive_raw`](Self::receive_raw).
    pub fn receive_raw_into(&mut self, buf: &mut [u8]) -> Result<usize> {
        check_payload_len(buf.len())?;
        if !self.transport.bytes_available() {
            return Err(Error::NoData);
        }
        self.transport.read_bytes(buf)?;
        log::trace!("LIN RX raw: {:02X?}", buf);
        Ok(buf.len())
    }

    /// Hold the bus dominant for the configured number of bit times, then
    /// release it.
    fn synch_break(&mut self) -> Result<()> {
        let hold = self.hold_duration_us(self.config.break_bits);
        self.break_pin.set_low().map_err(pin_error)?;
        self.delay.delay_us(hold);
        self.break_pin.set_high().map_err(pin_error)
    }

    /// Configure the transport, run `write`, and close it again.
    ///
    /// The transport is closed even if `write` fails; the write error wins.
    fn session<F>(&mut self, write: F) -> Result<()>
    where
        F: FnOnce(&mut T) -> Result<()>,
    {
        self.transport.configure(self.config.baud_rate)?;
        let written = write(&mut self.transport);
        let closed = self.transport.close();
        written.and(closed)
    }
}
