//! Byte-serial transport abstraction.
//!
//! The engine never touches a UART directly. It talks to a [`SerialTransport`]
//! that the application implements for its hardware (or host serial port),
//! selected once when the engine is built.
//!
//! [`BufferTransport`] is an in-memory implementation for simulation and
//! tests. It is available in both `std` and `no_std` builds.

use alloc::collections::VecDeque;
use alloc::vec::Vec;

use crate::{Error, Result};

/// Trait for the serial link the LIN engine drives.
///
/// The engine opens the link with [`configure`](Self::configure) before every
/// send and closes it again afterwards, so implementations must accept being
/// reconfigured any number of times.
pub trait SerialTransport {
    /// (Re)initialize the serial link at the given baud rate.
    fn configure(&mut self, baud_rate: u32) -> Result<()>;

    /// Write one byte, blocking until it is accepted.
    fn write_byte(&mut self, byte: u8) -> Result<()>;

    /// Write all bytes in order.
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        for &byte in bytes {
            self.write_byte(byte)?;
        }
        Ok(())
    }

    /// Non-blocking check for a pending received byte.
    fn bytes_available(&mut self) -> bool;

    /// Fill `buf` completely, blocking up to the transport's own timeout.
    ///
    /// Returns [`Error::TransportTimeout`] if fewer bytes arrive in time.
    fn read_bytes(&mut self, buf: &mut [u8]) -> Result<()>;

    /// Release the serial configuration.
    fn close(&mut self) -> Result<()>;
}

impl<T: SerialTransport + ?Sized> SerialTransport for &mut T {
    fn configure(&mut self, baud_rate: u32) -> Result<()> {
        (**self).configure(baud_rate)
    }

    fn write_byte(&mut self, byte: u8) -> Result<()> {
        (**self).write_byte(byte)
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        (**self).write_bytes(bytes)
    }

    fn bytes_available(&mut self) -> bool {
        (**self).bytes_available()
    }

    fn read_bytes(&mut self, buf: &mut [u8]) -> Result<()> {
        (**self).read_bytes(buf)
    }

    fn close(&mut self) -> Result<()> {
        (**self).close()
    }
}

/// A transport backed by in-memory buffers.
///
/// Written bytes are recorded in order; inbound bytes are queued with
/// [`queue_inbound`](Self::queue_inbound). Reading more bytes than are queued
/// consumes what is there and fails with [`Error::TransportTimeout`], the way a
/// UART read with a timeout would.
#[derive(Debug, Default)]
pub struct BufferTransport {
    written: Vec<u8>,
    inbound: VecDeque<u8>,
    baud_rate: Option<u32>,
    configure_count: usize,
    close_count: usize,
}

impl BufferTransport {
    /// Create a new transport with empty buffers, in the closed state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue bytes to be read by the engine.
    pub fn queue_inbound(&mut self, bytes: &[u8]) {
        self.inbound.extend(bytes.iter().copied());
    }

    /// Number of queued inbound bytes.
    pub fn pending(&self) -> usize {
        self.inbound.len()
    }

    /// Every byte written so far.
    pub fn written(&self) -> &[u8] {
        &self.written
    }

    /// Take the written bytes, leaving the record empty.
    pub fn take_written(&mut self) -> Vec<u8> {
        core::mem::take(&mut self.written)
    }

    /// Whether the link is currently configured.
    pub fn is_open(&self) -> bool {
        self.baud_rate.is_some()
    }

    /// Baud rate of the current configuration, if open.
    pub fn baud_rate(&self) -> Option<u32> {
        self.baud_rate
    }

    /// How many times [`SerialTransport::configure`] was called.
    pub fn configure_count(&self) -> usize {
        self.configure_count
    }

    /// How many times [`SerialTransport::close`] was called.
    pub fn close_count(&self) -> usize {
        self.close_count
    }

    fn ensure_open(&self) -> Result<()> {
        if self.is_open() {
            Ok(())
        } else {
            Err(Error::TransportClosed)
        }
    }
}

impl SerialTransport for BufferTransport {
    fn configure(&mut self, baud_rate: u32) -> Result<()> {
        self.baud_rate = Some(baud_rate);
        self.configure_count += 1;
        Ok(())
    }

    fn write_byte(&mut self, byte: u8) -> Result<()> {
        self.ensure_open()?;
        self.written.push(byte);
        Ok(())
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.ensure_open()?;
        self.written.extend_from_slice(bytes);
        Ok(())
    }

    fn bytes_available(&mut self) -> bool {
        self.is_open() && !self.inbound.is_empty()
    }

    fn read_bytes(&mut self, buf: &mut [u8]) -> Result<()> {
        self.ensure_open()?;
        let available = self.inbound.len().min(buf.len());
        for (slot, byte) in buf.iter_mut().zip(self.inbound.drain(..available)) {
            *slot = byte;
        }
        if available < buf.len() {
            return Err(Error::TransportTimeout {
                requested: buf.len(),
                received: available,
            });
        }
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.baud_rate = None;
        self.close_count += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writes_require_configuration() {
        let mut transport = BufferTransport::new();
        assert!(matches!(
            transport.write_byte(0x55),
            Err(Error::TransportClosed)
        ));

        transport.configure(9_600).unwrap();
        transport.write_byte(0x55).unwrap();
        transport.write_bytes(&[0x01, 0x02]).unwrap();
        transport.close().unwrap();

        assert_eq!(transport.written(), &[0x55, 0x01, 0x02]);
        assert_eq!(transport.configure_count(), 1);
        assert_eq!(transport.close_count(), 1);
        assert!(!transport.is_open());
    }

    #[test]
    fn test_nothing_available_while_closed() {
        let mut transport = BufferTransport::new();
        transport.queue_inbound(&[0x55]);
        assert!(!transport.bytes_available());

        transport.configure(9_600).unwrap();
        assert!(transport.bytes_available());
    }

    #[test]
    fn test_short_read_times_out_and_consumes() {
        let mut transport = BufferTransport::new();
        transport.configure(9_600).unwrap();
        transport.queue_inbound(&[0x01, 0x02]);

        let mut buf = [0u8; 4];
        assert!(matches!(
            transport.read_bytes(&mut buf),
            Err(Error::TransportTimeout {
                requested: 4,
                received: 2
            })
        ));
        assert_eq!(&buf[..2], &[0x01, 0x02]);
        assert_eq!(transport.pending(), 0);
    }

    fn open_and_write<T: SerialTransport>(mut transport: T) -> Result<()> {
        transport.configure(19_200)?;
        transport.write_bytes(&[0xAA])
    }

    #[test]
    fn test_mut_ref_forwards() {
        let mut transport = BufferTransport::new();
        open_and_write(&mut transport).unwrap();

        assert_eq!(transport.baud_rate(), Some(19_200));
        assert_eq!(transport.take_written(), [0xAA]);
        assert!(transport.written().is_empty());
    }
}
