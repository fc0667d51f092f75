//! Mock collaborators shared by the unit tests.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{self, ErrorKind, ErrorType, OutputPin};

use crate::Result;
use crate::transport::{BufferTransport, SerialTransport};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    PinHigh,
    PinLow,
    DelayUs(u32),
    Configure(u32),
    Write(Vec<u8>),
    Read(usize),
    Close,
}

/// Ordered record of collaborator calls, shared between mocks.
#[derive(Debug, Clone, Default)]
pub struct EventLog(Rc<RefCell<Vec<Event>>>);

impl EventLog {
    pub fn push(&self, event: Event) {
        self.0.borrow_mut().push(event);
    }

    pub fn take(&self) -> Vec<Event> {
        core::mem::take(&mut *self.0.borrow_mut())
    }
}

#[derive(Debug)]
pub struct PinFault;

impl digital::Error for PinFault {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

pub struct MockPin {
    log: EventLog,
    fail: bool,
}

impl MockPin {
    pub fn new(log: &EventLog) -> Self {
        Self {
            log: log.clone(),
            fail: false,
        }
    }

    pub fn failing(log: &EventLog) -> Self {
        Self {
            log: log.clone(),
            fail: true,
        }
    }
}

impl ErrorType for MockPin {
    type Error = PinFault;
}

impl OutputPin for MockPin {
    fn set_low(&mut self) -> core::result::Result<(), Self::Error> {
        if self.fail {
            return Err(PinFault);
        }
        self.log.push(Event::PinLow);
        Ok(())
    }

    fn set_high(&mut self) -> core::result::Result<(), Self::Error> {
        if self.fail {
            return Err(PinFault);
        }
        self.log.push(Event::PinHigh);
        Ok(())
    }
}

pub struct MockDelay {
    log: EventLog,
}

impl MockDelay {
    pub fn new(log: &EventLog) -> Self {
        Self { log: log.clone() }
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.log.push(Event::DelayUs(ns / 1_000));
    }

    fn delay_us(&mut self, us: u32) {
        self.log.push(Event::DelayUs(us));
    }
}

/// A [`BufferTransport`] that also records its calls in an [`EventLog`].
pub struct LoggedTransport {
    pub inner: BufferTransport,
    log: EventLog,
}

impl LoggedTransport {
    pub fn new(log: &EventLog) -> Self {
        Self {
            inner: BufferTransport::new(),
            log: log.clone(),
        }
    }
}

impl SerialTransport for LoggedTransport {
    fn configure(&mut self, baud_rate: u32) -> Result<()> {
        self.log.push(Event::Configure(baud_rate));
        self.inner.configure(baud_rate)
    }

    fn write_byte(&mut self, byte: u8) -> Result<()> {
        self.log.push(Event::Write(alloc::vec![byte]));
        self.inner.write_byte(byte)
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.log.push(Event::Write(bytes.to_vec()));
        self.inner.write_bytes(bytes)
    }

    fn bytes_available(&mut self) -> bool {
        self.inner.bytes_available()
    }

    fn read_bytes(&mut self, buf: &mut [u8]) -> Result<()> {
        self.log.push(Event::Read(buf.len()));
        self.inner.read_bytes(buf)
    }

    fn close(&mut self) -> Result<()> {
        self.log.push(Event::Close);
        self.inner.close()
    }
}
