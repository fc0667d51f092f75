#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

//! # lin-stack
//!
//! A LIN (Local Interconnect Network) master/slave frame engine that runs over
//! a plain UART byte transport.
//!
//! LIN is a low-cost, single-wire serial bus used in automotive body
//! electronics. A master starts every frame with a synch break (13 dominant
//! bit times), a synch byte `0x55` and an identifier; the addressed node then
//! sends up to 8 data bytes and a checksum.
//!
//! ## Features
//!
//! - **Sending**: full frames, headers, slave responses and raw streams
//! - **Receiving**: non-blocking poll with identifier and checksum validation
//! - **Break timing**: synch break produced on a GPIO pin with a busy-wait
//! - **Checksums**: the legacy `255 - (sum + 1)` model by default, LIN 1.x
//!   classic and LIN 2.x enhanced on request
//! - **Identifiers**: exact matching by default, LIN 2.x parity on request
//! - **no_std**: only `alloc` is required; hardware is reached through
//!   [`SerialTransport`] and the `embedded-hal` traits
//!
//! ## Quick Start
//!
//! ```no_run
//! use lin_stack::{BufferTransport, Error, FrameEngine, Result};
//! # use embedded_hal::{delay::DelayNs, digital::{ErrorType, OutputPin}};
//! # struct Pin;
//! # impl ErrorType for Pin { type Error = core::convert::Infallible; }
//! # impl OutputPin for Pin {
//! #     fn set_low(&mut self) -> core::result::Result<(), Self::Error> { Ok(()) }
//! #     fn set_high(&mut self) -> core::result::Result<(), Self::Error> { Ok(()) }
//! # }
//! # struct Delay;
//! # impl DelayNs for Delay { fn delay_ns(&mut self, _ns: u32) {} }
//!
//! fn main() -> Result<()> {
//!     // A slave node answering to identifier 0x22 at 9600 baud.
//!     let mut node = FrameEngine::slave(BufferTransport::new(), Pin, Delay, 0x22, 9_600)?;
//!
//!     // Master side: put a frame on the bus.
//!     node.send_frame(0x22, &[0x10, 0x20, 0x30])?;
//!
//!     // Slave side: poll for a 3-byte frame.
//!     node.prepare_receive()?;
//!     match node.receive_frame(3) {
//!         Ok(data) => println!("received {:02X?}", data),
//!         Err(Error::NoData) => {}
//!         Err(e) => eprintln!("bad frame: {e}"),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`engine`] | The [`FrameEngine`] send/receive operations |
//! | [`frame`] | Wire layout, [`Frame`] and [`ChecksumModel`] |
//! | [`identifier`] | Protected identifiers and [`IdentifierCheck`] |
//! | [`timing`] | Bit period and synch break durations |
//! | [`transport`] | [`SerialTransport`] and [`BufferTransport`] |
//! | [`transceiver`] | Optional wake/sleep control |
//! | [`config`] | [`EngineConfig`] |
//! | [`error`] | Error types and [`Result`] alias |
//!
//! ## Error Handling
//!
//! All fallible operations return [`Result<T>`]. [`Error::NoData`] is the
//! normal outcome of polling an idle bus and is kept separate from frames that
//! arrived but failed validation.

extern crate alloc;

pub mod config;
pub mod engine;
pub mod error;
pub mod frame;
pub mod identifier;
pub mod timing;
pub mod transceiver;
pub mod transport;

#[cfg(test)]
mod testing;

// Re-export commonly used types at the crate root
pub use config::EngineConfig;
pub use engine::FrameEngine;
pub use error::{Error, Result};
pub use frame::{ChecksumModel, Frame, MAX_LIN_DATA_LEN, MAX_PAYLOAD_LEN, SYNC_BYTE};
pub use identifier::{IdentifierCheck, protected_id};
pub use transceiver::Transceiver;
pub use transport::{BufferTransport, SerialTransport};
