//! Optional LIN transceiver power control.
//!
//! Transceivers such as the TJA1021 or MCP2004 have a control pin that
//! switches between normal and sleep mode. The frame engine does not touch it;
//! applications that want the transceiver asleep between transmissions wrap
//! their sends in [`Transceiver::awake`]:
//!
//! ```no_run
//! # use lin_stack::{Result, Transceiver};
//! # fn demo<P, D>(xcvr: &mut Transceiver<P, D>) -> Result<()>
//! # where P: embedded_hal::digital::OutputPin, D: embedded_hal::delay::DelayNs {
//! xcvr.awake(|| {
//!     // engine.send_frame(0x22, &[0x01, 0x02])
//!     Ok(())
//! })?;
//! # Ok(())
//! # }
//! ```

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::error::pin_error;
use crate::timing::TRANSCEIVER_SETTLE_US;
use crate::Result;

/// Wake/sleep control for a LIN transceiver.
///
/// The control pin is driven high for normal mode and low for sleep, each
/// followed by a settle delay of [`TRANSCEIVER_SETTLE_US`].
pub struct Transceiver<P, D> {
    pin: P,
    delay: D,
    awake: bool,
}

impl<P: OutputPin, D: DelayNs> Transceiver<P, D> {
    /// Wrap a control pin. The pin is not driven until the first
    /// [`wake`](Self::wake) or [`sleep`](Self::sleep).
    pub fn new(pin: P, delay: D) -> Self {
        Self {
            pin,
            delay,
            awake: false,
        }
    }

    /// Wrap a control pin and switch the transceiver to normal mode.
    pub fn new_awake(pin: P, delay: D) -> Result<Self> {
        let mut transceiver = Self::new(pin, delay);
        transceiver.wake()?;
        Ok(transceiver)
    }

    /// Switch to normal mode.
    pub fn wake(&mut self) -> Result<()> {
        self.pin.set_high().map_err(pin_error)?;
        self.delay.delay_us(TRANSCEIVER_SETTLE_US);
        self.awake = true;
        log::trace!("LIN transceiver awake");
        Ok(())
    }

    /// Switch to sleep mode.
    pub fn sleep(&mut self) -> Result<()> {
        self.pin.set_low().map_err(pin_error)?;
        self.delay.delay_us(TRANSCEIVER_SETTLE_US);
        self.awake = false;
        log::trace!("LIN transceiver asleep");
        Ok(())
    }

    /// Whether the last command was a wake.
    pub fn is_awake(&self) -> bool {
        self.awake
    }

    /// Wake the transceiver, run `f`, then put it back to sleep.
    ///
    /// The transceiver is put to sleep even when `f` fails; `f`'s error takes
    /// precedence over a failure to sleep.
    pub fn awake<R, F>(&mut self, f: F) -> Result<R>
    where
        F: FnOnce() -> Result<R>,
    {
        self.wake()?;
        let result = f();
        let slept = self.sleep();
        let value = result?;
        slept?;
        Ok(value)
    }

    /// Give back the control pin and delay.
    pub fn release(self) -> (P, D) {
        (self.pin, self.delay)
    }
}
