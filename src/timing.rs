//! Bit timing for the synch break.
//!
//! The bit period is derived from the baud rate with the ratio
//! `baud_rate / 108.5`. That divisor is a baud-rate-ratio approximation kept
//! for compatibility with deployed LIN nodes; it is not the physical bit time
//! (`1e6 / baud_rate`), and the two only agree near 10.4 kbaud.

/// Default LIN baud rate (~10.4 kbaud).
pub const DEFAULT_BAUD_RATE: u32 = 10_416;

/// Number of dominant bit times in a synch break.
pub const SYNCH_BREAK_BITS: u32 = 13;

/// Settle time after toggling the transceiver wake pin (TJA1021 datasheet).
pub const TRANSCEIVER_SETTLE_US: u32 = 20;

/// Divisor applied to the baud rate, expressed as the fraction 217 / 2 (108.5).
const PERIOD_DIVISOR_NUM: u64 = 217;
const PERIOD_DIVISOR_DEN: u64 = 2;

/// Bit period in microseconds: `round(baud_rate / 108.5)`.
///
/// Rounds half up using integer arithmetic only, so it works without a
/// floating point unit.
pub fn bit_period_us(baud_rate: u32) -> u32 {
    // round(b * den / num) == (2 * b * den + num) / (2 * num)
    let scaled = 2 * baud_rate as u64 * PERIOD_DIVISOR_DEN + PERIOD_DIVISOR_NUM;
    (scaled / (2 * PERIOD_DIVISOR_NUM)) as u32
}

/// Duration in microseconds to hold the line dominant for `bits` bit times.
#[inline]
pub fn hold_duration_us(baud_rate: u32, bits: u32) -> u32 {
    bits.saturating_mul(bit_period_us(baud_rate))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_period_matches_ratio() {
        // 9600 / 108.5 = 88.47
        assert_eq!(bit_period_us(9_600), 88);
        // 10416 / 108.5 = 96.0
        assert_eq!(bit_period_us(DEFAULT_BAUD_RATE), 96);
        // 19200 / 108.5 = 176.96
        assert_eq!(bit_period_us(19_200), 177);
        assert_eq!(bit_period_us(0), 0);
    }

    #[test]
    fn test_bit_period_rounds_half_up() {
        // 217 / 108.5 = 2.0 and 163 / 108.5 = 1.502
        assert_eq!(bit_period_us(217), 2);
        assert_eq!(bit_period_us(163), 2);
        assert_eq!(bit_period_us(162), 1);
    }

    #[test]
    fn test_hold_duration_scales_linearly() {
        let period = bit_period_us(9_600);
        for bits in 0..=20 {
            assert_eq!(hold_duration_us(9_600, bits), bits * period);
        }
        assert_eq!(hold_duration_us(9_600, SYNCH_BREAK_BITS), 13 * 88);
    }

    #[test]
    fn test_hold_duration_saturates() {
        assert_eq!(hold_duration_us(u32::MAX, u32::MAX), u32::MAX);
    }
}
