//! Constants and conversions taken from the HTU21D(F) datasheet.

/// The HTU21D has a single, fixed I²C address
pub const DEFAULT_ADDRESS: u8 = 0x40;

/// User register value after power-on or soft reset (12 bit RH, 14 bit T, heater off)
pub const USER_REGISTER_DEFAULT: u8 = 0b0000_0010;

/// Time the host waits for a no-hold humidity conversion before reading.
/// Comfortably above the worst-case conversion time from the datasheet.
pub const READ_DELAY_MS: u32 = 100;

/// Number of bytes in a measurement response: MSB, LSB + status, CRC
pub const RESPONSE_LEN: usize = 3;

/// Mask of the status bits in the response LSB
pub const STATUS_MASK: u8 = 0b0000_0011;

/// Status bits of a completed temperature measurement
pub const STATUS_TEMPERATURE: u8 = 1;

/// Status bits of a completed humidity measurement
pub const STATUS_HUMIDITY: u8 = 2;

/// Measurement commands
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u8)]
pub(crate) enum Command {
    /// Humidity measurement, sensor stretches the clock until done
    HumidityHoldMaster = 0xE5,
    /// Humidity measurement, sensor releases the bus immediately
    HumidityNoHoldMaster = 0xF5,
}

impl Command {
    pub(crate) const fn as_u8(self) -> u8 {
        self as u8
    }
}

/// Split a response LSB into its status bits and the data bits with status cleared
pub fn split_status(lsb: u8) -> (u8, u8) {
    (lsb & STATUS_MASK, lsb & !STATUS_MASK)
}

/// Convert a raw (status bits cleared) humidity reading to percent relative humidity
///
/// RH = -6 + 125 * S_RH / 2^16
pub fn raw_rel_humid_to_percent(raw: u16) -> f64 {
    raw as f64 * (125.0 / 65536.0) - 6.0
}

#[cfg(feature = "crc")]
pub(crate) const CRC_ALGORITHM: crc::Algorithm<u8> = crc::Algorithm {
    width: 8,
    // x^8 + x^5 + x^4 + 1
    poly: 0x31,
    init: 0x00,
    refin: false,
    refout: false,
    xorout: 0x00,
    check: 0xa2,
    residue: 0x00,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn humidity_conversion() {
        assert_eq!(raw_rel_humid_to_percent(0), -6.0);
        assert_eq!(raw_rel_humid_to_percent(32768), 56.5);
        // 0x7C80 from the datasheet
        assert!((raw_rel_humid_to_percent(0x7C80) - 54.791015625).abs() < 1e-12);
        // largest 14 bit reading, left justified
        assert!((raw_rel_humid_to_percent(0xFFFC) - 118.99237060546875).abs() < 1e-12);
    }

    #[test]
    fn status_split() {
        assert_eq!(split_status(0b1000_0110), (STATUS_HUMIDITY, 0b1000_0100));
        assert_eq!(split_status(0b0110_1001), (STATUS_TEMPERATURE, 0b0110_1000));
        assert_eq!(split_status(0xFF), (0b11, 0xFC));
    }

    #[test]
    fn command_bytes() {
        assert_eq!(Command::HumidityHoldMaster.as_u8(), 0xE5);
        assert_eq!(Command::HumidityNoHoldMaster.as_u8(), 0xF5);
    }

    #[cfg(feature = "crc")]
    #[test]
    fn datasheet_crc() {
        let crc = crc::Crc::<u8>::new(&CRC_ALGORITHM);
        assert_eq!(crc.checksum(b"123456789"), 0xa2);
        assert_eq!(crc.checksum(&[0x00, 0xDC]), 0x79);
        assert_eq!(crc.checksum(&[0x68, 0x3A]), 0x7C);
        assert_eq!(crc.checksum(&[0x4E, 0x85]), 0x6B);
    }
}
