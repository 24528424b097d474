//! This is a platform-agnostic Rust driver for the HTU21D(F) relative humidity and temperature
//! sensor using the [`embedded-hal`] traits.
//!
//! [`embedded-hal`]: https://github.com/rust-embedded/embedded-hal/tree/master/embedded-hal
//!
//! This driver allows you to:
//! - Measure relative humidity in hold master mode (the sensor stretches the clock until the
//!   conversion is done).
//! - Measure relative humidity in no-hold master mode (the host waits 100 ms before reading).
//! - Validate the status bits of every response, and optionally its CRC.
//! - Share one driver between threads. Measurements on a driver are serialized.
//!
//! This driver does not yet support the following device features:
//! - Temperature measurement (`sense_temperature` reports [`Error::NotImplemented`]).
//! - Writing the user register (`set_options` reports [`Error::NotImplemented`]).
//! - Soft reset and heater control.
//!
//! ## Features
//!
//! - `crc`: Checks the received CRC against the computed CRC.
//! - `defmt`: Enables logging using the `defmt` framework.
//! - `log`: Enables logging using the `log` framework.
//!
//! ## Supported devices: HTU21D, HTU21DF
//!
//! The HTU21D(F) is a digital humidity sensor with temperature output. Humidity readings are
//! 14 bit values, left justified into 16 bits, whose two low bits carry the measurement type.
//! A third response byte holds a CRC-8 over the reading.
//!
//! Datasheet:
//!   [HTU21D(F)](https://cdn-shop.adafruit.com/datasheets/1899_HTU21D.pdf)
//!
//! To use this driver, import this crate and an `embedded_hal` implementation, then instantiate
//! the device.
//!
//! ## Example:
//!
//! ```
//! # use embedded_hal_mock::eh1::delay::NoopDelay;
//! # use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction};
//! use htu21d::{DEFAULT_ADDRESS, Env, Htu21d, Mode, Options};
//!
//! // Platform-specific
//! # let i2c = I2cMock::new(&[
//! #     Transaction::write(DEFAULT_ADDRESS, vec![0xE5]),
//! #     Transaction::read(DEFAULT_ADDRESS, vec![0x7C, 0x82, 0x97]),
//! # ]);
//! # let delay = NoopDelay::new();
//! // let i2c = /* embedded_hal::i2c::I2c instance */;
//! // let delay = /* embedded_hal::delay::DelayNs instance */;
//!
//! let options = Options { mode: Mode::HoldMaster, ..Options::default() };
//! let htu21d = Htu21d::new(i2c, delay, DEFAULT_ADDRESS, options);
//!
//! let mut env = Env::default();
//! htu21d.sense_humidity(&mut env).unwrap();
//! println!("{}", env.humidity);
//! # assert_eq!(env.humidity.to_string(), "54.8%rH");
//! # let (mut i2c, _delay) = htu21d.release();
//! # i2c.done();
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]

#[cfg(all(feature = "defmt", feature = "log"))]
compile_error!("Features \"defmt\" and \"log\" are mutually exclusive and cannot be enabled together");

mod device_impl;
mod hw_def;
mod types;

pub use crate::{hw_def::*, types::*};

use core::fmt;
use std::sync::Mutex;

#[cfg(feature = "defmt")]
use defmt::Format;

/// HTU21D(F) device driver
///
/// The bus and delay live behind a lock, so every operation takes `&self` and at most one
/// bus sequence runs per driver at a time.
#[derive(Debug)]
pub struct Htu21d<I2C, Delay> {
    pub(crate) bus: Mutex<Bus<I2C, Delay>>,
    pub(crate) i2c_addr: u8,
    pub(crate) options: Options,
}

#[derive(Debug)]
pub(crate) struct Bus<I2C, Delay> {
    pub(crate) i2c: I2C,
    pub(crate) delay: Delay,
}

/// All possible errors in this crate
#[cfg_attr(feature = "defmt", derive(Format))]
#[derive(Debug, PartialEq)]
pub enum Error<E> {
    /// I²C error while sending the measurement command
    SendCommand(E),
    /// I²C error while reading the measurement response
    ReadResponse(E),
    /// The response status bits were not those of a humidity measurement
    StatusMismatch(u8),
    /// Failure of a checksum from the device was detected
    #[cfg(feature = "crc")]
    CrcMismatch {
        /// checksum computed over the received reading
        expected: u8,
        /// checksum sent by the device
        received: u8,
    },
    /// The operation is not supported yet
    NotImplemented,
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::SendCommand(e) => write!(f, "failed to send command: {e:?}"),
            Error::ReadResponse(e) => write!(f, "failed to read response: {e:?}"),
            Error::StatusMismatch(status) => write!(f, "status was not correct [{status}]"),
            #[cfg(feature = "crc")]
            Error::CrcMismatch { expected, received } => {
                write!(f, "crc mismatch: expected 0x{expected:02X}, received 0x{received:02X}")
            }
            Error::NotImplemented => write!(f, "not implemented"),
        }
    }
}

impl<E: fmt::Debug> core::error::Error for Error<E> {}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::i2c::ErrorKind;

    #[test]
    fn error_messages_name_the_phase() {
        let send: Error<ErrorKind> = Error::SendCommand(ErrorKind::Bus);
        let read: Error<ErrorKind> = Error::ReadResponse(ErrorKind::Bus);
        assert_eq!(send.to_string(), "failed to send command: Bus");
        assert_eq!(read.to_string(), "failed to read response: Bus");
        assert_eq!(Error::<ErrorKind>::StatusMismatch(1).to_string(), "status was not correct [1]");
        assert_eq!(Error::<ErrorKind>::NotImplemented.to_string(), "not implemented");
    }
}
