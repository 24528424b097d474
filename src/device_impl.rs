use crate::hw_def::*;
use crate::types::*;
use crate::{Bus, Error, Htu21d};

use embedded_hal::{delay::DelayNs, i2c::I2c};
use std::sync::{Mutex, MutexGuard, PoisonError};

cfg_if::cfg_if! {
    if #[cfg(feature = "defmt")] {
        use defmt::trace;
    } else if #[cfg(feature = "log")] {
        use log::trace;
    } else {
        macro_rules! trace {
            ($($arg:tt)*) => {};
        }
    }
}

#[cfg(feature = "crc")]
const CRC: crc::Crc<u8> = crc::Crc::<u8>::new(&CRC_ALGORITHM);

impl<I2C, Delay, E> Htu21d<I2C, Delay>
where
    I2C: I2c<Error = E>,
    Delay: DelayNs,
{
    /// Create a new HTU21D driver instance
    ///
    /// No bus traffic happens here; `options` are copied into the driver and fixed from then on.
    pub fn new(i2c: I2C, delay: Delay, i2c_addr: u8, options: Options) -> Self {
        Self {
            bus: Mutex::new(Bus { i2c, delay }),
            i2c_addr,
            options,
        }
    }

    /// I²C address the driver talks to
    pub fn address(&self) -> u8 {
        self.i2c_addr
    }

    /// Options the driver was created with
    pub fn options(&self) -> Options {
        self.options
    }

    /// Destroy the driver and hand back the bus and delay
    pub fn release(self) -> (I2C, Delay) {
        let Bus { i2c, delay } = self.bus.into_inner().unwrap_or_else(PoisonError::into_inner);
        (i2c, delay)
    }

    // Nothing but the bus handles lives behind the lock, so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, Bus<I2C, Delay>> {
        self.bus.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn cmd_and_read(&self, bus: &mut Bus<I2C, Delay>) -> Result<[u8; RESPONSE_LEN], Error<E>> {
        let (command, conversion_wait_ms) = match self.options.mode {
            Mode::HoldMaster => (Command::HumidityHoldMaster, None),
            Mode::NoHoldMaster => (Command::HumidityNoHoldMaster, Some(READ_DELAY_MS)),
        };

        trace!("htu21d::cmd_and_read(): command={:#x}", command.as_u8());
        bus.i2c
            .write(self.i2c_addr, &[command.as_u8()])
            .map_err(Error::SendCommand)?;

        // In hold master mode the read below stalls on clock stretching instead
        if let Some(ms) = conversion_wait_ms {
            bus.delay.delay_ms(ms);
        }

        let mut response = [0u8; RESPONSE_LEN];
        bus.i2c
            .read(self.i2c_addr, &mut response)
            .map_err(Error::ReadResponse)?;
        trace!("htu21d::cmd_and_read(): response={:?}", response);
        Ok(response)
    }

    /// Measure relative humidity
    ///
    /// Sends the measurement command for the configured [`Mode`], waits for the conversion,
    /// reads the 3 byte response and checks that its status bits mark a humidity result.
    /// Failures are never retried.
    pub fn measure_humidity(&self) -> Result<RelativeHumidity, Error<E>> {
        let mut bus = self.lock();
        let response = self.cmd_and_read(&mut bus)?;
        let raw = decode_humidity(&response)?;
        Ok(RelativeHumidity::from_percent(raw_rel_humid_to_percent(raw)))
    }

    /// Measure relative humidity into `env`
    ///
    /// `env` is only written when the measurement succeeds.
    pub fn sense_humidity(&self, env: &mut Env) -> Result<(), Error<E>> {
        env.humidity = self.measure_humidity()?;
        Ok(())
    }

    /// Measure temperature into `env`. Not supported yet, always returns [`Error::NotImplemented`].
    pub fn sense_temperature(&self, _env: &mut Env) -> Result<(), Error<E>> {
        let _bus = self.lock();
        Err(Error::NotImplemented)
    }

    /// Apply new options. Not supported yet, always returns [`Error::NotImplemented`].
    pub fn set_options(&self, _options: Options) -> Result<(), Error<E>> {
        let _bus = self.lock();
        Err(Error::NotImplemented)
    }
}

fn decode_humidity<E>(response: &[u8; RESPONSE_LEN]) -> Result<u16, Error<E>> {
    #[cfg(feature = "crc")]
    check_crc(response)?;

    let [msb, lsb, _crc] = *response;
    let (status, lsb) = split_status(lsb);
    if Status::from(status) != Status::Humidity {
        return Err(Error::StatusMismatch(status));
    }
    Ok(u16::from(msb) << 8 | u16::from(lsb))
}

#[cfg(feature = "crc")]
fn check_crc<E>(response: &[u8; RESPONSE_LEN]) -> Result<(), Error<E>> {
    let expected = CRC.checksum(&response[..2]);
    let received = response[2];
    if expected != received {
        trace!("htu21d::check_crc(): expected={:#x} received={:#x}", expected, received);
        return Err(Error::CrcMismatch { expected, received });
    }
    Ok(())
}
