use crate::hw_def::*;

use core::fmt;

#[cfg(feature = "defmt")]
use defmt::Format;

/// How the sensor is asked to signal the end of a conversion
#[cfg_attr(feature = "defmt", derive(Format))]
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Mode {
    /// The sensor holds the clock line until the conversion is done, so the read blocks on the bus
    HoldMaster,
    /// The sensor releases the bus right away and the host waits before reading
    #[default]
    NoHoldMaster,
}

/// Driver options, copied into the driver at construction
#[cfg_attr(feature = "defmt", derive(Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Options {
    /// Measurement mode
    pub mode: Mode,
    /// User register value. Stored only, not written to the device yet.
    pub config: u8,
}
impl Default for Options {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            config: USER_REGISTER_DEFAULT,
        }
    }
}

/// Meaning of the two status bits in a response
#[cfg_attr(feature = "defmt", derive(Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Status {
    /// result of a temperature measurement
    Temperature,
    /// result of a humidity measurement
    Humidity,
    /// reserved bit pattern
    Invalid(u8),
}
impl From<u8> for Status {
    /// Decode the status bits of a response LSB
    fn from(lsb: u8) -> Self {
        match lsb & STATUS_MASK {
            STATUS_TEMPERATURE => Status::Temperature,
            STATUS_HUMIDITY => Status::Humidity,
            other => Status::Invalid(other),
        }
    }
}
impl From<Status> for u8 {
    fn from(status: Status) -> u8 {
        match status {
            Status::Temperature => STATUS_TEMPERATURE,
            Status::Humidity => STATUS_HUMIDITY,
            Status::Invalid(bits) => bits,
        }
    }
}

/// Relative humidity, fixed point in units of 1/100000 %RH
#[cfg_attr(feature = "defmt", derive(Format))]
#[derive(Clone, Copy, Debug, Default, Eq, Ord, PartialEq, PartialOrd)]
pub struct RelativeHumidity(pub i32);
impl RelativeHumidity {
    /// One percent of relative humidity
    pub const PERCENT: i32 = 100_000;

    /// Convert from percent, truncating toward zero
    pub fn from_percent(percent: f64) -> Self {
        Self((percent * Self::PERCENT as f64) as i32)
    }

    /// Value in percent
    pub fn percent(&self) -> f64 {
        self.0 as f64 / Self::PERCENT as f64
    }
}
impl fmt::Display for RelativeHumidity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}%rH", self.percent())
    }
}

/// Environment record filled in by the sense operations
#[cfg_attr(feature = "defmt", derive(Format))]
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Env {
    /// relative humidity
    pub humidity: RelativeHumidity,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options() {
        let opts = Options::default();
        assert_eq!(opts.mode, Mode::NoHoldMaster);
        assert_eq!(opts.config, 0x02);
    }

    #[test]
    fn status_decoding() {
        assert_eq!(Status::from(0b1000_0110), Status::Humidity);
        assert_eq!(Status::from(0b0110_0101), Status::Temperature);
        assert_eq!(Status::from(0b0000_0000), Status::Invalid(0));
        assert_eq!(Status::from(0b1111_1111), Status::Invalid(3));
        assert_eq!(u8::from(Status::Humidity), 2);
    }

    #[test]
    fn fixed_point_humidity() {
        assert_eq!(RelativeHumidity::from_percent(56.5), RelativeHumidity(5_650_000));
        assert_eq!(RelativeHumidity::from_percent(-6.0), RelativeHumidity(-600_000));
        // truncated, not rounded
        assert_eq!(RelativeHumidity::from_percent(54.791015625), RelativeHumidity(5_479_101));
        assert_eq!(RelativeHumidity(5_650_000).percent(), 56.5);
    }

    #[test]
    fn display() {
        assert_eq!(RelativeHumidity(5_479_101).to_string(), "54.8%rH");
        assert_eq!(RelativeHumidity(-600_000).to_string(), "-6.0%rH");
    }
}
