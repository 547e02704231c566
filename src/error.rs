//! Error types shared by both drivers

use core::fmt;

/// Driver error, generic over the error type of the underlying bus or ADC
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// The I2C transaction kept failing until the [`RetryPolicy`](crate::retry::RetryPolicy)
    /// ran out of attempts; carries the last bus error
    Bus(E),
    /// The analog source could not produce a sample
    Adc(E),
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Bus(e) => write!(f, "bus transaction failed: {e:?}"),
            Error::Adc(e) => write!(f, "analog read failed: {e:?}"),
        }
    }
}

impl<E: fmt::Debug> embedded_io::Error for Error<E> {
    fn kind(&self) -> embedded_io::ErrorKind {
        match self {
            Error::Bus(_) => embedded_io::ErrorKind::TimedOut,
            Error::Adc(_) => embedded_io::ErrorKind::Other,
        }
    }
}

/// A raw unit selector that is neither Celsius (`0`) nor Fahrenheit (`1`)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UnknownUnit(pub u8);

impl fmt::Display for UnknownUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown temperature unit selector {}", self.0)
    }
}
