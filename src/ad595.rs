//! AD595 type K thermocouple amplifier
//!
//! The AD595 outputs 10 mV/°C. Read on a 10 bit ADC with a 5 V reference, one count is
//! 500/1024 °C. There is no cold junction, open thermocouple or range detection here: a
//! disconnected sensor just reads as whatever the ADC sees.

use crate::error::{Error, UnknownUnit};

/// Full scale of the ADC input, in volts
const ADC_REFERENCE_V: f32 = 5.0;
/// AD595 gain, °C per volt
const DEGREES_PER_VOLT: f32 = 100.0;
/// 10 bit ADC
const ADC_STEPS: f32 = 1024.0;

/// An analog input the AD595 output is wired to
pub trait AnalogInput {
    /// Error of the underlying ADC
    type Error;

    /// Put the pin in input mode
    ///
    /// Most HALs hand out pins already configured, so the default does nothing.
    fn configure_input(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    /// One raw conversion, `0..=1023` for 0 V to 5 V
    fn read_sample(&mut self) -> Result<u16, Self::Error>;
}

/// Unit of a measured temperature
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TemperatureUnit {
    #[allow(missing_docs)]
    #[default]
    Celsius,
    #[allow(missing_docs)]
    Fahrenheit,
}

/// Selector values `0` (Celsius) and `1` (Fahrenheit), anything else is rejected
impl TryFrom<u8> for TemperatureUnit {
    type Error = UnknownUnit;

    fn try_from(selector: u8) -> Result<Self, Self::Error> {
        match selector {
            0 => Ok(TemperatureUnit::Celsius),
            1 => Ok(TemperatureUnit::Fahrenheit),
            other => Err(UnknownUnit(other)),
        }
    }
}

/// AD595 reader on one analog input
pub struct Ad595<ADC> {
    adc: ADC,
}

impl<ADC: AnalogInput> Ad595<ADC> {
    /// Configure `adc` as an input and take ownership of it
    pub fn init(mut adc: ADC) -> Result<Self, Error<ADC::Error>> {
        adc.configure_input().map_err(Error::Adc)?;
        Ok(Self { adc })
    }

    /// Sample once and convert to `unit`
    pub fn measure(&mut self, unit: TemperatureUnit) -> Result<f32, Error<ADC::Error>> {
        let sample = self.adc.read_sample().map_err(Error::Adc)?;

        let celsius = sample_to_celsius(sample);
        Ok(match unit {
            TemperatureUnit::Celsius => celsius,
            TemperatureUnit::Fahrenheit => celsius_to_fahrenheit(celsius),
        })
    }

    #[allow(missing_docs)]
    pub fn measure_celsius(&mut self) -> Result<f32, Error<ADC::Error>> {
        self.measure(TemperatureUnit::Celsius)
    }

    #[allow(missing_docs)]
    pub fn measure_fahrenheit(&mut self) -> Result<f32, Error<ADC::Error>> {
        self.measure(TemperatureUnit::Fahrenheit)
    }

    /// Give the analog input back
    pub fn release(self) -> ADC {
        self.adc
    }
}

/// Raw 10 bit sample to °C
///
/// Samples above 1023 are not clamped.
pub fn sample_to_celsius(sample: u16) -> f32 {
    (ADC_REFERENCE_V * sample as f32 * DEGREES_PER_VOLT) / ADC_STEPS
}

#[allow(missing_docs)]
pub fn celsius_to_fahrenheit(celsius: f32) -> f32 {
    celsius * 9.0 / 5.0 + 32.0
}
