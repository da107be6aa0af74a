#![allow(clippy::missing_panics_doc, clippy::missing_errors_doc)]

//! Drivers for a BME280 (temperature, pressure, humidity), an MCP3002 (two
//! channel ADC) and a TSL2561 (light) hooked up to the spi and i2c pins of a
//! single board computer.
//!
//! Every driver follows the same flow: create it (this configures the
//! device), read a raw sample, then turn that sample into physical units with
//! one of the `compute_*` methods. The arithmetic is done either in fixed
//! point or in floating point, see [`SensorMath`].

use core::fmt::Display;

pub mod bme280;
pub mod mcp3002;
pub mod tsl2561;

mod errors;
mod math;

pub use errors::Error;
pub use math::{Fixed, Float, Math, SensorMath};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    /// hundredths of a degree celsius
    CentiC,
    C,
    Pa,
    HPa,
    /// relative humidity in 1/1024 of a percent
    RelHumidity1024,
    RH,
    MilliVolt,
    Volt,
    Lux,
}

impl Display for Unit {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Unit::CentiC => f.write_str("°C/100"),
            Unit::C => f.write_str("°C"),
            Unit::Pa => f.write_str("Pa"),
            Unit::HPa => f.write_str("hPa"),
            Unit::RelHumidity1024 => f.write_str("%RH/1024"),
            Unit::RH => f.write_str("%RH"),
            Unit::MilliVolt => f.write_str("mV"),
            Unit::Volt => f.write_str("V"),
            Unit::Lux => f.write_str("lx"),
        }
    }
}
