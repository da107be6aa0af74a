//! Bosch compensation formulas turning raw adc counts into temperature,
//! pressure and humidity.
//!
//! The fixed point versions mirror the 32 bit reference code: truncating
//! division where it divides, 32 bit wrapping intermediates. Keep it that way,
//! results are compared bit for bit against sensors running the reference
//! code.

use core::fmt::{Debug, Display};

use super::{Calibration, RawReading};
use crate::{Fixed, Float, Unit};

/// High resolution temperature produced by temperature compensation. Pressure
/// and humidity compensation depend on it, which is why the only way to get
/// one is [`Compensation::temperature`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FineTemperature(i32);

impl FineTemperature {
    #[must_use]
    pub fn raw(self) -> i32 {
        self.0
    }
}

pub trait Compensation {
    type Temperature: Copy + Debug + Display + PartialOrd;
    type Pressure: Copy + Debug + Display + PartialOrd;
    type Humidity: Copy + Debug + Display + PartialOrd;

    const TEMPERATURE_UNIT: Unit;
    const PRESSURE_UNIT: Unit;
    const HUMIDITY_UNIT: Unit;

    /// Clamped to -40..=85 °C
    fn temperature(
        calibration: &Calibration,
        raw: &RawReading,
    ) -> (Self::Temperature, FineTemperature);
    /// Clamped to 300..=1100 hPa, a degenerate calibration gives 300 hPa
    fn pressure(
        calibration: &Calibration,
        raw: &RawReading,
        fine: FineTemperature,
    ) -> Self::Pressure;
    fn humidity(
        calibration: &Calibration,
        raw: &RawReading,
        fine: FineTemperature,
    ) -> Self::Humidity;
}

mod fixed {
    pub const TEMPERATURE_MAX: i32 = 8500;
    pub const TEMPERATURE_MIN: i32 = -4000;
    pub const PRESSURE_MAX: u32 = 110_000;
    pub const PRESSURE_MIN: u32 = 30_000;
    pub const HUMIDITY_MAX: u32 = 102_400;
}

mod float {
    pub const TEMPERATURE_MAX: f64 = 85.0;
    pub const TEMPERATURE_MIN: f64 = -40.0;
    pub const PRESSURE_MAX: f64 = 1100.0;
    pub const PRESSURE_MIN: f64 = 300.0;
    pub const HUMIDITY_MAX: f64 = 100.0;
    pub const HUMIDITY_MIN: f64 = 0.0;
}

impl Compensation for Fixed {
    /// hundredths of a degree celsius
    type Temperature = i32;
    /// pascal
    type Pressure = u32;
    /// 1/1024 percent relative humidity
    type Humidity = u32;

    const TEMPERATURE_UNIT: Unit = Unit::CentiC;
    const PRESSURE_UNIT: Unit = Unit::Pa;
    const HUMIDITY_UNIT: Unit = Unit::RelHumidity1024;

    fn temperature(c: &Calibration, raw: &RawReading) -> (i32, FineTemperature) {
        let adc = raw.temperature;
        let t1 = i32::from(c.dig_t1);

        let var1 = ((adc / 8) as i32).wrapping_sub(t1 * 2);
        let var1 = var1.wrapping_mul(i32::from(c.dig_t2)) / 2048;
        let var2 = ((adc / 16) as i32).wrapping_sub(t1);
        let var2 = (var2.wrapping_mul(var2) / 4096).wrapping_mul(i32::from(c.dig_t3)) / 16384;

        let t_fine = var1.wrapping_add(var2);
        let temperature = t_fine.wrapping_mul(5).wrapping_add(128) / 256;
        let temperature = temperature.clamp(fixed::TEMPERATURE_MIN, fixed::TEMPERATURE_MAX);
        (temperature, FineTemperature(t_fine))
    }

    fn pressure(c: &Calibration, raw: &RawReading, fine: FineTemperature) -> u32 {
        let p1 = i32::from(c.dig_p1);
        let p2 = i32::from(c.dig_p2);
        let p3 = i32::from(c.dig_p3);
        let p4 = i32::from(c.dig_p4);
        let p5 = i32::from(c.dig_p5);
        let p6 = i32::from(c.dig_p6);
        let p7 = i32::from(c.dig_p7);
        let p8 = i32::from(c.dig_p8);
        let p9 = i32::from(c.dig_p9);

        let var1 = fine.0 / 2 - 64000;
        let square = (var1 / 4).wrapping_mul(var1 / 4);
        let var2 = (square / 2048).wrapping_mul(p6);
        let var2 = var2.wrapping_add(var1.wrapping_mul(p5).wrapping_mul(2));
        let var2 = (var2 / 4).wrapping_add(p4.wrapping_mul(65536));
        let var3 = p3.wrapping_mul(square / 8192) / 8;
        let var4 = p2.wrapping_mul(var1) / 2;
        let var1 = var3.wrapping_add(var4) / 262_144;
        let var1 = 32768i32.wrapping_add(var1).wrapping_mul(p1) / 32768;

        if var1 == 0 {
            return fixed::PRESSURE_MIN;
        }
        let divisor = var1 as u32;

        let var5 = 1_048_576u32.wrapping_sub(raw.pressure);
        let pressure = var5.wrapping_sub((var2 / 4096) as u32).wrapping_mul(3125);
        let pressure = if pressure < 0x8000_0000 {
            (pressure << 1) / divisor
        } else {
            (pressure / divisor).wrapping_mul(2)
        };

        let eighth = pressure / 8;
        let var1 = p9.wrapping_mul((eighth.wrapping_mul(eighth) / 8192) as i32) / 4096;
        let var2 = ((pressure / 4) as i32).wrapping_mul(p8) / 8192;
        let correction = var1.wrapping_add(var2).wrapping_add(p7) / 16;
        let pressure = (pressure as i32).wrapping_add(correction) as u32;

        pressure.clamp(fixed::PRESSURE_MIN, fixed::PRESSURE_MAX)
    }

    fn humidity(c: &Calibration, raw: &RawReading, fine: FineTemperature) -> u32 {
        let var1 = fine.0.wrapping_sub(76800);

        let adc = raw.humidity.wrapping_mul(16384) as i32;
        let offset = i32::from(c.dig_h4).wrapping_mul(1_048_576);
        let slope = i32::from(c.dig_h5).wrapping_mul(var1);
        let var5 = adc
            .wrapping_sub(offset)
            .wrapping_sub(slope)
            .wrapping_add(16384)
            / 32768;

        let var2 = var1.wrapping_mul(i32::from(c.dig_h6)) / 1024;
        let var3 = var1.wrapping_mul(i32::from(c.dig_h3)) / 2048;
        let var4 = (var2.wrapping_mul(var3.wrapping_add(32768)) / 1024).wrapping_add(2_097_152);
        let var2 = var4.wrapping_mul(i32::from(c.dig_h2)).wrapping_add(8192) / 16384;

        let var3 = var5.wrapping_mul(var2);
        let var4 = (var3 / 32768).wrapping_mul(var3 / 32768) / 128;
        let var5 = var3.wrapping_sub(var4.wrapping_mul(i32::from(c.dig_h1)) / 16);
        let var5 = var5.clamp(0, 419_430_400);

        // only the upper bound, var5 is non negative already
        ((var5 / 4096) as u32).min(fixed::HUMIDITY_MAX)
    }
}

impl Compensation for Float {
    /// degree celsius
    type Temperature = f64;
    /// hectopascal
    type Pressure = f64;
    /// percent relative humidity
    type Humidity = f64;

    const TEMPERATURE_UNIT: Unit = Unit::C;
    const PRESSURE_UNIT: Unit = Unit::HPa;
    const HUMIDITY_UNIT: Unit = Unit::RH;

    fn temperature(c: &Calibration, raw: &RawReading) -> (f64, FineTemperature) {
        let adc = f64::from(raw.temperature);
        let t1 = f64::from(c.dig_t1);

        let var1 = (adc / 16384.0 - t1 / 1024.0) * f64::from(c.dig_t2);
        let var2 = adc / 131_072.0 - t1 / 8192.0;
        let var2 = (var2 * var2) * f64::from(c.dig_t3);

        // stored truncated, pressure and humidity see the truncated value
        let fine = FineTemperature((var1 + var2) as i32);
        let temperature = (var1 + var2) / 5120.0;
        let temperature = temperature.clamp(float::TEMPERATURE_MIN, float::TEMPERATURE_MAX);
        (temperature, fine)
    }

    fn pressure(c: &Calibration, raw: &RawReading, fine: FineTemperature) -> f64 {
        let var1 = f64::from(fine.0) / 2.0 - 64000.0;
        let var2 = var1 * var1 * f64::from(c.dig_p6) / 32768.0;
        let var2 = var2 + var1 * f64::from(c.dig_p5) * 2.0;
        let var2 = (var2 / 4.0) + (f64::from(c.dig_p4) * 65536.0);
        let var3 = f64::from(c.dig_p3) * var1 * var1 / 524_288.0;
        let var1 = (var3 + f64::from(c.dig_p2) * var1) / 524_288.0;
        let var1 = (1.0 + var1 / 32768.0) * f64::from(c.dig_p1);

        if var1 <= 0.0 {
            return float::PRESSURE_MIN;
        }

        let pressure = 1_048_576.0 - f64::from(raw.pressure);
        let pressure = (pressure - (var2 / 4096.0)) * 6250.0 / var1;
        let var1 = f64::from(c.dig_p9) * pressure * pressure / 2_147_483_648.0;
        let var2 = pressure * f64::from(c.dig_p8) / 32768.0;
        let pressure = pressure + (var1 + var2 + f64::from(c.dig_p7)) / 16.0;
        let pressure = pressure / 100.0;

        pressure.clamp(float::PRESSURE_MIN, float::PRESSURE_MAX)
    }

    fn humidity(c: &Calibration, raw: &RawReading, fine: FineTemperature) -> f64 {
        let var1 = f64::from(fine.0) - 76800.0;
        let var2 = f64::from(c.dig_h4) * 64.0 + (f64::from(c.dig_h5) / 16384.0) * var1;
        let var3 = f64::from(raw.humidity) - var2;
        let var4 = f64::from(c.dig_h2) / 65536.0;
        let var5 = 1.0 + (f64::from(c.dig_h3) / 67_108_864.0) * var1;
        let var6 = 1.0 + (f64::from(c.dig_h6) / 67_108_864.0) * var1 * var5;
        let var6 = var3 * var4 * (var5 * var6);
        let humidity = var6 * (1.0 - f64::from(c.dig_h1) * var6 / 524_288.0);

        humidity.clamp(float::HUMIDITY_MIN, float::HUMIDITY_MAX)
    }
}
