//! TAOS TSL2561 ambient light sensor on i2c. The device is powered up only
//! for the duration of a transaction and powered down again afterwards.

use core::marker::PhantomData;

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use tracing::{debug, trace, warn};

mod lux;

pub use lux::LuxCalculation;

use crate::{Error, Math};

mod reg {
    /// command bit set, register 0
    pub const CONTROL: u8 = 0x80;
    pub const TIMING: u8 = 0x81;
    pub const ID: u8 = 0x8A;
    pub const DATA_0: u8 = 0x8C;
    pub const DATA_1: u8 = 0x8E;
}

const POWER_ON: u8 = 0x03;
const POWER_OFF: u8 = 0x00;
const POWER_UP_MS: u32 = 50;

/// Selected with the ADDR SEL pin
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum Address {
    /// pin tied to ground
    Low = 0x29,
    #[default]
    Float = 0x39,
    /// pin tied to VDD
    High = 0x49,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum Gain {
    X1 = 0x00,
    #[default]
    X16 = 0x10,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum Integration {
    Ms13 = 0x00,
    Ms101 = 0x01,
    #[default]
    Ms402 = 0x02,
}

impl Integration {
    /// Integration time plus a millisecond margin
    #[must_use]
    pub const fn wait_ms(self) -> u32 {
        match self {
            Integration::Ms13 => 14,
            Integration::Ms101 => 102,
            Integration::Ms402 => 403,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Settings {
    pub gain: Gain,
    pub integration: Integration,
}

impl Settings {
    #[must_use]
    pub const fn timing(&self) -> u8 {
        self.gain as u8 | self.integration as u8
    }
}

/// Chip packages differ in the lux formula coefficients
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Package {
    /// chipscale
    Cs,
    /// T, FN and CL packages
    TFnCl,
}

/// Package the lux formula is built for, chosen at compile time.
pub const PACKAGE: Package = if cfg!(feature = "tsl2561-cs") {
    Package::Cs
} else {
    Package::TFnCl
};

/// Counts of both photodiodes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawReading {
    /// visible and infrared
    pub channel_0: u16,
    /// infrared only
    pub channel_1: u16,
}

/// Content of the id register
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartId {
    /// 0 for the TSL2560, 1 for the TSL2561
    pub part_number: u8,
    pub revision: u8,
}

impl PartId {
    fn from_register(id: u8) -> Self {
        Self {
            part_number: id >> 4,
            revision: id & 0x0F,
        }
    }
}

pub struct Tsl2561<I2C, D, M = Math> {
    i2c: I2C,
    delay: D,
    address: u8,
    settings: Settings,
    math: PhantomData<M>,
}

impl<I2C: I2c, D: DelayNs> Tsl2561<I2C, D> {
    /// Applies the default settings: 16x gain and 402 ms integration.
    pub fn new(i2c: I2C, address: Address, delay: D) -> Result<Self, Error<I2C::Error>> {
        Self::with_math(i2c, address, delay)
    }
}

impl<I2C: I2c, D: DelayNs, M: LuxCalculation> Tsl2561<I2C, D, M> {
    pub fn with_math(i2c: I2C, address: Address, delay: D) -> Result<Self, Error<I2C::Error>> {
        let mut tsl = Self {
            i2c,
            delay,
            address: address as u8,
            settings: Settings::default(),
            math: PhantomData,
        };
        tsl.set_settings(Settings::default())?;
        Ok(tsl)
    }

    /// The new settings are only used once the device accepted them.
    pub fn set_settings(&mut self, settings: Settings) -> Result<(), Error<I2C::Error>> {
        debug!("applying settings: {settings:?}");
        self.powered(|tsl| tsl.write_register(reg::TIMING, settings.timing()))?;
        self.settings = settings;
        Ok(())
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Waits for a full integration cycle then reads both channels.
    pub fn read_data(&mut self) -> Result<RawReading, Error<I2C::Error>> {
        let reading = self.powered(|tsl| {
            tsl.delay.delay_ms(tsl.settings.integration.wait_ms());
            Ok(RawReading {
                channel_0: tsl.read_word(reg::DATA_0)?,
                channel_1: tsl.read_word(reg::DATA_1)?,
            })
        })?;
        trace!("raw reading: {reading:?}");
        Ok(reading)
    }

    pub fn read_id(&mut self) -> Result<PartId, Error<I2C::Error>> {
        self.powered(|tsl| {
            let mut id = [0u8];
            tsl.read_registers(reg::ID, &mut id)?;
            Ok(PartId::from_register(id[0]))
        })
    }

    pub fn compute_illuminance(&self, reading: &RawReading) -> M::Illuminance {
        M::illuminance(&self.settings, PACKAGE, reading)
    }

    pub fn release(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }

    /// Power on, run `op` and power off again. Powering off is attempted
    /// even if `op` failed, the first error is returned.
    fn powered<T>(
        &mut self,
        op: impl FnOnce(&mut Self) -> Result<T, Error<I2C::Error>>,
    ) -> Result<T, Error<I2C::Error>> {
        self.write_register(reg::CONTROL, POWER_ON)?;
        self.delay.delay_ms(POWER_UP_MS);

        let res = op(self);
        let off = self.write_register(reg::CONTROL, POWER_OFF);
        if let (Err(e), Err(_)) = (&off, &res) {
            warn!("could not power down after failed operation: {e:?}");
        }

        let value = res?;
        off?;
        Ok(value)
    }

    fn write_register(&mut self, register: u8, value: u8) -> Result<(), Error<I2C::Error>> {
        trace!("writing {value:#04x} to {register:#04x}");
        self.i2c
            .write(self.address, &[register, value])
            .map_err(Error::Bus)
    }

    fn read_registers(&mut self, register: u8, data: &mut [u8]) -> Result<(), Error<I2C::Error>> {
        self.i2c
            .write(self.address, &[register])
            .map_err(Error::Bus)?;
        self.i2c.read(self.address, data).map_err(Error::Bus)
    }

    fn read_word(&mut self, register: u8) -> Result<u16, Error<I2C::Error>> {
        let mut data = [0u8; 2];
        self.read_registers(register, &mut data)?;
        Ok(u16::from_le_bytes(data))
    }
}
