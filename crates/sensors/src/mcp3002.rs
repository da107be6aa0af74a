//! Microchip MCP3002, a 10 bit two channel ADC on spi.

use core::fmt::{Debug, Display};
use core::marker::PhantomData;

use embedded_hal::delay::DelayNs;
use embedded_hal::spi::SpiDevice;
use strum::IntoEnumIterator;
use tracing::trace;

use crate::{Error, Fixed, Float, Math};

const SETTLE_MS: u32 = 100;
/// start bit and msb first
const COMMAND: u8 = 0x48;
/// full scale of the 10 bit converter
const STEPS: u16 = 1024;

/// Input to convert, discriminant holds the `SGL/DIFF` and `ODD/SIGN` bits
/// of the command byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::EnumIter)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum Channel {
    /// CH0 relative to CH1
    Differential0 = 0x00,
    /// CH1 relative to CH0
    Differential1 = 0x10,
    Single0 = 0x20,
    Single1 = 0x30,
}

impl Channel {
    const fn command(self) -> u8 {
        COMMAND | self as u8
    }
}

/// 10 bit codes for every channel from a single [`Mcp3002::read_data`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawReading {
    pub differential_0: u16,
    pub differential_1: u16,
    pub single_0: u16,
    pub single_1: u16,
}

impl RawReading {
    #[must_use]
    pub fn code(&self, channel: Channel) -> u16 {
        match channel {
            Channel::Differential0 => self.differential_0,
            Channel::Differential1 => self.differential_1,
            Channel::Single0 => self.single_0,
            Channel::Single1 => self.single_1,
        }
    }

    fn code_mut(&mut self, channel: Channel) -> &mut u16 {
        match channel {
            Channel::Differential0 => &mut self.differential_0,
            Channel::Differential1 => &mut self.differential_1,
            Channel::Single0 => &mut self.single_0,
            Channel::Single1 => &mut self.single_1,
        }
    }
}

/// How a code scales to a voltage. The result is in the unit of the
/// reference voltage.
pub trait Scaling {
    type Voltage: Copy + Debug + Display + Default + PartialEq + PartialOrd;

    fn voltage(code: u16, reference: Self::Voltage) -> Self::Voltage;
}

impl Scaling for Fixed {
    type Voltage = u32;

    fn voltage(code: u16, reference: u32) -> u32 {
        u32::from(code).wrapping_mul(reference) / u32::from(STEPS)
    }
}

impl Scaling for Float {
    type Voltage = f64;

    fn voltage(code: u16, reference: f64) -> f64 {
        f64::from(code) * reference / f64::from(STEPS)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settings<M: Scaling = Math> {
    /// voltage on VDD/VREF, the voltage a full scale code corresponds to
    pub reference: M::Voltage,
}

impl<M: Scaling> Default for Settings<M> {
    fn default() -> Self {
        Self {
            reference: M::Voltage::default(),
        }
    }
}

pub struct Mcp3002<SPI, D, M: Scaling = Math> {
    spi: SPI,
    delay: D,
    settings: Settings<M>,
    math: PhantomData<M>,
}

impl<SPI: SpiDevice, D: DelayNs> Mcp3002<SPI, D> {
    /// The reference voltage starts out as zero, set it using
    /// [`Mcp3002::set_settings`] before computing voltages.
    pub fn new(spi: SPI, delay: D) -> Self {
        Self::with_math(spi, delay)
    }
}

impl<SPI: SpiDevice, D: DelayNs, M: Scaling> Mcp3002<SPI, D, M> {
    pub fn with_math(spi: SPI, delay: D) -> Self {
        Self {
            spi,
            delay,
            settings: Settings::default(),
            math: PhantomData,
        }
    }

    /// Only stored, the ADC itself has nothing to configure
    pub fn set_settings(&mut self, settings: Settings<M>) {
        self.settings = settings;
    }

    #[must_use]
    pub fn settings(&self) -> &Settings<M> {
        &self.settings
    }

    /// Waits for the input to settle then converts every channel, one
    /// transfer each.
    pub fn read_data(&mut self) -> Result<RawReading, Error<SPI::Error>> {
        self.delay.delay_ms(SETTLE_MS);

        let mut reading = RawReading::default();
        for channel in Channel::iter() {
            *reading.code_mut(channel) = self.convert(channel)?;
        }
        trace!("raw reading: {reading:?}");
        Ok(reading)
    }

    pub fn compute_voltage(&self, reading: &RawReading, channel: Channel) -> M::Voltage {
        M::voltage(reading.code(channel), self.settings.reference)
    }

    pub fn release(self) -> (SPI, D) {
        (self.spi, self.delay)
    }

    fn convert(&mut self, channel: Channel) -> Result<u16, Error<SPI::Error>> {
        let tx = [channel.command(), 0x00];
        let mut rx = [0u8; 2];
        self.spi.transfer(&mut rx, &tx).map_err(Error::Bus)?;
        Ok((u16::from(rx[0] & 0x03) << 8) | u16::from(rx[1]))
    }
}
