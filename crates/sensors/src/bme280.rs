//! Bosch BME280 temperature, pressure and humidity sensor on a 4 wire spi
//! bus.

use core::marker::PhantomData;

use embedded_hal::spi::SpiDevice;
use tracing::{debug, trace};

mod calibration;
mod compensation;
mod settings;

pub use calibration::Calibration;
pub use compensation::{Compensation, FineTemperature};
pub use settings::{Filter, Mode, Oversampling, Settings, Standby};

use crate::{Error, Math};

mod reg {
    pub const CALIB_TEMP_PRES: u8 = 0x88;
    pub const CALIB_HUM_1: u8 = 0xA1;
    pub const CALIB_HUM: u8 = 0xE1;
    pub const CTRL_HUM: u8 = 0xF2;
    pub const CTRL_MEAS: u8 = 0xF4;
    pub const CONFIG: u8 = 0xF5;
    pub const DATA: u8 = 0xF7;
}

const CALIB_TEMP_PRES_LEN: usize = 24;
const CALIB_HUM_1_LEN: usize = 1;
const DATA_LEN: usize = 8;
const MAX_READ: usize = CALIB_TEMP_PRES_LEN;

/// One sample as read from the data registers, not yet compensated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawReading {
    /// 20 bits
    pub pressure: u32,
    /// 20 bits
    pub temperature: u32,
    /// 16 bits
    pub humidity: u32,
}

impl RawReading {
    fn from_registers(regs: &[u8; DATA_LEN]) -> Self {
        let twenty_bits = |msb: u8, lsb: u8, xlsb: u8| {
            (u32::from(msb) << 12) | (u32::from(lsb) << 4) | (u32::from(xlsb & 0xF0) >> 4)
        };
        Self {
            pressure: twenty_bits(regs[0], regs[1], regs[2]),
            temperature: twenty_bits(regs[3], regs[4], regs[5]),
            humidity: (u32::from(regs[6]) << 8) | u32::from(regs[7]),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Measurements<M: Compensation> {
    pub temperature: M::Temperature,
    pub pressure: M::Pressure,
    pub humidity: M::Humidity,
}

pub struct Bme280<SPI, M = Math> {
    spi: SPI,
    settings: Settings,
    calibration: Calibration,
    math: PhantomData<M>,
}

impl<SPI: SpiDevice> Bme280<SPI> {
    /// Put the sensor in its low power default configuration and read its
    /// calibration. Compensation uses the build time [`Math`].
    pub fn new(spi: SPI) -> Result<Self, Error<SPI::Error>> {
        Self::with_math(spi)
    }
}

impl<SPI: SpiDevice, M: Compensation> Bme280<SPI, M> {
    /// Same as [`Bme280::new`] with compensation done in `M`
    pub fn with_math(spi: SPI) -> Result<Self, Error<SPI::Error>> {
        let mut bme = Self {
            spi,
            settings: Settings::default(),
            calibration: Calibration::default(),
            math: PhantomData,
        };
        bme.set_settings(Settings::default())?;
        bme.calibration = bme.read_calibration()?;
        debug!("calibration: {:?}", bme.calibration);
        Ok(bme)
    }

    /// Write the settings to the device. The registers are written in the
    /// order config, ctrl_meas, ctrl_hum. If any write fails the previous
    /// settings are kept.
    // TODO: the datasheet only guarantees ctrl_hum takes effect after a
    // following ctrl_meas write, check if swapping the order breaks deployed
    // sensors relying on the current order
    pub fn set_settings(&mut self, settings: Settings) -> Result<(), Error<SPI::Error>> {
        debug!("applying settings: {settings:?}");
        self.write_register(reg::CONFIG, settings.config())?;
        self.write_register(reg::CTRL_MEAS, settings.ctrl_meas())?;
        self.write_register(reg::CTRL_HUM, settings.ctrl_hum())?;
        self.settings = settings;
        Ok(())
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[must_use]
    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    pub fn read_data(&mut self) -> Result<RawReading, Error<SPI::Error>> {
        let mut regs = [0u8; DATA_LEN];
        self.read_registers(reg::DATA, &mut regs)?;
        let reading = RawReading::from_registers(&regs);
        trace!("raw reading: {reading:?}");
        Ok(reading)
    }

    /// Needs to be called before pressure or humidity can be computed as
    /// those need the returned [`FineTemperature`].
    pub fn compute_temperature(&self, reading: &RawReading) -> (M::Temperature, FineTemperature) {
        M::temperature(&self.calibration, reading)
    }

    pub fn compute_pressure(&self, reading: &RawReading, fine: FineTemperature) -> M::Pressure {
        M::pressure(&self.calibration, reading, fine)
    }

    pub fn compute_humidity(&self, reading: &RawReading, fine: FineTemperature) -> M::Humidity {
        M::humidity(&self.calibration, reading, fine)
    }

    /// Read a sample and compensate all three quantities
    pub fn measure(&mut self) -> Result<Measurements<M>, Error<SPI::Error>> {
        let reading = self.read_data()?;
        let (temperature, fine) = self.compute_temperature(&reading);
        Ok(Measurements {
            temperature,
            pressure: self.compute_pressure(&reading, fine),
            humidity: self.compute_humidity(&reading, fine),
        })
    }

    /// Give back the bus
    pub fn release(self) -> SPI {
        self.spi
    }

    fn read_calibration(&mut self) -> Result<Calibration, Error<SPI::Error>> {
        let mut regs = [0u8; calibration::LEN];
        let (temp_pres, hum) = regs.split_at_mut(CALIB_TEMP_PRES_LEN);
        let (hum_1, hum) = hum.split_at_mut(CALIB_HUM_1_LEN);

        self.read_registers(reg::CALIB_TEMP_PRES, temp_pres)?;
        self.read_registers(reg::CALIB_HUM_1, hum_1)?;
        self.read_registers(reg::CALIB_HUM, hum)?;
        Ok(Calibration::from_registers(&regs))
    }

    fn write_register(&mut self, address: u8, value: u8) -> Result<(), Error<SPI::Error>> {
        trace!("writing {value:#04x} to {address:#04x}");
        self.spi
            .write(&[address & 0x7F, value])
            .map_err(Error::Bus)
    }

    /// Full duplex: the first byte clocked in arrives while the address is
    /// still going out and is dropped.
    fn read_registers(&mut self, address: u8, data: &mut [u8]) -> Result<(), Error<SPI::Error>> {
        let len = data.len() + 1;
        let mut tx = [0u8; MAX_READ + 1];
        let mut rx = [0u8; MAX_READ + 1];
        tx[0] = address | 0x80;

        self.spi
            .transfer(&mut rx[..len], &tx[..len])
            .map_err(Error::Bus)?;
        data.copy_from_slice(&rx[1..len]);
        trace!("read {data:02x?} from {address:#04x}");
        Ok(())
    }
}
