use std::thread;
use std::time::Duration;

use color_eyre::eyre::Context;
use color_eyre::Result;
use linux_embedded_hal::Delay;
use sensors::bme280::{self, Bme280, Compensation};
use sensors::mcp3002::{self, Channel, Mcp3002};
use sensors::tsl2561::{self, Address, Tsl2561};
use sensors::{Math, Unit};
use strum::IntoEnumIterator;
use tracing::info;

use crate::bus::{I2cArgs, SpiArgs};

#[derive(Debug, Clone, Copy)]
pub struct Sampling {
    pub count: u32,
    pub interval: Duration,
}

impl Sampling {
    fn repeat(&self, mut sample: impl FnMut() -> Result<()>) -> Result<()> {
        for i in 0..self.count {
            if i > 0 {
                thread::sleep(self.interval);
            }
            sample()?;
        }
        Ok(())
    }
}

pub fn bme280(spi: &SpiArgs, settings: bme280::Settings, sampling: Sampling) -> Result<()> {
    let mut bme = Bme280::new(spi.open()?).wrap_err("Could not initialize the bme280")?;
    bme.set_settings(settings)
        .wrap_err("Could not configure the bme280")?;
    info!("bme280 ready, calibration: {:?}", bme.calibration());

    sampling.repeat(|| {
        let measurements = bme.measure().wrap_err("Could not read the bme280")?;
        println!(
            "temperature: {} {}",
            measurements.temperature,
            <Math as Compensation>::TEMPERATURE_UNIT
        );
        println!(
            "pressure: {} {}",
            measurements.pressure,
            <Math as Compensation>::PRESSURE_UNIT
        );
        println!(
            "humidity: {} {}",
            measurements.humidity,
            <Math as Compensation>::HUMIDITY_UNIT
        );
        Ok(())
    })
}

/// Channels to print, in conversion order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channels(Vec<Channel>);

impl Channels {
    /// Nothing selected means every channel
    pub fn new(selected: Vec<Channel>) -> Self {
        Self(
            Channel::iter()
                .filter(|c| selected.is_empty() || selected.contains(c))
                .collect(),
        )
    }
}

/// Voltages are printed in `unit`, the unit of the reference in `settings`
pub fn mcp3002(
    spi: &SpiArgs,
    settings: mcp3002::Settings,
    unit: Unit,
    channels: &Channels,
    sampling: Sampling,
) -> Result<()> {
    let mut adc = Mcp3002::new(spi.open()?, Delay);
    adc.set_settings(settings);

    sampling.repeat(|| {
        let reading = adc.read_data().wrap_err("Could not read the mcp3002")?;
        for &channel in &channels.0 {
            let voltage = adc.compute_voltage(&reading, channel);
            println!("{channel:?}: {voltage} {unit}");
        }
        Ok(())
    })
}

pub fn tsl2561(
    i2c: &I2cArgs,
    address: Address,
    settings: tsl2561::Settings,
    sampling: Sampling,
) -> Result<()> {
    let mut tsl =
        Tsl2561::new(i2c.open()?, address, Delay).wrap_err("Could not initialize the tsl2561")?;
    tsl.set_settings(settings)
        .wrap_err("Could not configure the tsl2561")?;
    let id = tsl.read_id().wrap_err("Could not read the tsl2561 id")?;
    info!("tsl2561 ready, {id:?}, using the {:?} lux formula", tsl2561::PACKAGE);

    sampling.repeat(|| {
        let reading = tsl.read_data().wrap_err("Could not read the tsl2561")?;
        let lux = tsl.compute_illuminance(&reading);
        println!("illuminance: {lux} {}", Unit::Lux);
        Ok(())
    })
}
