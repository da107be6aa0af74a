use std::time::Duration;

use clap::{Parser, Subcommand};
use color_eyre::Result;
use sensors::bme280::{self, Filter, Mode, Oversampling, Standby};
use sensors::mcp3002::{self, Channel, Scaling};
use sensors::tsl2561::{self, Address, Gain, Integration};
use sensors::{Math, Unit};

mod bus;
mod sample;

use bus::{I2cArgs, SpiArgs};
use sample::Sampling;

type Voltage = <Math as Scaling>::Voltage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum VoltageUnit {
    Millivolt,
    Volt,
}

impl From<VoltageUnit> for Unit {
    fn from(unit: VoltageUnit) -> Self {
        match unit {
            VoltageUnit::Millivolt => Unit::MilliVolt,
            VoltageUnit::Volt => Unit::Volt,
        }
    }
}

#[derive(Parser)]
#[command(name = "sensor reader")]
#[command(version = "1.0")]
#[command(about = "reads a sensor attached to the spi or i2c pins and prints the measurements")]
struct Cli {
    /// Number of samples to take
    #[arg(short, long, global = true, default_value_t = 1)]
    count: u32,
    /// Pause between samples in milliseconds
    #[arg(short, long, global = true, default_value_t = 1000)]
    interval: u64,
    #[command(subcommand)]
    sensor: Sensor,
}

#[derive(Subcommand)]
enum Sensor {
    /// Temperature, pressure and humidity
    Bme280 {
        #[command(flatten)]
        spi: SpiArgs,
        #[arg(long, value_enum, default_value_t = Mode::Normal)]
        mode: Mode,
        #[arg(long, value_enum, default_value_t = Oversampling::X16)]
        osr_temp: Oversampling,
        #[arg(long, value_enum, default_value_t = Oversampling::X16)]
        osr_pres: Oversampling,
        #[arg(long, value_enum, default_value_t = Oversampling::X16)]
        osr_hum: Oversampling,
        #[arg(long, value_enum, default_value_t = Standby::Ms1000)]
        standby: Standby,
        #[arg(long, value_enum, default_value_t = Filter::X16)]
        filter: Filter,
    },
    /// Voltage on both inputs of the adc
    Mcp3002 {
        #[command(flatten)]
        spi: SpiArgs,
        /// Voltage on VDD/VREF, measurements are printed in its unit
        #[arg(long)]
        reference: Voltage,
        /// Unit the reference is given in
        #[arg(long, value_enum, default_value_t = VoltageUnit::Millivolt)]
        unit: VoltageUnit,
        /// Only print these channels, can be repeated. Prints all by default
        #[arg(long, value_enum)]
        channel: Vec<Channel>,
    },
    /// Illuminance
    Tsl2561 {
        #[command(flatten)]
        i2c: I2cArgs,
        #[arg(long, value_enum, default_value_t = Address::Float)]
        address: Address,
        #[arg(long, value_enum, default_value_t = Gain::X16)]
        gain: Gain,
        #[arg(long, value_enum, default_value_t = Integration::Ms402)]
        integration: Integration,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    logger::tracing::setup();

    let sampling = Sampling {
        count: cli.count,
        interval: Duration::from_millis(cli.interval),
    };

    match cli.sensor {
        Sensor::Bme280 {
            spi,
            mode,
            osr_temp,
            osr_pres,
            osr_hum,
            standby,
            filter,
        } => {
            let settings = bme280::Settings {
                mode,
                osr_temp,
                osr_pres,
                osr_hum,
                standby,
                filter,
            };
            sample::bme280(&spi, settings, sampling)
        }
        Sensor::Mcp3002 {
            spi,
            reference,
            unit,
            channel,
        } => {
            let settings = mcp3002::Settings { reference };
            let channels = sample::Channels::new(channel);
            sample::mcp3002(&spi, settings, unit.into(), &channels, sampling)
        }
        Sensor::Tsl2561 {
            i2c,
            address,
            gain,
            integration,
        } => {
            let settings = tsl2561::Settings { gain, integration };
            sample::tsl2561(&i2c, address, settings, sampling)
        }
    }
}
