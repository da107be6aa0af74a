use color_eyre::eyre::{bail, Context};
use color_eyre::Result;
use linux_embedded_hal::spidev::{SpiModeFlags, SpidevOptions};
use linux_embedded_hal::{I2cdev, SpidevDevice};
use tracing::debug;

#[derive(Debug, clap::Args)]
pub struct SpiArgs {
    /// Number of the spi controller, picks /dev/spidev<BUS>.<CHIP_SELECT>
    #[arg(long, default_value_t = 0)]
    pub bus: u8,
    #[arg(long, default_value_t = 0)]
    pub chip_select: u8,
    /// In Hz
    #[arg(long, default_value_t = 100_000)]
    pub clock_speed: u32,
    /// Clock polarity and phase, 0 to 3
    #[arg(long, default_value_t = 0)]
    pub spi_mode: u8,
    /// Select the chip by pulling chip select high instead of low
    #[arg(long)]
    pub cs_active_high: bool,
}

impl SpiArgs {
    pub fn open(&self) -> Result<SpidevDevice> {
        let mut mode = match self.spi_mode {
            0 => SpiModeFlags::SPI_MODE_0,
            1 => SpiModeFlags::SPI_MODE_1,
            2 => SpiModeFlags::SPI_MODE_2,
            3 => SpiModeFlags::SPI_MODE_3,
            other => bail!("Spi mode must be between 0 and 3, got: {other}"),
        };
        if self.cs_active_high {
            mode |= SpiModeFlags::SPI_CS_HIGH;
        }

        let path = format!("/dev/spidev{}.{}", self.bus, self.chip_select);
        let mut spi = SpidevDevice::open(&path)
            .wrap_err_with(|| format!("Could not open spi device: {path}"))?;
        let options = SpidevOptions::new()
            .bits_per_word(8)
            .max_speed_hz(self.clock_speed)
            .mode(mode)
            .build();
        spi.configure(&options)
            .wrap_err("Could not configure spi device")?;
        debug!("opened {path} with {self:?}");
        Ok(spi)
    }
}

#[derive(Debug, clap::Args)]
pub struct I2cArgs {
    /// Number of the i2c controller, picks /dev/i2c-<BUS>
    #[arg(long, default_value_t = 1)]
    pub bus: u8,
}

impl I2cArgs {
    pub fn open(&self) -> Result<I2cdev> {
        let path = format!("/dev/i2c-{}", self.bus);
        let i2c = I2cdev::new(&path)
            .wrap_err_with(|| format!("Could not open i2c bus: {path}"))?;
        debug!("opened {path}");
        Ok(i2c)
    }
}
