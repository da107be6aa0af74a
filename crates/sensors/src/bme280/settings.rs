/// Number of samples the sensor averages per measurement. The same scale is
/// used for temperature, pressure and humidity, each lives at a different
/// offset in the control registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum Oversampling {
    /// measurement is turned off
    Skip = 0,
    #[default]
    X1 = 1,
    X2 = 2,
    X4 = 3,
    X8 = 4,
    X16 = 5,
}

impl Oversampling {
    const fn temperature_bits(self) -> u8 {
        (self as u8) << 5
    }

    const fn pressure_bits(self) -> u8 {
        (self as u8) << 2
    }

    const fn humidity_bits(self) -> u8 {
        self as u8
    }
}

/// Time the sensor idles between measurements in [`Mode::Normal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum Standby {
    Ms0_5 = 0x00,
    Ms62_5 = 0x20,
    Ms125 = 0x40,
    Ms250 = 0x60,
    Ms500 = 0x80,
    #[default]
    Ms1000 = 0xA0,
    Ms10 = 0xC0,
    Ms20 = 0xE0,
}

/// Coefficient of the IIR filter applied to temperature and pressure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum Filter {
    #[default]
    Off = 0x00,
    X2 = 0x04,
    X4 = 0x08,
    X8 = 0x0C,
    X16 = 0x10,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum Mode {
    #[default]
    Sleep = 0x00,
    /// take a single measurement then go back to sleep
    Forced = 0x01,
    /// measure continuously, pausing for the standby time in between
    Normal = 0x03,
}

/// Everything that ends up in the `config`, `ctrl_meas` and `ctrl_hum`
/// registers.
///
/// The default is the low power configuration the driver starts in: sleeping,
/// no filter, a single sample per measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Settings {
    pub mode: Mode,
    pub osr_temp: Oversampling,
    pub osr_pres: Oversampling,
    pub osr_hum: Oversampling,
    pub standby: Standby,
    pub filter: Filter,
}

impl Settings {
    /// Value for the `config` register: standby | filter
    #[must_use]
    pub const fn config(&self) -> u8 {
        self.standby as u8 | self.filter as u8
    }

    /// Value for the `ctrl_meas` register: temperature osr | pressure osr | mode
    #[must_use]
    pub const fn ctrl_meas(&self) -> u8 {
        self.osr_temp.temperature_bits() | self.osr_pres.pressure_bits() | self.mode as u8
    }

    /// Value for the `ctrl_hum` register: humidity osr
    #[must_use]
    pub const fn ctrl_hum(&self) -> u8 {
        self.osr_hum.humidity_bits()
    }
}
