//! Empirical lux formulas from the TAOS TSL2561 datasheet. The thresholds and
//! coefficients are fitted constants, they must be kept exactly as they are.

use core::fmt::{Debug, Display};

use super::{Gain, Integration, Package, RawReading, Settings};
use crate::{Fixed, Float};

pub trait LuxCalculation {
    type Illuminance: Copy + Debug + Display + PartialOrd;

    fn illuminance(settings: &Settings, package: Package, raw: &RawReading) -> Self::Illuminance;
}

const LUX_SCALE: u32 = 14;
const RATIO_SCALE: u32 = 9;
const CH_SCALE: u32 = 10;
/// 322/11 * 2^CH_SCALE
const CH_SCALE_13MS: u32 = 0x7517;
/// 322/81 * 2^CH_SCALE
const CH_SCALE_101MS: u32 = 0x0FE7;

/// (upper ratio bound, b, m) with the ratio scaled by 2^RATIO_SCALE.
/// Ratios above the last bound give zero lux.
type Table = [(u32, u32, u32); 7];

const T_FN_CL: Table = [
    (0x0040, 0x01f2, 0x01be),
    (0x0080, 0x0214, 0x02d1),
    (0x00c0, 0x023f, 0x037b),
    (0x0100, 0x0270, 0x03fe),
    (0x0138, 0x016f, 0x01fc),
    (0x019a, 0x00d2, 0x00fb),
    (0x029a, 0x0018, 0x0012),
];

const CS: Table = [
    (0x0043, 0x0204, 0x01ad),
    (0x0085, 0x0228, 0x02c1),
    (0x00c8, 0x0253, 0x0363),
    (0x010a, 0x0282, 0x03df),
    (0x014d, 0x0177, 0x01dd),
    (0x019a, 0x0101, 0x0127),
    (0x029a, 0x0037, 0x002b),
];

fn coefficients(package: Package, ratio: u32) -> (u32, u32) {
    let table = match package {
        Package::Cs => &CS,
        Package::TFnCl => &T_FN_CL,
    };
    table
        .iter()
        .find(|(bound, _, _)| ratio <= *bound)
        .map_or((0, 0), |&(_, b, m)| (b, m))
}

impl LuxCalculation for Fixed {
    type Illuminance = u32;

    fn illuminance(settings: &Settings, package: Package, raw: &RawReading) -> u32 {
        let ch_scale = match settings.integration {
            Integration::Ms13 => CH_SCALE_13MS,
            Integration::Ms101 => CH_SCALE_101MS,
            Integration::Ms402 => 1 << CH_SCALE,
        };
        let ch_scale = match settings.gain {
            Gain::X1 => ch_scale << 4,
            Gain::X16 => ch_scale,
        };

        let channel0 = u32::from(raw.channel_0).wrapping_mul(ch_scale) >> CH_SCALE;
        let channel1 = u32::from(raw.channel_1).wrapping_mul(ch_scale) >> CH_SCALE;

        let ratio = if channel0 == 0 {
            0
        } else {
            (channel1 << (RATIO_SCALE + 1)) / channel0
        };
        let ratio = (ratio + 1) >> 1;

        let (b, m) = coefficients(package, ratio);
        let lux = channel0
            .wrapping_mul(b)
            .wrapping_sub(channel1.wrapping_mul(m))
            .wrapping_add(1 << (LUX_SCALE - 1));
        lux >> LUX_SCALE
    }
}

impl LuxCalculation for Float {
    type Illuminance = f64;

    fn illuminance(settings: &Settings, package: Package, raw: &RawReading) -> f64 {
        let ch0 = f64::from(raw.channel_0);
        let ch1 = f64::from(raw.channel_1);

        let lux = if raw.channel_0 == 0 {
            0.0
        } else {
            let ratio = ch1 / ch0;
            match package {
                Package::Cs => {
                    if ratio <= 0.52 {
                        0.0315 * ch0 - 0.0593 * ch0 * ratio.powf(1.4)
                    } else if ratio <= 0.65 {
                        0.0229 * ch0 - 0.0291 * ch1
                    } else if ratio <= 0.80 {
                        0.0157 * ch0 - 0.0180 * ch1
                    } else if ratio <= 1.30 {
                        0.00338 * ch0 - 0.00260 * ch1
                    } else {
                        0.0
                    }
                }
                Package::TFnCl => {
                    if ratio <= 0.50 {
                        0.0304 * ch0 - 0.062 * ch0 * ratio.powf(1.4)
                    } else if ratio <= 0.61 {
                        0.0224 * ch0 - 0.031 * ch1
                    } else if ratio <= 0.80 {
                        0.0128 * ch0 - 0.0153 * ch1
                    } else if ratio <= 1.30 {
                        0.00146 * ch0 - 0.00112 * ch1
                    } else {
                        0.0
                    }
                }
            }
        };

        let lux = match settings.gain {
            Gain::X1 => lux * 16.0,
            Gain::X16 => lux,
        };
        match settings.integration {
            Integration::Ms13 => lux * (402.0 / 13.7),
            Integration::Ms101 => lux * (402.0 / 101.0),
            Integration::Ms402 => lux,
        }
    }
}
