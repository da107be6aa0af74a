use crate::{bme280, mcp3002, tsl2561};

/// Compensate using integer arithmetic only, following the fixed point
/// formulas from the datasheets. Results are scaled integers, for example a
/// temperature of `2508` means 25.08 °C.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Fixed;

/// Compensate using `f64`, results are in plain units (°C, hPa, %RH, lx).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Float;

/// A numeric representation every driver in this crate can compute its
/// measurements in. Implemented by [`Fixed`] and [`Float`].
pub trait SensorMath:
    bme280::Compensation + mcp3002::Scaling + tsl2561::LuxCalculation
{
}

impl<M> SensorMath for M where
    M: bme280::Compensation + mcp3002::Scaling + tsl2561::LuxCalculation
{
}

/// The representation picked at build time, used by the drivers unless told
/// otherwise. Enable the `float` feature to switch to [`Float`].
#[cfg(not(feature = "float"))]
pub type Math = Fixed;
#[cfg(feature = "float")]
pub type Math = Float;
