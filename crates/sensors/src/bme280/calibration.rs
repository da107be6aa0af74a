/// Bytes of calibration data: 24 for temperature and pressure, 1 + 7 for
/// humidity.
pub(crate) const LEN: usize = 32;

/// Compensation coefficients programmed into the sensor at the factory. Read
/// once when the driver is created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Calibration {
    pub dig_t1: u16,
    pub dig_t2: i16,
    pub dig_t3: i16,
    pub dig_p1: u16,
    pub dig_p2: i16,
    pub dig_p3: i16,
    pub dig_p4: i16,
    pub dig_p5: i16,
    pub dig_p6: i16,
    pub dig_p7: i16,
    pub dig_p8: i16,
    pub dig_p9: i16,
    pub dig_h1: u8,
    pub dig_h2: i16,
    pub dig_h3: u8,
    pub dig_h4: i16,
    pub dig_h5: i16,
    pub dig_h6: i8,
}

impl Calibration {
    /// Parse the three calibration ranges concatenated: `0x88..0xA0`,
    /// `0xA1` and `0xE1..0xE8`.
    #[must_use]
    pub fn from_registers(regs: &[u8; LEN]) -> Self {
        let u16_at = |i: usize| u16::from_le_bytes([regs[i], regs[i + 1]]);
        let i16_at = |i: usize| i16::from_le_bytes([regs[i], regs[i + 1]]);

        // h4 and h5 are 12 bits, sharing the nibbles of byte 29
        let h4 = (u16::from(regs[28]) << 4) | u16::from(regs[29] & 0x0F);
        let h5 = (u16::from(regs[30]) << 4) | u16::from(regs[29] >> 4);

        Self {
            dig_t1: u16_at(0),
            dig_t2: i16_at(2),
            dig_t3: i16_at(4),
            dig_p1: u16_at(6),
            dig_p2: i16_at(8),
            dig_p3: i16_at(10),
            dig_p4: i16_at(12),
            dig_p5: i16_at(14),
            dig_p6: i16_at(16),
            dig_p7: i16_at(18),
            dig_p8: i16_at(20),
            dig_p9: i16_at(22),
            dig_h1: regs[24],
            dig_h2: i16_at(25),
            dig_h3: regs[27],
            dig_h4: h4 as i16,
            dig_h5: h5 as i16,
            dig_h6: regs[31] as i8,
        }
    }
}
