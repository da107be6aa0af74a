#![allow(dead_code)]

//! Stand-ins for the buses and delay, they emulate just enough of the
//! devices to drive the real drivers and record what those did.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{self, I2c, NoAcknowledgeSource};
use embedded_hal::spi::{self, SpiDevice};

#[derive(Debug, Default)]
pub struct Delay {
    pub waits_ms: Vec<u32>,
}

impl DelayNs for Delay {
    fn delay_ns(&mut self, ns: u32) {
        self.waits_ms.push(ns.div_ceil(1_000_000));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.waits_ms.push(ms);
    }
}

/// Bme280 register file behind a 4 wire spi bus
pub struct Bme280Bus {
    pub registers: [u8; 256],
    /// (register, value) in the order they were written
    pub writes: Vec<(u8, u8)>,
    /// reject every write once this many have been accepted
    pub fail_writes_after: Option<usize>,
}

impl Bme280Bus {
    pub fn new(calibration: &[u8; 32], data: &[u8; 8]) -> Self {
        let mut registers = [0u8; 256];
        registers[0x88..0xA0].copy_from_slice(&calibration[..24]);
        registers[0xA1] = calibration[24];
        registers[0xE1..0xE8].copy_from_slice(&calibration[25..]);
        registers[0xF7..0xFF].copy_from_slice(data);
        Self {
            registers,
            writes: Vec::new(),
            fail_writes_after: None,
        }
    }

    pub fn set_data(&mut self, data: &[u8; 8]) {
        self.registers[0xF7..0xFF].copy_from_slice(data);
    }
}

impl spi::ErrorType for Bme280Bus {
    type Error = spi::ErrorKind;
}

impl SpiDevice for Bme280Bus {
    fn transaction(
        &mut self,
        operations: &mut [spi::Operation<'_, u8>],
    ) -> Result<(), Self::Error> {
        for op in operations {
            match op {
                spi::Operation::Write(words) => {
                    let [address, value] = words else {
                        return Err(spi::ErrorKind::Other);
                    };
                    assert_eq!(*address & 0x80, 0, "writes must clear the read bit");
                    let register = *address | 0x80;
                    if self.fail_writes_after == Some(self.writes.len()) {
                        return Err(spi::ErrorKind::Other);
                    }
                    self.registers[usize::from(register)] = *value;
                    self.writes.push((register, *value));
                }
                spi::Operation::Transfer(read, write) => {
                    assert_eq!(read.len(), write.len());
                    assert_ne!(write[0] & 0x80, 0, "reads must set the read bit");
                    let start = usize::from(write[0]);
                    read[0] = 0xFF;
                    for (i, byte) in read[1..].iter_mut().enumerate() {
                        *byte = self.registers[start + i];
                    }
                }
                _ => return Err(spi::ErrorKind::Other),
            }
        }
        Ok(())
    }
}

/// Mcp3002 returning a fixed code per channel. The bits above the code are
/// filled with ones as the real chip leaves them undefined.
pub struct Mcp3002Bus {
    /// indexed by the `SGL/DIFF` and `ODD/SIGN` bits
    pub codes: [u16; 4],
    pub commands: Vec<u8>,
}

impl Mcp3002Bus {
    pub fn new(codes: [u16; 4]) -> Self {
        Self {
            codes,
            commands: Vec::new(),
        }
    }
}

impl spi::ErrorType for Mcp3002Bus {
    type Error = spi::ErrorKind;
}

impl SpiDevice for Mcp3002Bus {
    fn transaction(
        &mut self,
        operations: &mut [spi::Operation<'_, u8>],
    ) -> Result<(), Self::Error> {
        for op in operations {
            let spi::Operation::Transfer(read, write) = op else {
                return Err(spi::ErrorKind::Other);
            };
            assert_eq!(write.len(), 2);
            assert_eq!(read.len(), 2);
            assert_eq!(write[0] & 0xCF, 0x48, "start bit and msb first");
            self.commands.push(write[0]);

            let code = self.codes[usize::from((write[0] >> 4) & 0x03)];
            read[0] = 0xFC | (code >> 8) as u8;
            read[1] = (code & 0xFF) as u8;
        }
        Ok(())
    }
}

/// Tsl2561 at one address. Data registers only hold a value while the
/// device is powered.
pub struct Tsl2561Bus {
    pub address: u8,
    pub registers: [u8; 256],
    pub channel_0: u16,
    pub channel_1: u16,
    pub powered: bool,
    pub control_writes: Vec<u8>,
    pub timing_writes: Vec<u8>,
    pub fail_reads: bool,
    /// reject timing writes once this many have been accepted
    pub fail_timing_writes_after: Option<usize>,
    pointer: u8,
}

impl Tsl2561Bus {
    pub fn new(address: u8, channel_0: u16, channel_1: u16) -> Self {
        let mut registers = [0u8; 256];
        registers[0x8A] = 0x1A;
        Self {
            address,
            registers,
            channel_0,
            channel_1,
            powered: false,
            control_writes: Vec::new(),
            timing_writes: Vec::new(),
            fail_reads: false,
            fail_timing_writes_after: None,
            pointer: 0,
        }
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), i2c::ErrorKind> {
        match *bytes {
            [register] => self.pointer = register,
            [0x81, _] if self.fail_timing_writes_after == Some(self.timing_writes.len()) => {
                return Err(i2c::ErrorKind::Bus)
            }
            [register, value] => {
                self.registers[usize::from(register)] = value;
                match register {
                    0x80 => {
                        self.powered = value == 0x03;
                        self.control_writes.push(value);
                    }
                    0x81 => self.timing_writes.push(value),
                    _ => (),
                }
            }
            _ => return Err(i2c::ErrorKind::Other),
        }
        Ok(())
    }

    fn read_bytes(&mut self, buf: &mut [u8]) -> Result<(), i2c::ErrorKind> {
        if self.fail_reads {
            return Err(i2c::ErrorKind::Bus);
        }
        if self.powered {
            self.registers[0x8C..0x8E].copy_from_slice(&self.channel_0.to_le_bytes());
            self.registers[0x8E..0x90].copy_from_slice(&self.channel_1.to_le_bytes());
        } else {
            self.registers[0x8C..0x90].fill(0);
        }
        let start = usize::from(self.pointer);
        buf.copy_from_slice(&self.registers[start..start + buf.len()]);
        Ok(())
    }
}

impl i2c::ErrorType for Tsl2561Bus {
    type Error = i2c::ErrorKind;
}

impl I2c for Tsl2561Bus {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [i2c::Operation<'_>],
    ) -> Result<(), Self::Error> {
        if address != self.address {
            return Err(i2c::ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        }
        for op in operations {
            match op {
                i2c::Operation::Write(bytes) => self.write_bytes(bytes)?,
                i2c::Operation::Read(buf) => self.read_bytes(buf)?,
            }
        }
        Ok(())
    }
}

/// Byte image of the calibration registers from the datasheet worked example
#[rustfmt::skip]
pub const DATASHEET_CALIBRATION: [u8; 32] = [
    0x70, 0x6B, 0x43, 0x67, 0x18, 0xFC,
    0x7D, 0x8E, 0x43, 0xD6, 0xD0, 0x0B,
    0x27, 0x0B, 0x8C, 0x00, 0xF9, 0xFF,
    0x8C, 0x3C, 0xF8, 0xC6, 0x70, 0x17,
    0x4B,
    0x6A, 0x01, 0x00,
    0x13, 0x29, 0x03, 0x1E,
];

/// Data registers giving adc_P = 415148, adc_T = 519888, adc_H = 30000
pub const DATASHEET_DATA: [u8; 8] = [0x65, 0x5A, 0xC0, 0x7E, 0xED, 0x00, 0x75, 0x30];
