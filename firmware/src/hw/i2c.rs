// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! I2C register access for a single device.
//!
//! `I2cRegisters` pairs a blocking I2C bus with a 7-bit device address and implements
//! [`RegisterBus`]: reads are a register-address write followed by a repeated-start read, writes
//! are a two-byte `[reg, value]` transfer.

use embedded_hal::blocking::i2c::{Write, WriteRead};
use thermovalve::hw::RegisterBus;

pub struct I2cRegisters<I> {
    i2c: I,
    addr: u8,
}

impl<I> I2cRegisters<I> {
    pub fn new(i2c: I, addr: u8) -> Self {
        Self { i2c, addr }
    }

    #[inline]
    pub fn addr(&self) -> u8 {
        self.addr
    }
}

impl<I, E> RegisterBus for I2cRegisters<I>
where
    I: Write<Error = E> + WriteRead<Error = E>,
{
    type Error = E;

    fn read_registers(&mut self, reg: u8, buf: &mut [u8]) -> Result<(), E> {
        self.i2c.write_read(self.addr, &[reg], buf)
    }

    fn write_register(&mut self, reg: u8, value: u8) -> Result<(), E> {
        self.i2c.write(self.addr, &[reg, value])
    }
}
