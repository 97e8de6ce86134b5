// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Transport Seams
//!
//! The core never touches peripherals directly. The board crate wraps its HAL instances (I2C, CAN,
//! USART) and implements these traits, which keeps everything above this layer testable on the
//! host.
//!
//! - [`RegisterBus`] - blocking register access to one sensor on a two-wire bus.
//! - [`FrameBus`] - standard-identifier data frames on the field bus.
//! - [`SerialTx`] - fire-and-forget byte transmission on the command link.

pub mod frame;

pub use frame::BusFrame;

/// Blocking register access to a single device.
///
/// The implementation owns the device address; register addresses are 8-bit.
pub trait RegisterBus {
    type Error;

    /// Burst-read `buf.len()` consecutive registers starting at `reg`.
    fn read_registers(&mut self, reg: u8, buf: &mut [u8]) -> Result<(), Self::Error>;

    /// Write a single register.
    fn write_register(&mut self, reg: u8, value: u8) -> Result<(), Self::Error>;
}

/// Field-bus transport for outgoing data frames.
pub trait FrameBus {
    type Error;

    /// Start the peripheral. Called once before the first frame is sent.
    fn start(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Queue one frame for transmission.
    fn send(&mut self, frame: &BusFrame) -> Result<(), Self::Error>;
}

/// Transmit side of the command link. Failures are swallowed by the implementation.
pub trait SerialTx {
    fn transmit(&mut self, bytes: &[u8]);
}

impl<T: RegisterBus + ?Sized> RegisterBus for &mut T {
    type Error = T::Error;

    fn read_registers(&mut self, reg: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
        (**self).read_registers(reg, buf)
    }

    fn write_register(&mut self, reg: u8, value: u8) -> Result<(), Self::Error> {
        (**self).write_register(reg, value)
    }
}

impl<T: FrameBus + ?Sized> FrameBus for &mut T {
    type Error = T::Error;

    fn start(&mut self) -> Result<(), Self::Error> {
        (**self).start()
    }

    fn send(&mut self, frame: &BusFrame) -> Result<(), Self::Error> {
        (**self).send(frame)
    }
}

impl<T: SerialTx + ?Sized> SerialTx for &mut T {
    fn transmit(&mut self, bytes: &[u8]) {
        (**self).transmit(bytes)
    }
}
