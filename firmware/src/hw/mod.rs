// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Hardware Abstraction Layer
//!
//! Thin wrappers around the STM32F7 HAL peripherals, each implementing one transport trait of the
//! control core.
//!
//! - [`can`] - CAN1 via bxcan, for the stepper driver.
//! - [`i2c`] - Register access to the BMP280.
//! - [`usart`] - Debug log and command link.

pub mod can;
pub mod i2c;
pub mod usart;

pub use can::CanBus;
pub use i2c::I2cRegisters;
pub use usart::Usart;
