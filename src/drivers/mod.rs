// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Device-Specific Drivers
//!
//! This module contains device-specific drivers that sit above the transport traits in `hw` and
//! below the application logic.
//!
//! ## Existing drivers
//!
//! - [`bmp280`] – Bosch BMP280 barometer (calibration and integer compensation)
//! - [`stepper_can`] – CAN stepper driver board (manual, angle, and zero commands)

pub mod bmp280;
pub mod stepper_can;

pub use bmp280::Bmp280;
pub use stepper_can::StepperCan;
