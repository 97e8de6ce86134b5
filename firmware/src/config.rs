// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Board configuration for the Nucleo-F767ZI node.

use thermovalve::drivers::stepper_can::BaseId;

/// Main loop period.
pub const LOOP_PERIOD_MS: u32 = 50;

/// Delay between BMP280 init attempts when the sensor does not answer.
pub const SENSOR_RETRY_MS: u32 = 500;

/// BMP280 with SDO tied high.
pub const BMP280_ADDR: u8 = 0x77;

pub const I2C_FREQ_HZ: u32 = 100_000;

/// Command link (USART6) and debug terminal (USART3 via ST-LINK).
pub const CMD_BAUD: u32 = 115_200;
pub const DEBUG_BAUD: u32 = 115_200;

/// CAN_BTR for 500 kbit/s from a 16 MHz APB1: BRP = 2, TS1 = 13 tq, TS2 = 2 tq.
pub const CAN_BTR: u32 = 0x001C_0001;

#[cfg(feature = "base-0x70")]
pub const STEPPER_BASE: BaseId = BaseId::X70;
#[cfg(feature = "base-0x80")]
pub const STEPPER_BASE: BaseId = BaseId::X80;
#[cfg(feature = "base-0x90")]
pub const STEPPER_BASE: BaseId = BaseId::X90;
#[cfg(not(any(feature = "base-0x70", feature = "base-0x80", feature = "base-0x90")))]
pub const STEPPER_BASE: BaseId = BaseId::X60;
