// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Thermovalve Control Core
//!
//! This crate contains the board-independent core of the Thermovalve node: a BMP280 barometer
//! feeds a proportional valve controller that drives a stepper over CAN, while a Raspberry Pi
//! reads telemetry and tunes the gain over a line-oriented serial protocol.
//!
//! ## Crate Structure
//!
//! | Module | Purpose |
//! | ------ | -------- |
//! | [`hw`] | Transport traits implemented by the board crate (I2C registers, CAN, USART TX) |
//! | [`drivers`] | Device-level drivers (BMP280, CAN stepper board) |
//! | [`telemetry`] | Latest calibrated readings and the tunable gain |
//! | [`protocol`] | Serial command protocol (line assembly, mailbox, dispatch) |
//! | [`control`] | Proportional valve controller |
//! | [`node`] | Owns the context objects and runs one main-loop cycle |
//!
//! ## Getting Started
//!
//! Run the host tests:
//!
//! ```bash
//! cargo test
//! ```
//!
//! Flash the board from the `firmware/` crate:
//!
//! ```bash
//! cd firmware && cargo run --release
//! ```
//!
//! ## License
//!
//! Licensed under the **MIT License**.
//! See the `LICENSE` file in the repository root for full terms.
//!
//! © 2025–2026 Christopher Liu

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod control;
pub mod drivers;
pub mod hw;
pub mod node;
pub mod protocol;
pub mod telemetry;

pub use node::{ControlNode, CycleReport};
pub use telemetry::{GainRegister, Measurement, TelemetryState};
