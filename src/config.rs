// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Compile-time configuration shared by the core and the board crate.

/// Capacity of the command line buffer, including the terminator slot.
pub const CMD_BUF_LEN: usize = 32;

/// Longest command line that can be buffered (one slot is reserved for the terminator).
pub const CMD_MAX_LEN: usize = CMD_BUF_LEN - 1;

/// Gain at start-up, in hundredths (100 = K 1.00).
pub const DEFAULT_GAIN_CENTI: i32 = 100;

/// Reference temperature of the valve control law, in hundredths of a degree (25.00 °C).
pub const T_REF_CENTI: i32 = 2500;

/// Mechanical saturation of the valve, in degrees. Commands stay in [-90, +90].
pub const ANGLE_LIMIT_DEG: i32 = 90;

/// Largest angle the stepper board accepts in angle mode. Larger requests are clamped.
pub const SET_ANGLE_MAX_DEG: i32 = 180;
