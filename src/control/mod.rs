// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Control Algorithms
//!
//! ## Modules
//!
//! - [`proportional`] - Integer proportional controller driving the valve stepper.

pub mod proportional;

pub use proportional::ProportionalController;
