// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Proportional valve controller.
//!
//! Maps the temperature error around 25.00 °C to a valve angle:
//!
//! ```text
//! angle_deg = K * (T - Tref)
//!           = (k_centi * (temp_centi - 2500)) / 10000
//! ```
//!
//! using integer arithmetic only, truncating toward zero, then saturates to ±90°. A command is only
//! put on the bus when the saturated angle differs from the last one actually sent.
//!
//! Typical usage pattern:
//!
//! ```ignore
//! loop {
//!     telemetry.refresh(&mut baro)?;
//!     controller.update(telemetry.temperature_centi(), gain.get(), &mut stepper)?;
//!     delay.delay_ms(50_u32);
//! }
//! ```

use crate::config::{ANGLE_LIMIT_DEG, T_REF_CENTI};
use crate::drivers::stepper_can::{Error, Sign, StepperCan};
use crate::hw::FrameBus;

/// Unsaturated control law output, in degrees.
pub fn raw_angle_deg(temp_centi: i32, gain_centi: i32) -> i64 {
    let err_centi = temp_centi as i64 - T_REF_CENTI as i64;
    (gain_centi as i64 * err_centi) / 10_000
}

/// Control law output saturated to the valve's mechanical range.
pub fn target_angle_deg(temp_centi: i32, gain_centi: i32) -> i32 {
    let limit = ANGLE_LIMIT_DEG as i64;
    raw_angle_deg(temp_centi, gain_centi).clamp(-limit, limit) as i32
}

/// Controller memory: the last computed and the last sent angle.
pub struct ProportionalController {
    /// `None` until a command has gone out, so the first one is always sent.
    last_sent: Option<i32>,
    last_computed: Option<i32>,
}

impl ProportionalController {
    pub const fn new() -> Self {
        Self {
            last_sent: None,
            last_computed: None,
        }
    }

    /// Forget the last sent command so the next update always transmits.
    pub fn reset(&mut self) {
        self.last_sent = None;
        self.last_computed = None;
    }

    /// Run one control step.
    ///
    /// Returns `Ok(Some(angle))` when a command was sent, `Ok(None)` when it was suppressed
    /// because the bus already carries that angle. On a bus error the angle is not recorded as
    /// sent, so the next update retries it.
    pub fn update<B: FrameBus>(
        &mut self,
        temp_centi: i32,
        gain_centi: i32,
        stepper: &mut StepperCan<B>,
    ) -> Result<Option<i32>, Error<B::Error>> {
        let angle = target_angle_deg(temp_centi, gain_centi);
        self.last_computed = Some(angle);

        // Do not resend the same command repeatedly on the CAN bus
        if self.last_sent == Some(angle) {
            return Ok(None);
        }

        let sign = if angle < 0 {
            Sign::Negative
        } else {
            Sign::Positive
        };
        stepper.set_angle(angle.abs(), sign)?;

        self.last_sent = Some(angle);
        Ok(Some(angle))
    }

    #[inline]
    pub fn last_sent(&self) -> Option<i32> {
        self.last_sent
    }

    #[inline]
    pub fn last_computed(&self) -> Option<i32> {
        self.last_computed
    }
}

impl Default for ProportionalController {
    fn default() -> Self {
        Self::new()
    }
}
