// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Latest telemetry and the tunable controller gain.
//!
//! Every field is a single 32-bit word stored atomically, so readers never see a torn value and no
//! lock is needed. Each field has exactly one writer: the refresh path for telemetry, `SET_K` for
//! the gain.

use core::sync::atomic::{AtomicI32, AtomicU32, Ordering};

use crate::config::DEFAULT_GAIN_CENTI;
use crate::drivers::bmp280::{self, Bmp280};
use crate::hw::RegisterBus;

pub use crate::drivers::bmp280::Measurement;

/// Latest calibrated readings.
pub struct TelemetryState {
    temperature_centi: AtomicI32,
    pressure_pa: AtomicU32,
    angle_milli: AtomicI32,
}

impl TelemetryState {
    pub const fn new() -> Self {
        Self {
            temperature_centi: AtomicI32::new(0),
            pressure_pa: AtomicU32::new(0),
            angle_milli: AtomicI32::new(0),
        }
    }

    /// Temperature in 0.01 °C.
    #[inline]
    pub fn temperature_centi(&self) -> i32 {
        self.temperature_centi.load(Ordering::Relaxed)
    }

    /// Pressure in Pa.
    #[inline]
    pub fn pressure_pa(&self) -> u32 {
        self.pressure_pa.load(Ordering::Relaxed)
    }

    /// Angle in 0.001°. Always 0: no attitude estimate is computed.
    #[inline]
    pub fn angle_milli(&self) -> i32 {
        self.angle_milli.load(Ordering::Relaxed)
    }

    /// Publish a calibrated sample.
    pub fn store(&self, m: &Measurement) {
        self.temperature_centi
            .store(m.temperature_centi, Ordering::Relaxed);
        self.pressure_pa.store(m.pressure_pa, Ordering::Relaxed);
    }

    /// Run one sensor read + compensation cycle and publish it.
    ///
    /// On a transport failure the previous values stay in place.
    pub fn refresh<B: RegisterBus>(
        &self,
        baro: &mut Bmp280<B>,
    ) -> Result<Measurement, bmp280::Error<B::Error>> {
        let m = baro.measure()?;
        self.store(&m);
        Ok(m)
    }
}

impl Default for TelemetryState {
    fn default() -> Self {
        Self::new()
    }
}

/// Proportional gain in hundredths (1234 = K 12.34).
pub struct GainRegister {
    centi: AtomicI32,
}

impl GainRegister {
    pub const fn new(centi: i32) -> Self {
        Self {
            centi: AtomicI32::new(centi),
        }
    }

    #[inline]
    pub fn get(&self) -> i32 {
        self.centi.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn set(&self, centi: i32) {
        self.centi.store(centi, Ordering::Relaxed);
    }
}

impl Default for GainRegister {
    fn default() -> Self {
        Self::new(DEFAULT_GAIN_CENTI)
    }
}
