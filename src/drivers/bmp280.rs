// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Bosch BMP280 barometric pressure sensor.
//!
//! This module handles register access, calibration loading, and the manufacturer's 32-bit
//! fixed-point compensation for the BMP280. The arithmetic below is the datasheet algorithm
//! operation for operation: same shift amounts, same operand widths, two's-complement wrapping on
//! overflow. Do not rewrite it in floating point; the outputs are compared against
//! datasheet vectors bit for bit.
//!
//! A measurement cycle is always one temperature compensation followed by one pressure
//! compensation. [`FineTemperature`] is produced by the former and consumed by the latter, so a
//! pressure value can never be computed from another sample's temperature.

use core::num::Wrapping;

use crate::hw::RegisterBus;

// Register addresses
pub mod reg {
    pub const CALIB_START: u8 = 0x88;
    pub const ID: u8 = 0xD0;
    pub const CTRL_MEAS: u8 = 0xF4;
    pub const PRESS_TEMP: u8 = 0xF7;
}

/// Number of calibration bytes at 0x88..=0xA1. The last two are reserved.
pub const CALIB_LEN: usize = 26;

/// Chip id reported by a genuine BMP280.
pub const CHIP_ID: u8 = 0x58;

/// Normal mode, pressure oversampling x16, temperature oversampling x2.
pub const CTRL_MEAS_DEFAULT: u8 = 0x57;

/// Error type for `Bmp280` operations.
#[derive(Debug, Eq, PartialEq)]
pub enum Error<E> {
    /// The register transport did not complete.
    Bus(E),
}

/// Factory trimming constants, read once from the sensor's NVM.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct CalibrationConstants {
    pub dig_t1: u16,
    pub dig_t2: i16,
    pub dig_t3: i16,
    pub dig_p1: u16,
    pub dig_p2: i16,
    pub dig_p3: i16,
    pub dig_p4: i16,
    pub dig_p5: i16,
    pub dig_p6: i16,
    pub dig_p7: i16,
    pub dig_p8: i16,
    pub dig_p9: i16,
}

/// Intermediate `t_fine` value of one temperature compensation.
///
/// Neither `Copy` nor `Clone`: each one feeds exactly one pressure compensation.
#[derive(Debug, Eq, PartialEq)]
pub struct FineTemperature(i32);

impl FineTemperature {
    /// Raw `t_fine` value, for diagnostics.
    #[inline]
    pub fn value(&self) -> i32 {
        self.0
    }
}

/// Uncompensated 20-bit ADC codes of one sample.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct RawSample {
    pub temperature: u32,
    pub pressure: u32,
}

impl RawSample {
    /// Decode the 6-byte burst starting at `PRESS_TEMP` (press msb/lsb/xlsb, temp msb/lsb/xlsb).
    pub fn from_bytes(data: &[u8; 6]) -> Self {
        let decode = |b: &[u8]| ((b[0] as u32) << 12) | ((b[1] as u32) << 4) | ((b[2] as u32) >> 4);
        Self {
            pressure: decode(&data[0..3]),
            temperature: decode(&data[3..6]),
        }
    }
}

/// Calibrated sample.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Measurement {
    /// Temperature in 0.01 °C (5123 = 51.23 °C).
    pub temperature_centi: i32,
    /// Pressure in Pa.
    pub pressure_pa: u32,
}

impl CalibrationConstants {
    /// Decode the calibration block. Coefficients are little-endian pairs; the trailing two
    /// reserved bytes are ignored.
    pub fn from_bytes(buf: &[u8; CALIB_LEN]) -> Self {
        let u = |i: usize| u16::from_le_bytes([buf[i], buf[i + 1]]);
        let s = |i: usize| i16::from_le_bytes([buf[i], buf[i + 1]]);

        Self {
            dig_t1: u(0),
            dig_t2: s(2),
            dig_t3: s(4),
            dig_p1: u(6),
            dig_p2: s(8),
            dig_p3: s(10),
            dig_p4: s(12),
            dig_p5: s(14),
            dig_p6: s(16),
            dig_p7: s(18),
            dig_p8: s(20),
            dig_p9: s(22),
        }
    }

    /// Temperature compensation.
    ///
    /// `adc_t` is the 20-bit raw code. Returns the temperature in 0.01 °C together with the
    /// `t_fine` value that the pressure compensation of the same sample needs.
    pub fn compensate_temperature(&self, adc_t: u32) -> (i32, FineTemperature) {
        let adc = Wrapping(adc_t as i32);
        let t1 = Wrapping(self.dig_t1 as i32);
        let t2 = Wrapping(self.dig_t2 as i32);
        let t3 = Wrapping(self.dig_t3 as i32);

        let var1 = (((adc >> 3) - (t1 << 1)) * t2) >> 11;
        let d = (adc >> 4) - t1;
        let var2 = (((d * d) >> 12) * t3) >> 14;

        let t_fine = var1 + var2;
        let t = (t_fine * Wrapping(5) + Wrapping(128)) >> 8;

        (t.0, FineTemperature(t_fine.0))
    }

    /// Pressure compensation, in Pa.
    ///
    /// Returns 0 when the internal divisor is zero, which only happens with corrupt calibration
    /// data or an unphysical raw code.
    pub fn compensate_pressure(&self, adc_p: u32, fine: FineTemperature) -> u32 {
        let adc = Wrapping(adc_p as i32);
        let p1 = Wrapping(self.dig_p1 as i32);
        let p2 = Wrapping(self.dig_p2 as i32);
        let p3 = Wrapping(self.dig_p3 as i32);
        let p4 = Wrapping(self.dig_p4 as i32);
        let p5 = Wrapping(self.dig_p5 as i32);
        let p6 = Wrapping(self.dig_p6 as i32);
        let p7 = Wrapping(self.dig_p7 as i32);
        let p8 = Wrapping(self.dig_p8 as i32);
        let p9 = Wrapping(self.dig_p9 as i32);

        let mut var1 = (Wrapping(fine.0) >> 1) - Wrapping(64000);
        let mut var2 = (((var1 >> 2) * (var1 >> 2)) >> 11) * p6;
        var2 += (var1 * p5) << 1;
        var2 = (var2 >> 2) + (p4 << 16);
        var1 = (((p3 * (((var1 >> 2) * (var1 >> 2)) >> 13)) >> 3) + ((p2 * var1) >> 1)) >> 18;
        var1 = ((Wrapping(32768) + var1) * p1) >> 15;

        if var1.0 == 0 {
            return 0;
        }
        let divisor = var1.0 as u32;

        let mut p = ((Wrapping(1_048_576) - adc).0 as u32)
            .wrapping_sub((var2 >> 12).0 as u32)
            .wrapping_mul(3125);

        p = if p < 0x8000_0000 {
            (p << 1) / divisor
        } else {
            (p / divisor).wrapping_mul(2)
        };

        let var1 = (p9 * Wrapping(((p >> 3).wrapping_mul(p >> 3) >> 13) as i32)) >> 12;
        let var2 = (Wrapping((p >> 2) as i32) * p8) >> 13;

        (Wrapping(p as i32) + ((var1 + var2 + p7) >> 4)).0 as u32
    }

    /// One full compensation cycle: temperature first, then pressure with its `t_fine`.
    pub fn compensate(&self, raw: RawSample) -> Measurement {
        let (temperature_centi, fine) = self.compensate_temperature(raw.temperature);
        let pressure_pa = self.compensate_pressure(raw.pressure, fine);
        Measurement {
            temperature_centi,
            pressure_pa,
        }
    }
}

/// Read the calibration block from the sensor's NVM.
pub fn load_calibration<B: RegisterBus>(
    bus: &mut B,
) -> Result<CalibrationConstants, Error<B::Error>> {
    let mut buf = [0u8; CALIB_LEN];
    bus.read_registers(reg::CALIB_START, &mut buf)
        .map_err(Error::Bus)?;
    Ok(CalibrationConstants::from_bytes(&buf))
}

/// What the init sequence saw. Neither value is validated; the caller decides what to report.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct InitInfo {
    pub chip_id: u8,
    pub ctrl_meas_readback: u8,
}

impl InitInfo {
    #[inline]
    pub fn chip_id_ok(&self) -> bool {
        self.chip_id == CHIP_ID
    }
}

/// BMP280 on a register bus, owning its calibration constants.
pub struct Bmp280<B> {
    bus: B,
    calib: CalibrationConstants,
}

impl<B: RegisterBus> Bmp280<B> {
    /// Run the init sequence: read the chip id, load calibration, write the default CTRL_MEAS and
    /// read it back.
    pub fn new(mut bus: B) -> Result<(Self, InitInfo), Error<B::Error>> {
        let chip_id = Self::read_id_from(&mut bus)?;
        let calib = load_calibration(&mut bus)?;

        let mut dev = Self { bus, calib };
        let ctrl_meas_readback = dev.configure(CTRL_MEAS_DEFAULT)?;

        Ok((
            dev,
            InitInfo {
                chip_id,
                ctrl_meas_readback,
            },
        ))
    }

    /// Wrap a bus with already known calibration, skipping the init sequence.
    pub fn with_calibration(bus: B, calib: CalibrationConstants) -> Self {
        Self { bus, calib }
    }

    fn read_id_from(bus: &mut B) -> Result<u8, Error<B::Error>> {
        let mut id = [0u8; 1];
        bus.read_registers(reg::ID, &mut id).map_err(Error::Bus)?;
        Ok(id[0])
    }

    /// Read the chip id register.
    pub fn read_id(&mut self) -> Result<u8, Error<B::Error>> {
        Self::read_id_from(&mut self.bus)
    }

    /// Write CTRL_MEAS and return what the sensor reads back.
    pub fn configure(&mut self, ctrl_meas: u8) -> Result<u8, Error<B::Error>> {
        self.bus
            .write_register(reg::CTRL_MEAS, ctrl_meas)
            .map_err(Error::Bus)?;

        let mut readback = [0u8; 1];
        self.bus
            .read_registers(reg::CTRL_MEAS, &mut readback)
            .map_err(Error::Bus)?;
        Ok(readback[0])
    }

    /// Burst-read the raw pressure and temperature codes.
    pub fn read_raw(&mut self) -> Result<RawSample, Error<B::Error>> {
        let mut data = [0u8; 6];
        self.bus
            .read_registers(reg::PRESS_TEMP, &mut data)
            .map_err(Error::Bus)?;
        Ok(RawSample::from_bytes(&data))
    }

    /// Read one sample and compensate it.
    pub fn measure(&mut self) -> Result<Measurement, Error<B::Error>> {
        let raw = self.read_raw()?;
        Ok(self.calib.compensate(raw))
    }

    /// Access the underlying bus.
    #[inline]
    pub fn inner(&mut self) -> &mut B {
        &mut self.bus
    }

    #[inline]
    pub fn calibration(&self) -> &CalibrationConstants {
        &self.calib
    }

    pub fn free(self) -> B {
        self.bus
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Calibration from the BMP280 datasheet worked example.
    pub(crate) const DATASHEET: CalibrationConstants = CalibrationConstants {
        dig_t1: 27504,
        dig_t2: 26435,
        dig_t3: -1000,
        dig_p1: 36477,
        dig_p2: -10685,
        dig_p3: 3024,
        dig_p4: 2855,
        dig_p5: 140,
        dig_p6: -7,
        dig_p7: 15500,
        dig_p8: -14600,
        dig_p9: 6000,
    };

    pub(crate) fn calib_bytes(c: &CalibrationConstants) -> [u8; CALIB_LEN] {
        let words: [[u8; 2]; 12] = [
            c.dig_t1.to_le_bytes(),
            c.dig_t2.to_le_bytes(),
            c.dig_t3.to_le_bytes(),
            c.dig_p1.to_le_bytes(),
            c.dig_p2.to_le_bytes(),
            c.dig_p3.to_le_bytes(),
            c.dig_p4.to_le_bytes(),
            c.dig_p5.to_le_bytes(),
            c.dig_p6.to_le_bytes(),
            c.dig_p7.to_le_bytes(),
            c.dig_p8.to_le_bytes(),
            c.dig_p9.to_le_bytes(),
        ];
        let mut out = [0xEEu8; CALIB_LEN];
        for (i, w) in words.iter().enumerate() {
            out[2 * i..2 * i + 2].copy_from_slice(w);
        }
        out
    }

    /// Register file backed by a 256-byte array.
    pub(crate) struct FakeBmp {
        pub regs: [u8; 256],
        pub fail: bool,
        pub writes: std::vec::Vec<(u8, u8)>,
    }

    impl FakeBmp {
        pub fn new(calib: &CalibrationConstants) -> Self {
            let mut regs = [0u8; 256];
            regs[reg::CALIB_START as usize..reg::CALIB_START as usize + CALIB_LEN]
                .copy_from_slice(&calib_bytes(calib));
            regs[reg::ID as usize] = CHIP_ID;
            Self {
                regs,
                fail: false,
                writes: std::vec::Vec::new(),
            }
        }

        /// Place raw codes into the data registers.
        pub fn set_raw(&mut self, temperature: u32, pressure: u32) {
            let base = reg::PRESS_TEMP as usize;
            let put = |regs: &mut [u8; 256], at: usize, v: u32| {
                regs[at] = (v >> 12) as u8;
                regs[at + 1] = (v >> 4) as u8;
                regs[at + 2] = ((v & 0xF) << 4) as u8;
            };
            put(&mut self.regs, base, pressure);
            put(&mut self.regs, base + 3, temperature);
        }
    }

    #[derive(Debug, Eq, PartialEq)]
    pub(crate) struct Nack;

    impl RegisterBus for FakeBmp {
        type Error = Nack;

        fn read_registers(&mut self, reg: u8, buf: &mut [u8]) -> Result<(), Nack> {
            if self.fail {
                return Err(Nack);
            }
            let start = reg as usize;
            buf.copy_from_slice(&self.regs[start..start + buf.len()]);
            Ok(())
        }

        fn write_register(&mut self, reg: u8, value: u8) -> Result<(), Nack> {
            if self.fail {
                return Err(Nack);
            }
            self.writes.push((reg, value));
            self.regs[reg as usize] = value;
            Ok(())
        }
    }

    #[test]
    fn calibration_decodes_documented_offsets() {
        let c = CalibrationConstants {
            dig_t1: 0xFFFF,
            dig_t2: -2,
            dig_t3: i16::MIN,
            dig_p1: 1,
            dig_p2: i16::MAX,
            dig_p3: -1,
            dig_p4: 0x1234,
            dig_p5: -0x1234,
            dig_p6: 7,
            dig_p7: -7,
            dig_p8: 256,
            dig_p9: -256,
        };
        assert_eq!(CalibrationConstants::from_bytes(&calib_bytes(&c)), c);
    }

    #[test]
    fn calibration_is_little_endian() {
        let mut buf = [0u8; CALIB_LEN];
        buf[0] = 0x70;
        buf[1] = 0x6B;
        buf[2] = 0x43;
        buf[3] = 0x67;
        buf[4] = 0x18;
        buf[5] = 0xFC;
        let c = CalibrationConstants::from_bytes(&buf);
        assert_eq!(c.dig_t1, 27504);
        assert_eq!(c.dig_t2, 26435);
        assert_eq!(c.dig_t3, -1000);
    }

    #[test]
    fn datasheet_temperature() {
        let (t, fine) = DATASHEET.compensate_temperature(519_888);
        assert_eq!(t, 2508);
        assert_eq!(fine.value(), 128_422);
    }

    #[test]
    fn datasheet_pressure() {
        let (_, fine) = DATASHEET.compensate_temperature(519_888);
        assert_eq!(DATASHEET.compensate_pressure(415_148, fine), 100_656);
    }

    #[test]
    fn mid_scale_codes() {
        let m = DATASHEET.compensate(RawSample {
            temperature: 0x80000,
            pressure: 0x80000,
        });
        assert_eq!(m.temperature_centi, 2646);
        assert_eq!(m.pressure_pa, 82_047);
    }

    #[test]
    fn zero_divisor_yields_zero_pressure() {
        let c = CalibrationConstants {
            dig_p1: 0,
            ..DATASHEET
        };
        let (_, fine) = c.compensate_temperature(519_888);
        assert_eq!(c.compensate_pressure(415_148, fine), 0);
    }

    #[test]
    fn extreme_codes_do_not_panic() {
        let c = CalibrationConstants {
            dig_t1: 0,
            dig_t2: i16::MAX,
            dig_t3: i16::MIN,
            dig_p1: 1,
            dig_p2: i16::MIN,
            dig_p3: i16::MAX,
            dig_p4: i16::MIN,
            dig_p5: i16::MAX,
            dig_p6: i16::MIN,
            dig_p7: i16::MAX,
            dig_p8: i16::MIN,
            dig_p9: i16::MAX,
        };
        for raw in [0u32, 0xF_FFFF, u32::MAX] {
            let _ = c.compensate(RawSample {
                temperature: raw,
                pressure: raw,
            });
        }
    }

    #[test]
    fn raw_sample_decodes_20_bit_codes() {
        let raw = RawSample::from_bytes(&[0x65, 0x5A, 0xC0, 0x7E, 0xED, 0x00]);
        assert_eq!(raw.pressure, 415_148);
        assert_eq!(raw.temperature, 519_888);
    }

    #[test]
    fn init_sequence_reads_id_calibration_and_configures() {
        let fake = FakeBmp::new(&DATASHEET);
        let (dev, info) = Bmp280::new(fake).unwrap();

        assert!(info.chip_id_ok());
        assert_eq!(info.ctrl_meas_readback, CTRL_MEAS_DEFAULT);
        assert_eq!(dev.calibration(), &DATASHEET);

        let fake = dev.free();
        assert_eq!(fake.writes, [(reg::CTRL_MEAS, CTRL_MEAS_DEFAULT)]);
    }

    #[test]
    fn measure_runs_a_full_cycle() {
        let mut fake = FakeBmp::new(&DATASHEET);
        fake.set_raw(519_888, 415_148);
        let mut dev = Bmp280::with_calibration(fake, DATASHEET);

        let m = dev.measure().unwrap();
        assert_eq!(m.temperature_centi, 2508);
        assert_eq!(m.pressure_pa, 100_656);
    }

    #[test]
    fn transport_failure_is_propagated() {
        let mut fake = FakeBmp::new(&DATASHEET);
        fake.fail = true;
        assert_eq!(load_calibration(&mut fake), Err(Error::Bus(Nack)));
        assert!(Bmp280::new(fake).is_err());
    }
}
