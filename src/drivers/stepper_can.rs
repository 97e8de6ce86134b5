// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Stepper driver board controlled over CAN.
//!
//! The board listens on three consecutive standard identifiers starting at a base selected by its
//! SW1/SW2 DIP switches:
//!
//! | SW1/SW2 | Base | Manual | Angle | Zero |
//! | ------- | ---- | ------ | ----- | ---- |
//! | 00 | 0x60 | 0x60 | 0x61 | 0x62 |
//! | 10 | 0x70 | 0x70 | 0x71 | 0x72 |
//! | 01 | 0x80 | 0x80 | 0x81 | 0x82 |
//! | 11 | 0x90 | 0x90 | 0x91 | 0x92 |
//!
//! Payloads:
//!   - manual (base + 0): `[direction, steps 1..=255, step delay ms 1..=255]`
//!   - angle (base + 1): `[angle 0..=180, sign]`
//!   - zero (base + 2): no data

use crate::config::SET_ANGLE_MAX_DEG;
use crate::hw::{BusFrame, FrameBus};

/// Error type for `StepperCan` operations.
#[derive(Debug, Eq, PartialEq)]
pub enum Error<E> {
    /// Zero steps or zero speed. Nothing was sent.
    InvalidArgument,
    /// The bus transport rejected the frame.
    Bus(E),
}

/// Base identifier selected by the board's DIP switches.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
#[repr(u16)]
pub enum BaseId {
    #[default]
    X60 = 0x60,
    X70 = 0x70,
    X80 = 0x80,
    X90 = 0x90,
}

impl BaseId {
    #[inline]
    pub fn raw(self) -> u16 {
        self as u16
    }

    /// Look up an allowed base identifier.
    pub fn from_raw(id: u16) -> Option<Self> {
        match id {
            0x60 => Some(BaseId::X60),
            0x70 => Some(BaseId::X70),
            0x80 => Some(BaseId::X80),
            0x90 => Some(BaseId::X90),
            _ => None,
        }
    }
}

/// Rotation direction in manual mode.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u8)]
pub enum Direction {
    /// Counter-clockwise.
    Ccw = 0x00,
    /// Clockwise.
    Cw = 0x01,
}

/// Sign of the target in angle mode.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u8)]
pub enum Sign {
    Positive = 0x00,
    Negative = 0x01,
}

// Identifier offsets from the base
const OFFSET_MANUAL: u16 = 0;
const OFFSET_ANGLE: u16 = 1;
const OFFSET_ZERO: u16 = 2;

/// Logical actuator intent.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ActuatorCommand {
    /// Step `steps` times (1 step = 1°) waiting `speed` ms between steps.
    ManualMove {
        direction: Direction,
        steps: u8,
        speed: u8,
    },
    /// Go to an absolute angle. Magnitudes above 180° are clamped.
    SetAngle { degrees: i32, sign: Sign },
    /// Make the current position the zero reference.
    SetZero,
}

impl ActuatorCommand {
    /// Encode into the frame for the board at `base`.
    ///
    /// Returns `None` for a manual move with zero steps or zero speed: the protocol has no no-op
    /// move, so such a request must never reach the bus.
    pub fn encode(&self, base: BaseId) -> Option<BusFrame> {
        let base = base.raw();
        match *self {
            ActuatorCommand::ManualMove {
                direction,
                steps,
                speed,
            } => {
                if steps == 0 || speed == 0 {
                    return None;
                }
                BusFrame::new(base + OFFSET_MANUAL, &[direction as u8, steps, speed])
            }
            ActuatorCommand::SetAngle { degrees, sign } => {
                let angle = degrees.clamp(0, SET_ANGLE_MAX_DEG) as u8;
                BusFrame::new(base + OFFSET_ANGLE, &[angle, sign as u8])
            }
            ActuatorCommand::SetZero => BusFrame::new(base + OFFSET_ZERO, &[]),
        }
    }
}

/// One stepper board on the field bus.
pub struct StepperCan<B> {
    bus: B,
    base: BaseId,
}

impl<B: FrameBus> StepperCan<B> {
    /// Wrap a bus, addressing the board at the default base (0x60).
    pub fn new(bus: B) -> Self {
        Self {
            bus,
            base: BaseId::default(),
        }
    }

    /// Start the bus transport.
    pub fn init(&mut self) -> Result<(), Error<B::Error>> {
        self.bus.start().map_err(Error::Bus)
    }

    /// Address a different board. Applies to every frame sent afterwards.
    #[inline]
    pub fn set_base_id(&mut self, base: BaseId) {
        self.base = base;
    }

    #[inline]
    pub fn base_id(&self) -> BaseId {
        self.base
    }

    /// Encode and transmit one command.
    pub fn send(&mut self, cmd: ActuatorCommand) -> Result<(), Error<B::Error>> {
        let frame = cmd.encode(self.base).ok_or(Error::InvalidArgument)?;
        self.bus.send(&frame).map_err(Error::Bus)
    }

    /// Manual mode (ID = base + 0).
    pub fn manual_move(
        &mut self,
        direction: Direction,
        steps: u8,
        speed: u8,
    ) -> Result<(), Error<B::Error>> {
        self.send(ActuatorCommand::ManualMove {
            direction,
            steps,
            speed,
        })
    }

    /// Angle mode (ID = base + 1). `degrees` is clamped to [0, 180].
    pub fn set_angle(&mut self, degrees: i32, sign: Sign) -> Result<(), Error<B::Error>> {
        self.send(ActuatorCommand::SetAngle { degrees, sign })
    }

    /// Reset the board's internal position (ID = base + 2).
    pub fn set_zero(&mut self) -> Result<(), Error<B::Error>> {
        self.send(ActuatorCommand::SetZero)
    }

    /// Access the underlying bus.
    #[inline]
    pub fn inner(&mut self) -> &mut B {
        &mut self.bus
    }

    pub fn free(self) -> B {
        self.bus
    }
}
