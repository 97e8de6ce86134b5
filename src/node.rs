// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Control node: owns every context object of the main loop.
//!
//! The firmware builds one `ControlNode` at start-up and calls [`ControlNode::cycle`] at the loop
//! rate. The only state shared with the receive interrupt is the [`Mailbox`], which is passed in.

use crate::control::ProportionalController;
use crate::drivers::bmp280::{self, Bmp280, Measurement};
use crate::drivers::stepper_can::{self, StepperCan};
use crate::hw::{FrameBus, RegisterBus, SerialTx};
use crate::protocol::{self, Command, Mailbox};
use crate::telemetry::{GainRegister, TelemetryState};

/// Outcome of one main-loop cycle. Nothing in it is fatal.
#[derive(Debug)]
pub struct CycleReport<SE, FE> {
    /// Sensor refresh. On error the telemetry keeps its previous values.
    pub refresh: Result<Measurement, bmp280::Error<SE>>,
    /// Controller step: `Ok(Some(angle))` if a command was sent.
    pub control: Result<Option<i32>, stepper_can::Error<FE>>,
    /// Command dispatched this cycle, if any.
    pub command: Option<Command>,
}

pub struct ControlNode<S, F> {
    baro: Bmp280<S>,
    stepper: StepperCan<F>,
    controller: ProportionalController,
    telemetry: TelemetryState,
    gain: GainRegister,
}

impl<S: RegisterBus, F: FrameBus> ControlNode<S, F> {
    /// Assemble a node around an initialized barometer and stepper. The gain starts at its
    /// default.
    pub fn new(baro: Bmp280<S>, stepper: StepperCan<F>) -> Self {
        Self {
            baro,
            stepper,
            controller: ProportionalController::new(),
            telemetry: TelemetryState::new(),
            gain: GainRegister::default(),
        }
    }

    /// Periodic sensor read + compensation.
    pub fn refresh(&mut self) -> Result<Measurement, bmp280::Error<S::Error>> {
        self.telemetry.refresh(&mut self.baro)
    }

    /// One controller step from the current telemetry and gain.
    pub fn control(&mut self) -> Result<Option<i32>, stepper_can::Error<F::Error>> {
        self.controller.update(
            self.telemetry.temperature_centi(),
            self.gain.get(),
            &mut self.stepper,
        )
    }

    /// Protocol dispatch: answer the waiting command line, if any.
    pub fn tick<T: SerialTx>(&mut self, mailbox: &Mailbox, serial: &mut T) -> Option<Command> {
        protocol::tick(mailbox, &self.telemetry, &self.gain, serial)
    }

    /// One main-loop tick: refresh, control, dispatch.
    pub fn cycle<T: SerialTx>(
        &mut self,
        mailbox: &Mailbox,
        serial: &mut T,
    ) -> CycleReport<S::Error, F::Error> {
        let refresh = self.refresh();
        let control = self.control();
        let command = self.tick(mailbox, serial);
        CycleReport {
            refresh,
            control,
            command,
        }
    }

    #[inline]
    pub fn telemetry(&self) -> &TelemetryState {
        &self.telemetry
    }

    #[inline]
    pub fn gain(&self) -> &GainRegister {
        &self.gain
    }

    #[inline]
    pub fn controller(&self) -> &ProportionalController {
        &self.controller
    }

    #[inline]
    pub fn stepper(&mut self) -> &mut StepperCan<F> {
        &mut self.stepper
    }

    #[inline]
    pub fn baro(&mut self) -> &mut Bmp280<S> {
        &mut self.baro
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::bmp280::tests::{FakeBmp, DATASHEET};
    use crate::drivers::stepper_can::tests::RecordingBus;
    use crate::protocol::LineAssembler;

    #[derive(Default)]
    struct Capture(std::vec::Vec<u8>);

    impl SerialTx for Capture {
        fn transmit(&mut self, bytes: &[u8]) {
            self.0.extend_from_slice(bytes);
        }
    }

    fn node() -> ControlNode<FakeBmp, RecordingBus> {
        let mut fake = FakeBmp::new(&DATASHEET);
        fake.set_raw(519_888, 415_148);
        ControlNode::new(
            Bmp280::with_calibration(fake, DATASHEET),
            StepperCan::new(RecordingBus::default()),
        )
    }

    #[test]
    fn cycle_refreshes_controls_and_dispatches() {
        let mut node = node();
        let mailbox = Mailbox::new();
        let mut asm = LineAssembler::new();
        let mut serial = Capture::default();

        for &b in b"GET_T\r\n" {
            asm.on_byte(b, &mailbox);
        }
        let report = node.cycle(&mailbox, &mut serial);

        assert!(report.refresh.is_ok());
        // 25.08 °C at K 1.00 -> 0°
        assert_eq!(report.control, Ok(Some(0)));
        assert_eq!(report.command, Some(Command::GetTemperature));
        assert_eq!(serial.0, b"T=+25.08_C\r\n");
    }

    #[test]
    fn gain_from_protocol_reaches_controller() {
        let mut node = node();
        let mailbox = Mailbox::new();
        let mut asm = LineAssembler::new();
        let mut serial = Capture::default();

        node.cycle(&mailbox, &mut serial);
        for &b in b"SET_K=50000\r" {
            asm.on_byte(b, &mailbox);
        }
        node.cycle(&mailbox, &mut serial);
        // Applied on the next control step: 500.00 * 0.08 = 40°
        let report = node.cycle(&mailbox, &mut serial);
        assert_eq!(report.control, Ok(Some(40)));
        assert_eq!(node.stepper().inner().frames.len(), 2);
    }

    #[test]
    fn sensor_failure_keeps_telemetry_and_still_controls() {
        let mut node = node();
        let mailbox = Mailbox::new();
        let mut serial = Capture::default();
        node.cycle(&mailbox, &mut serial);

        node.baro().inner().fail = true;
        let report = node.cycle(&mailbox, &mut serial);
        assert!(report.refresh.is_err());
        assert_eq!(report.control, Ok(None));
        assert_eq!(node.telemetry().temperature_centi(), 2508);
    }
}
