// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Controller Area Network (CAN) abstraction layer.
//!
//! - `CanBus` wraps a HAL `can::Can` instance in `bxcan::Can`.
//! - Implements [`FrameBus`] so the stepper driver can put its frames on the bus.

use bxcan::{self, Data, Frame, StandardId};
use stm32f7xx_hal::can as hal_can;
use thermovalve::hw::{BusFrame, FrameBus};

/// Reasons a frame did not make it into a transmit mailbox.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum TxError {
    /// All three transmit mailboxes are pending, e.g. nobody acknowledges on the bus.
    MailboxFull,
    /// Identifier or payload does not fit a standard data frame.
    InvalidFrame,
}

/// Wrapper around a bxcan CAN instance built from a HAL CAN peripheral.
pub struct CanBus<I>
where
    hal_can::Can<I>: bxcan::Instance,
{
    can: bxcan::Can<hal_can::Can<I>>,
}

impl<I> CanBus<I>
where
    hal_can::Can<I>: bxcan::Instance,
{
    /// Configure a bxcan instance from a HAL CAN peripheral. The peripheral stays in init mode
    /// until [`FrameBus::start`].
    ///
    /// * `hal_can` – the HAL CAN wrapper
    /// * `btr` – value for the CAN_BTR register (bit timing). Get this from the
    ///           reference manual or the bxcan timing tables.
    /// * `loopback` – enable internal loopback
    pub fn new(hal_can: hal_can::Can<I>, btr: u32, loopback: bool) -> Self {
        let can = bxcan::Can::builder(hal_can)
            .set_bit_timing(btr)
            .set_loopback(loopback)
            .set_automatic_retransmit(true)
            .leave_disabled();

        Self { can }
    }

    /// Access the underlying bxcan instance for advanced configuration.
    pub fn inner(&mut self) -> &mut bxcan::Can<hal_can::Can<I>> {
        &mut self.can
    }
}

impl<I> FrameBus for CanBus<I>
where
    hal_can::Can<I>: bxcan::Instance,
{
    type Error = TxError;

    fn start(&mut self) -> Result<(), TxError> {
        // Waits for 11 recessive bits; returns immediately on an idle bus
        let _ = nb::block!(self.can.enable_non_blocking());
        Ok(())
    }

    /// Queue one frame without waiting. A full set of mailboxes is reported, not waited out.
    fn send(&mut self, frame: &BusFrame) -> Result<(), TxError> {
        let id = StandardId::new(frame.id()).ok_or(TxError::InvalidFrame)?;
        let data = Data::new(frame.payload()).ok_or(TxError::InvalidFrame)?;
        match self.can.transmit(&Frame::new_data(id, data)) {
            Ok(_) => Ok(()),
            Err(nb::Error::WouldBlock) => Err(TxError::MailboxFull),
            Err(nb::Error::Other(never)) => match never {},
        }
    }
}
