// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Single-slot hand-off between the receive interrupt and the main loop.
//!
//! The interrupt posts a completed line; the main loop takes it. Both sides only hold the
//! critical section long enough to move one line in or out, so dispatch (which may block on the
//! serial transmitter) never runs with interrupts masked.
//!
//! A line posted before the previous one was taken replaces it: this is a mailbox, not a queue.

use core::cell::RefCell;
use critical_section::Mutex;

use crate::protocol::line::CommandLine;

pub struct Mailbox {
    slot: Mutex<RefCell<Option<CommandLine>>>,
}

impl Mailbox {
    pub const fn new() -> Self {
        Self {
            slot: Mutex::new(RefCell::new(None)),
        }
    }

    /// Producer side. Returns `true` if an unconsumed line was overwritten.
    pub fn post(&self, line: CommandLine) -> bool {
        critical_section::with(|cs| self.slot.borrow(cs).replace(Some(line)).is_some())
    }

    /// Consumer side. Clears the slot and returns its line, if any.
    pub fn take(&self) -> Option<CommandLine> {
        critical_section::with(|cs| self.slot.borrow(cs).take())
    }

    /// Whether a line is waiting.
    pub fn is_ready(&self) -> bool {
        critical_section::with(|cs| self.slot.borrow(cs).borrow().is_some())
    }
}

impl Default for Mailbox {
    fn default() -> Self {
        Self::new()
    }
}
