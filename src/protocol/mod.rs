// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Raspberry Pi Command Protocol
//!
//! Text commands arrive one byte at a time in the USART interrupt ([`line`]), are handed over
//! through a single-slot [`mailbox`], and are parsed ([`messages`]) and answered ([`engine`]) from
//! the main loop.

pub mod engine;
pub mod line;
pub mod mailbox;
pub mod messages;

pub use engine::{respond, tick, Reply};
pub use line::{CommandLine, LineAssembler};
pub use mailbox::Mailbox;
pub use messages::Command;
