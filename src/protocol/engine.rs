// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Command dispatch and reply formatting.
//!
//! Runs in the main loop. Reply formats:
//!
//! | Request | Reply |
//! | ------- | ----- |
//! | `GET_T` | `T=+25.50_C` |
//! | `GET_P` | `P=101325Pa` |
//! | `SET_K=<int>` | `SET_K=OK` |
//! | `GET_K` | `K=12.34000` |
//! | `GET_A` | `A=0.0000` |
//! | other | `ERR=CMD` |
//!
//! Every reply ends in `\r\n`. Integer parts are truncated toward zero and keep their sign;
//! fractional parts are always printed as absolute values. For gain and angle this means a value
//! in (-1, 0) prints without a minus sign. Receivers depend on this exact output.

use core::fmt::Write;

use heapless::String;

use crate::hw::SerialTx;
use crate::protocol::mailbox::Mailbox;
use crate::protocol::messages::Command;
use crate::telemetry::{GainRegister, TelemetryState};

/// Formatted reply, including the trailing CRLF.
pub type Reply = String<32>;

/// Execute one command and format its reply. `SET_K` updates `gain`.
pub fn respond(cmd: Command, telemetry: &TelemetryState, gain: &GainRegister) -> Reply {
    let mut tx = Reply::new();

    // Longest reply is 19 bytes, so writes cannot fail.
    let _ = match cmd {
        Command::GetTemperature => {
            let t = telemetry.temperature_centi();
            let sign = if t < 0 { '-' } else { '+' };
            let t = t.unsigned_abs();
            write!(tx, "T={}{:02}.{:02}_C\r\n", sign, t / 100, t % 100)
        }
        Command::GetPressure => write!(tx, "P={}Pa\r\n", telemetry.pressure_pa()),
        Command::SetGain(k) => {
            gain.set(k);
            tx.push_str("SET_K=OK\r\n").map_err(|_| core::fmt::Error)
        }
        Command::GetGain => {
            let k = gain.get();
            write!(tx, "K={}.{:02}000\r\n", k / 100, (k % 100).unsigned_abs())
        }
        Command::GetAngle => {
            let a = telemetry.angle_milli();
            write!(tx, "A={}.{:03}0\r\n", a / 1000, (a % 1000).unsigned_abs())
        }
        Command::Unknown => tx.push_str("ERR=CMD\r\n").map_err(|_| core::fmt::Error),
    };

    tx
}

/// Main-loop entry point: if a line is waiting, take it, execute it, and send the reply.
///
/// Returns the executed command, for logging.
pub fn tick<S: SerialTx>(
    mailbox: &Mailbox,
    telemetry: &TelemetryState,
    gain: &GainRegister,
    serial: &mut S,
) -> Option<Command> {
    let line = mailbox.take()?;
    let cmd = Command::parse(&line);
    let reply = respond(cmd, telemetry, gain);
    serial.transmit(reply.as_bytes());
    Some(cmd)
}
