// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Line assembly for the command link.
//!
//! Runs in the USART receive interrupt, one byte per call, so it never blocks and never allocates.
//! Completed lines are handed to the main loop through a [`Mailbox`].

use heapless::Vec;

use crate::config::CMD_MAX_LEN;
use crate::protocol::mailbox::Mailbox;
use crate::protocol::messages::{CR, LF};

/// One complete command line, terminator stripped.
pub type CommandLine = Vec<u8, CMD_MAX_LEN>;

enum State {
    Collecting,
    /// The current line overflowed; drop bytes until the next terminator.
    Discarding,
}

pub struct LineAssembler {
    state: State,
    buf: CommandLine,
}

impl LineAssembler {
    pub const fn new() -> Self {
        Self {
            state: State::Collecting,
            buf: Vec::new(),
        }
    }

    /// Process a single incoming byte. Returns `Some(line)` when a terminator completes a
    /// non-empty line.
    pub fn push(&mut self, byte: u8) -> Option<CommandLine> {
        match byte {
            CR | LF => {
                let line = match self.state {
                    State::Collecting if !self.buf.is_empty() => {
                        Some(core::mem::take(&mut self.buf))
                    }
                    _ => None,
                };
                self.buf.clear();
                self.state = State::Collecting;
                line
            }
            _ => {
                if let State::Collecting = self.state {
                    if self.buf.push(byte).is_err() {
                        // Overflow: the partial line is dropped, not truncated
                        self.buf.clear();
                        self.state = State::Discarding;
                    }
                }
                None
            }
        }
    }

    /// Interrupt entry point: process one byte and post any completed line.
    ///
    /// Returns `true` if a line was posted.
    pub fn on_byte(&mut self, byte: u8, mailbox: &Mailbox) -> bool {
        match self.push(byte) {
            Some(line) => {
                mailbox.post(line);
                true
            }
            None => false,
        }
    }

    /// Number of bytes buffered for the current line.
    #[inline]
    pub fn pending(&self) -> usize {
        self.buf.len()
    }
}

impl Default for LineAssembler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(asm: &mut LineAssembler, bytes: &[u8]) -> std::vec::Vec<CommandLine> {
        bytes.iter().filter_map(|&b| asm.push(b)).collect()
    }

    #[test]
    fn line_completes_on_either_terminator() {
        let mut asm = LineAssembler::new();
        let lines = feed(&mut asm, b"GET_T\rGET_P\n");
        assert_eq!(lines.len(), 2);
        assert_eq!(&lines[0][..], b"GET_T");
        assert_eq!(&lines[1][..], b"GET_P");
    }

    #[test]
    fn bare_terminators_emit_nothing() {
        let mut asm = LineAssembler::new();
        assert!(feed(&mut asm, b"\r\n\r\n").is_empty());

        let lines = feed(&mut asm, b"GET_K\r\n");
        assert_eq!(lines.len(), 1);
        assert_eq!(asm.pending(), 0);
    }

    #[test]
    fn longest_line_fits() {
        let mut asm = LineAssembler::new();
        let long = [b'A'; CMD_MAX_LEN];
        assert!(feed(&mut asm, &long).is_empty());
        let lines = feed(&mut asm, b"\n");
        assert_eq!(&lines[0][..], &long[..]);
    }

    #[test]
    fn overflow_drops_the_line() {
        let mut asm = LineAssembler::new();
        let long = [b'X'; 40];
        assert!(feed(&mut asm, &long).is_empty());
        assert!(feed(&mut asm, b"\r\n").is_empty());

        let lines = feed(&mut asm, b"GET_T\r\n");
        assert_eq!(lines.len(), 1);
        assert_eq!(&lines[0][..], b"GET_T");
    }

    #[test]
    fn on_byte_posts_to_mailbox() {
        let mailbox = Mailbox::new();
        let mut asm = LineAssembler::new();
        for &b in b"GET_A" {
            assert!(!asm.on_byte(b, &mailbox));
        }
        assert!(!mailbox.is_ready());
        assert!(asm.on_byte(b'\r', &mailbox));
        assert_eq!(&mailbox.take().unwrap()[..], b"GET_A");
    }
}
