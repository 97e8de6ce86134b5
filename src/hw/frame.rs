// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Field-bus data frame as handed to a [`FrameBus`](super::FrameBus).

/// Largest payload the stepper protocol uses.
pub const MAX_PAYLOAD: usize = 3;

/// One standard-identifier data frame with up to [`MAX_PAYLOAD`] bytes.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct BusFrame {
    id: u16,
    data: [u8; MAX_PAYLOAD],
    len: u8,
}

impl BusFrame {
    /// Build a frame. Returns `None` if `payload` is longer than [`MAX_PAYLOAD`].
    pub fn new(id: u16, payload: &[u8]) -> Option<Self> {
        if payload.len() > MAX_PAYLOAD {
            return None;
        }
        let mut data = [0u8; MAX_PAYLOAD];
        data[..payload.len()].copy_from_slice(payload);
        Some(Self {
            id,
            data,
            len: payload.len() as u8,
        })
    }

    /// 11-bit standard identifier.
    #[inline]
    pub fn id(&self) -> u16 {
        self.id
    }

    /// Payload bytes (the first `len()` bytes only).
    #[inline]
    pub fn payload(&self) -> &[u8] {
        &self.data[..self.len as usize]
    }

    /// Data length code.
    #[inline]
    pub fn len(&self) -> u8 {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
