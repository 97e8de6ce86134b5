// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Command grammar of the Raspberry Pi link.
//!
//! Commands are ASCII, case-sensitive, and matched by prefix, so `GET_TEMP` reads the temperature.

// Command prefixes, checked in this order
pub const CMD_GET_T: &[u8] = b"GET_T";
pub const CMD_GET_P: &[u8] = b"GET_P";
pub const CMD_SET_K: &[u8] = b"SET_K=";
pub const CMD_GET_K: &[u8] = b"GET_K";
pub const CMD_GET_A: &[u8] = b"GET_A";

/// Line terminators. Either one ends a line; pairs like `\r\n` are fine.
pub const CR: u8 = b'\r';
pub const LF: u8 = b'\n';

/// Parsed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    GetTemperature,
    GetPressure,
    /// New gain in hundredths.
    SetGain(i32),
    GetGain,
    GetAngle,
    Unknown,
}

impl Command {
    /// Parse one line (without terminator).
    ///
    /// Anything after a NUL byte is ignored, as a C-string receiver would.
    pub fn parse(line: &[u8]) -> Self {
        let line = match line.iter().position(|&b| b == 0) {
            Some(end) => &line[..end],
            None => line,
        };

        if line.starts_with(CMD_GET_T) {
            Command::GetTemperature
        } else if line.starts_with(CMD_GET_P) {
            Command::GetPressure
        } else if let Some(value) = line.strip_prefix(CMD_SET_K) {
            Command::SetGain(parse_int_lenient(value))
        } else if line.starts_with(CMD_GET_K) {
            Command::GetGain
        } else if line.starts_with(CMD_GET_A) {
            Command::GetAngle
        } else {
            Command::Unknown
        }
    }
}

/// `atoi`-style parse: skip leading whitespace, optional sign, then digits up to the first
/// non-digit. No digits gives 0. Out-of-range values saturate.
pub fn parse_int_lenient(s: &[u8]) -> i32 {
    let mut rest = s;
    while let Some((&b, tail)) = rest.split_first() {
        if !matches!(b, b' ' | b'\t' | b'\n' | 0x0B | 0x0C | b'\r') {
            break;
        }
        rest = tail;
    }

    let negative = match rest.first() {
        Some(b'-') => {
            rest = &rest[1..];
            true
        }
        Some(b'+') => {
            rest = &rest[1..];
            false
        }
        _ => false,
    };

    // Accumulate toward the sign so i32::MIN is reachable.
    let mut value: i32 = 0;
    for &b in rest.iter().take_while(|b| b.is_ascii_digit()) {
        let digit = (b - b'0') as i32;
        value = value.saturating_mul(10);
        value = if negative {
            value.saturating_sub(digit)
        } else {
            value.saturating_add(digit)
        };
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_commands() {
        assert_eq!(Command::parse(b"GET_T"), Command::GetTemperature);
        assert_eq!(Command::parse(b"GET_P"), Command::GetPressure);
        assert_eq!(Command::parse(b"GET_K"), Command::GetGain);
        assert_eq!(Command::parse(b"GET_A"), Command::GetAngle);
        assert_eq!(Command::parse(b"SET_K=1234"), Command::SetGain(1234));
    }

    #[test]
    fn prefix_match() {
        assert_eq!(Command::parse(b"GET_TEMP"), Command::GetTemperature);
        assert_eq!(Command::parse(b"GET_Kxyz"), Command::GetGain);
    }

    #[test]
    fn unknown_commands() {
        assert_eq!(Command::parse(b"FOO"), Command::Unknown);
        assert_eq!(Command::parse(b"get_t"), Command::Unknown);
        assert_eq!(Command::parse(b"GET_"), Command::Unknown);
        // SET_K needs the '='
        assert_eq!(Command::parse(b"SET_K"), Command::Unknown);
    }

    #[test]
    fn nul_ends_the_line() {
        assert_eq!(Command::parse(b"GET_\0T"), Command::Unknown);
        assert_eq!(Command::parse(b"SET_K=12\x0034"), Command::SetGain(12));
    }

    #[test]
    fn lenient_integer() {
        assert_eq!(parse_int_lenient(b"-250"), -250);
        assert_eq!(parse_int_lenient(b"+7"), 7);
        assert_eq!(parse_int_lenient(b"  42abc"), 42);
        assert_eq!(parse_int_lenient(b"abc"), 0);
        assert_eq!(parse_int_lenient(b""), 0);
        assert_eq!(parse_int_lenient(b"-"), 0);
        assert_eq!(parse_int_lenient(b"99999999999"), i32::MAX);
        assert_eq!(parse_int_lenient(b"-2147483648"), i32::MIN);
        assert_eq!(parse_int_lenient(b"-99999999999"), i32::MIN);
    }
}
