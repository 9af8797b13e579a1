use std::fmt;
use std::str::FromStr;

use crate::error::PinvaultError;

const PIN_MODULUS: u16 = 10_000;
const PIN_DIGITS: usize = 4;

/// A PIN value in `0..=9999`. Displays with leading zeros.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pin(u16);

impl From<u16> for Pin {
    fn from(value: u16) -> Self {
        Self(value % PIN_MODULUS)
    }
}

impl FromStr for Pin {
    type Err = PinvaultError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        normalize(s)
    }
}

impl fmt::Display for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:0width$}", self.0, width = PIN_DIGITS)
    }
}

/// Parse an integer literal of any length and reduce it modulo 10000.
///
/// Negative values wrap to the non-negative residue, so `-1` becomes `9999`.
pub fn normalize(input: &str) -> Result<Pin, PinvaultError> {
    let trimmed = input.trim();
    let invalid = || PinvaultError::InvalidPin(input.to_string());

    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let modulus = u32::from(PIN_MODULUS);
    let residue = digits
        .bytes()
        .fold(0u32, |acc, b| (acc * 10 + u32::from(b - b'0')) % modulus);
    let residue = if negative {
        (modulus - residue) % modulus
    } else {
        residue
    };
    // residue < 10000
    Ok(Pin(residue as u16))
}

/// True when `input` is exactly four ASCII digits, the form the menu asks for.
pub fn is_four_digits(input: &str) -> bool {
    let trimmed = input.trim();
    trimmed.len() == PIN_DIGITS && trimmed.bytes().all(|b| b.is_ascii_digit())
}

/// Holds the active PIN for one running session.
///
/// The PIN lives only in memory. Every run starts unset and the session asks
/// for a new one; it is not tied to the stored data in any way.
#[derive(Debug, Default)]
pub struct PinGate {
    active: Option<Pin>,
}

impl PinGate {
    pub fn unset() -> Self {
        Self::default()
    }

    pub fn set(&mut self, pin: Pin) {
        self.active = Some(pin);
    }

    pub fn is_set(&self) -> bool {
        self.active.is_some()
    }

    /// Always false while no PIN is active.
    pub fn check(&self, candidate: Pin) -> bool {
        self.active == Some(candidate)
    }
}
