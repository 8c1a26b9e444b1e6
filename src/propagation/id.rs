//! 128-bit trace and span identifiers
//!
//! Peers send identifiers either as 64-bit (historical) or 128-bit hex
//! strings. Both decode into an [`Id128`] split into high and low 64-bit
//! halves; a bare 64-bit id decodes with `high == 0` and re-encodes to the
//! same short form, so 64-bit-only peers see their ids unchanged.
//!
//! Encoding prints the full 128-bit magnitude in lowercase base 16 with
//! leading zeros stripped. Decoding accepts any number of hex digits: the last
//! 16 form the low half, everything before them the high half, truncated to
//! its low 64 bits.

use super::PropagationError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Hex digits carried by one 64-bit half
const HALF_DIGITS: usize = 16;

/// 128-bit identifier stored as two unsigned 64-bit halves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Id128 {
    high: u64,
    low: u64,
}

impl Id128 {
    /// Create an identifier from its high and low halves
    pub const fn new(high: u64, low: u64) -> Self {
        Self { high, low }
    }

    /// Create an identifier from a single 128-bit value
    pub const fn from_u128(value: u128) -> Self {
        Self {
            high: (value >> 64) as u64,
            low: value as u64,
        }
    }

    /// Upper 64 bits
    pub const fn high(&self) -> u64 {
        self.high
    }

    /// Lower 64 bits
    pub const fn low(&self) -> u64 {
        self.low
    }

    /// Combined `(high << 64) | low` value
    pub const fn as_u128(&self) -> u128 {
        ((self.high as u128) << 64) | self.low as u128
    }

    /// Whether both halves are zero
    pub const fn is_zero(&self) -> bool {
        self.high == 0 && self.low == 0
    }

    /// Hex text form, see [`to_hex`]
    pub fn to_hex(&self) -> String {
        to_hex(*self)
    }
}

/// Encode an identifier as minimal lowercase hex
///
/// Behaves like printing `(high << 64) | low` as an unsigned integer in base
/// 16: no zero-padding, `"0"` for the zero id.
///
/// # Example
///
/// ```
/// use b3_propagation::propagation::{to_hex, Id128};
///
/// assert_eq!(to_hex(Id128::new(0, 0xabc)), "abc");
/// assert_eq!(to_hex(Id128::new(1, 0xabc)), "10000000000000abc");
/// ```
pub fn to_hex(id: Id128) -> String {
    format!("{:x}", id.as_u128())
}

/// Decode hex text into an identifier
///
/// # Returns
///
/// * `Ok(Id128)` - Decoded identifier
/// * `Err(PropagationError::MalformedIdentifier)` - If `text` is empty or
///   contains anything other than ASCII hex digits
///
/// # Example
///
/// ```
/// use b3_propagation::propagation::{from_hex, Id128};
///
/// let id = from_hex("1234567890abcdef1").unwrap();
/// assert_eq!(id, Id128::new(0x1, 0x234567890abcdef1));
///
/// assert!(from_hex("not-hex").is_err());
/// ```
pub fn from_hex(text: &str) -> Result<Id128, PropagationError> {
    // from_str_radix tolerates a leading '+', so check the digits ourselves
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(malformed(text));
    }

    let (high, low) = text.split_at(text.len().saturating_sub(HALF_DIGITS));
    Ok(Id128::new(
        parse_truncated(high, text)?,
        parse_truncated(low, text)?,
    ))
}

/// Parse hex digits keeping only the low 64 bits of the value
fn parse_truncated(digits: &str, text: &str) -> Result<u64, PropagationError> {
    let tail = &digits[digits.len().saturating_sub(HALF_DIGITS)..];
    if tail.is_empty() {
        return Ok(0);
    }
    u64::from_str_radix(tail, 16).map_err(|_| malformed(text))
}

fn malformed(text: &str) -> PropagationError {
    PropagationError::MalformedIdentifier {
        value: text.to_string(),
    }
}

impl fmt::Display for Id128 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(self, f)
    }
}

impl fmt::LowerHex for Id128 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.as_u128(), f)
    }
}

impl FromStr for Id128 {
    type Err = PropagationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        from_hex(s)
    }
}

impl From<u128> for Id128 {
    fn from(value: u128) -> Self {
        Self::from_u128(value)
    }
}

impl From<u64> for Id128 {
    fn from(value: u64) -> Self {
        Self::new(0, value)
    }
}

impl From<Id128> for u128 {
    fn from(id: Id128) -> Self {
        id.as_u128()
    }
}

// Most significant UUID bits map to the high half.
impl From<Uuid> for Id128 {
    fn from(uuid: Uuid) -> Self {
        let (high, low) = uuid.as_u64_pair();
        Self::new(high, low)
    }
}

impl From<Id128> for Uuid {
    fn from(id: Id128) -> Self {
        Uuid::from_u64_pair(id.high, id.low)
    }
}

impl Serialize for Id128 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Id128 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        from_hex(&s).map_err(serde::de::Error::custom)
    }
}
