// Fri Jan 23 2026 - Alex

pub mod logging;
#[cfg(test)]
pub mod testing;

pub use logging::{LoggingUtils, ScopedTimer};

/// Parses `0x`-prefixed or bare hex, as accepted on the command line.
pub fn parse_hex_u64(s: &str) -> Option<u64> {
    let s = s.trim();
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    if digits.is_empty() {
        return None;
    }
    u64::from_str_radix(digits, 16).ok()
}
