//! Base62 encoding of numeric ids.
//!
//! Digits are `a-z`, then `A-Z`, then `0-9`, most significant first.

use crate::error::{Result, ShortenerError};

pub const ALPHABET: &[u8; 62] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const BASE: u64 = 62;

/// Encode `id` in Base62. Zero encodes as `"a"`.
pub fn encode(mut id: u64) -> String {
    if id == 0 {
        return (ALPHABET[0] as char).to_string();
    }
    let mut digits = Vec::new();
    while id > 0 {
        digits.push(ALPHABET[(id % BASE) as usize]);
        id /= BASE;
    }
    digits.reverse();
    // Every byte comes from the ASCII alphabet.
    digits.into_iter().map(char::from).collect()
}

/// Decode a Base62 code back into its id.
pub fn decode(code: &str) -> Result<u64> {
    if code.is_empty() {
        return Err(ShortenerError::InvalidCode(code.to_owned()));
    }
    code.bytes().try_fold(0u64, |id, byte| {
        let digit = digit_value(byte).ok_or_else(|| ShortenerError::InvalidCode(code.to_owned()))?;
        id.checked_mul(BASE)
            .and_then(|id| id.checked_add(digit))
            .ok_or_else(|| ShortenerError::InvalidCode(code.to_owned()))
    })
}

fn digit_value(byte: u8) -> Option<u64> {
    let value = match byte {
        b'a'..=b'z' => byte - b'a',
        b'A'..=b'Z' => byte - b'A' + 26,
        b'0'..=b'9' => byte - b'0' + 52,
        _ => return None,
    };
    Some(u64::from(value))
}
