//! Challenge response derivation for the draft-76 handshake.
//!
//! Each security key encodes a number: the decimal digits scattered through
//! the key, read in order, divided by the number of spaces in the key. The
//! two 32-bit results and the client's 8 raw token bytes are MD5-hashed into
//! the 16-byte challenge response.
//!
//! - [`key_number`]: Extract one key's 32-bit value
//! - [`challenge_digest`]: MD5 over the 16-byte challenge buffer
//! - [`derive`]: Both steps from the raw key strings

use md5::{Digest, Md5};

/// Compute the numeric value of a security key.
///
/// Returns `None` when the key contains no space characters, since the
/// space count is the divisor. A key with spaces but no digits is worth 0.
///
/// The digit string may be far longer than fits any fixed-width integer, so
/// the division is done as schoolbook long division over the digits. Every
/// partial dividend is below `10 * spaces`, so each quotient digit is 0-9,
/// and the quotient is folded into a wrapping `u32` (the low 32 bits are all
/// that go on the wire).
pub fn key_number(key: &str) -> Option<u32> {
    let spaces = key.bytes().filter(|&b| b == b' ').count() as u64;
    if spaces == 0 {
        return None;
    }

    let mut remainder: u64 = 0;
    let mut quotient: u32 = 0;
    for digit in key.bytes().filter(u8::is_ascii_digit).map(|b| u64::from(b - b'0')) {
        let partial = remainder * 10 + digit;
        quotient = quotient
            .wrapping_mul(10)
            .wrapping_add((partial / spaces) as u32);
        remainder = partial % spaces;
    }
    Some(quotient)
}

/// MD5 of `n1 (big-endian) ++ n2 (big-endian) ++ token`.
pub fn challenge_digest(n1: u32, n2: u32, token: &[u8; 8]) -> [u8; 16] {
    let mut challenge = [0u8; 16];
    challenge[..4].copy_from_slice(&n1.to_be_bytes());
    challenge[4..8].copy_from_slice(&n2.to_be_bytes());
    challenge[8..].copy_from_slice(token);

    let mut hasher = Md5::new();
    hasher.update(challenge);
    hasher.finalize().into()
}

/// Derive the challenge response from both security keys and the client token.
///
/// Returns `None` if either key has no spaces.
pub fn derive(key1: &str, key2: &str, token: &[u8; 8]) -> Option<[u8; 16]> {
    let n1 = key_number(key1)?;
    let n2 = key_number(key2)?;
    Some(challenge_digest(n1, n2, token))
}
