//! Short code generation.
//!
//! Codes are drawn uniformly from a 62-symbol alphabet. Eight symbols give
//! 62^8 (about 2.2e14) possible codes, which keeps collisions negligible at the
//! expected scale; the allocator still retries on the rare hit.

use rand::Rng;

/// Digits, then upper case, then lower case letters.
pub const ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Number of symbols in every generated code.
pub const CODE_LENGTH: usize = 8;

/// Draws a fresh random code.
///
/// # Examples
///
/// ```
/// use shortlink::utils::code_generator::{generate_code, is_well_formed, CODE_LENGTH};
///
/// let code = generate_code();
/// assert_eq!(code.len(), CODE_LENGTH);
/// assert!(is_well_formed(&code));
/// ```
pub fn generate_code() -> String {
    let mut rng = rand::rng();

    (0..CODE_LENGTH)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
        .collect()
}

/// Returns true if `code` has the length and alphabet of a generated code.
///
/// Anything else can never have been allocated, so callers may treat it as
/// not found without a store round-trip.
pub fn is_well_formed(code: &str) -> bool {
    code.len() == CODE_LENGTH && code.bytes().all(|b| b.is_ascii_alphanumeric())
}
