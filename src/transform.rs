//! Reversible per-character shift applied to stored passwords.
//!
//! This is obfuscation, not encryption: anyone holding the passwords file can
//! undo it without the PIN. It only keeps passwords from being readable at a
//! glance. The exact transform is kept so existing files stay readable.

/// Shift used by the on-disk format unless configured otherwise.
pub const DEFAULT_SHIFT: u8 = 3;

/// Shift every character's code point up by `shift`, modulo 256.
///
/// Characters above U+00FF are reduced to their low byte first, so they do not
/// survive a round trip.
pub fn obfuscate(plaintext: &str, shift: u8) -> String {
    plaintext
        .chars()
        .map(|c| char::from((c as u8).wrapping_add(shift)))
        .collect()
}

/// Inverse of [`obfuscate`] for the same `shift`.
pub fn reveal(obfuscated: &str, shift: u8) -> String {
    obfuscated
        .chars()
        .map(|c| char::from((c as u8).wrapping_sub(shift)))
        .collect()
}
