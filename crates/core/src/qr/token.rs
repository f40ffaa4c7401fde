//! Token generation.

use rand::RngCore;

/// Raw entropy per token.
pub const TOKEN_BYTES: usize = 32;

/// Generates a 256-bit random token, hex encoded.
#[must_use]
pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}
