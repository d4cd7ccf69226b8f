//! Random wishlist identifiers.
//!
//! Identifiers are drawn uniformly from `[0-9a-z]`. There is no uniqueness
//! check; at the default length of 12 a collision needs on the order of
//! 36^6 identifiers. Callers that need a guarantee should pass their own id.

use rand::Rng;

/// Identifier length used when none is requested.
pub const DEFAULT_ID_LENGTH: usize = 12;

const ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Generate an identifier of `len` characters from the thread-local RNG.
#[must_use]
pub fn create_wishlist_identifier(len: usize) -> String {
    create_identifier_with(&mut rand::thread_rng(), len)
}

/// Generate an identifier of `len` characters from `rng`.
#[must_use]
pub fn create_identifier_with<R: Rng>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|_| char::from(ALPHABET[rng.gen_range(0..ALPHABET.len())]))
        .collect()
}
