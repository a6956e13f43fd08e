//! API key token generation and hashing

use rand::RngCore;
use sha2::{Digest, Sha256};

/// Token prefix for identification
const TOKEN_PREFIX: &str = "ak_";

/// Random bytes behind each token (64 hex chars)
const TOKEN_BYTES: usize = 32;

/// How much of the random part the display prefix keeps
const PREFIX_VISIBLE: usize = 8;

/// A freshly generated token with everything needed to persist it.
#[derive(Debug, Clone)]
pub struct GeneratedToken {
    /// The full plaintext token (only shown once!)
    pub token: String,
    /// SHA-256 hex of the token; the value stored and looked up
    pub token_hash: String,
    /// Display fragment, e.g. "ak_1a2b3c4d..."
    pub prefix: String,
}

/// Generate a new API key token from OS-seeded randomness.
pub fn generate_token() -> GeneratedToken {
    let mut random_bytes = [0u8; TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut random_bytes);
    let suffix = hex::encode(random_bytes);

    let token = format!("{}{}", TOKEN_PREFIX, suffix);

    GeneratedToken {
        token_hash: hash_token(&token),
        prefix: format!("{}{}...", TOKEN_PREFIX, &suffix[..PREFIX_VISIBLE]),
        token,
    }
}

/// Hash a token for storage and lookup.
pub fn hash_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}
