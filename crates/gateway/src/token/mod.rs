//! Shielded-request tokens: sealing, opening, and replay-window enforcement.
//!
//! State-mutating endpoints accept requests only when accompanied by a token
//! the trusted front end sealed moments earlier. A token is the AEAD
//! encryption of `"<shared-secret>:|:<unix-timestamp>"`; the server rejects
//! any token older than [`verifier::MAX_TOKEN_AGE_SECS`] seconds. The window
//! is deliberately this tight — tokens are sealed immediately before the
//! request they accompany, so anything older is a replay.
//!
//! # Token wire format
//!
//! ```text
//! <base64url-no-pad(nonce)>.<base64url-no-pad(ciphertext+tag)>
//! ```
//!
//! The cipher is AES-256-GCM-SIV with the key derived as
//! `SHA-256(passphrase)`; the AEAD tag covers integrity, so tampering and a
//! wrong passphrase are indistinguishable from garbage.

pub mod cipher;
pub mod verifier;

pub use cipher::TokenCipher;
pub use verifier::{Clock, SystemClock, TokenVerifier};

use thiserror::Error;

/// Every way a shielded token can fail validation.
///
/// All variants surface to callers as HTTP 500 with a generic message; the
/// variant detail exists for logs only.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    /// No `token` query parameter was supplied.
    #[error("token is missing")]
    Missing,

    /// The token string does not match the `nonce.ciphertext` structure.
    #[error("token does not match the expected format")]
    InvalidFormat,

    /// AEAD decryption failed — wrong key, tampering, or garbage input.
    #[error("token could not be decrypted")]
    Undecryptable,

    /// The decrypted payload does not split into exactly secret + timestamp.
    #[error("token payload does not split into secret and timestamp")]
    MalformedPayload,

    /// The embedded secret does not match the pre-shared secret.
    #[error("token secret mismatch")]
    SecretMismatch,

    /// The embedded timestamp is not a unix-seconds integer.
    #[error("token timestamp is malformed")]
    BadTimestamp,

    /// The token is older than the replay window allows.
    #[error("token issued {0} seconds ago exceeds the replay window")]
    Expired(u64),

    /// The AEAD seal operation itself failed.
    #[error("token could not be sealed")]
    SealFailure,
}
