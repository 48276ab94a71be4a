//! AES-256-GCM-SIV sealing and opening of token strings.

use aes_gcm_siv::{
    aead::{Aead, KeyInit, OsRng},
    Aes256GcmSiv, Nonce,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use sha2::{Digest, Sha256};

use super::TokenError;

/// Byte length of an AES-GCM-SIV nonce (12 bytes = 96 bits).
pub const NONCE_LEN: usize = 12;

/// Symmetric cipher for shielded tokens.
///
/// The 256-bit key is derived from the pre-shared passphrase with a single
/// SHA-256 pass, so both sides only have to agree on a string.
pub struct TokenCipher {
    cipher: Aes256GcmSiv,
}

impl TokenCipher {
    /// Build a cipher from the pre-shared passphrase.
    pub fn new(passphrase: &str) -> Self {
        let key: [u8; 32] = Sha256::digest(passphrase.as_bytes()).into();
        Self {
            cipher: Aes256GcmSiv::new(&key.into()),
        }
    }

    /// Seal `plaintext` into the token wire format.
    ///
    /// A fresh 96-bit nonce is drawn from the OS CSPRNG per call, so sealing
    /// the same payload twice yields different tokens.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::SealFailure`] on an internal AEAD error (should
    /// be unreachable with a valid key).
    pub fn seal(&self, plaintext: &str) -> Result<String, TokenError> {
        use aes_gcm_siv::aead::rand_core::RngCore;
        let mut nonce_bytes = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = self
            .cipher
            .encrypt(nonce, plaintext.as_bytes())
            .map_err(|_| TokenError::SealFailure)?;

        Ok(format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(nonce_bytes),
            URL_SAFE_NO_PAD.encode(&ciphertext),
        ))
    }

    /// Open a token string back into its plaintext payload.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::InvalidFormat`] when the string does not parse
    /// into a nonce and ciphertext segment, and [`TokenError::Undecryptable`]
    /// when authentication fails (wrong passphrase, tampering) or the
    /// plaintext is not UTF-8.
    pub fn open(&self, token: &str) -> Result<String, TokenError> {
        let (nonce_part, ct_part) = token.split_once('.').ok_or(TokenError::InvalidFormat)?;

        let nonce_bytes = URL_SAFE_NO_PAD
            .decode(nonce_part)
            .map_err(|_| TokenError::InvalidFormat)?;
        if nonce_bytes.len() != NONCE_LEN {
            return Err(TokenError::InvalidFormat);
        }

        let ciphertext = URL_SAFE_NO_PAD
            .decode(ct_part)
            .map_err(|_| TokenError::InvalidFormat)?;

        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(&nonce_bytes), ciphertext.as_ref())
            .map_err(|_| TokenError::Undecryptable)?;

        String::from_utf8(plaintext).map_err(|_| TokenError::Undecryptable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seal_open_round_trip() {
        let cipher = TokenCipher::new("correct horse battery staple");
        let token = cipher.seal("secret:|:1700000000").unwrap();
        assert_eq!(cipher.open(&token).unwrap(), "secret:|:1700000000");
    }

    #[test]
    fn sealing_twice_yields_different_tokens() {
        let cipher = TokenCipher::new("pass");
        let a = cipher.seal("payload").unwrap();
        let b = cipher.seal("payload").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn wrong_passphrase_fails_to_open() {
        let sealer = TokenCipher::new("pass-a");
        let opener = TokenCipher::new("pass-b");
        let token = sealer.seal("payload").unwrap();
        assert_eq!(opener.open(&token), Err(TokenError::Undecryptable));
    }

    #[test]
    fn rejects_missing_separator() {
        let cipher = TokenCipher::new("pass");
        assert_eq!(cipher.open("nodotshere"), Err(TokenError::InvalidFormat));
    }

    #[test]
    fn rejects_bad_base64() {
        let cipher = TokenCipher::new("pass");
        assert_eq!(cipher.open("!!!.abc"), Err(TokenError::InvalidFormat));
    }

    #[test]
    fn rejects_wrong_nonce_length() {
        let cipher = TokenCipher::new("pass");
        let short_nonce = URL_SAFE_NO_PAD.encode([0u8; 4]);
        let token = format!("{short_nonce}.YWJj");
        assert_eq!(cipher.open(&token), Err(TokenError::InvalidFormat));
    }

    #[test]
    fn tampered_ciphertext_fails_auth() {
        let cipher = TokenCipher::new("pass");
        let token = cipher.seal("payload").unwrap();
        let (nonce_part, ct_part) = token.split_once('.').unwrap();
        let mut ct = URL_SAFE_NO_PAD.decode(ct_part).unwrap();
        ct[0] ^= 0xFF;
        let tampered = format!("{nonce_part}.{}", URL_SAFE_NO_PAD.encode(&ct));
        assert_eq!(cipher.open(&tampered), Err(TokenError::Undecryptable));
    }
}
