//! Token payload validation against the pre-shared secret and replay window.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use super::cipher::TokenCipher;
use super::TokenError;

/// Separator between the shared secret and the timestamp in the payload.
pub const SEPARATOR: &str = ":|:";

/// Maximum accepted token age in seconds.
///
/// `now > issued + 5` rejects, so a token exactly five seconds old still
/// passes. Tokens are sealed immediately before the request they accompany;
/// the window only has to absorb network latency.
pub const MAX_TOKEN_AGE_SECS: u64 = 5;

/// Source of unix time, injected so expiry boundaries are testable.
#[cfg_attr(test, mockall::automock)]
pub trait Clock: Send + Sync {
    /// Current unix time in whole seconds.
    fn unix_now(&self) -> u64;
}

/// [`Clock`] backed by the system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn unix_now(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }
}

/// Validates (and, for trusted callers, issues) shielded-request tokens.
pub struct TokenVerifier {
    cipher: TokenCipher,
    shared_secret: String,
    clock: Arc<dyn Clock>,
}

impl TokenVerifier {
    pub fn new(passphrase: &str, shared_secret: impl Into<String>, clock: Arc<dyn Clock>) -> Self {
        Self {
            cipher: TokenCipher::new(passphrase),
            shared_secret: shared_secret.into(),
            clock,
        }
    }

    /// Seal a fresh token for the current instant.
    ///
    /// Exists for trusted front-end code and tests; the verify path never
    /// calls it.
    pub fn issue(&self) -> Result<String, TokenError> {
        self.issue_at(self.clock.unix_now())
    }

    /// Seal a token carrying an explicit timestamp.
    pub fn issue_at(&self, unix_ts: u64) -> Result<String, TokenError> {
        self.cipher
            .seal(&format!("{}{}{}", self.shared_secret, SEPARATOR, unix_ts))
    }

    /// Validate a token taken from the `token` query parameter.
    ///
    /// # Errors
    ///
    /// Returns the precise [`TokenError`] for logging; the dispatcher
    /// collapses every variant to the same opaque HTTP 500 response.
    pub fn verify(&self, token: Option<&str>) -> Result<(), TokenError> {
        let token = token.ok_or(TokenError::Missing)?;
        let payload = self.cipher.open(token)?;

        let parts: Vec<&str> = payload.split(SEPARATOR).collect();
        if parts.len() != 2 {
            return Err(TokenError::MalformedPayload);
        }
        if parts[0] != self.shared_secret {
            return Err(TokenError::SecretMismatch);
        }

        let issued: u64 = parts[1].parse().map_err(|_| TokenError::BadTimestamp)?;
        let now = self.clock.unix_now();
        if now > issued + MAX_TOKEN_AGE_SECS {
            return Err(TokenError::Expired(now.saturating_sub(issued)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: u64 = 1_700_000_000;

    fn verifier_at(now: u64) -> TokenVerifier {
        let mut clock = MockClock::new();
        clock.expect_unix_now().return_const(now);
        TokenVerifier::new("passphrase", "secret", Arc::new(clock))
    }

    #[test]
    fn fresh_token_is_accepted() {
        let v = verifier_at(NOW);
        let token = v.issue().unwrap();
        assert_eq!(v.verify(Some(&token)), Ok(()));
    }

    #[test]
    fn four_second_old_token_is_accepted() {
        let v = verifier_at(NOW);
        let token = v.issue_at(NOW - 4).unwrap();
        assert_eq!(v.verify(Some(&token)), Ok(()));
    }

    #[test]
    fn five_second_old_token_is_still_accepted() {
        // The window test: rejection requires now > issued + 5.
        let v = verifier_at(NOW);
        let token = v.issue_at(NOW - 5).unwrap();
        assert_eq!(v.verify(Some(&token)), Ok(()));
    }

    #[test]
    fn six_second_old_token_is_rejected() {
        let v = verifier_at(NOW);
        let token = v.issue_at(NOW - 6).unwrap();
        assert_eq!(v.verify(Some(&token)), Err(TokenError::Expired(6)));
    }

    #[test]
    fn future_token_is_accepted() {
        // Clock skew towards the future never trips the age check.
        let v = verifier_at(NOW);
        let token = v.issue_at(NOW + 30).unwrap();
        assert_eq!(v.verify(Some(&token)), Ok(()));
    }

    #[test]
    fn missing_token_is_rejected() {
        let v = verifier_at(NOW);
        assert_eq!(v.verify(None), Err(TokenError::Missing));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let mut clock = MockClock::new();
        clock.expect_unix_now().return_const(NOW);
        let issuer = TokenVerifier::new("passphrase", "other-secret", Arc::new(clock));
        let token = issuer.issue().unwrap();

        let v = verifier_at(NOW);
        assert_eq!(v.verify(Some(&token)), Err(TokenError::SecretMismatch));
    }

    #[test]
    fn payload_with_extra_separator_is_rejected() {
        let v = verifier_at(NOW);
        let cipher = TokenCipher::new("passphrase");
        let token = cipher.seal(&format!("secret:|:{NOW}:|:extra")).unwrap();
        assert_eq!(v.verify(Some(&token)), Err(TokenError::MalformedPayload));
    }

    #[test]
    fn non_numeric_timestamp_is_rejected() {
        let v = verifier_at(NOW);
        let cipher = TokenCipher::new("passphrase");
        let token = cipher.seal("secret:|:not-a-number").unwrap();
        assert_eq!(v.verify(Some(&token)), Err(TokenError::BadTimestamp));
    }

    #[test]
    fn garbage_token_is_rejected() {
        let v = verifier_at(NOW);
        assert_eq!(
            v.verify(Some("complete garbage")),
            Err(TokenError::InvalidFormat)
        );
    }
}
