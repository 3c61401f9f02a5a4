//! Keyed digest over a tracking identifier and user name.
//!
//! The signer binds a tracking identifier to the user it was issued to:
//! `sign(id, user)` is an HMAC-SHA256 keyed by the process-wide secret over
//! the exact concatenation `identifier || user_name` (no separator), encoded
//! as lowercase hex. A cookie presented by a different user, or one minted
//! without the secret, fails verification.
//!
//! Verification is constant-time (`subtle::ConstantTimeEq`) to avoid leaking
//! digest prefixes through response timing.

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::error::SignerError;

type HmacSha256 = Hmac<Sha256>;

/// Minimum accepted signing secret length, in bytes.
pub const MIN_SECRET_LEN: usize = 32;

/// Deterministic keyed digest over `(identifier, user_name)`.
///
/// Pure and stateless apart from the secret, which is loaded once at startup
/// and never exposed or logged.
pub struct HashSigner {
    secret: SecretString,
}

impl HashSigner {
    /// Creates a signer from the process-wide secret.
    ///
    /// # Errors
    ///
    /// Returns [`SignerError::SecretTooShort`] if the secret is shorter than
    /// [`MIN_SECRET_LEN`] bytes.
    pub fn new(secret: SecretString) -> Result<Self, SignerError> {
        let len = secret.expose_secret().len();
        if len < MIN_SECRET_LEN {
            return Err(SignerError::SecretTooShort {
                len,
                min: MIN_SECRET_LEN,
            });
        }
        Ok(Self { secret })
    }

    /// Computes the lowercase-hex digest for `(identifier, user_name)`.
    #[must_use]
    pub fn sign(&self, identifier: &str, user_name: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(self.secret.expose_secret().as_bytes())
            .expect("HMAC accepts keys of any length");
        mac.update(identifier.as_bytes());
        mac.update(user_name.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    /// Verifies a presented digest against the expected one.
    ///
    /// Constant-time: comparison cost does not depend on where the values
    /// first differ.
    #[must_use]
    pub fn verify(&self, identifier: &str, user_name: &str, presented: &str) -> bool {
        let expected = self.sign(identifier, user_name);
        expected.as_bytes().ct_eq(presented.as_bytes()).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_signer() -> HashSigner {
        HashSigner::new(SecretString::from(
            "an-adequately-long-test-secret-0123456789".to_string(),
        ))
        .unwrap()
    }

    #[test]
    fn sign_is_deterministic() {
        let signer = test_signer();
        assert_eq!(signer.sign("42", "alice"), signer.sign("42", "alice"));
    }

    #[test]
    fn sign_round_trip_verifies() {
        let signer = test_signer();
        let digest = signer.sign("7812630412", "alice");
        assert!(signer.verify("7812630412", "alice", &digest));
    }

    #[test]
    fn other_user_fails_verification() {
        let signer = test_signer();
        let digest = signer.sign("7812630412", "alice");
        assert!(!signer.verify("7812630412", "bob", &digest));
    }

    #[test]
    fn other_identifier_fails_verification() {
        let signer = test_signer();
        let digest = signer.sign("1", "alice");
        assert!(!signer.verify("2", "alice", &digest));
    }

    #[test]
    fn truncated_digest_fails_verification() {
        let signer = test_signer();
        let digest = signer.sign("1", "alice");
        assert!(!signer.verify("1", "alice", &digest[..digest.len() - 2]));
    }

    #[test]
    fn digest_is_lowercase_hex() {
        let signer = test_signer();
        let digest = signer.sign("1", "alice");
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn short_secret_is_rejected() {
        let result = HashSigner::new(SecretString::from("too-short".to_string()));
        assert!(matches!(
            result,
            Err(SignerError::SecretTooShort { len: 9, min: MIN_SECRET_LEN })
        ));
    }

    #[test]
    fn different_secrets_produce_different_digests() {
        let a = test_signer();
        let b = HashSigner::new(SecretString::from(
            "a-different-but-equally-long-secret-000000".to_string(),
        ))
        .unwrap();
        assert_ne!(a.sign("1", "alice"), b.sign("1", "alice"));
    }
}
