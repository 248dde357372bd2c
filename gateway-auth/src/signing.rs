//! HMAC-SHA256 signing for values that round-trip through the browser.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;

use crate::error::{handshake_error, Error, HandshakeErrorKind};

type HmacSha256 = Hmac<Sha256>;

/// Signs and verifies payloads with HMAC-SHA256.
///
/// Signatures are base64url encoded without padding so they can be embedded in cookie values.
#[derive(Clone)]
pub struct HmacSigner {
    key: SecretString,
}

impl HmacSigner {
    /// Create a new signer.
    ///
    /// # Arguments
    ///
    /// * `key` - Shared signing secret; every gateway instance must use the same key
    pub fn new(key: SecretString) -> Self {
        Self { key }
    }

    /// Compute the signature of `payload`.
    pub fn sign(&self, payload: &[u8]) -> Result<String, Error> {
        let mut mac = self.mac()?;
        mac.update(payload);
        Ok(URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes()))
    }

    /// Verify `signature` against `payload`.
    ///
    /// The comparison is constant time. Returns `Ok(false)` for a well formed but wrong
    /// signature and an error when the signature is not valid base64url.
    pub fn verify(&self, payload: &[u8], signature: &str) -> Result<bool, Error> {
        let expected_sig = URL_SAFE_NO_PAD.decode(signature).map_err(|_| {
            handshake_error(
                HandshakeErrorKind::InvalidSignature,
                "Invalid signature format",
            )
        })?;

        let mut mac = self.mac()?;
        mac.update(payload);

        Ok(mac.verify_slice(&expected_sig).is_ok())
    }

    fn mac(&self) -> Result<HmacSha256, Error> {
        HmacSha256::new_from_slice(self.key.expose_secret().as_bytes()).map_err(|_| {
            handshake_error(HandshakeErrorKind::InvalidSignature, "Invalid HMAC key")
        })
    }
}

impl std::fmt::Debug for HmacSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HmacSigner").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signer(key: &str) -> HmacSigner {
        HmacSigner::new(SecretString::new(key.to_string()))
    }

    #[test]
    fn test_valid_signature() {
        let signer = signer("test_secret");
        let signature = signer.sign(b"test payload").unwrap();

        assert!(signer.verify(b"test payload", &signature).unwrap());
    }

    #[test]
    fn test_signature_is_url_safe() {
        let signature = signer("test_secret").sign(b"test payload").unwrap();

        assert_eq!(signature.len(), 43); // 32 bytes, unpadded base64
        assert!(signature
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn test_tampered_payload_fails() {
        let signer = signer("test_secret");
        let signature = signer.sign(b"test payload").unwrap();

        assert!(!signer.verify(b"test payload!", &signature).unwrap());
    }

    #[test]
    fn test_other_key_fails() {
        let signature = signer("test_secret").sign(b"test payload").unwrap();

        assert!(!signer("other_secret")
            .verify(b"test payload", &signature)
            .unwrap());
    }

    #[test]
    fn test_invalid_signature_format() {
        let result = signer("test_secret").verify(b"test payload", "not base64!");
        assert!(result.is_err());
    }

    #[test]
    fn test_debug_hides_key() {
        let output = format!("{:?}", signer("super_secret_key"));
        assert!(!output.contains("super_secret_key"));
    }
}
