use std::path::Path;

use rsa::pkcs1::DecodeRsaPublicKey;
use rsa::pkcs8::DecodePublicKey;
use rsa::{Pkcs1v15Encrypt, RsaPublicKey};

use crate::error::{BoardError, Result};

/// Encrypts handshake challenges so that only a holder of the judge private
/// key can recover them.
pub trait ChallengeCipher: Send + Sync {
    fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>>;
}

/// RSA encryption with PKCS#1 v1.5 padding under the judge public key.
#[derive(Debug, Clone)]
pub struct RsaChallengeCipher {
    key: RsaPublicKey,
}

impl RsaChallengeCipher {
    pub fn new(key: RsaPublicKey) -> Self {
        Self { key }
    }

    /// Parse a public key in either `RSA PUBLIC KEY` (PKCS#1) or
    /// `PUBLIC KEY` (SPKI) PEM form.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Crypto`] if the PEM cannot be decoded as either.
    pub fn from_public_key_pem(pem: &str) -> Result<Self> {
        let key = RsaPublicKey::from_pkcs1_pem(pem)
            .or_else(|_| RsaPublicKey::from_public_key_pem(pem))
            .map_err(|e| BoardError::Crypto(format!("invalid RSA public key: {e}")))?;
        Ok(Self::new(key))
    }

    /// Load the public key from a PEM file.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be read, or
    /// [`BoardError::Crypto`] if it does not hold an RSA public key.
    pub fn load(path: &Path) -> Result<Self> {
        let pem = std::fs::read_to_string(path)?;
        let cipher = Self::from_public_key_pem(&pem)?;
        tracing::info!(path = %path.display(), "Loaded judge public key");
        Ok(cipher)
    }
}

impl ChallengeCipher for RsaChallengeCipher {
    fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        self.key
            .encrypt(&mut rand::thread_rng(), Pkcs1v15Encrypt, plaintext)
            .map_err(|e| BoardError::Crypto(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rsa::pkcs1::EncodeRsaPublicKey;
    use rsa::pkcs8::{EncodePublicKey, LineEnding};
    use rsa::RsaPrivateKey;

    fn keypair() -> (RsaPrivateKey, RsaPublicKey) {
        let private = RsaPrivateKey::new(&mut rand::thread_rng(), 1024).unwrap();
        let public = RsaPublicKey::from(&private);
        (private, public)
    }

    #[test]
    fn encrypted_challenge_decrypts_with_private_key() {
        let (private, public) = keypair();
        let cipher = RsaChallengeCipher::new(public);

        let ciphertext = cipher.encrypt(b"0123456789abcdef").unwrap();
        assert_ne!(ciphertext, b"0123456789abcdef");

        let plaintext = private.decrypt(Pkcs1v15Encrypt, &ciphertext).unwrap();
        assert_eq!(plaintext, b"0123456789abcdef");
    }

    #[test]
    fn accepts_pkcs1_and_spki_pem() {
        let (_, public) = keypair();
        let pkcs1 = public.to_pkcs1_pem(LineEnding::LF).unwrap();
        let spki = public.to_public_key_pem(LineEnding::LF).unwrap();

        assert!(RsaChallengeCipher::from_public_key_pem(&pkcs1).is_ok());
        assert!(RsaChallengeCipher::from_public_key_pem(&spki).is_ok());
    }

    #[test]
    fn rejects_garbage_pem() {
        assert!(matches!(
            RsaChallengeCipher::from_public_key_pem("not a key"),
            Err(BoardError::Crypto(_))
        ));
    }

    #[test]
    fn load_reads_pem_file() {
        let (_, public) = keypair();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("judge.pem");
        std::fs::write(&path, public.to_public_key_pem(LineEnding::LF).unwrap()).unwrap();

        assert!(RsaChallengeCipher::load(&path).is_ok());
        assert!(matches!(
            RsaChallengeCipher::load(&dir.path().join("missing.pem")),
            Err(BoardError::Io(_))
        ));
    }
}
