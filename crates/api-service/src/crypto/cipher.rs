//! Field cipher.
//!
//! Encrypts short strings for at-rest protection with AES-256-GCM. Output is
//! `base64(nonce || ciphertext || tag)` using the standard alphabet. The
//! default key comes from `APP_SECRET`; callers may pass their own 32-byte key.

use crate::config::{Config, APP_SECRET_LEN};
use base64::{engine::general_purpose::STANDARD, Engine};
use common::secret::{ExposeSecret, SecretString};
use ring::{
    aead::{Aad, LessSafeKey, Nonce, UnboundKey, AES_256_GCM, NONCE_LEN},
    rand::{SecureRandom, SystemRandom},
};
use thiserror::Error;
use tracing::instrument;

const TAG_LEN: usize = 16;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CipherError {
    #[error("Invalid key length: {0} (expected 32)")]
    InvalidKeyLength(usize),

    #[error("Ciphertext is not valid")]
    InvalidCiphertext,

    #[error("Encryption failed")]
    Encryption,

    #[error("Decryption failed")]
    Decryption,

    #[error("Decrypted data is not valid UTF-8")]
    InvalidUtf8,
}

/// Symmetric cipher with an immutable default key.
#[derive(Clone)]
pub struct CipherService {
    default_key: SecretString,
    rng: SystemRandom,
}

impl CipherService {
    pub fn new(config: &Config) -> Self {
        Self::with_key(config.app_secret.clone())
    }

    pub fn with_key(default_key: SecretString) -> Self {
        Self {
            default_key,
            rng: SystemRandom::new(),
        }
    }

    /// Encrypt `plaintext` with `key`, or the default key when `None`.
    ///
    /// # Errors
    ///
    /// - `InvalidKeyLength` - key is not 32 bytes
    /// - `Encryption` - nonce generation or sealing failed
    #[instrument(skip_all)]
    pub fn encrypt(&self, plaintext: &str, key: Option<&str>) -> Result<String, CipherError> {
        let key = self.sealing_key(key)?;

        let mut nonce_bytes = [0u8; NONCE_LEN];
        self.rng.fill(&mut nonce_bytes).map_err(|_| {
            tracing::error!(target: "api.crypto.cipher", "Nonce generation failed");
            CipherError::Encryption
        })?;

        let mut in_out = plaintext.as_bytes().to_vec();
        key.seal_in_place_append_tag(
            Nonce::assume_unique_for_key(nonce_bytes),
            Aad::empty(),
            &mut in_out,
        )
        .map_err(|_| CipherError::Encryption)?;

        let mut output = Vec::with_capacity(NONCE_LEN + in_out.len());
        output.extend_from_slice(&nonce_bytes);
        output.extend_from_slice(&in_out);

        Ok(STANDARD.encode(output))
    }

    /// Decrypt output of [`encrypt`](Self::encrypt).
    ///
    /// # Errors
    ///
    /// - `InvalidKeyLength` - key is not 32 bytes
    /// - `InvalidCiphertext` - not base64, or too short to hold nonce and tag
    /// - `Decryption` - authentication failed (wrong key or tampered data)
    /// - `InvalidUtf8` - plaintext is not UTF-8
    #[instrument(skip_all)]
    pub fn decrypt(&self, ciphertext: &str, key: Option<&str>) -> Result<String, CipherError> {
        let key = self.sealing_key(key)?;

        let data = STANDARD
            .decode(ciphertext)
            .map_err(|_| CipherError::InvalidCiphertext)?;
        if data.len() < NONCE_LEN + TAG_LEN {
            return Err(CipherError::InvalidCiphertext);
        }

        let (nonce_bytes, sealed) = data.split_at(NONCE_LEN);
        let nonce_bytes: [u8; NONCE_LEN] = nonce_bytes
            .try_into()
            .map_err(|_| CipherError::InvalidCiphertext)?;

        let mut in_out = sealed.to_vec();
        let plaintext = key
            .open_in_place(
                Nonce::assume_unique_for_key(nonce_bytes),
                Aad::empty(),
                &mut in_out,
            )
            .map_err(|_| {
                tracing::debug!(target: "api.crypto.cipher", "Ciphertext failed authentication");
                CipherError::Decryption
            })?;

        String::from_utf8(plaintext.to_vec()).map_err(|_| CipherError::InvalidUtf8)
    }

    fn sealing_key(&self, key: Option<&str>) -> Result<LessSafeKey, CipherError> {
        let key_bytes = match key {
            Some(key) => key.as_bytes(),
            None => self.default_key.expose_secret().as_bytes(),
        };

        if key_bytes.len() != APP_SECRET_LEN {
            return Err(CipherError::InvalidKeyLength(key_bytes.len()));
        }

        let unbound =
            UnboundKey::new(&AES_256_GCM, key_bytes).map_err(|_| CipherError::Encryption)?;
        Ok(LessSafeKey::new(unbound))
    }
}
