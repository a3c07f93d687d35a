//! The envelope codec
//!
//! Sealing: validate AAD, serialize, draw salt and nonce, derive the key,
//! encrypt and pack. Opening runs the same steps in reverse. The blocking and
//! async forms share every step except where key derivation runs, so they
//! produce identical envelopes for identical inputs.

use crate::aead;
use crate::armor::{self, EnvelopeInput};
use crate::config::{CodecConfig, Passphrase};
use crate::error::{ErrorCategory, ErrorKind, Result, SealboxError};
use crate::kdf;
use crate::layout::{self, NONCE_LEN, SALT_LEN};
use crate::serializer;
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::debug;
use zeroize::Zeroizing;

/// Seals values into passphrase-protected envelopes and opens them again.
///
/// Immutable after construction and cheap to clone; clones share the
/// passphrase. Safe to use from many threads or tasks at once.
#[derive(Debug, Clone)]
pub struct Codec {
    passphrase: Arc<Passphrase>,
}

fn validate_aad(aad: Option<&str>) -> Result<()> {
    if aad == Some("") {
        return Err(SealboxError::with_kind(
            ErrorCategory::User,
            ErrorKind::Validation,
            "AAD cannot be an empty string",
        ));
    }
    Ok(())
}

/// Everything that must happen before any entropy is drawn.
fn prepare<T: Serialize + ?Sized>(value: &T, aad: Option<&str>) -> Result<Zeroizing<Vec<u8>>> {
    validate_aad(aad)?;
    serializer::to_plaintext(value)
}

fn fresh_material<R: RngCore + CryptoRng>(rng: &mut R) -> ([u8; SALT_LEN], [u8; NONCE_LEN]) {
    let mut salt = [0u8; SALT_LEN];
    rng.fill_bytes(&mut salt);

    let mut nonce = [0u8; NONCE_LEN];
    rng.fill_bytes(&mut nonce);

    (salt, nonce)
}

impl Codec {
    /// Create a codec from its configuration.
    ///
    /// Fails with [`ErrorKind::Configuration`] if the passphrase is missing
    /// or empty.
    pub fn new(config: CodecConfig) -> Result<Self> {
        let passphrase = config.into_passphrase()?;
        debug!("envelope codec ready");
        Ok(Self {
            passphrase: Arc::new(passphrase),
        })
    }

    /// Encrypt `value` into a base64 envelope, deriving the key on tokio's
    /// blocking pool.
    ///
    /// `value` is serialized when this is called, not when the future is
    /// first polled, so the future does not borrow it.
    pub fn encrypt<'a, T: Serialize + ?Sized>(
        &'a self,
        value: &T,
        aad: Option<&'a str>,
    ) -> impl Future<Output = Result<String>> + Send + use<'a, T> {
        let sealing = self.encrypt_bytes(value, aad);
        async move { sealing.await.map(|envelope| armor::wrap(&envelope)) }
    }

    /// Like [`Codec::encrypt`], returning the raw envelope bytes.
    pub fn encrypt_bytes<'a, T: Serialize + ?Sized>(
        &'a self,
        value: &T,
        aad: Option<&'a str>,
    ) -> impl Future<Output = Result<Vec<u8>>> + Send + use<'a, T> {
        self.seal_with_rng(value, aad, &mut OsRng)
    }

    /// Encrypt `value` into a base64 envelope on the calling thread.
    pub fn encrypt_sync<T: Serialize + ?Sized>(
        &self,
        value: &T,
        aad: Option<&str>,
    ) -> Result<String> {
        self.encrypt_bytes_sync(value, aad)
            .map(|envelope| armor::wrap(&envelope))
    }

    /// Like [`Codec::encrypt_sync`], returning the raw envelope bytes.
    pub fn encrypt_bytes_sync<T: Serialize + ?Sized>(
        &self,
        value: &T,
        aad: Option<&str>,
    ) -> Result<Vec<u8>> {
        self.seal_sync_with_rng(value, aad, &mut OsRng)
    }

    /// Encrypt with caller-provided salt and nonce.
    ///
    /// This function is ONLY for known-answer testing. Reusing a salt and
    /// nonce pair across messages destroys the guarantees of the envelope;
    /// always use [`Codec::encrypt`] or [`Codec::encrypt_sync`] otherwise.
    pub fn encrypt_with_material<'a, T: Serialize + ?Sized>(
        &'a self,
        value: &T,
        aad: Option<&'a str>,
        salt: &[u8; SALT_LEN],
        nonce: &[u8; NONCE_LEN],
    ) -> impl Future<Output = Result<String>> + Send + use<'a, T> {
        let plaintext = prepare(value, aad);
        let (salt, nonce) = (*salt, *nonce);
        async move {
            let envelope = self.seal_with_material(plaintext?, aad, salt, nonce).await?;
            Ok(armor::wrap(&envelope))
        }
    }

    /// Blocking form of [`Codec::encrypt_with_material`]. Same restrictions apply.
    pub fn encrypt_with_material_sync<T: Serialize + ?Sized>(
        &self,
        value: &T,
        aad: Option<&str>,
        salt: &[u8; SALT_LEN],
        nonce: &[u8; NONCE_LEN],
    ) -> Result<String> {
        let plaintext = prepare(value, aad)?;
        self.seal_with_material_sync(&plaintext, aad, salt, nonce)
            .map(|envelope| armor::wrap(&envelope))
    }

    /// Authenticate and decrypt an envelope, deriving the key on tokio's
    /// blocking pool.
    pub async fn decrypt<T: DeserializeOwned>(
        &self,
        envelope: impl Into<EnvelopeInput>,
        aad: Option<&str>,
    ) -> Result<T> {
        validate_aad(aad)?;
        let envelope = envelope.into().into_bytes()?;
        let salt = *layout::split(&envelope)?.salt;
        let key = kdf::derive_key_async(Arc::clone(&self.passphrase), salt).await?;
        let plaintext = aead::open(&envelope, &key, aad)?;
        serializer::from_plaintext(&plaintext)
    }

    /// Authenticate and decrypt an envelope on the calling thread.
    pub fn decrypt_sync<T: DeserializeOwned>(
        &self,
        envelope: impl Into<EnvelopeInput>,
        aad: Option<&str>,
    ) -> Result<T> {
        validate_aad(aad)?;
        let envelope = envelope.into().into_bytes()?;
        let parts = layout::split(&envelope)?;
        let key = kdf::derive_key(self.passphrase.expose(), parts.salt);
        let plaintext = aead::open(&envelope, &key, aad)?;
        serializer::from_plaintext(&plaintext)
    }

    fn seal_with_rng<'a, T, R>(
        &'a self,
        value: &T,
        aad: Option<&'a str>,
        rng: &mut R,
    ) -> impl Future<Output = Result<Vec<u8>>> + Send + use<'a, T, R>
    where
        T: Serialize + ?Sized,
        R: RngCore + CryptoRng,
    {
        let prepared = prepare(value, aad).map(|plaintext| (plaintext, fresh_material(rng)));
        async move {
            let (plaintext, (salt, nonce)) = prepared?;
            self.seal_with_material(plaintext, aad, salt, nonce).await
        }
    }

    fn seal_sync_with_rng<T, R>(
        &self,
        value: &T,
        aad: Option<&str>,
        rng: &mut R,
    ) -> Result<Vec<u8>>
    where
        T: Serialize + ?Sized,
        R: RngCore + CryptoRng,
    {
        let plaintext = prepare(value, aad)?;
        let (salt, nonce) = fresh_material(rng);
        self.seal_with_material_sync(&plaintext, aad, &salt, &nonce)
    }

    async fn seal_with_material(
        &self,
        plaintext: Zeroizing<Vec<u8>>,
        aad: Option<&str>,
        salt: [u8; SALT_LEN],
        nonce: [u8; NONCE_LEN],
    ) -> Result<Vec<u8>> {
        debug!(plaintext_len = plaintext.len(), aad = aad.is_some(), "sealing envelope");
        let key = kdf::derive_key_async(Arc::clone(&self.passphrase), salt).await?;
        aead::seal(&plaintext, &key, &nonce, &salt, aad)
    }

    fn seal_with_material_sync(
        &self,
        plaintext: &[u8],
        aad: Option<&str>,
        salt: &[u8; SALT_LEN],
        nonce: &[u8; NONCE_LEN],
    ) -> Result<Vec<u8>> {
        debug!(plaintext_len = plaintext.len(), aad = aad.is_some(), "sealing envelope");
        let key = kdf::derive_key(self.passphrase.expose(), salt);
        aead::seal(plaintext, &key, nonce, salt, aad)
    }
}
