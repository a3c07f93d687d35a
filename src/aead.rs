//! Authenticated encryption using AES-256-GCM
//!
//! Sealing produces the complete binary envelope (see [`crate::layout`]);
//! opening splits it again, verifies the tag and only then yields plaintext.

use crate::error::{ErrorCategory, ErrorKind, Result, SealboxError};
use crate::kdf::KEY_LEN;
use crate::layout::{self, EnvelopeParts, NONCE_LEN, SALT_LEN, TAG_LEN};
use aes_gcm::aead::generic_array::GenericArray;
use aes_gcm::aead::{AeadInPlace, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use zeroize::Zeroizing;

fn cipher(key: &[u8; KEY_LEN]) -> Aes256Gcm {
    Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key))
}

/// No AAD and empty AAD authenticate identically under GCM.
fn associated_data(aad: Option<&str>) -> &[u8] {
    aad.map(str::as_bytes).unwrap_or_default()
}

/// Encrypt `plaintext` and pack the result with `salt` and `nonce`.
///
/// Returns the binary format: salt(64) + nonce(12) + tag(16) + ciphertext(variable)
pub fn seal(
    plaintext: &[u8],
    key: &[u8; KEY_LEN],
    nonce: &[u8; NONCE_LEN],
    salt: &[u8; SALT_LEN],
    aad: Option<&str>,
) -> Result<Vec<u8>> {
    let mut ciphertext = plaintext.to_vec();
    let tag = cipher(key)
        .encrypt_in_place_detached(
            Nonce::from_slice(nonce),
            associated_data(aad),
            &mut ciphertext,
        )
        .map_err(|e| {
            SealboxError::with_kind(
                ErrorCategory::Internal,
                ErrorKind::Internal,
                format!("encryption failed: {}", e),
            )
        })?;
    let tag: [u8; TAG_LEN] = tag.into();

    Ok(layout::pack(&EnvelopeParts {
        salt,
        nonce,
        tag: &tag,
        ciphertext: &ciphertext,
    }))
}

/// Verify and decrypt an envelope with a key already derived from its salt.
///
/// The tag is checked before any plaintext is produced. Every failure,
/// including a truncated envelope, is reported as the same opaque
/// authentication error.
pub fn open(
    envelope: &[u8],
    key: &[u8; KEY_LEN],
    aad: Option<&str>,
) -> Result<Zeroizing<Vec<u8>>> {
    let parts = layout::split(envelope)?;

    let mut buffer = Zeroizing::new(parts.ciphertext.to_vec());
    cipher(key)
        .decrypt_in_place_detached(
            Nonce::from_slice(parts.nonce),
            associated_data(aad),
            buffer.as_mut_slice(),
            GenericArray::from_slice(parts.tag),
        )
        .map_err(|_| SealboxError::authentication_failed())?;

    Ok(buffer)
}
