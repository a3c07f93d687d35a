//! Key derivation using PBKDF2-HMAC-SHA512
//!
//! Derivation is the only expensive step of sealing or opening an envelope.
//! [`derive_key`] runs it on the calling thread; [`derive_key_async`] runs
//! the same function on tokio's blocking pool.

use crate::config::Passphrase;
use crate::error::{ErrorCategory, ErrorKind, Result, SealboxError};
use crate::layout::SALT_LEN;
use pbkdf2::pbkdf2_hmac;
use sha2::Sha512;
use std::sync::Arc;
use tokio::task;
use tracing::debug;
use zeroize::Zeroizing;

/// Length of derived key in bytes
pub const KEY_LEN: usize = 32;

/// PBKDF2 iteration count
pub const KDF_ITERATIONS: u32 = 10_000;

/// A derived AES-256 key, wiped from memory when dropped.
pub type DerivedKey = Zeroizing<[u8; KEY_LEN]>;

/// Derive a 32-byte key from a passphrase and salt.
pub fn derive_key(passphrase: &[u8], salt: &[u8; SALT_LEN]) -> DerivedKey {
    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    pbkdf2_hmac::<Sha512>(passphrase, salt, KDF_ITERATIONS, key.as_mut_slice());
    key
}

/// Derive a key without blocking the calling task.
///
/// Must be called from within a tokio runtime. Dropping the returned future
/// does not stop a derivation already running on the blocking pool.
pub async fn derive_key_async(
    passphrase: Arc<Passphrase>,
    salt: [u8; SALT_LEN],
) -> Result<DerivedKey> {
    debug!(iterations = KDF_ITERATIONS, "offloading key derivation");
    task::spawn_blocking(move || derive_key(passphrase.expose(), &salt))
        .await
        .map_err(|e| {
            SealboxError::with_kind_and_source(
                ErrorCategory::Internal,
                ErrorKind::Internal,
                "key derivation task failed",
                e,
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic() {
        let salt = [7u8; SALT_LEN];
        let k1 = derive_key(b"passphrase", &salt);
        let k2 = derive_key(b"passphrase", &salt);
        assert_eq!(*k1, *k2);
    }

    #[test]
    fn test_salt_changes_key() {
        let k1 = derive_key(b"passphrase", &[1u8; SALT_LEN]);
        let k2 = derive_key(b"passphrase", &[2u8; SALT_LEN]);
        assert_ne!(*k1, *k2);
    }

    #[test]
    fn test_passphrase_changes_key() {
        let salt = [1u8; SALT_LEN];
        let k1 = derive_key(b"correct", &salt);
        let k2 = derive_key(b"wrong", &salt);
        assert_ne!(*k1, *k2);
    }

    #[test]
    fn test_known_answer() {
        // PBKDF2-HMAC-SHA512("test", 0x00..0x3f, 10000, 32)
        let salt: [u8; SALT_LEN] = std::array::from_fn(|i| i as u8);
        let key = derive_key(b"test", &salt);
        assert_eq!(
            *key,
            [
                0xe7, 0x20, 0x33, 0x06, 0x0a, 0x75, 0xa1, 0xbf, 0x03, 0x4e, 0x03, 0x3f, 0x56,
                0xad, 0x88, 0xf1, 0x52, 0xcd, 0xcd, 0x45, 0x15, 0x9e, 0x3c, 0x16, 0xfe, 0x76,
                0x6a, 0xc8, 0x35, 0x8b, 0x1a, 0x7b,
            ]
        );
    }

    #[tokio::test]
    async fn test_async_matches_blocking() {
        let salt = [9u8; SALT_LEN];
        let passphrase = Arc::new(Passphrase::from("same inputs"));

        let blocking = derive_key(passphrase.expose(), &salt);
        let offloaded = derive_key_async(Arc::clone(&passphrase), salt).await.unwrap();

        assert_eq!(*blocking, *offloaded);
    }
}
