//! Binary envelope layout
//!
//! The envelope is a fixed-offset concatenation with no length fields or
//! version markers:
//! - salt: 64 bytes
//! - nonce: 12 bytes
//! - tag: 16 bytes (AES-GCM authentication tag)
//! - ciphertext: variable length, equal to the plaintext length

use crate::error::{Result, SealboxError};

/// Length of salt in bytes
pub const SALT_LEN: usize = 64;

/// Length of nonce in bytes
pub const NONCE_LEN: usize = 12;

/// Length of the authentication tag in bytes
pub const TAG_LEN: usize = 16;

/// Bytes every envelope carries in addition to its ciphertext.
pub const ENVELOPE_OVERHEAD: usize = SALT_LEN + NONCE_LEN + TAG_LEN;

/// Borrowed view of the components of an envelope.
#[derive(Debug, Clone, Copy)]
pub struct EnvelopeParts<'a> {
    pub salt: &'a [u8; SALT_LEN],
    pub nonce: &'a [u8; NONCE_LEN],
    pub tag: &'a [u8; TAG_LEN],
    pub ciphertext: &'a [u8],
}

/// Raw envelope length for a plaintext of `plaintext_len` bytes.
pub const fn envelope_len(plaintext_len: usize) -> usize {
    ENVELOPE_OVERHEAD + plaintext_len
}

/// Concatenate the components into the binary format:
/// salt(64) + nonce(12) + tag(16) + ciphertext(variable)
pub fn pack(parts: &EnvelopeParts<'_>) -> Vec<u8> {
    let mut output = Vec::with_capacity(envelope_len(parts.ciphertext.len()));
    output.extend_from_slice(parts.salt);
    output.extend_from_slice(parts.nonce);
    output.extend_from_slice(parts.tag);
    output.extend_from_slice(parts.ciphertext);
    output
}

/// Split an envelope by its fixed offsets.
///
/// Envelopes too short to hold the fixed-size header fail the same way a
/// forged tag does, so truncation is indistinguishable from tampering.
pub fn split(envelope: &[u8]) -> Result<EnvelopeParts<'_>> {
    let (salt, rest) = envelope
        .split_first_chunk::<SALT_LEN>()
        .ok_or_else(SealboxError::authentication_failed)?;
    let (nonce, rest) = rest
        .split_first_chunk::<NONCE_LEN>()
        .ok_or_else(SealboxError::authentication_failed)?;
    let (tag, ciphertext) = rest
        .split_first_chunk::<TAG_LEN>()
        .ok_or_else(SealboxError::authentication_failed)?;

    Ok(EnvelopeParts {
        salt,
        nonce,
        tag,
        ciphertext,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_offsets() {
        let envelope: Vec<u8> = (0..100).collect();
        let parts = split(&envelope).unwrap();

        assert_eq!(parts.salt[0], 0);
        assert_eq!(parts.salt[SALT_LEN - 1], 63);
        assert_eq!(parts.nonce[0], 64);
        assert_eq!(parts.nonce[NONCE_LEN - 1], 75);
        assert_eq!(parts.tag[0], 76);
        assert_eq!(parts.tag[TAG_LEN - 1], 91);
        assert_eq!(parts.ciphertext, &envelope[92..]);
    }

    #[test]
    fn test_pack_split_identity() {
        let salt = [1u8; SALT_LEN];
        let nonce = [2u8; NONCE_LEN];
        let tag = [3u8; TAG_LEN];
        let ciphertext = b"ciphertext";

        let packed = pack(&EnvelopeParts {
            salt: &salt,
            nonce: &nonce,
            tag: &tag,
            ciphertext,
        });
        assert_eq!(packed.len(), envelope_len(ciphertext.len()));

        let parts = split(&packed).unwrap();
        assert_eq!(parts.salt, &salt);
        assert_eq!(parts.nonce, &nonce);
        assert_eq!(parts.tag, &tag);
        assert_eq!(parts.ciphertext, ciphertext);
    }

    #[test]
    fn test_empty_ciphertext_is_structurally_valid() {
        let envelope = vec![0u8; ENVELOPE_OVERHEAD];
        let parts = split(&envelope).unwrap();
        assert!(parts.ciphertext.is_empty());
    }

    #[test]
    fn test_truncated_inputs() {
        for len in [0, 3, SALT_LEN, SALT_LEN + NONCE_LEN, ENVELOPE_OVERHEAD - 1] {
            let envelope = vec![0u8; len];
            let err = split(&envelope).expect_err("expected truncation to fail");
            assert_eq!(err.kind, Some(ErrorKind::AuthenticationFailed));
        }
    }
}
