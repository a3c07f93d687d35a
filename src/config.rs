//! Codec configuration and passphrase handling

use crate::error::{ErrorCategory, ErrorKind, Result, SealboxError};
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::io::Read;
use zeroize::Zeroizing;

/// Passphrase bytes, wiped from memory when dropped.
///
/// Arbitrary bytes are accepted, not only UTF-8.
#[derive(Clone)]
pub struct Passphrase(Zeroizing<Vec<u8>>);

impl Passphrase {
    /// Take ownership of `bytes` as the passphrase.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(Zeroizing::new(bytes))
    }

    /// Read a passphrase as all remaining bytes of `reader`.
    ///
    /// Nothing is trimmed; a trailing newline is part of the passphrase.
    pub fn read_from(mut reader: impl Read) -> Result<Self> {
        let mut data = Zeroizing::new(Vec::new());
        reader.read_to_end(&mut data).map_err(|e| {
            SealboxError::with_kind_and_source(
                ErrorCategory::Internal,
                ErrorKind::Configuration,
                format!("error reading passphrase: {}", e),
                e,
            )
        })?;
        Ok(Self(data))
    }

    /// True for a zero-length passphrase, which [`crate::Codec::new`] rejects.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn expose(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Passphrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Passphrase(<redacted>)")
    }
}

impl From<Vec<u8>> for Passphrase {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

impl From<&[u8]> for Passphrase {
    fn from(bytes: &[u8]) -> Self {
        Self::new(bytes.to_vec())
    }
}

impl From<String> for Passphrase {
    fn from(s: String) -> Self {
        Self::new(s.into_bytes())
    }
}

impl From<&str> for Passphrase {
    fn from(s: &str) -> Self {
        Self::new(s.as_bytes().to_vec())
    }
}

impl<'de> Deserialize<'de> for Passphrase {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = Zeroizing::new(String::deserialize(deserializer)?);
        Ok(Self::from(s.as_str()))
    }
}

/// Options accepted when constructing a [`Codec`](crate::Codec).
///
/// The passphrase is the only option. Cipher, digest, iteration count and
/// lengths are fixed and cannot be configured.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CodecConfig {
    #[serde(default)]
    passphrase: Option<Passphrase>,
}

impl CodecConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn passphrase(mut self, passphrase: impl Into<Passphrase>) -> Self {
        self.passphrase = Some(passphrase.into());
        self
    }

    /// Build a configuration whose passphrase is read from `reader`.
    pub fn from_reader(reader: impl Read) -> Result<Self> {
        Ok(Self {
            passphrase: Some(Passphrase::read_from(reader)?),
        })
    }

    /// Extract the passphrase, rejecting a missing or empty one.
    pub(crate) fn into_passphrase(self) -> Result<Passphrase> {
        match self.passphrase {
            Some(passphrase) if !passphrase.is_empty() => Ok(passphrase),
            Some(_) => Err(SealboxError::with_kind(
                ErrorCategory::User,
                ErrorKind::Configuration,
                "passphrase cannot be empty",
            )),
            None => Err(SealboxError::with_kind(
                ErrorCategory::User,
                ErrorKind::Configuration,
                "passphrase is required",
            )),
        }
    }
}
