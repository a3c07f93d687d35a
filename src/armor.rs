//! Text armoring for envelopes
//!
//! Envelopes travel as standard-alphabet, padded base64. Decryption accepts
//! either that text or the raw envelope bytes; [`EnvelopeInput`] normalizes
//! both to bytes before the layout is parsed.

use crate::error::{Result, SealboxError};
use base64::{Engine, engine::general_purpose::STANDARD};

/// Wrap envelope bytes in base64.
pub fn wrap(envelope: &[u8]) -> String {
    STANDARD.encode(envelope)
}

/// Unwrap base64 text, returning the envelope bytes.
///
/// Undecodable text is reported as an authentication failure, the same as
/// any other corrupt envelope.
pub fn unwrap(armored: &str) -> Result<Vec<u8>> {
    STANDARD
        .decode(armored)
        .map_err(|_| SealboxError::authentication_failed())
}

/// An envelope as handed to decryption: armored text or raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvelopeInput {
    /// Standard padded base64, as produced by [`wrap`].
    Text(String),
    /// The envelope bytes themselves.
    Raw(Vec<u8>),
}

impl EnvelopeInput {
    /// Decode to envelope bytes. Text that is not valid base64 fails with
    /// the authentication error.
    pub fn into_bytes(self) -> Result<Vec<u8>> {
        match self {
            Self::Text(armored) => unwrap(&armored),
            Self::Raw(bytes) => Ok(bytes),
        }
    }
}

impl From<String> for EnvelopeInput {
    fn from(armored: String) -> Self {
        Self::Text(armored)
    }
}

impl From<&String> for EnvelopeInput {
    fn from(armored: &String) -> Self {
        Self::Text(armored.clone())
    }
}

impl From<&str> for EnvelopeInput {
    fn from(armored: &str) -> Self {
        Self::Text(armored.to_owned())
    }
}

impl From<Vec<u8>> for EnvelopeInput {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Raw(bytes)
    }
}

impl From<&Vec<u8>> for EnvelopeInput {
    fn from(bytes: &Vec<u8>) -> Self {
        Self::Raw(bytes.clone())
    }
}

impl From<&[u8]> for EnvelopeInput {
    fn from(bytes: &[u8]) -> Self {
        Self::Raw(bytes.to_vec())
    }
}
