//! Sealbox - Passphrase-based authenticated encryption envelopes
//!
//! A [`Codec`] turns any serializable value into a self-describing base64
//! envelope and back:
//!
//! ```text
//! salt(64) || nonce(12) || tag(16) || ciphertext(N)
//! ```
//!
//! The key is derived per message with PBKDF2-HMAC-SHA512 (10000 iterations)
//! from the codec's passphrase and the envelope's random salt, and the value
//! is sealed with AES-256-GCM. Algorithms and parameters are fixed.

#![forbid(unsafe_code)]

pub mod aead;
pub mod armor;
pub mod codec;
pub mod config;
pub mod error;
pub mod kdf;
pub mod layout;
pub mod serializer;

pub use armor::EnvelopeInput;
pub use codec::Codec;
pub use config::{CodecConfig, Passphrase};
pub use error::{ErrorCategory, ErrorKind, Result, SealboxError};
