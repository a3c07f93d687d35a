use std::error::Error as StdError;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorCategory {
    /// Any failure that cannot be confidently attributed to any other error
    /// category in this enum.
    ///
    /// Use of Internal is never a guarantee that the caller did nothing wrong,
    /// merely that the code cannot tell.
    Internal,

    /// The caller provided invalid input, or the envelope could not be
    /// authenticated with the supplied passphrase and AAD.
    User,
}

/// Fine-grained condition flags for consumers that want to branch on error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The codec configuration is missing a passphrase, or it is empty.
    Configuration,
    /// Caller-supplied AAD is malformed.
    Validation,
    /// The value could not be serialized, or authenticated plaintext could
    /// not be deserialized into the requested type.
    Serialization,
    /// The envelope failed to authenticate: wrong passphrase, wrong AAD,
    /// tampering, truncation or a malformed encoding. Deliberately carries
    /// no detail about which.
    AuthenticationFailed,
    /// The AEAD primitive or the key derivation worker failed unexpectedly.
    Internal,
}

#[derive(Debug, Error)]
#[error("{msg}")]
pub struct SealboxError {
    /// Broad error category, always provided.
    pub category: ErrorCategory,
    /// Optional specific condition tag for consumers that need to
    /// branch their behavior. Any code consuming errors MUST handle
    /// the absence of a defined kind.
    pub kind: Option<ErrorKind>,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
    msg: String,
}

impl SealboxError {
    /// Creates a new error that also tags the failure with a kind.
    pub fn with_kind(category: ErrorCategory, kind: ErrorKind, msg: impl Into<String>) -> Self {
        Self {
            category,
            kind: Some(kind),
            source: None,
            msg: msg.into(),
        }
    }

    /// Creates a new error that carries both a kind tag and the originating source error.
    pub fn with_kind_and_source(
        category: ErrorCategory,
        kind: ErrorKind,
        msg: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self {
            category,
            kind: Some(kind),
            source: Some(Box::new(source)),
            msg: msg.into(),
        }
    }

    /// The single error returned for every envelope that fails to open.
    pub(crate) fn authentication_failed() -> Self {
        Self::with_kind(
            ErrorCategory::User,
            ErrorKind::AuthenticationFailed,
            "unable to authenticate data",
        )
    }

    /// The user-facing message carried by the error.
    pub fn message(&self) -> &str {
        &self.msg
    }

    /// Returns the preserved source error if present.
    pub fn source_error(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.source.as_deref()
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, SealboxError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authentication_failed_is_opaque() {
        let err = SealboxError::authentication_failed();
        assert_eq!(err.category, ErrorCategory::User);
        assert_eq!(err.kind, Some(ErrorKind::AuthenticationFailed));
        assert_eq!(err.to_string(), "unable to authenticate data");
        assert!(err.source_error().is_none());
    }

    #[test]
    fn test_with_kind_and_source_preserves_source() {
        let cause = serde_json::from_str::<u32>("\"nope\"").unwrap_err();
        let cause_text = cause.to_string();
        let err = SealboxError::with_kind_and_source(
            ErrorCategory::User,
            ErrorKind::Serialization,
            "value must be deserializable",
            cause,
        );

        assert_eq!(err.kind, Some(ErrorKind::Serialization));
        assert_eq!(err.message(), "value must be deserializable");
        assert_eq!(err.source_error().unwrap().to_string(), cause_text);
        assert_eq!(
            std::error::Error::source(&err).unwrap().to_string(),
            cause_text
        );
    }
}
