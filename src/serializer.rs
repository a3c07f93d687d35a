//! Plaintext serialization
//!
//! Values are encrypted as compact JSON. Any `Serialize` type is accepted;
//! [`serde_json::Value`] is the closed set of shapes that round-trip.

use crate::error::{ErrorCategory, ErrorKind, Result, SealboxError};
use serde::Serialize;
use serde::de::DeserializeOwned;
use zeroize::Zeroizing;

/// Serialize `value` to the bytes that get encrypted.
pub fn to_plaintext<T: Serialize + ?Sized>(value: &T) -> Result<Zeroizing<Vec<u8>>> {
    serde_json::to_vec(value).map(Zeroizing::new).map_err(|e| {
        SealboxError::with_kind_and_source(
            ErrorCategory::User,
            ErrorKind::Serialization,
            "value must be serializable",
            e,
        )
    })
}

/// Deserialize authenticated plaintext into the caller's type.
pub fn from_plaintext<T: DeserializeOwned>(plaintext: &[u8]) -> Result<T> {
    serde_json::from_slice(plaintext).map_err(|e| {
        SealboxError::with_kind_and_source(
            ErrorCategory::User,
            ErrorKind::Serialization,
            "value must be deserializable",
            e,
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serializer;
    use serde_json::{Value, json};
    use std::collections::BTreeMap;

    struct Unrepresentable;

    impl Serialize for Unrepresentable {
        fn serialize<S: Serializer>(
            &self,
            _serializer: S,
        ) -> std::result::Result<S::Ok, S::Error> {
            Err(serde::ser::Error::custom("functions have no JSON form"))
        }
    }

    #[test]
    fn test_compact_encoding() {
        let plaintext = to_plaintext(&json!({"id": 1, "tags": ["a", "b"]})).unwrap();
        assert_eq!(&plaintext[..], br#"{"id":1,"tags":["a","b"]}"#);
    }

    #[test]
    fn test_scalars() {
        assert_eq!(&to_plaintext("hi").unwrap()[..], br#""hi""#);
        assert_eq!(&to_plaintext(&42).unwrap()[..], b"42");
        assert_eq!(&to_plaintext(&true).unwrap()[..], b"true");
        assert_eq!(&to_plaintext(&1.5).unwrap()[..], b"1.5");
    }

    #[test]
    fn test_custom_serialize_error() {
        let err = to_plaintext(&Unrepresentable).unwrap_err();
        assert_eq!(err.kind, Some(ErrorKind::Serialization));
        assert_eq!(err.to_string(), "value must be serializable");
        assert!(err.source_error().is_some());
    }

    #[test]
    fn test_non_string_keys() {
        let mut map = BTreeMap::new();
        map.insert(vec![1u8, 2], "value");
        let err = to_plaintext(&map).unwrap_err();
        assert_eq!(err.kind, Some(ErrorKind::Serialization));
    }

    #[test]
    fn test_from_plaintext() {
        let value: Value = from_plaintext(br#"{"id":1,"tags":["a","b"]}"#).unwrap();
        assert_eq!(value, json!({"id": 1, "tags": ["a", "b"]}));
    }

    #[test]
    fn test_from_plaintext_wrong_type() {
        let err = from_plaintext::<u32>(br#""not a number""#).unwrap_err();
        assert_eq!(err.kind, Some(ErrorKind::Serialization));
        assert_eq!(err.to_string(), "value must be deserializable");
    }
}
