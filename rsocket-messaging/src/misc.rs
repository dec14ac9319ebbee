use std::any::Any;
use std::fmt;
use std::marker::PhantomData;

use bytes::{BufMut, Bytes, BytesMut};
use rsocket_rust_metadata::extension::MimeType;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::decoder::{Decoder, TargetType, Value};
use crate::error::MessagingError;
use crate::Result;

pub(crate) fn marshal<T>(mime_type: &MimeType, bf: &mut BytesMut, data: &T) -> Result<()>
where
    T: Sized + Serialize,
{
    match *mime_type {
        MimeType::APPLICATION_JSON => {
            let raw = serde_json::to_vec(data)?;
            bf.put_slice(&raw[..]);
            Ok(())
        }
        MimeType::APPLICATION_CBOR => {
            let raw = serde_cbor::to_vec(data)?;
            bf.put_slice(&raw[..]);
            Ok(())
        }
        _ => Err(MessagingError::IllegalArgument(format!(
            "No encoder for {}",
            mime_type
        ))),
    }
}

/// Deserializes JSON metadata (`application/json`, `application/*+json`) into `T`.
pub struct JsonDecoder<T> {
    mime_types: Vec<MimeType>,
    _marker: PhantomData<fn() -> T>,
}

/// Deserializes CBOR metadata (`application/cbor`) into `T`.
pub struct CborDecoder<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonDecoder<T> {
    pub fn new() -> JsonDecoder<T> {
        JsonDecoder {
            mime_types: vec![
                MimeType::APPLICATION_JSON,
                MimeType::from("application/*+json"),
            ],
            _marker: PhantomData,
        }
    }
}

impl<T> Default for JsonDecoder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for JsonDecoder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "JsonDecoder<{}>", std::any::type_name::<T>())
    }
}

impl<T> Decoder for JsonDecoder<T>
where
    T: DeserializeOwned + Any + Send + Sync,
{
    fn can_decode(&self, target: &TargetType, mime_type: &MimeType) -> bool {
        target.is::<T>() && self.mime_types.iter().any(|it| it.includes(mime_type))
    }

    fn decode(&self, raw: &Bytes, target: &TargetType, mime_type: &MimeType) -> Result<Value> {
        let v: T = serde_json::from_slice(&raw[..])
            .map_err(|e| MessagingError::decode(mime_type, target, e))?;
        Ok(Box::new(v))
    }
}

impl<T> CborDecoder<T> {
    pub fn new() -> CborDecoder<T> {
        CborDecoder {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for CborDecoder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for CborDecoder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CborDecoder<{}>", std::any::type_name::<T>())
    }
}

impl<T> Decoder for CborDecoder<T>
where
    T: DeserializeOwned + Any + Send + Sync,
{
    fn can_decode(&self, target: &TargetType, mime_type: &MimeType) -> bool {
        target.is::<T>() && *mime_type == MimeType::APPLICATION_CBOR
    }

    fn decode(&self, raw: &Bytes, target: &TargetType, mime_type: &MimeType) -> Result<Value> {
        let v: T = serde_cbor::from_slice(&raw[..])
            .map_err(|e| MessagingError::decode(mime_type, target, e))?;
        Ok(Box::new(v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_derive::{Deserialize, Serialize};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Tenant {
        id: u32,
        name: String,
    }

    #[test]
    fn json_roundtrip() {
        let t = Tenant {
            id: 7,
            name: "acme".to_owned(),
        };
        let mut bf = BytesMut::new();
        marshal(&MimeType::APPLICATION_JSON, &mut bf, &t).unwrap();
        assert_eq!(r#"{"id":7,"name":"acme"}"#.as_bytes(), &bf[..]);

        let decoder = JsonDecoder::<Tenant>::new();
        let target = TargetType::of::<Tenant>();
        assert!(decoder.can_decode(&target, &MimeType::APPLICATION_JSON));
        assert!(decoder.can_decode(&target, &MimeType::APPLICATION_CLOUDEVENTS_JSON));
        assert!(!decoder.can_decode(&target, &MimeType::TEXT_PLAIN));
        assert!(!decoder.can_decode(&TargetType::of::<String>(), &MimeType::APPLICATION_JSON));

        let v = decoder
            .decode(&bf.freeze(), &target, &MimeType::APPLICATION_JSON)
            .unwrap();
        assert_eq!(&t, v.downcast_ref::<Tenant>().unwrap());
    }

    #[test]
    fn cbor_roundtrip() {
        let t = Tenant {
            id: 1,
            name: "x".to_owned(),
        };
        let mut bf = BytesMut::new();
        marshal(&MimeType::APPLICATION_CBOR, &mut bf, &t).unwrap();
        let decoder = CborDecoder::<Tenant>::new();
        let target = TargetType::of::<Tenant>();
        assert!(decoder.can_decode(&target, &MimeType::APPLICATION_CBOR));
        let v = decoder
            .decode(&bf.freeze(), &target, &MimeType::APPLICATION_CBOR)
            .unwrap();
        assert_eq!(&t, v.downcast_ref::<Tenant>().unwrap());
    }

    #[test]
    fn malformed_json() {
        let decoder = JsonDecoder::<Tenant>::new();
        let err = decoder
            .decode(
                &Bytes::from_static(b"{"),
                &TargetType::of::<Tenant>(),
                &MimeType::APPLICATION_JSON,
            )
            .unwrap_err();
        assert!(matches!(err, MessagingError::Decode { .. }));
    }

    #[test]
    fn unsupported_marshal() {
        let mut bf = BytesMut::new();
        let err = marshal(&MimeType::TEXT_PLAIN, &mut bf, &1u8).unwrap_err();
        assert!(err.is_illegal_argument());
    }
}
