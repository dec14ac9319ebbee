use std::any::{self, Any, TypeId};
use std::fmt;

use bytes::Bytes;
use rsocket_rust_metadata::extension::MimeType;

use crate::error::MessagingError;
use crate::Result;

/// A decoded metadata value of any type.
pub type Value = Box<dyn Any + Send + Sync>;

/// The runtime type a decoder produces.
#[derive(Clone, Copy, Debug)]
pub struct TargetType {
    id: TypeId,
    name: &'static str,
}

impl TargetType {
    pub fn of<T>() -> TargetType
    where
        T: Any,
    {
        TargetType {
            id: TypeId::of::<T>(),
            name: any::type_name::<T>(),
        }
    }

    pub fn is<T>(&self) -> bool
    where
        T: Any,
    {
        self.id == TypeId::of::<T>()
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for TargetType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TargetType {}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Turns raw metadata bytes of some MIME type into a typed value.
///
/// A decoder is asked with [`Decoder::can_decode`] first and must only be
/// called with a target type and MIME type it accepted.
pub trait Decoder: Send + Sync {
    fn can_decode(&self, target: &TargetType, mime_type: &MimeType) -> bool;

    fn decode(&self, raw: &Bytes, target: &TargetType, mime_type: &MimeType) -> Result<Value>;
}

fn supports(mime_types: &[MimeType], mime_type: &MimeType) -> bool {
    mime_types.iter().any(|it| it.includes(mime_type))
}

/// Decodes UTF-8 metadata into a `String`.
#[derive(Debug, Clone)]
pub struct StringDecoder {
    mime_types: Vec<MimeType>,
}

impl StringDecoder {
    /// Only `text/plain`.
    pub fn text_plain_only() -> StringDecoder {
        StringDecoder {
            mime_types: vec![MimeType::TEXT_PLAIN],
        }
    }

    /// Any MIME type, `*/*`.
    pub fn all_mime_types() -> StringDecoder {
        StringDecoder {
            mime_types: vec![MimeType::TEXT_PLAIN, MimeType::all()],
        }
    }
}

impl Decoder for StringDecoder {
    fn can_decode(&self, target: &TargetType, mime_type: &MimeType) -> bool {
        target.is::<String>() && supports(&self.mime_types, mime_type)
    }

    fn decode(&self, raw: &Bytes, target: &TargetType, mime_type: &MimeType) -> Result<Value> {
        let s = String::from_utf8(raw.to_vec())
            .map_err(|e| MessagingError::decode(mime_type, target, e))?;
        Ok(Box::new(s))
    }
}

/// Copies metadata into a `Vec<u8>`, for any MIME type.
#[derive(Debug, Clone, Copy, Default)]
pub struct ByteArrayDecoder;

impl Decoder for ByteArrayDecoder {
    fn can_decode(&self, target: &TargetType, _mime_type: &MimeType) -> bool {
        target.is::<Vec<u8>>()
    }

    fn decode(&self, raw: &Bytes, _target: &TargetType, _mime_type: &MimeType) -> Result<Value> {
        Ok(Box::new(raw.to_vec()))
    }
}

/// Hands out the metadata buffer itself as `Bytes`, for any MIME type.
#[derive(Debug, Clone, Copy, Default)]
pub struct BytesDecoder;

impl Decoder for BytesDecoder {
    fn can_decode(&self, target: &TargetType, _mime_type: &MimeType) -> bool {
        target.is::<Bytes>()
    }

    fn decode(&self, raw: &Bytes, _target: &TargetType, _mime_type: &MimeType) -> Result<Value> {
        Ok(Box::new(raw.clone()))
    }
}
