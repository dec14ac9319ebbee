//! Metadata extraction for RSocket messaging.
//!
//! A [`DefaultMetadataExtractor`] holds a list of [`Decoder`]s and a table of
//! rules, keyed by MIME type, saying which metadata entries to decode and
//! where to put the decoded values. [`PayloadComposer`] writes payloads the
//! extractor can read back.

#[macro_use]
extern crate log;

mod composer;
mod decoder;
pub mod error;
mod extractor;
mod map;
mod misc;

pub use composer::{ComposeSpec, PayloadComposer};
pub use decoder::{ByteArrayDecoder, BytesDecoder, Decoder, StringDecoder, TargetType, Value};
pub use extractor::{
    DefaultMetadataExtractor, ExtractorBuilder, MetadataExtractor, COMPOSITE_METADATA, ROUTE_KEY,
    ROUTING,
};
pub use map::MetadataMap;
pub use misc::{CborDecoder, JsonDecoder};

pub type Result<T> = std::result::Result<T, error::MessagingError>;
