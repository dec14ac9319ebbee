#![allow(clippy::len_without_is_empty)]
#![doc(test(
    no_crate_inject,
    attr(deny(warnings, rust_2018_idioms), allow(dead_code, unused_variables))
))]

//! RSocket metadata extensions.
//!
//! RSocket carries an optional metadata buffer beside the data of every payload.
//! This crate implements the well-known metadata formats that peers use to describe it:
//! - well-known MIME types, as encoded in a single byte
//! - composite metadata, a container of many MIME-typed entries
//! - routing metadata, a list of route tags
//!
//! # Examples
//!
//! ```
//! use bytes::BytesMut;
//! use rsocket_rust_metadata::extension::{CompositeMetadata, MimeType, RoutingMetadata};
//! use rsocket_rust_metadata::utils::Writeable;
//!
//! let routing = RoutingMetadata::builder().push_str("orders").build();
//! let composite = CompositeMetadata::builder()
//!     .push(MimeType::MESSAGE_X_RSOCKET_ROUTING_V0, routing.bytes())
//!     .push(MimeType::TEXT_PLAIN, "Hello World!")
//!     .build();
//!
//! let mut bf = BytesMut::new();
//! composite.write_to(&mut bf);
//! let decoded = CompositeMetadata::decode(&mut bf).unwrap();
//! assert_eq!(2, decoded.len());
//! ```

#[macro_use]
extern crate log;

pub mod error;
pub mod extension;
#[macro_use]
mod macros;
mod payload;
pub mod utils;

pub use payload::{Payload, PayloadBuilder};

pub type Result<T> = std::result::Result<T, error::RSocketError>;
