use std::collections::LinkedList;

use bytes::{Bytes, BytesMut};
use rsocket_rust_metadata::extension::{CompositeMetadata, MimeType, RoutingMetadata};
use rsocket_rust_metadata::utils::Writeable;
use rsocket_rust_metadata::Payload;
use serde::Serialize;

use super::misc::marshal;
use crate::error::MessagingError;
use crate::extractor::{COMPOSITE_METADATA, ROUTING};
use crate::Result;

/// Composes payloads whose metadata follows the metadata MIME type of a
/// connection.
///
/// With composite metadata every route and metadata value becomes its own
/// entry. With routing metadata only a route is allowed. With any other
/// metadata MIME type exactly one value is written as is.
#[derive(Debug, Clone)]
pub struct PayloadComposer {
    metadata_mime_type: MimeType,
    data_mime_type: MimeType,
}

#[derive(Debug)]
pub struct ComposeSpec {
    metadata_mime_type: MimeType,
    data_mime_type: MimeType,
    route: Option<String>,
    metadatas: LinkedList<(Option<MimeType>, Bytes)>,
    data: Option<Bytes>,
}

impl PayloadComposer {
    pub fn new<M>(metadata_mime_type: M) -> PayloadComposer
    where
        M: Into<MimeType>,
    {
        PayloadComposer {
            metadata_mime_type: metadata_mime_type.into(),
            data_mime_type: MimeType::APPLICATION_JSON,
        }
    }

    pub fn data_mime_type<M>(mut self, mime_type: M) -> Self
    where
        M: Into<MimeType>,
    {
        self.data_mime_type = mime_type.into();
        self
    }

    pub fn metadata_mime_type(&self) -> &MimeType {
        &self.metadata_mime_type
    }

    pub fn route<R>(&self, route: R) -> ComposeSpec
    where
        R: Into<String>,
    {
        let mut spec = self.spec();
        spec.route = Some(route.into());
        spec
    }

    pub fn spec(&self) -> ComposeSpec {
        ComposeSpec {
            metadata_mime_type: self.metadata_mime_type.clone(),
            data_mime_type: self.data_mime_type.clone(),
            route: None,
            metadatas: LinkedList::new(),
            data: None,
        }
    }
}

impl ComposeSpec {
    /// Adds a serialized metadata value. The MIME type selects the format and
    /// defaults to the connection's metadata MIME type.
    pub fn metadata<T>(mut self, metadata: &T, mime_type: Option<MimeType>) -> Result<Self>
    where
        T: Sized + Serialize,
    {
        let format = mime_type
            .clone()
            .unwrap_or_else(|| self.metadata_mime_type.clone());
        let mut b = BytesMut::new();
        marshal(&format, &mut b, metadata)?;
        self.metadatas.push_back((mime_type, b.freeze()));
        Ok(self)
    }

    pub fn metadata_raw<I>(mut self, metadata: I, mime_type: Option<MimeType>) -> Self
    where
        I: Into<Bytes>,
    {
        self.metadatas.push_back((mime_type, metadata.into()));
        self
    }

    pub fn data<T>(mut self, data: &T) -> Result<Self>
    where
        T: Sized + Serialize,
    {
        let mut bf = BytesMut::new();
        marshal(&self.data_mime_type, &mut bf, data)?;
        self.data = Some(bf.freeze());
        Ok(self)
    }

    pub fn data_raw<I>(mut self, data: I) -> Self
    where
        I: Into<Bytes>,
    {
        self.data = Some(data.into());
        self
    }

    pub fn build(self) -> Result<Payload> {
        let metadata = if self.metadata_mime_type == COMPOSITE_METADATA {
            Some(self.composite()?)
        } else if self.metadata_mime_type == ROUTING {
            self.routing()?
        } else {
            self.single()?
        };
        Ok(Payload::new(self.data, metadata))
    }

    fn composite(&self) -> Result<Bytes> {
        let mut c = CompositeMetadata::builder();
        if let Some(route) = &self.route {
            c = c.push(ROUTING, routing_of(route)?);
        }
        for (mime_type, raw) in self.metadatas.iter() {
            let mime_type = mime_type.clone().ok_or_else(|| {
                MessagingError::IllegalArgument(
                    "MIME type is required for composite metadata entries.".to_owned(),
                )
            })?;
            check_entry(&mime_type, raw)?;
            c = c.push(mime_type, raw);
        }
        let c = c.build();
        let mut bf = BytesMut::with_capacity(c.len());
        c.write_to(&mut bf);
        Ok(bf.freeze())
    }

    fn routing(&self) -> Result<Option<Bytes>> {
        if !self.metadatas.is_empty() {
            return Err(MessagingError::IllegalArgument(format!(
                "Only a route can be sent with {} metadata.",
                ROUTING
            )));
        }
        self.route.as_deref().map(routing_of).transpose()
    }

    fn single(&self) -> Result<Option<Bytes>> {
        let count = self.metadatas.len() + usize::from(self.route.is_some());
        if count > 1 {
            return Err(MessagingError::IllegalArgument(
                "Composite metadata required for multiple metadata entries.".to_owned(),
            ));
        }
        if let Some(route) = &self.route {
            return Ok(Some(Bytes::from(route.clone())));
        }
        match self.metadatas.front() {
            Some((Some(mime_type), _)) if *mime_type != self.metadata_mime_type => {
                Err(MessagingError::IllegalArgument(format!(
                    "MIME type {} does not match the metadata MIME type {}.",
                    mime_type, self.metadata_mime_type
                )))
            }
            Some((_, raw)) => Ok(Some(raw.clone())),
            None => Ok(None),
        }
    }
}

fn check_entry(mime_type: &MimeType, raw: &Bytes) -> Result<()> {
    if let MimeType::Normal(s) = mime_type {
        if s.len() > 0x7F {
            return Err(MessagingError::IllegalArgument(format!(
                "MIME type is longer than 127 bytes: {}",
                s
            )));
        }
    }
    if raw.len() > 0x00FF_FFFF {
        return Err(MessagingError::IllegalArgument(format!(
            "Metadata of {} exceeds 16MB",
            mime_type
        )));
    }
    Ok(())
}

fn routing_of(route: &str) -> Result<Bytes> {
    if route.len() > 0xFF {
        return Err(MessagingError::IllegalArgument(format!(
            "Route is longer than 255 bytes: {}",
            route
        )));
    }
    Ok(RoutingMetadata::builder().push_str(route).build().bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composite_route_comes_first() {
        let payload = PayloadComposer::new(COMPOSITE_METADATA)
            .route("toA")
            .metadata_raw("text data", Some(MimeType::TEXT_PLAIN))
            .data_raw("data")
            .build()
            .unwrap();
        assert_eq!(Some("data"), payload.data_utf8());
        let mut bf = BytesMut::from(&payload.metadata().unwrap()[..]);
        let c = CompositeMetadata::decode(&mut bf).unwrap();
        let mime_types: Vec<_> = c.iter().map(|it| it.get_mime_type().clone()).collect();
        assert_eq!(vec![ROUTING, MimeType::TEXT_PLAIN], mime_types);
    }

    #[test]
    fn composite_requires_entry_mime_type() {
        let err = PayloadComposer::new(COMPOSITE_METADATA)
            .spec()
            .metadata_raw("x", None)
            .build()
            .unwrap_err();
        assert!(err.is_illegal_argument());
    }

    #[test]
    fn routing_metadata() {
        let payload = PayloadComposer::new(ROUTING).route("toA").build().unwrap();
        assert_eq!(&b"\x03toA"[..], &payload.metadata().unwrap()[..]);
        let err = PayloadComposer::new(ROUTING)
            .route("toA")
            .metadata_raw("x", Some(MimeType::TEXT_PLAIN))
            .build()
            .unwrap_err();
        assert!(err.is_illegal_argument());
    }

    #[test]
    fn single_metadata() {
        let payload = PayloadComposer::new(MimeType::TEXT_PLAIN)
            .route("toA")
            .build()
            .unwrap();
        assert_eq!(Some("toA"), payload.metadata_utf8());

        let payload = PayloadComposer::new(MimeType::TEXT_PLAIN)
            .spec()
            .metadata_raw("toA:text data", None)
            .build()
            .unwrap();
        assert_eq!(Some("toA:text data"), payload.metadata_utf8());

        let err = PayloadComposer::new(MimeType::TEXT_PLAIN)
            .route("toA")
            .metadata_raw("x", None)
            .build()
            .unwrap_err();
        assert_eq!(
            "Composite metadata required for multiple metadata entries.",
            err.to_string()
        );

        let err = PayloadComposer::new(MimeType::TEXT_PLAIN)
            .spec()
            .metadata_raw("x", Some(MimeType::TEXT_HTML))
            .build()
            .unwrap_err();
        assert!(err.is_illegal_argument());
    }

    #[test]
    fn serialized_data_and_metadata() {
        let payload = PayloadComposer::new(MimeType::APPLICATION_JSON)
            .spec()
            .metadata(&vec![1, 2], None)
            .unwrap()
            .data(&"hi")
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(Some("[1,2]"), payload.metadata_utf8());
        assert_eq!(Some("\"hi\""), payload.data_utf8());
    }

    #[test]
    fn no_metadata() {
        let payload = PayloadComposer::new(MimeType::TEXT_PLAIN)
            .spec()
            .data_raw("data")
            .build()
            .unwrap();
        assert!(payload.metadata().is_none());
    }
}
