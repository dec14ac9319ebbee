use std::collections::LinkedList;

use bytes::{Buf, BufMut, Bytes, BytesMut};

use super::mime::MimeType;
use crate::error::RSocketError;
use crate::utils::{Writeable, U24};
use crate::Result;

const MAX_MIME_LEN: usize = 0x7F;

/// An ordered container of MIME-typed metadata entries,
/// as described by `message/x.rsocket.composite-metadata.v0`.
#[derive(Debug, Clone, Eq, PartialEq, Default)]
pub struct CompositeMetadata {
    metadatas: LinkedList<CompositeMetadataEntry>,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct CompositeMetadataEntry {
    mime_type: MimeType,
    metadata: Bytes,
}

#[derive(Debug, Default)]
pub struct CompositeMetadataBuilder {
    inner: CompositeMetadata,
}

impl CompositeMetadataBuilder {
    /// Appends an entry.
    ///
    /// # Panics
    ///
    /// Panics if a non well-known MIME type is longer than 127 bytes, or if the
    /// metadata exceeds the 24-bit length limit.
    pub fn push<A, B>(mut self, mime_type: A, metadata: B) -> Self
    where
        A: Into<MimeType>,
        B: AsRef<[u8]>,
    {
        let entry = CompositeMetadataEntry::new(mime_type.into(), Bytes::copy_from_slice(metadata.as_ref()));
        self.inner.push(entry);
        self
    }

    pub fn build(self) -> CompositeMetadata {
        self.inner
    }
}

impl CompositeMetadata {
    pub fn builder() -> CompositeMetadataBuilder {
        CompositeMetadataBuilder::default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CompositeMetadataEntry> {
        self.metadatas.iter()
    }

    pub fn len(&self) -> usize {
        self.metadatas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metadatas.is_empty()
    }

    pub fn decode(b: &mut BytesMut) -> Result<CompositeMetadata> {
        let mut raw = b.split().freeze();
        Self::decode_bytes(&mut raw)
    }

    /// Decodes without copying: entry contents are slices of `raw`.
    pub fn decode_bytes(raw: &mut Bytes) -> Result<CompositeMetadata> {
        let mut res = CompositeMetadata::default();
        while let Some(entry) = Self::decode_once(raw)? {
            res.push(entry);
        }
        Ok(res)
    }

    fn push(&mut self, metadata: CompositeMetadataEntry) {
        self.metadatas.push_back(metadata)
    }

    #[inline]
    fn decode_once(bs: &mut Bytes) -> Result<Option<CompositeMetadataEntry>> {
        if bs.is_empty() {
            return Ok(None);
        }
        let first: u8 = bs.get_u8();
        let mime_type = if 0x80 & first != 0 {
            // Well
            let n = first & 0x7F;
            MimeType::parse(n).ok_or(RSocketError::UnknownWellKnownMime(n))?
        } else {
            // Bad
            let mime_len = first as usize;
            if bs.len() < mime_len {
                return Err(RSocketError::InCompleteMetadata("broken MIME type"));
            }
            let front = bs.split_to(mime_len);
            MimeType::from(String::from_utf8(front.to_vec())?)
        };

        let metadata_len = U24::read_advance(bs)
            .ok_or(RSocketError::InCompleteMetadata("broken metadata length"))?
            as usize;
        if bs.len() < metadata_len {
            return Err(RSocketError::InCompleteMetadata("broken metadata content"));
        }
        let metadata = bs.split_to(metadata_len);
        trace!("decode composite metadata entry: mime_type={}, len={}", mime_type, metadata_len);
        Ok(Some(CompositeMetadataEntry::new(mime_type, metadata)))
    }
}

impl Writeable for CompositeMetadata {
    fn write_to(&self, bf: &mut BytesMut) {
        for it in self.iter() {
            it.write_to(bf);
        }
    }

    fn len(&self) -> usize {
        self.iter().map(|it| it.len()).sum()
    }
}

impl CompositeMetadataEntry {
    /// # Panics
    ///
    /// Panics if a non well-known MIME type is longer than 127 bytes, or if the
    /// metadata exceeds the 24-bit length limit.
    pub fn new(mime_type: MimeType, metadata: Bytes) -> CompositeMetadataEntry {
        if let MimeType::Normal(s) = &mime_type {
            if s.len() > MAX_MIME_LEN {
                panic!("too large MIME type!");
            }
        }
        if metadata.len() > U24::max() {
            panic!("too large metadata!");
        }
        CompositeMetadataEntry {
            mime_type,
            metadata,
        }
    }

    pub fn get_mime_type(&self) -> &MimeType {
        &self.mime_type
    }

    pub fn get_metadata(&self) -> &Bytes {
        &self.metadata
    }

    pub fn get_metadata_utf8(&self) -> Option<&str> {
        std::str::from_utf8(&self.metadata).ok()
    }
}

impl Writeable for CompositeMetadataEntry {
    fn write_to(&self, bf: &mut BytesMut) {
        match &self.mime_type {
            MimeType::WellKnown(n) => {
                bf.put_u8(0x80 | n);
            }
            MimeType::Normal(s) => {
                bf.put_u8(s.len() as u8);
                bf.put_slice(s.as_bytes());
            }
        };
        U24::write(self.metadata.len() as u32, bf);
        bf.put_slice(&self.metadata);
    }

    fn len(&self) -> usize {
        let mime_len = match &self.mime_type {
            MimeType::WellKnown(_) => 1,
            MimeType::Normal(s) => 1 + s.len(),
        };
        mime_len + 3 + self.metadata.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_well_known_entry() {
        let c = CompositeMetadata::builder()
            .push(MimeType::TEXT_PLAIN, "hi")
            .build();
        let mut bf = BytesMut::new();
        c.write_to(&mut bf);
        assert_eq!("a1000002".to_owned() + &hex::encode("hi"), hex::encode(&bf));
        assert_eq!(bf.len(), c.len());
    }

    #[test]
    fn encode_custom_entry() {
        let c = CompositeMetadata::builder()
            .push("application/x.foo", b"ab")
            .build();
        let mut bf = BytesMut::new();
        c.write_to(&mut bf);
        assert_eq!(17, bf[0]);
        assert_eq!(b"application/x.foo", &bf[1..18]);
        assert_eq!(&[0, 0, 2, b'a', b'b'], &bf[18..]);
        assert_eq!(bf.len(), c.len());
    }

    #[test]
    fn decode_preserves_order() {
        let c = CompositeMetadata::builder()
            .push(MimeType::TEXT_PLAIN, "1")
            .push(MimeType::TEXT_HTML, "2")
            .push(MimeType::TEXT_PLAIN, "3")
            .build();
        let mut bf = BytesMut::new();
        c.write_to(&mut bf);
        let c2 = CompositeMetadata::decode(&mut bf).unwrap();
        let got: Vec<_> = c2
            .iter()
            .map(|it| it.get_metadata_utf8().unwrap().to_owned())
            .collect();
        assert_eq!(vec!["1", "2", "3"], got);
        assert_eq!(c, c2);
    }

    #[test]
    fn decode_broken() {
        // truncated content
        let mut bf = BytesMut::from(&hex::decode("a1000005414243").unwrap()[..]);
        assert!(CompositeMetadata::decode(&mut bf).is_err());
        // truncated length
        let mut bf = BytesMut::from(&hex::decode("a10000").unwrap()[..]);
        assert!(CompositeMetadata::decode(&mut bf).is_err());
        // truncated MIME string
        let mut bf = BytesMut::from(&hex::decode("0a7465").unwrap()[..]);
        assert!(CompositeMetadata::decode(&mut bf).is_err());
        // reserved well-known id
        let mut bf = BytesMut::from(&hex::decode("d0000000").unwrap()[..]);
        match CompositeMetadata::decode(&mut bf) {
            Err(RSocketError::UnknownWellKnownMime(0x50)) => (),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn decode_bytes_shares_buffer() {
        let c = CompositeMetadata::builder()
            .push(MimeType::TEXT_PLAIN, "hello")
            .build();
        let mut bf = BytesMut::new();
        c.write_to(&mut bf);
        let raw = bf.freeze();
        let mut input = raw.clone();
        let c2 = CompositeMetadata::decode_bytes(&mut input).unwrap();
        assert!(input.is_empty());
        let entry = c2.iter().next().unwrap();
        assert_eq!(Some("hello"), entry.get_metadata_utf8());
        // the entry points into the original buffer
        assert_eq!(raw[4..].as_ptr(), entry.get_metadata().as_ptr());
    }

    #[test]
    fn decode_empty() {
        let mut bf = BytesMut::new();
        assert!(CompositeMetadata::decode(&mut bf).unwrap().is_empty());
    }
}
