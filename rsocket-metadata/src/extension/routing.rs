use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::RSocketError;
use crate::utils::Writeable;
use crate::Result;

const MAX_ROUTING_TAG_LEN: usize = 0xFF;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoutingMetadata {
    tags: Vec<String>,
}

#[derive(Debug, Default)]
pub struct RoutingMetadataBuilder {
    inner: RoutingMetadata,
}

impl RoutingMetadataBuilder {
    pub fn push_str(self, tag: &str) -> Self {
        self.push(String::from(tag))
    }

    /// # Panics
    ///
    /// Panics if the tag is longer than 255 bytes.
    pub fn push(mut self, tag: String) -> Self {
        if tag.len() > MAX_ROUTING_TAG_LEN {
            panic!("exceeded maximum routing tag length!");
        }
        self.inner.tags.push(tag);
        self
    }

    pub fn build(self) -> RoutingMetadata {
        self.inner
    }
}

impl RoutingMetadata {
    pub fn builder() -> RoutingMetadataBuilder {
        RoutingMetadataBuilder::default()
    }

    pub fn decode(bf: &mut BytesMut) -> Result<RoutingMetadata> {
        let mut raw = bf.split().freeze();
        Self::decode_bytes(&mut raw)
    }

    pub fn decode_bytes(bf: &mut Bytes) -> Result<RoutingMetadata> {
        let mut bu = RoutingMetadata::builder();
        while let Some(tag) = Self::decode_once(bf)? {
            bu = bu.push(tag);
        }
        Ok(bu.build())
    }

    pub fn get_tags(&self) -> &Vec<String> {
        &self.tags
    }

    pub fn bytes(&self) -> Bytes {
        let mut bf = BytesMut::with_capacity(self.len());
        self.write_to(&mut bf);
        bf.freeze()
    }

    fn decode_once(bf: &mut Bytes) -> Result<Option<String>> {
        if bf.is_empty() {
            return Ok(None);
        }
        let size = bf.get_u8() as usize;
        if bf.len() < size {
            return Err(RSocketError::InCompleteMetadata("require more bytes!"));
        }
        let tag = String::from_utf8(bf.split_to(size).to_vec())?;
        Ok(Some(tag))
    }
}

impl Writeable for RoutingMetadata {
    fn write_to(&self, bf: &mut BytesMut) {
        for tag in &self.tags {
            let size = tag.len() as u8;
            bf.put_u8(size);
            bf.put_slice(tag.as_bytes());
        }
    }

    fn len(&self) -> usize {
        let mut n = 0;
        for tag in &self.tags {
            n += 1 + tag.as_bytes().len();
        }
        n
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routing_metadata_codec() {
        let m = RoutingMetadata::builder()
            .push_str("/orders")
            .push_str("/orders/77778888")
            .build();
        let mut bf = BytesMut::from(&m.bytes()[..]);
        assert_eq!(m.len(), bf.len());
        assert_eq!(7, bf[0]);
        let m2 = RoutingMetadata::decode(&mut bf).unwrap();
        assert_eq!(m, m2);
    }

    #[test]
    fn decode_bytes() {
        let mut raw = tags_bytes();
        let m = RoutingMetadata::decode_bytes(&mut raw).unwrap();
        assert_eq!(vec!["toA".to_owned(), "toB".to_owned()], *m.get_tags());
        assert!(raw.is_empty());
    }

    fn tags_bytes() -> Bytes {
        RoutingMetadata::builder()
            .push_str("toA")
            .push_str("toB")
            .build()
            .bytes()
    }

    #[test]
    fn decode_truncated() {
        let mut bf = BytesMut::from(&[0x05, b'a', b'b'][..]);
        assert!(RoutingMetadata::decode(&mut bf).is_err());
    }

    #[test]
    fn decode_invalid_utf8() {
        let mut bf = BytesMut::from(&[0x02, 0xC3, 0x28][..]);
        match RoutingMetadata::decode(&mut bf) {
            Err(RSocketError::Utf8(_)) => (),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
