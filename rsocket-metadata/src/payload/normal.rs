use bytes::Bytes;

/// Data and metadata of a single RSocket message.
///
/// Both buffers are reference counted; dropping the payload releases them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Payload {
    m: Option<Bytes>,
    d: Option<Bytes>,
}

#[derive(Debug)]
pub struct PayloadBuilder {
    value: Payload,
}

impl PayloadBuilder {
    fn new() -> PayloadBuilder {
        PayloadBuilder {
            value: Payload::default(),
        }
    }

    pub fn set_data<A>(mut self, data: A) -> Self
    where
        A: Into<Bytes>,
    {
        self.value.d = Some(data.into());
        self
    }

    pub fn set_metadata<A>(mut self, metadata: A) -> Self
    where
        A: Into<Bytes>,
    {
        self.value.m = Some(metadata.into());
        self
    }

    pub fn set_metadata_utf8(mut self, metadata: &str) -> Self {
        self.value.m = Some(Bytes::from(metadata.to_owned()));
        self
    }

    pub fn set_data_utf8(mut self, data: &str) -> Self {
        self.value.d = Some(Bytes::from(data.to_owned()));
        self
    }

    pub fn build(self) -> Payload {
        self.value
    }
}

impl Payload {
    pub fn new(data: Option<Bytes>, metadata: Option<Bytes>) -> Payload {
        Payload {
            d: data,
            m: metadata,
        }
    }

    pub fn builder() -> PayloadBuilder {
        PayloadBuilder::new()
    }

    pub fn metadata(&self) -> Option<&Bytes> {
        self.m.as_ref()
    }

    pub fn data(&self) -> Option<&Bytes> {
        self.d.as_ref()
    }

    pub fn data_utf8(&self) -> Option<&str> {
        self.d.as_ref().and_then(|raw| std::str::from_utf8(raw).ok())
    }

    pub fn metadata_utf8(&self) -> Option<&str> {
        self.m.as_ref().and_then(|raw| std::str::from_utf8(raw).ok())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn len(&self) -> usize {
        let mut n = 0;
        if let Some(it) = &self.m {
            n += it.len();
        }
        if let Some(it) = &self.d {
            n += it.len();
        }
        n
    }

    /// Splits into `(data, metadata)`.
    pub fn split(self) -> (Option<Bytes>, Option<Bytes>) {
        (self.d, self.m)
    }
}

impl From<&'static str> for Payload {
    fn from(data: &'static str) -> Payload {
        Payload {
            d: Some(Bytes::from(data)),
            m: None,
        }
    }
}

impl From<(&'static str, &'static str)> for Payload {
    fn from((data, metadata): (&'static str, &'static str)) -> Payload {
        Payload {
            d: Some(Bytes::from(data)),
            m: Some(Bytes::from(metadata)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_payload() {
        let p = Payload::builder()
            .set_data_utf8("data")
            .set_metadata(vec![0xFFu8, 0xFE])
            .build();
        assert_eq!(Some("data"), p.data_utf8());
        assert_eq!(None, p.metadata_utf8());
        assert_eq!(6, p.len());
        let (d, m) = p.split();
        assert_eq!(Some(Bytes::from("data")), d);
        assert_eq!(Some(Bytes::from(vec![0xFFu8, 0xFE])), m);
    }

    #[test]
    fn from_tuple() {
        let p = Payload::from(("data", "metadata"));
        assert_eq!(Some("metadata"), p.metadata_utf8());
        assert!(!Payload::from("x").is_empty());
        assert!(Payload::default().is_empty());
    }
}
