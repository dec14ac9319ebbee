use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use rsocket_rust_metadata::extension::{CompositeMetadata, MimeType, RoutingMetadata};
use rsocket_rust_metadata::Payload;

use crate::decoder::{Decoder, TargetType, Value};
use crate::error::MessagingError;
use crate::map::MetadataMap;
use crate::Result;

/// Key under which the route of a payload is stored.
pub const ROUTE_KEY: &str = "route";

pub const ROUTING: MimeType = MimeType::ROUTING;

pub const COMPOSITE_METADATA: MimeType = MimeType::COMPOSITE_METADATA;

/// Extracts named values from the metadata of a payload.
pub trait MetadataExtractor: Send + Sync {
    /// Decodes the metadata of `payload`, described by `metadata_mime_type`.
    ///
    /// Composite metadata is split into its entries first. Entries whose MIME
    /// type has no registered rule are ignored.
    fn extract(&self, payload: &Payload, metadata_mime_type: &MimeType) -> Result<MetadataMap>;
}

type Merge = Box<dyn Fn(Value, &mut MetadataMap) -> Result<()> + Send + Sync>;

enum Action {
    Key(String),
    Merge(Merge),
}

struct EntryProcessor {
    mime_type: MimeType,
    target: TargetType,
    action: Action,
}

impl EntryProcessor {
    fn process(&self, value: Value, result: &mut MetadataMap) -> Result<()> {
        match &self.action {
            Action::Key(key) => {
                result.insert_boxed(key.clone(), value);
                Ok(())
            }
            Action::Merge(f) => f(value, result),
        }
    }
}

impl fmt::Debug for EntryProcessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let action = match &self.action {
            Action::Key(k) => k.as_str(),
            Action::Merge(_) => "<fn>",
        };
        f.debug_struct("EntryProcessor")
            .field("mime_type", &self.mime_type)
            .field("target", &self.target)
            .field("action", &action)
            .finish()
    }
}

/// Decoder-driven [`MetadataExtractor`].
///
/// Configure it once with [`set_decoders`](Self::set_decoders) and the
/// `metadata_to_extract*` methods, then share it for extraction. Out of the
/// box, routing metadata yields its first tag under [`ROUTE_KEY`].
///
/// ```
/// use std::sync::Arc;
/// use rsocket_rust_metadata::extension::MimeType;
/// use rsocket_rust_metadata::Payload;
/// use rsocket_rust_messaging::{DefaultMetadataExtractor, MetadataExtractor, StringDecoder};
///
/// let mut extractor = DefaultMetadataExtractor::new(vec![Arc::new(StringDecoder::all_mime_types())]);
/// extractor
///     .metadata_to_extract::<String, _, _>(MimeType::TEXT_PLAIN, "text-entry")
///     .unwrap();
///
/// let payload = Payload::builder().set_metadata_utf8("hello").build();
/// let result = extractor.extract(&payload, &MimeType::TEXT_PLAIN).unwrap();
/// assert_eq!(Some("hello"), result.get_str("text-entry"));
/// ```
#[derive(Default)]
pub struct DefaultMetadataExtractor {
    decoders: Vec<Arc<dyn Decoder>>,
    registrations: HashMap<MimeType, EntryProcessor>,
}

impl fmt::Debug for DefaultMetadataExtractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefaultMetadataExtractor")
            .field("decoders", &self.decoders.len())
            .field("registrations", &self.registrations)
            .finish()
    }
}

impl DefaultMetadataExtractor {
    pub fn new(decoders: Vec<Arc<dyn Decoder>>) -> DefaultMetadataExtractor {
        DefaultMetadataExtractor {
            decoders,
            registrations: HashMap::new(),
        }
    }

    pub fn builder() -> ExtractorBuilder {
        ExtractorBuilder::default()
    }

    pub fn decoders(&self) -> &[Arc<dyn Decoder>] {
        &self.decoders
    }

    /// Replaces the decoders.
    ///
    /// Every registered rule must still be served by one of the new decoders,
    /// otherwise this fails with [`MessagingError::IllegalArgument`] and the
    /// current decoders stay in place.
    pub fn set_decoders(&mut self, decoders: Vec<Arc<dyn Decoder>>) -> Result<()> {
        for p in self.registrations.values() {
            if find_decoder(&decoders, &p.target, &p.mime_type).is_none() {
                return Err(MessagingError::IllegalArgument(no_decoder_for(p)));
            }
        }
        debug!("replace metadata decoders: count={}", decoders.len());
        self.decoders = decoders;
        Ok(())
    }

    /// Decodes entries of `mime_type` to `T` and stores them under `key`.
    pub fn metadata_to_extract<T, M, K>(&mut self, mime_type: M, key: K) -> Result<()>
    where
        T: Any + Send + Sync,
        M: Into<MimeType>,
        K: Into<String>,
    {
        self.register(mime_type.into(), TargetType::of::<T>(), Action::Key(key.into()))
    }

    /// Decodes entries of `mime_type` to `T` and lets `f` merge the value
    /// into the result however it likes.
    pub fn metadata_to_extract_with<T, M, F>(&mut self, mime_type: M, f: F) -> Result<()>
    where
        T: Any + Send + Sync,
        M: Into<MimeType>,
        F: Fn(T, &mut MetadataMap) -> Result<()> + Send + Sync + 'static,
    {
        let target = TargetType::of::<T>();
        let merge: Merge = Box::new(move |value: Value, result: &mut MetadataMap| match value.downcast::<T>() {
            Ok(v) => f(*v, result),
            Err(_) => Err(MessagingError::IllegalState(format!(
                "Decoded metadata is not of type {}",
                target
            ))),
        });
        self.register(mime_type.into(), target, Action::Merge(merge))
    }

    fn register(&mut self, mime_type: MimeType, target: TargetType, action: Action) -> Result<()> {
        let mime_type = normalize(mime_type);
        // Rules may be registered before any decoder; set_decoders validates them later.
        if !self.decoders.is_empty() && find_decoder(&self.decoders, &target, &mime_type).is_none() {
            return Err(MessagingError::IllegalArgument(format!(
                "No decoder for {}",
                mime_type
            )));
        }
        debug!(
            "register metadata to extract: mime_type={}, target={}",
            mime_type, target
        );
        let p = EntryProcessor {
            mime_type: mime_type.clone(),
            target,
            action,
        };
        self.registrations.insert(mime_type, p);
        Ok(())
    }

    fn extract_entry(
        &self,
        content: &Bytes,
        mime_type: &MimeType,
        result: &mut MetadataMap,
    ) -> Result<()> {
        if content.is_empty() {
            return Ok(());
        }
        if let Some(p) = self.registrations.get(mime_type) {
            let decoder = find_decoder(&self.decoders, &p.target, &p.mime_type)
                .ok_or_else(|| MessagingError::IllegalState(no_decoder_for(p)))?;
            let value = decoder.decode(content, &p.target, mime_type)?;
            return p.process(value, result);
        }
        if *mime_type == ROUTING {
            let routing = RoutingMetadata::decode_bytes(&mut content.clone())?;
            if let Some(route) = routing.get_tags().first() {
                result.insert(ROUTE_KEY, route.clone());
            }
            return Ok(());
        }
        trace!("skip metadata entry without rule: mime_type={}", mime_type);
        Ok(())
    }
}

impl MetadataExtractor for DefaultMetadataExtractor {
    fn extract(&self, payload: &Payload, metadata_mime_type: &MimeType) -> Result<MetadataMap> {
        let mut result = MetadataMap::new();
        let metadata = match payload.metadata() {
            Some(m) => m,
            None => return Ok(result),
        };
        let metadata_mime_type = normalize(metadata_mime_type.clone());
        if metadata_mime_type == COMPOSITE_METADATA {
            let composite = CompositeMetadata::decode_bytes(&mut metadata.clone())?;
            for entry in composite.iter() {
                self.extract_entry(entry.get_metadata(), entry.get_mime_type(), &mut result)?;
            }
        } else {
            self.extract_entry(metadata, &metadata_mime_type, &mut result)?;
        }
        Ok(result)
    }
}

/// Collects decoders and rules, then validates every rule against the
/// decoders at once.
#[derive(Default)]
pub struct ExtractorBuilder {
    decoders: Vec<Arc<dyn Decoder>>,
    rules: Vec<Box<dyn FnOnce(&mut DefaultMetadataExtractor) -> Result<()>>>,
}

impl ExtractorBuilder {
    pub fn decoder<D>(mut self, decoder: D) -> Self
    where
        D: Decoder + 'static,
    {
        self.decoders.push(Arc::new(decoder));
        self
    }

    pub fn metadata_to_extract<T, M, K>(mut self, mime_type: M, key: K) -> Self
    where
        T: Any + Send + Sync,
        M: Into<MimeType>,
        K: Into<String>,
    {
        let mime_type = mime_type.into();
        let key = key.into();
        self.rules
            .push(Box::new(move |it: &mut DefaultMetadataExtractor| it.metadata_to_extract::<T, _, _>(mime_type, key)));
        self
    }

    pub fn metadata_to_extract_with<T, M, F>(mut self, mime_type: M, f: F) -> Self
    where
        T: Any + Send + Sync,
        M: Into<MimeType>,
        F: Fn(T, &mut MetadataMap) -> Result<()> + Send + Sync + 'static,
    {
        let mime_type = mime_type.into();
        self.rules
            .push(Box::new(move |it: &mut DefaultMetadataExtractor| it.metadata_to_extract_with::<T, _, _>(mime_type, f)));
        self
    }

    pub fn build(self) -> Result<DefaultMetadataExtractor> {
        let mut extractor = DefaultMetadataExtractor::default();
        for rule in self.rules {
            rule(&mut extractor)?;
        }
        extractor.set_decoders(self.decoders)?;
        Ok(extractor)
    }
}

impl fmt::Debug for ExtractorBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractorBuilder")
            .field("decoders", &self.decoders.len())
            .field("rules", &self.rules.len())
            .finish()
    }
}

fn find_decoder<'a>(
    decoders: &'a [Arc<dyn Decoder>],
    target: &TargetType,
    mime_type: &MimeType,
) -> Option<&'a Arc<dyn Decoder>> {
    decoders.iter().find(|it| it.can_decode(target, mime_type))
}

fn no_decoder_for(p: &EntryProcessor) -> String {
    format!(
        "No decoder for metadata entry mimeType={}, targetType={}",
        p.mime_type, p.target
    )
}

fn normalize(mime_type: MimeType) -> MimeType {
    match mime_type {
        MimeType::Normal(s) => MimeType::from(s),
        well => well,
    }
}
