use rsocket_rust_metadata::error::RSocketError;
use rsocket_rust_metadata::extension::MimeType;
use thiserror::Error;

use crate::decoder::TargetType;

#[derive(Error, Debug)]
pub enum MessagingError {
    /// A configuration that cannot be satisfied, such as a rule without a decoder.
    #[error("{0}")]
    IllegalArgument(String),
    /// A configuration promise broken at use time.
    #[error("{0}")]
    IllegalState(String),
    #[error("cannot decode {mime_type} metadata as {target}: {source}")]
    Decode {
        mime_type: MimeType,
        target: TargetType,
        #[source]
        source: anyhow::Error,
    },
    #[error(transparent)]
    Codec(#[from] RSocketError),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Cbor(#[from] serde_cbor::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MessagingError {
    pub fn is_illegal_argument(&self) -> bool {
        matches!(self, MessagingError::IllegalArgument(_))
    }

    pub fn is_illegal_state(&self) -> bool {
        matches!(self, MessagingError::IllegalState(_))
    }

    pub(crate) fn decode<E>(mime_type: &MimeType, target: &TargetType, source: E) -> Self
    where
        E: Into<anyhow::Error>,
    {
        MessagingError::Decode {
            mime_type: mime_type.clone(),
            target: *target,
            source: source.into(),
        }
    }
}
