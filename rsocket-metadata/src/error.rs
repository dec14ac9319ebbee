use std::string::FromUtf8Error;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RSocketError {
    // Codec errors:
    #[error("this metadata is incomplete: {0}")]
    InCompleteMetadata(&'static str),
    #[error("unknown well-known MIME type: 0x{0:02X}")]
    UnknownWellKnownMime(u8),
    #[error("invalid UTF-8 in metadata: {0}")]
    Utf8(#[from] FromUtf8Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
