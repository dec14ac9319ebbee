mod composite;
mod mime;
mod routing;

pub use composite::{CompositeMetadata, CompositeMetadataBuilder, CompositeMetadataEntry};
pub use mime::*;
pub use routing::{RoutingMetadata, RoutingMetadataBuilder};
