mod normal;

pub use normal::{Payload, PayloadBuilder};
