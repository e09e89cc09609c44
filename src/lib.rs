pub mod decoder;
pub mod encoding;
pub mod error;
pub mod stream;

pub use decoder::{DecoderOptions, OptionValue, Result, TextDecoder};
pub use encoding::Encoding;
pub use error::DecodeError;
pub use stream::DecodeStream;
