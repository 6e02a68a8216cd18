/// Message decoding
///
/// Turns a raw RFC 5322 message into the UTF-8 text parts that are fed to
/// the tokenizer.

pub mod decoder;
pub mod types;

pub use decoder::MessageDecoder;
pub use types::DecodedMessage;
