use mail_parser::{MessageParser, MessagePart, MimeHeaders, PartType};

use super::types::DecodedMessage;
use crate::error::{Result, SpamError};

const DEFAULT_CHARSET: &str = "us-ascii";

/// Raw RFC 5322 message decoder
pub struct MessageDecoder;

impl MessageDecoder {
    /// Extract subject, plain and HTML bodies from a raw message.
    ///
    /// Every part is converted to UTF-8 using its own declared charset, and
    /// transfer encodings (base64, quoted-printable) are undone.
    pub fn decode(raw: &[u8]) -> Result<DecodedMessage> {
        if raw.is_empty() {
            return Err(SpamError::Decode("empty message".to_string()));
        }

        let message = MessageParser::default()
            .parse(raw)
            .ok_or_else(|| SpamError::Decode(format!("failed to parse message ({} bytes)", raw.len())))?;

        let charset = message
            .text_bodies()
            .chain(message.html_bodies())
            .chain(std::iter::once(message.root_part()))
            .find_map(|part| {
                part.content_type()
                    .and_then(|ct| ct.attribute("charset"))
                    .map(|cs| cs.trim().to_lowercase())
            })
            .unwrap_or_else(|| DEFAULT_CHARSET.to_string());

        let subject = message.subject().map(str::to_string);
        let plain_body = first_body(message.text_bodies(), false);
        let html_body = first_body(message.html_bodies(), true);

        Ok(DecodedMessage {
            subject,
            plain_body,
            html_body,
            charset,
        })
    }
}

/// First part whose content really is of the requested kind; the body lists
/// also carry the converted alternative when a message has only one of them.
fn first_body<'a, 'x: 'a, I>(mut parts: I, html: bool) -> Option<String>
where
    I: Iterator<Item = &'a MessagePart<'x>>,
{
    parts.find_map(|part| match (&part.body, html) {
        (PartType::Text(text), false) | (PartType::Html(text), true) => Some(text.to_string()),
        _ => None,
    })
}
