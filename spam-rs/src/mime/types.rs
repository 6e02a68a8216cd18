/// Text content extracted from a raw message, normalized to UTF-8
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedMessage {
    /// Subject header (RFC 2047 words decoded)
    pub subject: Option<String>,
    /// First text/plain body
    pub plain_body: Option<String>,
    /// First text/html body
    pub html_body: Option<String>,
    /// Charset declared by the message, lowercased ("us-ascii" when absent)
    pub charset: String,
}

impl DecodedMessage {
    /// True when no text part was found
    pub fn is_empty(&self) -> bool {
        self.subject.is_none() && self.plain_body.is_none() && self.html_body.is_none()
    }
}
