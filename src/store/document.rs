use bytes::Bytes;
use chrono::{DateTime, Utc};
use sha1::{Digest, Sha1};

/// Snapshot of the shared text.
///
/// `signature` is always the hex SHA-1 of `body`; both are only ever set
/// together through [`Document::new`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Document {
    pub body: Bytes,
    pub signature: String,
    pub updated_at: DateTime<Utc>,
}

impl Document {
    pub fn new(body: impl Into<Bytes>) -> Self {
        let body = body.into();
        let signature = signature_of(&body);
        Self {
            body,
            signature,
            updated_at: Utc::now(),
        }
    }

    /// Body as text, replacing invalid UTF-8 sequences
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Content signature used by clients for staleness checks
pub fn signature_of(body: &[u8]) -> String {
    hex::encode(Sha1::digest(body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_is_sha1_hex() {
        assert_eq!(
            signature_of(b"Hello World"),
            "0a4d55a8d778e5022fab701977c5d840bbc486d0"
        );
    }

    #[test]
    fn test_new_document_signature_matches_body() {
        let doc = Document::new("Hello Mars");
        assert_eq!(doc.signature, signature_of(b"Hello Mars"));
        assert_eq!(doc.body_text(), "Hello Mars");
    }

    #[test]
    fn test_body_text_is_lossy() {
        let doc = Document::new(vec![0x48, 0xff, 0x69]);
        assert_eq!(doc.body_text(), "H\u{fffd}i");
        assert_eq!(doc.signature.len(), 40);
    }
}
