use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::store::Document;

/// The shared text and its signature
#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TextDocumentResponse {
    pub body: String,
    pub sig: String,
    pub updated_at: DateTime<Utc>,
}

impl From<&Document> for TextDocumentResponse {
    fn from(doc: &Document) -> Self {
        Self {
            body: doc.body_text(),
            sig: doc.signature.clone(),
            updated_at: doc.updated_at,
        }
    }
}

/// Request payload for replacing the text
#[derive(Serialize, Deserialize, ToSchema)]
pub struct TextUpdateRequest {
    pub body: String,
}

/// Response returned after a successful write
#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct TextUpdateResponse {
    pub status: String,
    pub sig: String,
    pub delivered: u32,
    pub skipped: u32,
}

/// Long-poll request; `sig` is the signature of the copy the client holds
#[derive(Serialize, Deserialize, ToSchema, Default)]
pub struct TextListenRequest {
    pub sig: Option<String>,
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ListenOutcome {
    /// A newer text is attached
    Document,
    /// The caller wrote the change itself
    Ack,
    /// Nothing changed before the wait limit
    Timeout,
}

/// Response to a long-poll
#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TextListenResponse {
    #[serde(rename = "type")]
    pub kind: ListenOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sig: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl TextListenResponse {
    pub fn document(doc: &Document) -> Self {
        Self {
            kind: ListenOutcome::Document,
            body: Some(doc.body_text()),
            sig: Some(doc.signature.clone()),
            updated_at: Some(doc.updated_at),
        }
    }

    pub fn ack() -> Self {
        Self::bare(ListenOutcome::Ack)
    }

    pub fn timeout() -> Self {
        Self::bare(ListenOutcome::Timeout)
    }

    fn bare(kind: ListenOutcome) -> Self {
        Self {
            kind,
            body: None,
            sig: None,
            updated_at: None,
        }
    }
}
