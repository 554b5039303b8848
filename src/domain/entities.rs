//! Domain entities: forum posts and their content fields

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Signature shown when a post carries no signer list.
pub const UNKNOWN_SIGNATURE: &str = "Unknown";

/// Content fields of a post, keyed by field name ("title", "review", ...).
pub type ContentMap = BTreeMap<String, ContentValue>;

/// A single content field as returned by the OpenReview v2 API.
///
/// The API wraps every field in an object with a `value` key; the value
/// itself may be a string, a list (e.g. "authors") or a number.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentValue {
    #[serde(default)]
    pub value: serde_json::Value,
}

impl ContentValue {
    /// Wrap a plain string value.
    pub fn text(value: impl Into<String>) -> Self {
        Self {
            value: serde_json::Value::String(value.into()),
        }
    }

    /// The field value as text, if it is a string.
    pub fn as_text(&self) -> Option<&str> {
        self.value.as_str()
    }

    /// The field value as a list of strings (e.g. the "authors" field).
    /// Non-string elements are skipped.
    pub fn as_text_list(&self) -> Vec<&str> {
        self.value
            .as_array()
            .map(|items| items.iter().filter_map(|v| v.as_str()).collect())
            .unwrap_or_default()
    }
}

/// Look up a content field and return its string value when present.
///
/// This is the single accessor used by the classifier and renderer; absent
/// fields and non-string values both come back as `None`.
pub fn text_value<'a>(content: &'a ContentMap, name: &str) -> Option<&'a str> {
    content.get(name).and_then(ContentValue::as_text)
}

/// One record in a discussion forum: the paper submission itself, a review,
/// a comment, a decision, etc.
///
/// Mirrors the note shape of the OpenReview v2 API. `replyto == None` marks
/// a root post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    #[serde(default)]
    pub forum: Option<String>,
    #[serde(default)]
    pub replyto: Option<String>,
    #[serde(default)]
    pub signatures: Vec<String>,
    #[serde(default)]
    pub readers: Vec<String>,
    #[serde(default)]
    pub writers: Vec<String>,
    #[serde(default)]
    pub invitations: Vec<String>,
    /// Creation time, milliseconds since the epoch. Sort key.
    #[serde(default)]
    pub cdate: i64,
    /// Modification time, when the server reports one.
    #[serde(default)]
    pub mdate: Option<i64>,
    #[serde(default)]
    pub content: ContentMap,
}

impl Post {
    /// First signer identifier, or [`UNKNOWN_SIGNATURE`] when the post
    /// carries no signatures.
    pub fn signature(&self) -> &str {
        self.signatures
            .first()
            .map(String::as_str)
            .unwrap_or(UNKNOWN_SIGNATURE)
    }

    /// String value of a content field, if present.
    pub fn text_field(&self, name: &str) -> Option<&str> {
        text_value(&self.content, name)
    }
}
