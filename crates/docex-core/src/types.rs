use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Top-level grouping of documents, as returned by the categories endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub order: i64,
}

/// Document node in summary form, as listed under a category.
///
/// Summaries carry the tree structure but no body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocSummary {
    pub slug: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub children: Vec<DocSummary>,
}

/// Document in full form, as returned by the detail endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub slug: String,
    pub title: String,
    /// Raw markup; `null` or missing bodies decode as empty.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub body: String,
}

/// JSON payload of a `[block:image]` block.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ImageBlock {
    pub images: Vec<ImageDescriptor>,
}

/// One image inside an [`ImageBlock`].
///
/// The platform encodes an image as a positional tuple
/// `[url, file name, caption]`; any member may be `null`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ImageDescriptor {
    #[serde(default)]
    pub image: Vec<Value>,
    /// Newer blocks carry the caption beside the tuple.
    #[serde(default)]
    pub caption: Option<String>,
}

impl ImageDescriptor {
    /// Remote URL of the image, if the tuple has one.
    pub fn url(&self) -> Option<&str> {
        self.image.first().and_then(Value::as_str)
    }

    /// Caption from the tuple, falling back to the sibling field, else empty.
    pub fn caption(&self) -> &str {
        self.image
            .get(2)
            .and_then(Value::as_str)
            .or(self.caption.as_deref())
            .unwrap_or_default()
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
