//! Content parts of a chat message.

use serde::de::Error as _;
use serde::ser::{Error as _, SerializeMap};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// Where image bytes come from.
///
/// Serialized in the Anthropic messages shape, e.g.
/// `{"type": "base64", "media_type": "image/png", "data": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ImageSource {
    /// Base64-encoded image bytes with their media type.
    Base64 {
        /// MIME type, e.g. "image/jpeg"
        media_type: String,
        /// Base64-encoded image data
        data: String,
    },
    /// Reference to an image by URL.
    Url {
        /// Location of the image
        url: String,
    },
}

/// One typed unit within a chat message.
///
/// Keys beside `type` and the part's payload (for example `cache_control`)
/// are kept in `extra` and written back unchanged.
///
/// # Examples
///
/// ```
/// use bedrock_relay_core::ContentPart;
///
/// let part: ContentPart = serde_json::from_str(r#"{"type":"text","text":"hi"}"#).unwrap();
/// assert_eq!(part, ContentPart::text("hi"));
///
/// // Unknown part kinds are kept verbatim.
/// let part: ContentPart = serde_json::from_str(r#"{"type":"document","id":7}"#).unwrap();
/// assert!(matches!(part, ContentPart::Passthrough(_)));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum ContentPart {
    /// Plain text.
    Text {
        /// Text content
        text: String,
        /// Other keys of the part
        extra: Map<String, Value>,
    },
    /// Image reference or inline bytes.
    Image {
        /// Image source
        source: ImageSource,
        /// Other keys of the part
        extra: Map<String, Value>,
    },
    /// Any other part kind, carried as raw JSON.
    Passthrough(Value),
}

impl ContentPart {
    /// Creates a text part.
    pub fn text(text: impl Into<String>) -> Self {
        ContentPart::Text {
            text: text.into(),
            extra: Map::new(),
        }
    }

    /// Creates an inline base64 image part.
    pub fn base64_image(media_type: impl Into<String>, data: impl Into<String>) -> Self {
        ContentPart::Image {
            source: ImageSource::Base64 {
                media_type: media_type.into(),
                data: data.into(),
            },
            extra: Map::new(),
        }
    }

    /// Returns the text of a text part.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ContentPart::Text { text, .. } => Some(text),
            _ => None,
        }
    }

    /// The JSON `type` tag of this part.
    pub fn kind(&self) -> &str {
        match self {
            ContentPart::Text { .. } => "text",
            ContentPart::Image { .. } => "image",
            ContentPart::Passthrough(value) => value
                .get("type")
                .and_then(Value::as_str)
                .unwrap_or("unknown"),
        }
    }
}

impl Serialize for ContentPart {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let (kind, key, payload, extra) = match self {
            ContentPart::Text { text, extra } => ("text", "text", Value::from(text.as_str()), extra),
            ContentPart::Image { source, extra } => (
                "image",
                "source",
                serde_json::to_value(source).map_err(S::Error::custom)?,
                extra,
            ),
            ContentPart::Passthrough(value) => return value.serialize(serializer),
        };
        let mut map = serializer.serialize_map(Some(extra.len() + 2))?;
        map.serialize_entry("type", kind)?;
        map.serialize_entry(key, &payload)?;
        for (name, value) in extra {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ContentPart {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let kind = match value.get("type") {
            Some(Value::String(kind)) => kind.clone(),
            _ => return Err(D::Error::custom("content part is missing a string `type`")),
        };
        let mut fields = match value {
            Value::Object(fields) if kind == "text" || kind == "image" => fields,
            other => return Ok(ContentPart::Passthrough(other)),
        };
        fields.remove("type");

        if kind == "text" {
            let text = match fields.remove("text") {
                Some(Value::String(text)) => text,
                _ => return Err(D::Error::custom("text part needs a string `text`")),
            };
            return Ok(ContentPart::Text { text, extra: fields });
        }

        let source = fields
            .remove("source")
            .ok_or_else(|| D::Error::missing_field("source"))?;
        let source = ImageSource::deserialize(source).map_err(D::Error::custom)?;
        Ok(ContentPart::Image { source, extra: fields })
    }
}
