//! Media references and slot descriptors
//!
//! A slot is a named position for media inside a resource ("images", "logo",
//! "video", "blockMedia_3"). Resources declare their slots as static data and the
//! upload pipeline works from those descriptors alone.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const IMAGE_CONTENT_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif", "image/webp"];
pub const VIDEO_CONTENT_TYPES: &[&str] = &["video/mp4", "video/webm", "video/quicktime"];

/// Kind of remotely hosted content, decides folder and resource type on the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
    File,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
            MediaKind::File => "file",
        }
    }
}

/// A persisted URL plus the kind of content it points at.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MediaReference {
    pub url: String,
    pub kind: MediaKind,
}

impl MediaReference {
    pub fn new(url: impl Into<String>, kind: MediaKind) -> Self {
        Self {
            url: url.into(),
            kind,
        }
    }

    pub fn image(url: impl Into<String>) -> Self {
        Self::new(url, MediaKind::Image)
    }

    pub fn video(url: impl Into<String>) -> Self {
        Self::new(url, MediaKind::Video)
    }

    pub fn file(url: impl Into<String>) -> Self {
        Self::new(url, MediaKind::File)
    }
}

/// What a slot accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    Image,
    Video,
    Attachment,
    ImageOrVideo,
}

impl SlotKind {
    /// Whether a file with this MIME type may be placed in the slot.
    pub fn accepts(&self, content_type: &str) -> bool {
        let ct = normalize_mime_type(content_type);
        match self {
            SlotKind::Image => IMAGE_CONTENT_TYPES.contains(&ct.as_str()),
            SlotKind::Video => VIDEO_CONTENT_TYPES.contains(&ct.as_str()),
            SlotKind::Attachment => true,
            SlotKind::ImageOrVideo => {
                IMAGE_CONTENT_TYPES.contains(&ct.as_str())
                    || VIDEO_CONTENT_TYPES.contains(&ct.as_str())
            }
        }
    }

    /// Kind the uploaded file is stored as.
    pub fn media_kind(&self, content_type: &str) -> MediaKind {
        let ct = normalize_mime_type(content_type);
        match self {
            SlotKind::Image => MediaKind::Image,
            SlotKind::Video => MediaKind::Video,
            SlotKind::Attachment => MediaKind::File,
            SlotKind::ImageOrVideo if ct.starts_with("video/") => MediaKind::Video,
            SlotKind::ImageOrVideo => MediaKind::Image,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    /// At most one file, stored as a nullable URL
    One,
    /// An ordered URL list
    Many { max: usize },
    /// Family of fields `{field}_{index}`, one file each
    Indexed,
}

/// Static descriptor of one media slot on a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaSlot {
    pub field: &'static str,
    pub kind: SlotKind,
    pub cardinality: Cardinality,
    pub required: bool,
}

impl MediaSlot {
    pub const fn one(field: &'static str, kind: SlotKind) -> Self {
        Self {
            field,
            kind,
            cardinality: Cardinality::One,
            required: false,
        }
    }

    pub const fn many(field: &'static str, kind: SlotKind, max: usize) -> Self {
        Self {
            field,
            kind,
            cardinality: Cardinality::Many { max },
            required: false,
        }
    }

    pub const fn indexed(prefix: &'static str, kind: SlotKind) -> Self {
        Self {
            field: prefix,
            kind,
            cardinality: Cardinality::Indexed,
            required: false,
        }
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Whether a multipart field name belongs to this slot; returns the block index
    /// for indexed slots.
    pub fn matches(&self, name: &str) -> Option<Option<usize>> {
        match self.cardinality {
            Cardinality::Indexed => name
                .strip_prefix(self.field)
                .and_then(|rest| rest.strip_prefix('_'))
                .and_then(|idx| idx.parse::<usize>().ok())
                .map(Some),
            _ if name == self.field || name.strip_suffix("[]") == Some(self.field) => Some(None),
            _ => None,
        }
    }

    /// Form flag signalling that the client changed this slot (`imagesChanged`).
    pub fn changed_flag(&self) -> String {
        format!("{}Changed", self.field)
    }

    /// Form field carrying the URLs the client keeps (`existingImages`).
    pub fn existing_field(&self) -> String {
        let mut chars = self.field.chars();
        match chars.next() {
            Some(first) => format!("existing{}{}", first.to_uppercase(), chars.as_str()),
            None => "existing".to_string(),
        }
    }
}

/// Resolved value of a slot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SlotValue {
    #[default]
    Empty,
    One(String),
    Many(Vec<String>),
    Indexed(BTreeMap<usize, String>),
}

impl SlotValue {
    pub fn urls(&self) -> Vec<&str> {
        match self {
            SlotValue::Empty => Vec::new(),
            SlotValue::One(url) => vec![url.as_str()],
            SlotValue::Many(urls) => urls.iter().map(String::as_str).collect(),
            SlotValue::Indexed(map) => map.values().map(String::as_str).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.urls().is_empty()
    }

    pub fn into_option(self) -> Option<String> {
        match self {
            SlotValue::One(url) => Some(url),
            SlotValue::Many(urls) => urls.into_iter().next(),
            SlotValue::Indexed(map) => map.into_values().next(),
            SlotValue::Empty => None,
        }
    }

    pub fn into_vec(self) -> Vec<String> {
        match self {
            SlotValue::Empty => Vec::new(),
            SlotValue::One(url) => vec![url],
            SlotValue::Many(urls) => urls,
            SlotValue::Indexed(map) => map.into_values().collect(),
        }
    }

    pub fn into_indexed(self) -> BTreeMap<usize, String> {
        match self {
            SlotValue::Indexed(map) => map,
            other => other.into_vec().into_iter().enumerate().collect(),
        }
    }
}

impl From<Option<String>> for SlotValue {
    fn from(value: Option<String>) -> Self {
        value.map(SlotValue::One).unwrap_or_default()
    }
}

impl From<Vec<String>> for SlotValue {
    fn from(value: Vec<String>) -> Self {
        SlotValue::Many(value)
    }
}

/// Strip parameters and normalize common aliases (`image/jpg` is sent by some browsers).
pub fn normalize_mime_type(content_type: &str) -> String {
    let base = content_type
        .split(';')
        .next()
        .unwrap_or(content_type)
        .trim()
        .to_lowercase();
    match base.as_str() {
        "image/jpg" | "image/pjpeg" => "image/jpeg".to_string(),
        "image/x-png" => "image/png".to_string(),
        _ => base,
    }
}
