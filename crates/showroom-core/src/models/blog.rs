use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::form::FormFields;
use crate::media::{MediaKind, MediaReference, MediaSlot, SlotKind, SlotValue};
use crate::resource::{infer_kind, required_bool, required_list, Document, Draft, Patch};

pub const BLOCK_MEDIA_PREFIX: &str = "blockMedia";

pub const BLOG_SLOTS: &[MediaSlot] = &[
    MediaSlot::one("blogImage", SlotKind::Image),
    MediaSlot::indexed(BLOCK_MEDIA_PREFIX, SlotKind::ImageOrVideo),
];

const REQUIRED_FIELDS: &[&str] = &["writerName", "blogTitle", "blogContent"];
const MAX_BLOCKS: usize = 100;

/// One section of a blog body. Media is attached through the `blockMedia_{index}`
/// file field; URLs sent by the client are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentBlock {
    #[serde(rename = "type", default = "default_block_type")]
    pub block_type: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<MediaKind>,
    /// Drop inherited media on update
    #[serde(default, skip_serializing)]
    pub remove_media: bool,
}

fn default_block_type() -> String {
    "paragraph".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Blog {
    pub id: Uuid,
    pub writer_name: String,
    pub blog_title: String,
    pub categories: Vec<String>,
    pub blog_content: String,
    #[cfg_attr(feature = "sqlx", sqlx(json))]
    pub content_blocks: Vec<ContentBlock>,
    pub list_on_website: bool,
    pub blog_image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn block_media(blocks: &[ContentBlock]) -> BTreeMap<usize, String> {
    blocks
        .iter()
        .enumerate()
        .filter_map(|(i, b)| b.media_url.clone().map(|url| (i, url)))
        .collect()
}

impl Document for Blog {
    const NAME: &'static str = "Blog";
    const SLOTS: &'static [MediaSlot] = BLOG_SLOTS;

    fn id(&self) -> Uuid {
        self.id
    }

    fn slot_value(&self, field: &str) -> SlotValue {
        match field {
            "blogImage" => self.blog_image_url.clone().into(),
            BLOCK_MEDIA_PREFIX => SlotValue::Indexed(block_media(&self.content_blocks)),
            _ => SlotValue::Empty,
        }
    }

    fn media(&self) -> Vec<MediaReference> {
        let mut refs: Vec<MediaReference> = self
            .blog_image_url
            .iter()
            .map(MediaReference::image)
            .collect();
        refs.extend(self.content_blocks.iter().filter_map(|b| {
            b.media_url.as_ref().map(|url| {
                let kind = b
                    .media_type
                    .unwrap_or_else(|| infer_kind(SlotKind::ImageOrVideo, url));
                MediaReference::new(url.clone(), kind)
            })
        }));
        refs
    }
}

/// Parse the `contentBlocks` JSON field, discarding client-supplied media.
fn parse_blocks(form: &FormFields) -> Result<Option<Vec<ContentBlock>>, AppError> {
    let Some(raw) = form.text("contentBlocks") else {
        return Ok(None);
    };
    let mut blocks: Vec<ContentBlock> = serde_json::from_str(&raw).map_err(|_| {
        AppError::InvalidInput("contentBlocks must be a JSON array of blocks".to_string())
    })?;
    if blocks.len() > MAX_BLOCKS {
        return Err(AppError::InvalidInput(format!(
            "A blog can have at most {} content blocks",
            MAX_BLOCKS
        )));
    }
    for block in &mut blocks {
        block.media_url = None;
        block.media_type = None;
    }
    Ok(Some(blocks))
}

fn attach(block: &mut ContentBlock, url: String) {
    block.media_type = Some(infer_kind(SlotKind::ImageOrVideo, &url));
    block.media_url = Some(url);
}

#[derive(Debug, Clone, Default)]
pub struct BlogDraft {
    pub writer_name: String,
    pub blog_title: String,
    pub categories: Vec<String>,
    pub blog_content: String,
    pub content_blocks: Vec<ContentBlock>,
    pub list_on_website: bool,
    pub blog_image_url: Option<String>,
}

impl Draft for BlogDraft {
    fn from_form(form: &FormFields) -> Result<Self, AppError> {
        form.require(REQUIRED_FIELDS)?;
        let list_on_website = required_bool(form, "listOnWebsite")?;
        let categories = required_list(form, "categories")?;
        let text = |name: &str| form.text(name).unwrap_or_default();

        Ok(BlogDraft {
            writer_name: text("writerName"),
            blog_title: text("blogTitle"),
            categories,
            blog_content: text("blogContent"),
            content_blocks: parse_blocks(form)?.unwrap_or_default(),
            list_on_website,
            blog_image_url: None,
        })
    }

    fn set_slot(&mut self, field: &str, value: SlotValue) {
        match field {
            "blogImage" => self.blog_image_url = value.into_option(),
            BLOCK_MEDIA_PREFIX => {
                for (index, url) in value.into_indexed() {
                    if let Some(block) = self.content_blocks.get_mut(index) {
                        attach(block, url);
                    }
                }
            }
            _ => {}
        }
    }

    fn indexed_capacity(&self, field: &str) -> Option<usize> {
        (field == BLOCK_MEDIA_PREFIX).then_some(self.content_blocks.len())
    }
}

#[derive(Debug, Clone, Default)]
pub struct BlogPatch {
    pub writer_name: Option<String>,
    pub blog_title: Option<String>,
    pub categories: Option<Vec<String>>,
    pub blog_content: Option<String>,
    pub content_blocks: Option<Vec<ContentBlock>>,
    pub list_on_website: Option<bool>,
    pub blog_image_url: Option<Option<String>>,
}

impl Patch<Blog> for BlogPatch {
    fn from_form(form: &FormFields) -> Result<Self, AppError> {
        let categories = match form.list("categories")? {
            Some(list) if list.is_empty() => {
                return Err(AppError::InvalidInput(
                    "At least one category is required".to_string(),
                ))
            }
            other => other,
        };

        Ok(BlogPatch {
            writer_name: form.text("writerName"),
            blog_title: form.text("blogTitle"),
            categories,
            blog_content: form.text("blogContent"),
            content_blocks: parse_blocks(form)?,
            list_on_website: form.bool("listOnWebsite")?,
            blog_image_url: None,
        })
    }

    fn set_slot(&mut self, field: &str, value: SlotValue, existing: &Blog) {
        match field {
            "blogImage" => self.blog_image_url = Some(value.into_option()),
            BLOCK_MEDIA_PREFIX => {
                let uploads = value.into_indexed();
                let mut blocks = match self.content_blocks.take() {
                    Some(blocks) => blocks,
                    None if uploads.is_empty() => return,
                    None => existing.content_blocks.clone(),
                };

                for (index, block) in blocks.iter_mut().enumerate() {
                    if let Some(url) = uploads.get(&index) {
                        attach(block, url.clone());
                    } else if block.remove_media {
                        block.media_url = None;
                        block.media_type = None;
                    } else if let Some(previous) = existing.content_blocks.get(index) {
                        if previous.media_url.is_some() {
                            block.media_url = previous.media_url.clone();
                            block.media_type = previous.media_type;
                        }
                    }
                }
                self.content_blocks = Some(blocks);
            }
            _ => {}
        }
    }

    fn indexed_capacity(&self, field: &str, existing: &Blog) -> Option<usize> {
        if field != BLOCK_MEDIA_PREFIX {
            return None;
        }
        Some(
            self.content_blocks
                .as_ref()
                .map_or(existing.content_blocks.len(), Vec::len),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(content: &str, media: Option<&str>) -> ContentBlock {
        ContentBlock {
            block_type: "paragraph".to_string(),
            content: content.to_string(),
            media_url: media.map(str::to_string),
            media_type: media.map(|_| MediaKind::Image),
            remove_media: false,
        }
    }

    fn existing_blog() -> Blog {
        Blog {
            id: Uuid::new_v4(),
            writer_name: "Ana".to_string(),
            blog_title: "Title".to_string(),
            categories: vec!["Cars".to_string()],
            blog_content: "Body".to_string(),
            content_blocks: vec![
                block("intro", Some("https://host/image/upload/v1/b/0.webp")),
                block("middle", None),
                block("outro", Some("https://host/image/upload/v1/b/2.webp")),
            ],
            list_on_website: true,
            blog_image_url: Some("https://host/image/upload/v1/b/cover.webp".to_string()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_client_media_urls_are_discarded() {
        let form: FormFields = [
            ("writerName", "Ana"),
            ("blogTitle", "T"),
            ("blogContent", "B"),
            ("listOnWebsite", "true"),
            ("categories", r#"["Cars"]"#),
            (
                "contentBlocks",
                r#"[{"type":"image","content":"","mediaUrl":"https://evil/x.png"}]"#,
            ),
        ]
        .into_iter()
        .collect();
        let draft = BlogDraft::from_form(&form).unwrap();
        assert_eq!(draft.content_blocks.len(), 1);
        assert!(draft.content_blocks[0].media_url.is_none());
        assert_eq!(draft.indexed_capacity(BLOCK_MEDIA_PREFIX), Some(1));
    }

    #[test]
    fn test_draft_assigns_block_media_by_index() {
        let mut draft = BlogDraft {
            content_blocks: vec![block("a", None), block("b", None)],
            ..Default::default()
        };
        let uploads = BTreeMap::from([(1, "https://host/video/upload/v1/b/clip.mp4".to_string())]);
        draft.set_slot(BLOCK_MEDIA_PREFIX, SlotValue::Indexed(uploads));
        assert!(draft.content_blocks[0].media_url.is_none());
        assert_eq!(draft.content_blocks[1].media_type, Some(MediaKind::Video));
    }

    #[test]
    fn test_update_inherits_previous_block_media() {
        let existing = existing_blog();
        let mut patch = BlogPatch {
            content_blocks: Some(vec![block("intro v2", None), block("middle v2", None), block("outro v2", None)]),
            ..Default::default()
        };
        let uploads = BTreeMap::from([(1, "https://host/image/upload/v1/b/new.webp".to_string())]);
        patch.set_slot(BLOCK_MEDIA_PREFIX, SlotValue::Indexed(uploads), &existing);

        let blocks = patch.content_blocks.unwrap();
        assert_eq!(blocks[0].media_url, existing.content_blocks[0].media_url);
        assert_eq!(blocks[1].media_url.as_deref(), Some("https://host/image/upload/v1/b/new.webp"));
        assert_eq!(blocks[2].media_url, existing.content_blocks[2].media_url);
    }

    #[test]
    fn test_update_can_drop_block_media() {
        let existing = existing_blog();
        let mut dropped = block("intro", None);
        dropped.remove_media = true;
        let mut patch = BlogPatch {
            content_blocks: Some(vec![dropped]),
            ..Default::default()
        };
        patch.set_slot(BLOCK_MEDIA_PREFIX, SlotValue::Indexed(BTreeMap::new()), &existing);
        assert!(patch.content_blocks.unwrap()[0].media_url.is_none());
    }

    #[test]
    fn test_untouched_blocks_stay_out_of_patch() {
        let existing = existing_blog();
        let mut patch = BlogPatch::default();
        patch.set_slot(BLOCK_MEDIA_PREFIX, SlotValue::Indexed(BTreeMap::new()), &existing);
        assert!(patch.content_blocks.is_none());
    }

    #[test]
    fn test_media_lists_cover_and_blocks() {
        let refs = existing_blog().media();
        assert_eq!(refs.len(), 3);
        assert_eq!(refs[0].kind, MediaKind::Image);
    }
}
