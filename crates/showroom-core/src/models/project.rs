use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::form::FormFields;
use crate::media::{MediaSlot, SlotKind, SlotValue};
use crate::resource::{required_bool, required_list, Document, Draft, Patch};

pub const PROJECT_SLOTS: &[MediaSlot] = &[
    MediaSlot::many("images", SlotKind::Image, 10).required(),
    MediaSlot::one("logo", SlotKind::Image),
    MediaSlot::one("video", SlotKind::Video),
];

const REQUIRED_FIELDS: &[&str] = &[
    "title",
    "mainCategory",
    "client",
    "duration",
    "downloads",
    "description",
];

/// Portfolio project
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    pub title: String,
    pub main_category: String,
    pub client: String,
    pub duration: String,
    pub downloads: String,
    pub images: Vec<String>,
    pub video: Option<String>,
    pub logo: Option<String>,
    pub categories: Vec<String>,
    pub description: String,
    pub list_on_website: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Projection used by the admin project list
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    pub id: Uuid,
    pub title: String,
    pub main_category: String,
    pub logo: Option<String>,
    pub video: Option<String>,
    pub categories: Vec<String>,
    pub description: String,
}

impl Document for Project {
    const NAME: &'static str = "Project";
    const SLOTS: &'static [MediaSlot] = PROJECT_SLOTS;

    fn id(&self) -> Uuid {
        self.id
    }

    fn slot_value(&self, field: &str) -> SlotValue {
        match field {
            "images" => SlotValue::Many(self.images.clone()),
            "logo" => self.logo.clone().into(),
            "video" => self.video.clone().into(),
            _ => SlotValue::Empty,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProjectDraft {
    pub title: String,
    pub main_category: String,
    pub client: String,
    pub duration: String,
    pub downloads: String,
    pub images: Vec<String>,
    pub video: Option<String>,
    pub logo: Option<String>,
    pub categories: Vec<String>,
    pub description: String,
    pub list_on_website: bool,
}

impl Draft for ProjectDraft {
    fn from_form(form: &FormFields) -> Result<Self, AppError> {
        form.require(REQUIRED_FIELDS)?;
        let list_on_website = required_bool(form, "listOnWebsite")?;
        let categories = required_list(form, "categories")?;
        let text = |name: &str| form.text(name).unwrap_or_default();

        Ok(ProjectDraft {
            title: text("title"),
            main_category: text("mainCategory"),
            client: text("client"),
            duration: text("duration"),
            downloads: text("downloads"),
            images: Vec::new(),
            video: None,
            logo: None,
            categories,
            description: text("description"),
            list_on_website,
        })
    }

    fn set_slot(&mut self, field: &str, value: SlotValue) {
        match field {
            "images" => self.images = value.into_vec(),
            "logo" => self.logo = value.into_option(),
            "video" => self.video = value.into_option(),
            _ => {}
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProjectPatch {
    pub title: Option<String>,
    pub main_category: Option<String>,
    pub client: Option<String>,
    pub duration: Option<String>,
    pub downloads: Option<String>,
    pub images: Option<Vec<String>>,
    pub video: Option<Option<String>>,
    pub logo: Option<Option<String>>,
    pub categories: Option<Vec<String>>,
    pub description: Option<String>,
    pub list_on_website: Option<bool>,
}

impl Patch<Project> for ProjectPatch {
    fn from_form(form: &FormFields) -> Result<Self, AppError> {
        let categories = match form.list("categories")? {
            Some(list) if list.is_empty() => {
                return Err(AppError::InvalidInput(
                    "At least one category is required".to_string(),
                ))
            }
            other => other,
        };

        Ok(ProjectPatch {
            title: form.text("title"),
            main_category: form.text("mainCategory"),
            client: form.text("client"),
            duration: form.text("duration"),
            downloads: form.text("downloads"),
            images: None,
            video: None,
            logo: None,
            categories,
            description: form.text("description"),
            list_on_website: form.bool("listOnWebsite")?,
        })
    }

    fn set_slot(&mut self, field: &str, value: SlotValue, _existing: &Project) {
        match field {
            "images" => self.images = Some(value.into_vec()),
            "logo" => self.logo = Some(value.into_option()),
            "video" => self.video = Some(value.into_option()),
            _ => {}
        }
    }
}
