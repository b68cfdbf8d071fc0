use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::form::FormFields;
use crate::media::{MediaSlot, SlotKind, SlotValue};
use crate::resource::{Document, Draft, Patch};

pub const STATIC_TESTIMONIAL_SLOTS: &[MediaSlot] = &[
    MediaSlot::one("projectLogo", SlotKind::Image),
    MediaSlot::one("clientImage", SlotKind::Image),
];

pub const VIDEO_TESTIMONIAL_SLOTS: &[MediaSlot] =
    &[MediaSlot::one("video", SlotKind::Video).required()];

const TESTIMONIAL_FIELDS: &[&str] = &["clientName", "designation", "projectName", "description"];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct StaticTestimonial {
    pub id: Uuid,
    pub client_name: String,
    pub designation: String,
    pub project_name: String,
    pub description: String,
    pub project_logo: Option<String>,
    pub client_image: Option<String>,
    pub list_on_website: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document for StaticTestimonial {
    const NAME: &'static str = "Static testimonial";
    const SLOTS: &'static [MediaSlot] = STATIC_TESTIMONIAL_SLOTS;

    fn id(&self) -> Uuid {
        self.id
    }

    fn slot_value(&self, field: &str) -> SlotValue {
        match field {
            "projectLogo" => self.project_logo.clone().into(),
            "clientImage" => self.client_image.clone().into(),
            _ => SlotValue::Empty,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct StaticTestimonialDraft {
    pub client_name: String,
    pub designation: String,
    pub project_name: String,
    pub description: String,
    pub project_logo: Option<String>,
    pub client_image: Option<String>,
    pub list_on_website: bool,
}

impl Draft for StaticTestimonialDraft {
    fn from_form(form: &FormFields) -> Result<Self, AppError> {
        form.require(TESTIMONIAL_FIELDS)?;
        let text = |name: &str| form.text(name).unwrap_or_default();
        Ok(StaticTestimonialDraft {
            client_name: text("clientName"),
            designation: text("designation"),
            project_name: text("projectName"),
            description: text("description"),
            project_logo: None,
            client_image: None,
            list_on_website: form.bool("listOnWebsite")?.unwrap_or(false),
        })
    }

    fn set_slot(&mut self, field: &str, value: SlotValue) {
        match field {
            "projectLogo" => self.project_logo = value.into_option(),
            "clientImage" => self.client_image = value.into_option(),
            _ => {}
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct StaticTestimonialPatch {
    pub client_name: Option<String>,
    pub designation: Option<String>,
    pub project_name: Option<String>,
    pub description: Option<String>,
    pub project_logo: Option<Option<String>>,
    pub client_image: Option<Option<String>>,
    pub list_on_website: Option<bool>,
}

impl Patch<StaticTestimonial> for StaticTestimonialPatch {
    fn from_form(form: &FormFields) -> Result<Self, AppError> {
        Ok(StaticTestimonialPatch {
            client_name: form.text("clientName"),
            designation: form.text("designation"),
            project_name: form.text("projectName"),
            description: form.text("description"),
            project_logo: None,
            client_image: None,
            list_on_website: form.bool("listOnWebsite")?,
        })
    }

    fn set_slot(&mut self, field: &str, value: SlotValue, _existing: &StaticTestimonial) {
        match field {
            "projectLogo" => self.project_logo = Some(value.into_option()),
            "clientImage" => self.client_image = Some(value.into_option()),
            _ => {}
        }
    }
}

/// Whether the reviewed product is live
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "live_status", rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum LiveStatus {
    Yes,
    No,
}

impl std::str::FromStr for LiveStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "yes" => Ok(LiveStatus::Yes),
            "no" => Ok(LiveStatus::No),
            _ => Err(AppError::InvalidInput(
                "liveStatus must be 'yes' or 'no'".to_string(),
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct VideoTestimonial {
    pub id: Uuid,
    pub client_name: String,
    pub designation: String,
    pub project_name: String,
    pub live_status: LiveStatus,
    pub description: String,
    pub website_link: Option<String>,
    pub ios_link: Option<String>,
    pub android_link: Option<String>,
    pub stars: i16,
    pub video_url: String,
    pub list_on_website: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document for VideoTestimonial {
    const NAME: &'static str = "Video testimonial";
    const SLOTS: &'static [MediaSlot] = VIDEO_TESTIMONIAL_SLOTS;

    fn id(&self) -> Uuid {
        self.id
    }

    fn slot_value(&self, field: &str) -> SlotValue {
        match field {
            "video" => SlotValue::One(self.video_url.clone()),
            _ => SlotValue::Empty,
        }
    }
}

fn parse_stars(form: &FormFields) -> Result<Option<i16>, AppError> {
    match form.number::<i16>("stars")? {
        Some(stars) if !(1..=5).contains(&stars) => Err(AppError::InvalidInput(
            "stars must be between 1 and 5".to_string(),
        )),
        other => Ok(other),
    }
}

fn has_link(links: [&Option<String>; 3]) -> bool {
    links.iter().any(|l| l.is_some())
}

const MISSING_LINK: &str = "At least one of websiteLink, iosLink, or androidLink is required.";

#[derive(Debug, Clone)]
pub struct VideoTestimonialDraft {
    pub client_name: String,
    pub designation: String,
    pub project_name: String,
    pub live_status: LiveStatus,
    pub description: String,
    pub website_link: Option<String>,
    pub ios_link: Option<String>,
    pub android_link: Option<String>,
    pub stars: i16,
    pub video_url: String,
    pub list_on_website: bool,
}

impl Draft for VideoTestimonialDraft {
    fn from_form(form: &FormFields) -> Result<Self, AppError> {
        let mut required = TESTIMONIAL_FIELDS.to_vec();
        required.extend(["liveStatus", "stars"]);
        form.require(&required)?;

        let text = |name: &str| form.text(name).unwrap_or_default();
        let draft = VideoTestimonialDraft {
            client_name: text("clientName"),
            designation: text("designation"),
            project_name: text("projectName"),
            live_status: text("liveStatus").parse()?,
            description: text("description"),
            website_link: form.text("websiteLink"),
            ios_link: form.text("iosLink"),
            android_link: form.text("androidLink"),
            stars: parse_stars(form)?.unwrap_or(5),
            video_url: String::new(),
            list_on_website: form.bool("listOnWebsite")?.unwrap_or(false),
        };

        if !has_link([&draft.website_link, &draft.ios_link, &draft.android_link]) {
            return Err(AppError::InvalidInput(MISSING_LINK.to_string()));
        }
        Ok(draft)
    }

    fn set_slot(&mut self, field: &str, value: SlotValue) {
        if field == "video" {
            self.video_url = value.into_option().unwrap_or_default();
        }
    }

    fn validate(&self) -> Result<(), AppError> {
        if self.video_url.is_empty() {
            return Err(AppError::MissingFields("video".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct VideoTestimonialPatch {
    pub client_name: Option<String>,
    pub designation: Option<String>,
    pub project_name: Option<String>,
    pub live_status: Option<LiveStatus>,
    pub description: Option<String>,
    pub website_link: Option<String>,
    pub ios_link: Option<String>,
    pub android_link: Option<String>,
    pub stars: Option<i16>,
    pub video_url: Option<String>,
    pub list_on_website: Option<bool>,
}

impl Patch<VideoTestimonial> for VideoTestimonialPatch {
    fn from_form(form: &FormFields) -> Result<Self, AppError> {
        Ok(VideoTestimonialPatch {
            client_name: form.text("clientName"),
            designation: form.text("designation"),
            project_name: form.text("projectName"),
            live_status: form.text("liveStatus").map(|s| s.parse()).transpose()?,
            description: form.text("description"),
            website_link: form.text("websiteLink"),
            ios_link: form.text("iosLink"),
            android_link: form.text("androidLink"),
            stars: parse_stars(form)?,
            video_url: None,
            list_on_website: form.bool("listOnWebsite")?,
        })
    }

    fn set_slot(&mut self, field: &str, value: SlotValue, _existing: &VideoTestimonial) {
        // Required slot: an empty value never clears the stored video.
        if field == "video" {
            if let Some(url) = value.into_option() {
                self.video_url = Some(url);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video_form(extra: &[(&'static str, &'static str)]) -> FormFields {
        let mut pairs = vec![
            ("clientName", "Jo"),
            ("designation", "CTO"),
            ("projectName", "Fleet"),
            ("description", "Great"),
            ("liveStatus", "yes"),
            ("stars", "4"),
        ];
        pairs.extend_from_slice(extra);
        pairs.into_iter().collect()
    }

    #[test]
    fn test_video_testimonial_requires_a_link() {
        let err = VideoTestimonialDraft::from_form(&video_form(&[])).unwrap_err();
        assert!(err.to_string().contains("websiteLink"));
        assert!(VideoTestimonialDraft::from_form(&video_form(&[("iosLink", "https://apps")])).is_ok());
    }

    #[test]
    fn test_stars_out_of_range() {
        let form: FormFields = [("stars", "0")].into_iter().collect();
        assert!(VideoTestimonialPatch::from_form(&form).is_err());
    }

    #[test]
    fn test_live_status_parse() {
        assert_eq!("YES".parse::<LiveStatus>().unwrap(), LiveStatus::Yes);
        assert!("maybe".parse::<LiveStatus>().is_err());
    }

    #[test]
    fn test_video_required_after_upload() {
        let draft =
            VideoTestimonialDraft::from_form(&video_form(&[("websiteLink", "https://x")])).unwrap();
        assert!(draft.validate().is_err());
    }

    #[test]
    fn test_static_list_flag_defaults_false() {
        let form: FormFields = [
            ("clientName", "Jo"),
            ("designation", "CTO"),
            ("projectName", "Fleet"),
            ("description", "Great"),
        ]
        .into_iter()
        .collect();
        assert!(!StaticTestimonialDraft::from_form(&form).unwrap().list_on_website);
    }
}
