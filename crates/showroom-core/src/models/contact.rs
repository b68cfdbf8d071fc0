use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::form::FormFields;
use crate::media::{MediaSlot, SlotKind, SlotValue};
use crate::resource::{Document, Draft};

/// Current layout of contact submissions. Older rows had no country code.
pub const CONTACT_SCHEMA_VERSION: i16 = 2;

pub const CONTACT_SLOTS: &[MediaSlot] =
    &[MediaSlot::one("attachment", SlotKind::Attachment).required()];

const REQUIRED_FIELDS: &[&str] = &["countryCode", "countryName", "fullName", "phone", "email"];

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\S+@\S+\.\S+$").expect("static email pattern"));

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: Uuid,
    pub schema_version: i16,
    pub country_code: Option<String>,
    pub country_name: String,
    pub full_name: String,
    pub phone: String,
    pub email: String,
    pub description: String,
    pub services: Vec<String>,
    pub file_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document for Contact {
    const NAME: &'static str = "Contact";
    const SLOTS: &'static [MediaSlot] = CONTACT_SLOTS;

    fn id(&self) -> Uuid {
        self.id
    }

    fn slot_value(&self, field: &str) -> SlotValue {
        match field {
            "attachment" => SlotValue::One(self.file_url.clone()),
            _ => SlotValue::Empty,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ContactDraft {
    pub country_code: String,
    pub country_name: String,
    pub full_name: String,
    pub phone: String,
    pub email: String,
    pub description: String,
    pub services: Vec<String>,
    pub file_url: String,
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

impl Draft for ContactDraft {
    fn from_form(form: &FormFields) -> Result<Self, AppError> {
        form.require(REQUIRED_FIELDS)?;
        let text = |name: &str| form.text(name).unwrap_or_default();

        let email = text("email").to_lowercase();
        if !is_valid_email(&email) {
            return Err(AppError::InvalidInput(
                "Please enter a valid email address".to_string(),
            ));
        }

        Ok(ContactDraft {
            country_code: text("countryCode"),
            country_name: text("countryName"),
            full_name: text("fullName"),
            phone: text("phone"),
            email,
            description: form.raw("description").unwrap_or_default().to_string(),
            services: form.list("services")?.unwrap_or_default(),
            file_url: String::new(),
        })
    }

    fn set_slot(&mut self, field: &str, value: SlotValue) {
        if field == "attachment" {
            self.file_url = value.into_option().unwrap_or_default();
        }
    }

    fn validate(&self) -> Result<(), AppError> {
        if self.file_url.is_empty() {
            return Err(AppError::InvalidInput("Attachment is required".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_is_lowercased_and_checked() {
        let form: FormFields = [
            ("countryCode", "+44"),
            ("countryName", "UK"),
            ("fullName", "Sam Lee"),
            ("phone", "0123"),
            ("email", "Sam@Example.COM"),
        ]
        .into_iter()
        .collect();
        let draft = ContactDraft::from_form(&form).unwrap();
        assert_eq!(draft.email, "sam@example.com");
        assert!(draft.services.is_empty());
        assert_eq!(draft.description, "");
    }

    #[test]
    fn test_invalid_email() {
        assert!(!is_valid_email("not an email"));
        assert!(!is_valid_email("a@b"));
        assert!(is_valid_email("a@b.co"));
    }

    #[test]
    fn test_country_code_is_required() {
        let form: FormFields = [
            ("countryName", "UK"),
            ("fullName", "Sam Lee"),
            ("phone", "0123"),
            ("email", "sam@example.com"),
        ]
        .into_iter()
        .collect();
        assert!(matches!(
            ContactDraft::from_form(&form),
            Err(AppError::MissingFields(ref f)) if f == "countryCode"
        ));
    }
}
