use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::form::FormFields;
use crate::media::{MediaSlot, SlotKind, SlotValue};
use crate::resource::{Document, Draft, Patch};

pub const CAR_SLOTS: &[MediaSlot] = &[MediaSlot::many("images", SlotKind::Image, 15).required()];

const REQUIRED_FIELDS: &[&str] = &[
    "title",
    "make",
    "model",
    "manufacturing_year",
    "body_type",
    "price",
    "currency",
    "mileage",
    "mileage_unit",
];

/// Car listing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Car {
    pub id: Uuid,
    pub title: String,
    pub make: String,
    pub model: String,
    pub manufacturing_year: i32,
    pub condition: Option<String>,
    pub body_type: String,
    pub engine: Option<String>,
    pub cylinders: Option<i32>,
    pub doors: Option<i32>,
    pub horsepower: Option<i32>,
    pub fuel_type: Option<String>,
    pub gear_type: Option<String>,
    pub drive_train: Option<String>,
    pub exterior_color: Option<String>,
    pub interior_color: Vec<String>,
    pub chasis_no: Option<String>,
    pub engine_no: Option<String>,
    pub reg_no: Option<String>,
    pub state: Option<String>,
    pub price: f64,
    pub currency: String,
    pub mileage: f64,
    pub mileage_unit: String,
    pub description: Option<String>,
    pub should_list_on_website: bool,
    pub reserved_by: Option<String>,
    pub clicks: i64,
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Reduced projection used by the car list
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct CarSummary {
    pub id: Uuid,
    pub make: String,
    pub model: String,
    pub manufacturing_year: i32,
    pub fuel_type: Option<String>,
    pub gear_type: Option<String>,
    pub price: f64,
    pub currency: String,
}

impl Document for Car {
    const NAME: &'static str = "Car";
    const SLOTS: &'static [MediaSlot] = CAR_SLOTS;

    fn id(&self) -> Uuid {
        self.id
    }

    fn slot_value(&self, field: &str) -> SlotValue {
        match field {
            "images" => SlotValue::Many(self.images.clone()),
            _ => SlotValue::Empty,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CarDraft {
    pub title: String,
    pub make: String,
    pub model: String,
    pub manufacturing_year: i32,
    pub condition: Option<String>,
    pub body_type: String,
    pub engine: Option<String>,
    pub cylinders: Option<i32>,
    pub doors: Option<i32>,
    pub horsepower: Option<i32>,
    pub fuel_type: Option<String>,
    pub gear_type: Option<String>,
    pub drive_train: Option<String>,
    pub exterior_color: Option<String>,
    pub interior_color: Vec<String>,
    pub chasis_no: Option<String>,
    pub engine_no: Option<String>,
    pub reg_no: Option<String>,
    pub state: Option<String>,
    pub price: f64,
    pub currency: String,
    pub mileage: f64,
    pub mileage_unit: String,
    pub description: Option<String>,
    pub should_list_on_website: bool,
    pub reserved_by: Option<String>,
    pub images: Vec<String>,
}

/// Accepts a plain year ("2019") or a date ("2019-05-01", RFC 3339).
pub fn parse_manufacturing_year(value: &str) -> Result<i32, AppError> {
    let value = value.trim();
    if let Ok(year) = value.parse::<i32>() {
        return Ok(year);
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date.year());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.year());
    }
    Err(AppError::InvalidInput(
        "manufacturing_year must be a year or a date".to_string(),
    ))
}

fn positive(name: &str, value: f64) -> Result<f64, AppError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(AppError::InvalidInput(format!("{} must not be negative", name)))
    }
}

impl Draft for CarDraft {
    fn from_form(form: &FormFields) -> Result<Self, AppError> {
        form.require(REQUIRED_FIELDS)?;

        let text = |name: &str| form.text(name).unwrap_or_default();
        let year = parse_manufacturing_year(&text("manufacturing_year"))?;

        Ok(CarDraft {
            title: text("title"),
            make: text("make"),
            model: text("model"),
            manufacturing_year: year,
            condition: form.text("condition"),
            body_type: text("body_type"),
            engine: form.text("engine"),
            cylinders: form.number("cylinders")?,
            doors: form.number("doors")?,
            horsepower: form.number("horsepower")?,
            fuel_type: form.text("fuel_type"),
            gear_type: form.text("gear_type"),
            drive_train: form.text("drive_train"),
            exterior_color: form.text("exterior_color"),
            interior_color: form.list("interior_color")?.unwrap_or_default(),
            chasis_no: form.text("chasis_no"),
            engine_no: form.text("engine_no"),
            reg_no: form.text("reg_no"),
            state: form.text("state"),
            price: positive("price", form.number("price")?.unwrap_or_default())?,
            currency: text("currency"),
            mileage: positive("mileage", form.number("mileage")?.unwrap_or_default())?,
            mileage_unit: text("mileage_unit"),
            description: form.text("description"),
            should_list_on_website: form.bool("should_list_on_website")?.unwrap_or(true),
            reserved_by: form.text("reserved_by"),
            images: Vec::new(),
        })
    }

    fn set_slot(&mut self, field: &str, value: SlotValue) {
        if field == "images" {
            self.images = value.into_vec();
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CarPatch {
    pub title: Option<String>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub manufacturing_year: Option<i32>,
    pub condition: Option<String>,
    pub body_type: Option<String>,
    pub engine: Option<String>,
    pub cylinders: Option<i32>,
    pub doors: Option<i32>,
    pub horsepower: Option<i32>,
    pub fuel_type: Option<String>,
    pub gear_type: Option<String>,
    pub drive_train: Option<String>,
    pub exterior_color: Option<String>,
    pub interior_color: Option<Vec<String>>,
    pub chasis_no: Option<String>,
    pub engine_no: Option<String>,
    pub reg_no: Option<String>,
    pub state: Option<String>,
    pub price: Option<f64>,
    pub currency: Option<String>,
    pub mileage: Option<f64>,
    pub mileage_unit: Option<String>,
    pub description: Option<String>,
    pub should_list_on_website: Option<bool>,
    pub reserved_by: Option<String>,
    pub images: Option<Vec<String>>,
}

impl Patch<Car> for CarPatch {
    fn from_form(form: &FormFields) -> Result<Self, AppError> {
        let manufacturing_year = form
            .text("manufacturing_year")
            .map(|v| parse_manufacturing_year(&v))
            .transpose()?;

        Ok(CarPatch {
            title: form.text("title"),
            make: form.text("make"),
            model: form.text("model"),
            manufacturing_year,
            condition: form.text("condition"),
            body_type: form.text("body_type"),
            engine: form.text("engine"),
            cylinders: form.number("cylinders")?,
            doors: form.number("doors")?,
            horsepower: form.number("horsepower")?,
            fuel_type: form.text("fuel_type"),
            gear_type: form.text("gear_type"),
            drive_train: form.text("drive_train"),
            exterior_color: form.text("exterior_color"),
            interior_color: form.list("interior_color")?,
            chasis_no: form.text("chasis_no"),
            engine_no: form.text("engine_no"),
            reg_no: form.text("reg_no"),
            state: form.text("state"),
            price: form
                .number("price")?
                .map(|p| positive("price", p))
                .transpose()?,
            currency: form.text("currency"),
            mileage: form
                .number("mileage")?
                .map(|m| positive("mileage", m))
                .transpose()?,
            mileage_unit: form.text("mileage_unit"),
            description: form.text("description"),
            should_list_on_website: form.bool("should_list_on_website")?,
            reserved_by: form.text("reserved_by"),
            images: None,
        })
    }

    fn set_slot(&mut self, field: &str, value: SlotValue, _existing: &Car) {
        if field == "images" {
            self.images = Some(value.into_vec());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_form() -> FormFields {
        [
            ("title", "Toyota Corolla 2019"),
            ("make", "Toyota"),
            ("model", "Corolla"),
            ("manufacturing_year", "2019-03-01"),
            ("body_type", "Sedan"),
            ("price", "15000"),
            ("currency", "USD"),
            ("mileage", "42000"),
            ("mileage_unit", "km"),
            ("interior_color", "Black"),
            ("should_list_on_website", "false"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_draft_from_complete_form() {
        let draft = CarDraft::from_form(&full_form()).unwrap();
        assert_eq!(draft.manufacturing_year, 2019);
        assert_eq!(draft.interior_color, vec!["Black"]);
        assert!(!draft.should_list_on_website);
        assert!(draft.images.is_empty());
    }

    #[test]
    fn test_listing_flag_defaults_to_true() {
        let form: FormFields = [
            ("title", "Civic"),
            ("make", "Honda"),
            ("model", "Civic"),
            ("manufacturing_year", "2020"),
            ("body_type", "Hatchback"),
            ("price", "12000"),
            ("currency", "EUR"),
            ("mileage", "1000"),
            ("mileage_unit", "mi"),
        ]
        .into_iter()
        .collect();
        assert!(CarDraft::from_form(&form).unwrap().should_list_on_website);
    }

    #[test]
    fn test_draft_missing_fields() {
        let form: FormFields = [("title", "x")].into_iter().collect();
        let err = CarDraft::from_form(&form).unwrap_err();
        assert!(matches!(err, AppError::MissingFields(ref f) if f.contains("make") && f.contains("price")));
    }

    #[test]
    fn test_year_parsing() {
        assert_eq!(parse_manufacturing_year("2021").unwrap(), 2021);
        assert_eq!(parse_manufacturing_year("2018-01-01T00:00:00Z").unwrap(), 2018);
        assert!(parse_manufacturing_year("last year").is_err());
    }

    #[test]
    fn test_patch_only_carries_sent_fields() {
        let form: FormFields = [("price", "9999"), ("doors", "4")].into_iter().collect();
        let patch = CarPatch::from_form(&form).unwrap();
        assert_eq!(patch.price, Some(9999.0));
        assert_eq!(patch.doors, Some(4));
        assert!(patch.title.is_none());
        assert!(patch.images.is_none());
    }

    #[test]
    fn test_negative_price_rejected() {
        let form: FormFields = [("price", "-1")].into_iter().collect();
        assert!(CarPatch::from_form(&form).is_err());
    }
}
