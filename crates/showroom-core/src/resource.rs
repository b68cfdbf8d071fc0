//! Descriptor traits for media-bearing resources
//!
//! A resource is described by its stored document, the draft built from a create
//! form and the patch built from an update form. The upload pipeline only talks to
//! these traits; the per-resource modules supply validation rules and slot lists.

use serde::Serialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::form::FormFields;
use crate::media::{MediaKind, MediaReference, MediaSlot, SlotKind, SlotValue};

/// A stored document that may reference remote media.
pub trait Document: Serialize + Send + Sync + Unpin + 'static {
    /// Human readable resource name used in messages ("Car", "Project").
    const NAME: &'static str;
    /// Media slots in upload order.
    const SLOTS: &'static [MediaSlot];

    fn id(&self) -> Uuid;

    /// Current value of a slot; `SlotValue::Empty` for unknown fields.
    fn slot_value(&self, field: &str) -> SlotValue;

    /// Every remote reference held by the document.
    fn media(&self) -> Vec<MediaReference> {
        Self::SLOTS
            .iter()
            .flat_map(|slot| {
                self.slot_value(slot.field)
                    .urls()
                    .into_iter()
                    .map(|url| MediaReference::new(url, infer_kind(slot.kind, url)))
                    .collect::<Vec<_>>()
            })
            .collect()
    }
}

/// Fields assembled for an insert. Built from the form before any upload happens
/// so missing input is rejected without touching the media host.
pub trait Draft: Send + Sized + 'static {
    fn from_form(form: &FormFields) -> Result<Self, AppError>;

    /// Place resolved URLs into the draft.
    fn set_slot(&mut self, field: &str, value: SlotValue);

    /// Checks that need the resolved media (e.g. "at least one link or file").
    fn validate(&self) -> Result<(), AppError> {
        Ok(())
    }

    /// Number of positions an indexed slot can hold, `None` when unbounded.
    fn indexed_capacity(&self, _field: &str) -> Option<usize> {
        None
    }
}

/// Partial update; every `None` leaves the stored column untouched.
pub trait Patch<D: Document>: Send + Sized + 'static {
    fn from_form(form: &FormFields) -> Result<Self, AppError>;

    /// Place the new value of a changed slot. `existing` is the document before the update.
    ///
    /// Indexed slots are always offered, with only the freshly uploaded positions, so
    /// the patch can carry earlier media over.
    fn set_slot(&mut self, field: &str, value: SlotValue, existing: &D);

    fn indexed_capacity(&self, _field: &str, _existing: &D) -> Option<usize> {
        None
    }
}

/// Infer the stored kind of a URL held by a slot.
pub fn infer_kind(slot: SlotKind, url: &str) -> MediaKind {
    match slot {
        SlotKind::Image => MediaKind::Image,
        SlotKind::Video => MediaKind::Video,
        SlotKind::Attachment => MediaKind::File,
        SlotKind::ImageOrVideo if url.contains("/video/upload/") => MediaKind::Video,
        SlotKind::ImageOrVideo => MediaKind::Image,
    }
}

/// Require a boolean field, accepting the usual form encodings.
pub fn required_bool(form: &FormFields, name: &str) -> Result<bool, AppError> {
    form.bool(name)?
        .ok_or_else(|| AppError::MissingFields(name.to_string()))
}

/// Require a non-empty list field.
pub fn required_list(form: &FormFields, name: &str) -> Result<Vec<String>, AppError> {
    match form.list(name)? {
        Some(list) if !list.is_empty() => Ok(list),
        _ => Err(AppError::InvalidInput(format!(
            "At least one {} is required",
            name.trim_end_matches('s')
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_kind_for_mixed_slot() {
        assert_eq!(
            infer_kind(
                SlotKind::ImageOrVideo,
                "https://res.cloudinary.com/demo/video/upload/v1/a/b.mp4"
            ),
            MediaKind::Video
        );
        assert_eq!(
            infer_kind(
                SlotKind::ImageOrVideo,
                "https://res.cloudinary.com/demo/image/upload/v1/a/b.webp"
            ),
            MediaKind::Image
        );
    }

    #[test]
    fn test_required_list_rejects_empty() {
        let form: FormFields = [("categories", "[]")].into_iter().collect();
        assert!(required_list(&form, "categories").is_err());
        let form: FormFields = [("categories", "Design")].into_iter().collect();
        assert_eq!(required_list(&form, "categories").unwrap(), vec!["Design"]);
    }
}
