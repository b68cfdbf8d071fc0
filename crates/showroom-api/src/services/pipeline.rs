//! Upload, persist, clean up
//!
//! One implementation of create/update/delete for every media-bearing resource.
//! The resource supplies its slot descriptors, draft and patch types; the
//! repository supplies storage. Invariants kept here:
//!
//! - nothing is written to the database unless every upload succeeded
//! - remote assets uploaded for a request that does not commit are queued for deletion
//! - staged files are released exactly once, through the [`UploadBatch`] guard
//! - stored media a client did not flag as changed is left alone

use std::collections::{BTreeMap, HashMap, HashSet};

use showroom_core::{
    AppError, Cardinality, Document, Draft, FormFields, MediaReference, MediaSlot, Patch,
    SlotValue,
};
use showroom_db::{ResourceRepository, UpdatableRepository};
use showroom_services::{CleanupQueue, MediaStore};
use uuid::Uuid;

use crate::utils::upload::{StagedForm, UploadBatch};

/// URLs uploaded per slot field, with the block index for indexed slots.
type SlotUploads = HashMap<&'static str, Vec<(Option<usize>, String)>>;

#[derive(Clone)]
pub struct MediaPipeline {
    store: MediaStore,
    cleanup: CleanupQueue,
}

/// Remote assets uploaded during one request. Unless committed, they are queued
/// for deletion when the guard goes away.
struct UploadedAssets<'a> {
    references: Vec<MediaReference>,
    cleanup: &'a CleanupQueue,
    committed: bool,
}

impl<'a> UploadedAssets<'a> {
    fn new(cleanup: &'a CleanupQueue) -> Self {
        Self {
            references: Vec::new(),
            cleanup,
            committed: false,
        }
    }

    fn commit(mut self) -> usize {
        self.committed = true;
        self.references.len()
    }
}

impl Drop for UploadedAssets<'_> {
    fn drop(&mut self) {
        if !self.committed && !self.references.is_empty() {
            tracing::warn!(
                count = self.references.len(),
                "Request failed after upload, removing orphaned remote assets"
            );
            self.cleanup
                .remove_remote(std::mem::take(&mut self.references));
        }
    }
}

/// What the client said about one slot in an update form.
#[derive(Debug, Clone, Default)]
struct SlotRequest {
    /// `{field}Changed`
    changed: Option<bool>,
    /// `existing{Field}` URLs the client keeps
    kept: Vec<String>,
}

impl SlotRequest {
    fn from_form(fields: &FormFields, slot: &MediaSlot) -> Result<Self, AppError> {
        Ok(Self {
            changed: fields.bool(&slot.changed_flag())?,
            kept: fields.list(&slot.existing_field())?.unwrap_or_default(),
        })
    }

    fn flagged(&self) -> bool {
        self.changed == Some(true)
    }

    /// Whether staged files for the slot take part in the update. A list slot
    /// only changes when flagged; its files are ignored otherwise.
    fn takes_files(&self, slot: &MediaSlot) -> bool {
        match slot.cardinality {
            Cardinality::Many { .. } => self.flagged(),
            Cardinality::One | Cardinality::Indexed => true,
        }
    }

    /// Kept URLs the resource actually holds, deduplicated, in request order.
    fn kept_in(&self, current: &[&str]) -> Vec<String> {
        let mut kept: Vec<String> = Vec::new();
        for url in &self.kept {
            if current.contains(&url.as_str()) && !kept.contains(url) {
                kept.push(url.clone());
            }
        }
        kept
    }
}

impl MediaPipeline {
    pub fn new(store: MediaStore, cleanup: CleanupQueue) -> Self {
        Self { store, cleanup }
    }

    pub fn cleanup(&self) -> &CleanupQueue {
        &self.cleanup
    }

    /// Validate, upload, insert.
    #[tracing::instrument(skip(self, repo, form), fields(resource = <R::Doc as Document>::NAME))]
    pub async fn create<R: ResourceRepository>(
        &self,
        repo: &R,
        form: StagedForm,
    ) -> Result<R::Doc, AppError> {
        let StagedForm { fields, files } = form;

        let mut draft = R::Draft::from_form(&fields)?;
        check_required_slots::<R::Doc>(&files)?;
        for slot in indexed_slots::<R::Doc>() {
            check_indexed_capacity(&files, slot, draft.indexed_capacity(slot.field))?;
        }

        let mut uploaded = UploadedAssets::new(&self.cleanup);
        let uploads = self
            .upload_all::<R::Doc>(&files, &mut uploaded, |_| true)
            .await?;

        for slot in <R::Doc as Document>::SLOTS {
            if let Some(entries) = uploads.get(slot.field) {
                draft.set_slot(slot.field, slot_value(slot, entries.clone()));
            }
        }
        draft.validate()?;

        let document = repo.insert(draft).await?;
        let media_count = uploaded.commit();

        tracing::info!(id = %document.id(), media_count, "Resource created");
        Ok(document)
    }

    /// Load, merge the fields present in the form, resolve slots, patch.
    #[tracing::instrument(skip(self, repo, form), fields(resource = <R::Doc as Document>::NAME, id = %id))]
    pub async fn update<R: UpdatableRepository>(
        &self,
        repo: &R,
        id: Uuid,
        form: StagedForm,
    ) -> Result<R::Doc, AppError> {
        let StagedForm { fields, files } = form;

        let existing = repo
            .find(id)
            .await?
            .ok_or_else(|| AppError::not_found(<R::Doc as Document>::NAME))?;

        let mut patch = R::Patch::from_form(&fields)?;
        let requests = <R::Doc as Document>::SLOTS
            .iter()
            .map(|slot| SlotRequest::from_form(&fields, slot))
            .collect::<Result<Vec<_>, _>>()?;
        for slot in indexed_slots::<R::Doc>() {
            check_indexed_capacity(&files, slot, patch.indexed_capacity(slot.field, &existing))?;
        }
        for (slot, request) in <R::Doc as Document>::SLOTS.iter().zip(&requests) {
            let incoming = files.for_slot(slot.field).count();
            check_update_slot(slot, request, &existing.slot_value(slot.field), incoming)?;
            if incoming > 0 && !request.takes_files(slot) {
                tracing::debug!(
                    slot = slot.field,
                    incoming,
                    "Slot not flagged as changed, ignoring its files"
                );
            }
        }

        let mut uploaded = UploadedAssets::new(&self.cleanup);
        let mut uploads = self
            .upload_all::<R::Doc>(&files, &mut uploaded, |slot| {
                <R::Doc as Document>::SLOTS
                    .iter()
                    .zip(&requests)
                    .any(|(s, request)| s.field == slot.field && request.takes_files(s))
            })
            .await?;

        for (slot, request) in <R::Doc as Document>::SLOTS.iter().zip(&requests) {
            let new = uploads.remove(slot.field).unwrap_or_default();
            let current = existing.slot_value(slot.field);
            if let Some(value) = resolve_update(slot, request, current, new) {
                patch.set_slot(slot.field, value, &existing);
            }
        }

        let updated = repo
            .update(id, patch)
            .await?
            .ok_or_else(|| AppError::not_found(<R::Doc as Document>::NAME))?;
        let media_count = uploaded.commit();

        let removed = superseded(&existing, &updated);
        tracing::info!(
            media_count,
            removed = removed.len(),
            "Resource updated"
        );
        self.cleanup.remove_remote(removed);

        Ok(updated)
    }

    /// Delete the row, then queue removal of everything it referenced.
    #[tracing::instrument(skip(self, repo), fields(resource = <R::Doc as Document>::NAME, id = %id))]
    pub async fn delete<R: ResourceRepository>(&self, repo: &R, id: Uuid) -> Result<R::Doc, AppError> {
        let existing = repo
            .find(id)
            .await?
            .ok_or_else(|| AppError::not_found(<R::Doc as Document>::NAME))?;

        if !repo.delete(id).await? {
            return Err(AppError::not_found(<R::Doc as Document>::NAME));
        }

        let media = existing.media();
        tracing::info!(media_count = media.len(), "Resource deleted");
        self.cleanup.remove_remote(media);

        Ok(existing)
    }

    /// Upload the staged files of every slot `include` selects, in slot order,
    /// recording each success in `uploaded` before the next transfer starts.
    async fn upload_all<D: Document>(
        &self,
        files: &UploadBatch,
        uploaded: &mut UploadedAssets<'_>,
        include: impl Fn(&MediaSlot) -> bool,
    ) -> Result<SlotUploads, AppError> {
        let mut uploads = SlotUploads::new();

        for slot in D::SLOTS.iter().filter(|&slot| include(slot)) {
            let mut staged: Vec<_> = files.for_slot(slot.field).collect();
            staged.sort_by_key(|file| file.index);

            for file in staged {
                let kind = slot.kind.media_kind(&file.content_type);
                let reference = self.store.upload(&file.path, kind).await.map_err(|e| {
                    tracing::error!(
                        slot = slot.field,
                        index = ?file.index,
                        completed = uploaded.references.len(),
                        error = %e,
                        "Upload failed, aborting request"
                    );
                    e
                })?;

                uploads
                    .entry(slot.field)
                    .or_default()
                    .push((file.index, reference.url.clone()));
                uploaded.references.push(reference);
            }
        }

        Ok(uploads)
    }
}

fn indexed_slots<D: Document>() -> impl Iterator<Item = &'static MediaSlot> {
    D::SLOTS
        .iter()
        .filter(|slot| slot.cardinality == Cardinality::Indexed)
}

fn check_required_slots<D: Document>(files: &UploadBatch) -> Result<(), AppError> {
    let missing: Vec<&str> = D::SLOTS
        .iter()
        .filter(|slot| slot.required && !files.has(slot.field))
        .map(|slot| slot.field)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(AppError::MissingFields(missing.join(", ")))
    }
}

fn check_indexed_capacity(
    files: &UploadBatch,
    slot: &MediaSlot,
    capacity: Option<usize>,
) -> Result<(), AppError> {
    let Some(capacity) = capacity else {
        return Ok(());
    };
    match files
        .for_slot(slot.field)
        .filter_map(|file| file.index)
        .find(|index| *index >= capacity)
    {
        Some(index) => Err(AppError::InvalidInput(format!(
            "{}_{} does not match any content block",
            slot.field, index
        ))),
        None => Ok(()),
    }
}

fn slot_value(slot: &MediaSlot, entries: Vec<(Option<usize>, String)>) -> SlotValue {
    match slot.cardinality {
        Cardinality::One => entries
            .into_iter()
            .next()
            .map(|(_, url)| SlotValue::One(url))
            .unwrap_or_default(),
        Cardinality::Many { .. } => {
            SlotValue::Many(entries.into_iter().map(|(_, url)| url).collect())
        }
        Cardinality::Indexed => SlotValue::Indexed(
            entries
                .into_iter()
                .filter_map(|(index, url)| index.map(|i| (i, url)))
                .collect::<BTreeMap<_, _>>(),
        ),
    }
}

/// Reject an update whose slot would overflow or end up empty, before anything
/// is uploaded. `incoming` counts the staged files for the slot.
fn check_update_slot(
    slot: &MediaSlot,
    request: &SlotRequest,
    current: &SlotValue,
    incoming: usize,
) -> Result<(), AppError> {
    if !request.takes_files(slot) {
        return Ok(());
    }
    match slot.cardinality {
        Cardinality::Indexed => Ok(()),
        Cardinality::Many { max } => {
            let total = request.kept_in(&current.urls()).len() + incoming;
            if total > max {
                return Err(AppError::InvalidInput(format!(
                    "{} can hold at most {} files",
                    slot.field, max
                )));
            }
            if slot.required && total == 0 {
                return Err(AppError::MissingFields(slot.field.to_string()));
            }
            Ok(())
        }
        Cardinality::One => {
            if incoming > 0 || !request.flagged() || !slot.required {
                return Ok(());
            }
            if request.kept_in(&current.urls()).is_empty() {
                Err(AppError::MissingFields(slot.field.to_string()))
            } else {
                Ok(())
            }
        }
    }
}

/// New value of a slot on update, `None` to leave the stored value untouched.
///
/// Kept URLs are only honoured when the resource actually holds them. Counts
/// have already been checked by [`check_update_slot`].
fn resolve_update(
    slot: &MediaSlot,
    request: &SlotRequest,
    current: SlotValue,
    new: Vec<(Option<usize>, String)>,
) -> Option<SlotValue> {
    match slot.cardinality {
        Cardinality::Indexed => Some(slot_value(slot, new)),
        Cardinality::Many { .. } => {
            if !request.flagged() {
                return None;
            }
            let mut urls = request.kept_in(&current.urls());
            urls.extend(new.into_iter().map(|(_, url)| url));
            Some(SlotValue::Many(urls))
        }
        Cardinality::One => {
            if let Some((_, url)) = new.into_iter().next() {
                return Some(SlotValue::One(url));
            }
            if !request.flagged() {
                return None;
            }
            match request.kept_in(&current.urls()).into_iter().next() {
                Some(url) => Some(SlotValue::One(url)),
                None => Some(SlotValue::Empty),
            }
        }
    }
}

/// References held before an update that the updated document no longer holds.
fn superseded<D: Document>(before: &D, after: &D) -> Vec<MediaReference> {
    let still_used: HashSet<String> = after.media().into_iter().map(|r| r.url).collect();
    before
        .media()
        .into_iter()
        .filter(|r| !still_used.contains(&r.url))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use showroom_core::SlotKind;

    const IMAGES: MediaSlot = MediaSlot::many("images", SlotKind::Image, 3).required();
    const LOGO: MediaSlot = MediaSlot::one("logo", SlotKind::Image);
    const VIDEO: MediaSlot = MediaSlot::one("video", SlotKind::Video).required();
    const BLOCKS: MediaSlot = MediaSlot::indexed("blockMedia", SlotKind::ImageOrVideo);

    fn stored(urls: &[&str]) -> SlotValue {
        SlotValue::Many(urls.iter().map(|u| u.to_string()).collect())
    }

    fn uploaded(urls: &[&str]) -> Vec<(Option<usize>, String)> {
        urls.iter().map(|u| (None, u.to_string())).collect()
    }

    fn request(changed: Option<bool>, kept: &[&str]) -> SlotRequest {
        SlotRequest {
            changed,
            kept: kept.iter().map(|u| u.to_string()).collect(),
        }
    }

    #[test]
    fn test_unflagged_slot_without_files_is_untouched() {
        let value = resolve_update(&IMAGES, &request(None, &[]), stored(&["a"]), vec![]);
        assert_eq!(value, None);

        let value = resolve_update(&IMAGES, &request(Some(false), &["x"]), stored(&["a"]), vec![]);
        assert_eq!(value, None);
    }

    #[test]
    fn test_unflagged_list_slot_ignores_new_files() {
        let unflagged = request(None, &[]);
        assert!(!unflagged.takes_files(&IMAGES));
        assert_eq!(
            resolve_update(&IMAGES, &unflagged, stored(&["a"]), uploaded(&["b"])),
            None
        );

        let declined = request(Some(false), &[]);
        assert!(!declined.takes_files(&IMAGES));
        assert_eq!(
            resolve_update(&IMAGES, &declined, stored(&["a"]), uploaded(&["b"])),
            None
        );

        // Nothing to upload, so nothing to count either.
        assert!(check_update_slot(&IMAGES, &unflagged, &stored(&["a", "b", "c"]), 5).is_ok());
    }

    #[test]
    fn test_changed_keeps_only_stored_urls_then_appends_new() {
        let value = resolve_update(
            &IMAGES,
            &request(Some(true), &["b", "https://evil.example/x.png", "b"]),
            stored(&["a", "b"]),
            uploaded(&["c"]),
        );
        assert_eq!(value, Some(stored(&["b", "c"])));
    }

    #[test]
    fn test_list_slot_limits_checked_before_upload() {
        let keep_all = request(Some(true), &["a", "b", "c"]);
        let too_many = check_update_slot(&IMAGES, &keep_all, &stored(&["a", "b", "c"]), 1);
        assert!(matches!(too_many, Err(AppError::InvalidInput(_))));

        // Foreign URLs do not count towards the limit.
        let foreign = request(Some(true), &["x", "y", "z"]);
        assert!(check_update_slot(&IMAGES, &foreign, &stored(&["a"]), 3).is_ok());

        let emptied = check_update_slot(&IMAGES, &request(Some(true), &[]), &stored(&["a"]), 0);
        assert!(matches!(emptied, Err(AppError::MissingFields(_))));
    }

    #[test]
    fn test_one_slot_replaced_by_new_file() {
        let value = resolve_update(
            &LOGO,
            &request(None, &[]),
            SlotValue::One("old".into()),
            uploaded(&["new"]),
        );
        assert_eq!(value, Some(SlotValue::One("new".into())));
        assert!(request(None, &[]).takes_files(&LOGO));
    }

    #[test]
    fn test_one_slot_cleared_or_kept() {
        let cleared = resolve_update(
            &LOGO,
            &request(Some(true), &[]),
            SlotValue::One("old".into()),
            vec![],
        );
        assert_eq!(cleared, Some(SlotValue::Empty));

        let kept = resolve_update(
            &LOGO,
            &request(Some(true), &["old"]),
            SlotValue::One("old".into()),
            vec![],
        );
        assert_eq!(kept, Some(SlotValue::One("old".into())));
    }

    #[test]
    fn test_required_one_slot_cannot_be_cleared() {
        let current = SlotValue::One("old".into());
        let cleared = check_update_slot(&VIDEO, &request(Some(true), &[]), &current, 0);
        assert!(matches!(cleared, Err(AppError::MissingFields(_))));

        assert!(check_update_slot(&VIDEO, &request(Some(true), &["old"]), &current, 0).is_ok());
        assert!(check_update_slot(&VIDEO, &request(Some(true), &[]), &current, 1).is_ok());
        assert!(check_update_slot(&LOGO, &request(Some(true), &[]), &current, 0).is_ok());
    }

    #[test]
    fn test_indexed_slot_always_offered() {
        let value = resolve_update(
            &BLOCKS,
            &request(None, &[]),
            SlotValue::Empty,
            vec![(Some(2), "u".to_string())],
        );
        let expected: BTreeMap<usize, String> = [(2, "u".to_string())].into_iter().collect();
        assert_eq!(value, Some(SlotValue::Indexed(expected)));
    }

    #[test]
    fn test_slot_value_for_create() {
        assert_eq!(
            slot_value(&LOGO, uploaded(&["l"])),
            SlotValue::One("l".into())
        );
        assert_eq!(slot_value(&IMAGES, uploaded(&["a", "b"])), stored(&["a", "b"]));
    }
}
