//! Multipart staging
//!
//! File parts are streamed to the temp directory while text parts are collected
//! into [`FormFields`]. Every staged path is owned by an [`UploadBatch`], which
//! hands the paths to the cleanup queue when it is dropped, whatever the outcome
//! of the request.

use std::path::{Path, PathBuf};

use axum::extract::multipart::{Field, MultipartError};
use axum::extract::Multipart;
use axum::http::StatusCode;
use chrono::Utc;
use rand::Rng;
use showroom_core::media::normalize_mime_type;
use showroom_core::{AppError, Cardinality, Config, FormFields, MediaSlot};
use showroom_services::CleanupQueue;
use tokio::io::AsyncWriteExt;

const MAX_EXTENSION_LEN: usize = 5;

#[derive(Debug, Clone)]
pub struct UploadLimits {
    pub temp_dir: PathBuf,
    pub max_file_size_bytes: usize,
    pub max_files_per_field: usize,
}

impl UploadLimits {
    pub fn from_config(config: &Config) -> Self {
        Self {
            temp_dir: config.upload.temp_dir.clone(),
            max_file_size_bytes: config.upload.max_file_size_bytes,
            max_files_per_field: config.upload.max_files_per_field,
        }
    }

    /// Same limits with a different per-field file cap.
    pub fn with_max_files(mut self, max_files: usize) -> Self {
        self.max_files_per_field = max_files;
        self
    }

    fn max_files_for(&self, slot: &MediaSlot) -> usize {
        match slot.cardinality {
            Cardinality::One | Cardinality::Indexed => 1,
            Cardinality::Many { max } => max.min(self.max_files_per_field),
        }
    }
}

/// One file written to the temp directory.
#[derive(Debug, Clone)]
pub struct StagedFile {
    pub field: &'static str,
    /// Block index for indexed slots (`blockMedia_3` -> 3)
    pub index: Option<usize>,
    pub path: PathBuf,
    pub content_type: String,
    pub size: usize,
}

/// Files staged for one request.
pub struct UploadBatch {
    files: Vec<StagedFile>,
    paths: Vec<PathBuf>,
    cleanup: CleanupQueue,
}

impl UploadBatch {
    pub fn new(cleanup: CleanupQueue) -> Self {
        Self {
            files: Vec::new(),
            paths: Vec::new(),
            cleanup,
        }
    }

    /// Register a path before anything is written to it.
    fn track(&mut self, path: PathBuf) {
        self.paths.push(path);
    }

    fn push(&mut self, file: StagedFile) {
        self.files.push(file);
    }

    pub fn files(&self) -> &[StagedFile] {
        &self.files
    }

    /// Staged files for a slot, in arrival order.
    pub fn for_slot<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a StagedFile> + 'a {
        self.files.iter().filter(move |f| f.field == field)
    }

    pub fn has(&self, field: &str) -> bool {
        self.for_slot(field).next().is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    fn count_for(&self, field: &str, index: Option<usize>) -> usize {
        self.for_slot(field).filter(|f| f.index == index).count()
    }
}

impl Drop for UploadBatch {
    fn drop(&mut self) {
        let paths = std::mem::take(&mut self.paths);
        if !paths.is_empty() {
            tracing::debug!(count = paths.len(), "Scheduling staged file cleanup");
            self.cleanup.remove_local(paths);
        }
    }
}

/// Parsed multipart request: text fields plus the staged files.
pub struct StagedForm {
    pub fields: FormFields,
    pub files: UploadBatch,
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge("Request body is too large".to_string())
    } else {
        AppError::InvalidInput(format!("Failed to read multipart: {}", err.body_text()))
    }
}

/// Read a multipart body, staging the files that belong to `slots`.
///
/// File parts under any other name are rejected, as are parts whose type the
/// slot does not accept.
pub async fn read_multipart(
    mut multipart: Multipart,
    slots: &'static [MediaSlot],
    limits: &UploadLimits,
    cleanup: CleanupQueue,
) -> Result<StagedForm, AppError> {
    let mut fields = FormFields::new();
    let mut batch = UploadBatch::new(cleanup);

    while let Some(mut field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();

        let Some(file_name) = field.file_name().map(str::to_string) else {
            let value = field.text().await.map_err(multipart_error)?;
            fields.push(&name, value);
            continue;
        };

        let (slot, index) = slots
            .iter()
            .find_map(|slot| slot.matches(&name).map(|index| (slot, index)))
            .ok_or_else(|| AppError::InvalidInput(format!("Unexpected file field: {}", name)))?;

        let content_type = field
            .content_type()
            .map(normalize_mime_type)
            .unwrap_or_else(|| "application/octet-stream".to_string());

        // Browsers send an empty part for an untouched file input.
        if file_name.is_empty() {
            while field.chunk().await.map_err(multipart_error)?.is_some() {}
            continue;
        }

        if !slot.kind.accepts(&content_type) {
            return Err(AppError::UnsupportedMedia(format!(
                "{} does not accept {} files",
                slot.field, content_type
            )));
        }

        let max_files = limits.max_files_for(slot);
        if batch.count_for(slot.field, index) >= max_files {
            return Err(AppError::InvalidInput(format!(
                "Too many files for {}: at most {} allowed",
                name, max_files
            )));
        }

        let extension = staged_extension(&file_name, &content_type);
        let path = limits.temp_dir.join(staged_name(&name, &extension));
        batch.track(path.clone());

        let size = write_field(&mut field, &path, limits.max_file_size_bytes).await?;
        if size == 0 {
            continue;
        }

        tracing::debug!(field = %name, size, content_type = %content_type, "Staged upload");
        batch.push(StagedFile {
            field: slot.field,
            index,
            path,
            content_type,
            size,
        });
    }

    Ok(StagedForm {
        fields,
        files: batch,
    })
}

async fn write_field(
    field: &mut Field<'_>,
    path: &Path,
    max_size: usize,
) -> Result<usize, AppError> {
    let mut file = tokio::fs::File::create(path).await?;
    let mut size = 0usize;

    while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
        size += chunk.len();
        if size > max_size {
            return Err(AppError::PayloadTooLarge(format!(
                "File exceeds the maximum size of {} MB",
                max_size / 1024 / 1024
            )));
        }
        file.write_all(&chunk).await?;
    }

    file.flush().await?;
    Ok(size)
}

/// `{field}-{unix_millis}-{random}.{ext}` with the field reduced to safe characters.
pub fn staged_name(field: &str, extension: &str) -> String {
    let field: String = field
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '-' })
        .collect();
    let random: [u8; 4] = rand::rng().random();
    format!(
        "{}-{}-{}.{}",
        field,
        Utc::now().timestamp_millis(),
        hex::encode(random),
        extension
    )
}

/// Extension from the client's file name, or derived from the content type.
pub fn staged_extension(file_name: &str, content_type: &str) -> String {
    let from_name = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .filter(|e| {
            !e.is_empty()
                && e.len() <= MAX_EXTENSION_LEN
                && e.chars().all(|c| c.is_ascii_alphanumeric())
        });

    from_name.unwrap_or_else(|| {
        match content_type {
            "image/jpeg" => "jpg",
            "image/png" => "png",
            "image/gif" => "gif",
            "image/webp" => "webp",
            "video/mp4" => "mp4",
            "video/webm" => "webm",
            "video/quicktime" => "mov",
            "application/pdf" => "pdf",
            _ => "bin",
        }
        .to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use showroom_core::SlotKind;

    #[test]
    fn test_extension_from_name() {
        assert_eq!(staged_extension("Photo.JPG", "image/jpeg"), "jpg");
        assert_eq!(staged_extension("clip.mov", "video/quicktime"), "mov");
    }

    #[test]
    fn test_extension_falls_back_to_content_type() {
        assert_eq!(staged_extension("blob", "image/png"), "png");
        assert_eq!(staged_extension("weird.ext/../x", "video/mp4"), "mp4");
        assert_eq!(staged_extension("a.toolongext", "application/zip"), "bin");
    }

    #[test]
    fn test_staged_name_shape() {
        let name = staged_name("blockMedia_2", "webp");
        let parts: Vec<&str> = name.splitn(3, '-').collect();
        assert_eq!(parts[0], "blockMedia_2");
        assert!(parts[1].parse::<i64>().is_ok());
        assert!(name.ends_with(".webp"));

        let unsafe_name = staged_name("../etc/passwd", "bin");
        assert!(!unsafe_name.contains('/'));
    }

    #[test]
    fn test_max_files_per_slot() {
        let limits = UploadLimits {
            temp_dir: PathBuf::from("/tmp"),
            max_file_size_bytes: 1024,
            max_files_per_field: 10,
        };
        let images = MediaSlot::many("images", SlotKind::Image, 15);
        assert_eq!(limits.max_files_for(&images), 10);
        assert_eq!(limits.clone().with_max_files(15).max_files_for(&images), 15);
        assert_eq!(
            limits.max_files_for(&MediaSlot::one("logo", SlotKind::Image)),
            1
        );
    }
}
