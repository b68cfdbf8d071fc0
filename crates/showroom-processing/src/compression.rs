use bytes::Bytes;
use image::{DynamicImage, GenericImageView, ImageReader};
use std::io::Cursor;
use thiserror::Error;

/// Extensions worth decoding. GIFs keep their animation by skipping this step.
const COMPRESSIBLE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

#[derive(Debug, Error)]
pub enum ProcessingError {
    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("Image has no pixels")]
    Empty,
}

pub fn is_compressible_extension(ext: &str) -> bool {
    COMPRESSIBLE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str())
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompressionSettings {
    pub primary_quality: f32,
    pub fallback_quality: f32,
    /// A primary encode above this size triggers the fallback encode.
    pub size_threshold_bytes: usize,
}

impl Default for CompressionSettings {
    fn default() -> Self {
        Self {
            primary_quality: 80.0,
            fallback_quality: 75.0,
            size_threshold_bytes: 350 * 1024,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ArtifactFormat {
    Original,
    WebP { quality: f32 },
}

impl ArtifactFormat {
    /// Extension to upload the artifact under, given the original one.
    pub fn extension<'a>(&self, original_ext: &'a str) -> &'a str {
        match self {
            ArtifactFormat::Original => original_ext,
            ArtifactFormat::WebP { .. } => "webp",
        }
    }
}

/// The bytes chosen for upload.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub data: Bytes,
    pub format: ArtifactFormat,
    pub original_size: usize,
}

impl Artifact {
    pub fn is_original(&self) -> bool {
        self.format == ArtifactFormat::Original
    }
}

pub struct ImageCompressor {
    settings: CompressionSettings,
}

impl ImageCompressor {
    pub fn new(settings: CompressionSettings) -> Self {
        Self { settings }
    }

    /// Re-encode `original` and return the smallest candidate.
    ///
    /// CPU bound; call from a blocking thread. Fails only when the bytes cannot be
    /// decoded, in which case the caller uploads the original as a plain file.
    pub fn compress(&self, original: Bytes) -> Result<Artifact, ProcessingError> {
        let img = decode(&original)?;
        let (width, height) = img.dimensions();
        if width == 0 || height == 0 {
            return Err(ProcessingError::Empty);
        }

        let rgba = img.to_rgba8();
        let encode = |quality: f32| -> Bytes {
            let encoded = webp::Encoder::from_rgba(&rgba, width, height).encode(quality);
            Bytes::copy_from_slice(&encoded)
        };

        let original_size = original.len();
        let mut candidates = vec![(original, ArtifactFormat::Original)];

        let primary = encode(self.settings.primary_quality);
        let over_threshold = primary.len() > self.settings.size_threshold_bytes;
        candidates.push((
            primary,
            ArtifactFormat::WebP {
                quality: self.settings.primary_quality,
            },
        ));

        if over_threshold {
            candidates.push((
                encode(self.settings.fallback_quality),
                ArtifactFormat::WebP {
                    quality: self.settings.fallback_quality,
                },
            ));
        }

        let (data, format) = pick_smallest(candidates);

        tracing::debug!(
            width,
            height,
            original_size,
            chosen_size = data.len(),
            format = ?format,
            "Image compressed"
        );

        Ok(Artifact {
            data,
            format,
            original_size,
        })
    }
}

fn decode(data: &[u8]) -> Result<DynamicImage, ProcessingError> {
    ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| ProcessingError::Decode(e.to_string()))?
        .decode()
        .map_err(|e| ProcessingError::Decode(e.to_string()))
}

/// Smallest candidate; on a tie the earlier one (the original first) wins.
fn pick_smallest(candidates: Vec<(Bytes, ArtifactFormat)>) -> (Bytes, ArtifactFormat) {
    candidates
        .into_iter()
        .reduce(|best, next| if next.0.len() < best.0.len() { next } else { best })
        .unwrap_or_else(|| (Bytes::new(), ArtifactFormat::Original))
}
