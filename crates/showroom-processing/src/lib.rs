//! Image re-encoding for uploads
//!
//! Photos coming from the admin panel are usually straight off a phone or a
//! camera. Before they are sent to the media host they are re-encoded to WebP,
//! and whichever of the original and the re-encoded candidates is smallest wins.

pub mod compression;

pub use compression::{
    is_compressible_extension, Artifact, ArtifactFormat, CompressionSettings, ImageCompressor,
    ProcessingError,
};
