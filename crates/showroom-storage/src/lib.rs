//! Showroom Storage Library
//!
//! Remote media hosting for the showroom backend. The [`MediaHost`] trait is the
//! only thing the upload pipeline depends on; two hosts implement it:
//!
//! - [`CloudinaryHost`]: the signed Cloudinary upload API
//! - [`LocalHost`]: a directory on disk served under a base URL, for development
//!   and tests
//!
//! Both hand out URLs of the form `{base}/{resource_type}/upload/v{version}/{public_id}.{ext}`,
//! so [`extract_public_id`] recovers the identifier needed for deletion from any
//! stored URL regardless of the host that produced it.
//!
//! The crate also owns [`safe_unlink`], the retrying local file removal used to
//! clean up staged uploads.

pub mod cloudinary;
pub mod factory;
pub mod local;
pub mod public_id;
pub mod traits;
pub mod unlink;

pub use cloudinary::CloudinaryHost;
pub use factory::create_media_host;
pub use local::LocalHost;
pub use public_id::{extract_public_id, resource_type_from_url};
pub use traits::{MediaHost, RemoteAsset, ResourceType, StorageError, StorageResult};
pub use unlink::{safe_unlink, RetryPolicy, UnlinkOutcome};
