use crate::{CloudinaryHost, LocalHost, MediaHost, StorageError, StorageResult};
use showroom_core::{Config, MediaBackend};
use std::sync::Arc;

/// Create the media host selected by `MEDIA_BACKEND`
pub async fn create_media_host(config: &Config) -> StorageResult<Arc<dyn MediaHost>> {
    let media = &config.media;

    match media.backend {
        MediaBackend::Cloudinary => {
            let missing = |key: &str| StorageError::ConfigError(format!("{} not configured", key));
            let cloud_name = media
                .cloudinary_cloud_name
                .clone()
                .ok_or_else(|| missing("CLOUDINARY_CLOUD_NAME"))?;
            let api_key = media
                .cloudinary_api_key
                .clone()
                .ok_or_else(|| missing("CLOUDINARY_API_KEY"))?;
            let api_secret = media
                .cloudinary_api_secret
                .clone()
                .ok_or_else(|| missing("CLOUDINARY_API_SECRET"))?;

            let host = CloudinaryHost::new(cloud_name, api_key, api_secret)?;
            Ok(Arc::new(host))
        }

        MediaBackend::Local => {
            let host = LocalHost::new(
                media.local_media_path.clone(),
                media.local_media_base_url.clone(),
            )
            .await?;
            Ok(Arc::new(host))
        }
    }
}
