//! Configuration module
//!
//! Everything is read from the environment (optionally through a `.env` file) once at
//! startup. Values that fail to parse fall back to their defaults; combinations that
//! cannot work are rejected by [`Config::validate`].

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::media_backend::MediaBackend;

const SERVER_PORT: u16 = 3000;
const MAX_CONNECTIONS: u32 = 10;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const JWT_EXPIRY_HOURS: i64 = 24;
const DEFAULT_CORS_ORIGINS: &str = "http://localhost:5173,http://localhost:3000";

const MAX_FILE_SIZE_MB: usize = 50;
const MAX_FILES_PER_FIELD: usize = 10;
const MAX_CAR_IMAGES: usize = 15;
const IMAGE_PRIMARY_QUALITY: f32 = 80.0;
const IMAGE_FALLBACK_QUALITY: f32 = 75.0;
const IMAGE_SIZE_THRESHOLD_KB: usize = 350;

const CLEANUP_INITIAL_DELAY_MS: u64 = 500;
const CLEANUP_MAX_RETRIES: u32 = 5;
const CLEANUP_BASE_DELAY_MS: u64 = 200;

const VISITOR_COOKIE_DAYS: i64 = 30;
const VISIT_DEDUP_MINUTES: i64 = 60;
const TRUSTED_PROXY_COUNT: usize = 1;

/// Server, database and authentication settings
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_host: String,
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    pub jwt_secret: String,
    pub jwt_expiry_hours: i64,
    pub environment: String,
}

/// Remote media host settings
#[derive(Clone, Debug)]
pub struct MediaConfig {
    pub backend: MediaBackend,
    pub cloudinary_cloud_name: Option<String>,
    pub cloudinary_api_key: Option<String>,
    pub cloudinary_api_secret: Option<String>,
    pub local_media_path: PathBuf,
    pub local_media_base_url: String,
    pub image_folder: String,
    pub file_folder: String,
    pub video_folder: String,
    pub image_primary_quality: f32,
    pub image_fallback_quality: f32,
    pub image_size_threshold_bytes: usize,
}

/// Multipart staging limits
#[derive(Clone, Debug)]
pub struct UploadConfig {
    pub temp_dir: PathBuf,
    pub max_file_size_bytes: usize,
    pub max_files_per_field: usize,
    pub max_car_images: usize,
}

/// Local temp-file cleanup policy
#[derive(Clone, Debug)]
pub struct CleanupConfig {
    pub initial_delay: Duration,
    pub max_retries: u32,
    pub base_delay: Duration,
}

/// Visitor tracking settings
#[derive(Clone, Debug)]
pub struct VisitConfig {
    pub cookie_max_age_days: i64,
    pub dedup_window_minutes: i64,
    pub geoip_url: Option<String>,
    pub trusted_proxy_count: usize,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub base: BaseConfig,
    pub database_url: String,
    pub media: MediaConfig,
    pub upload: UploadConfig,
    pub cleanup: CleanupConfig,
    pub visits: VisitConfig,
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("NODE_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| DEFAULT_CORS_ORIGINS.to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let base = BaseConfig {
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            server_port: env::var("SERVER_PORT")
                .or_else(|_| env::var("PORT"))
                .unwrap_or_else(|_| SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("SERVER_PORT must be a valid number"))?,
            cors_origins,
            db_max_connections: env_or("DATABASE_MAX_CONNECTIONS", MAX_CONNECTIONS),
            db_timeout_seconds: env_or("DATABASE_TIMEOUT_SECONDS", CONNECTION_TIMEOUT_SECS),
            jwt_secret: env::var("JWT_SECRET")
                .map_err(|_| anyhow::anyhow!("JWT_SECRET must be set for authentication"))?,
            jwt_expiry_hours: env_or("JWT_EXPIRY_HOURS", JWT_EXPIRY_HOURS),
            environment,
        };

        let backend = env::var("MEDIA_BACKEND")
            .unwrap_or_else(|_| "cloudinary".to_string())
            .parse::<MediaBackend>()?;

        let media = MediaConfig {
            backend,
            cloudinary_cloud_name: env_opt("CLOUDINARY_CLOUD_NAME"),
            cloudinary_api_key: env_opt("CLOUDINARY_API_KEY"),
            cloudinary_api_secret: env_opt("CLOUDINARY_API_SECRET"),
            local_media_path: PathBuf::from(
                env::var("LOCAL_MEDIA_PATH").unwrap_or_else(|_| "media".to_string()),
            ),
            local_media_base_url: env::var("LOCAL_MEDIA_BASE_URL")
                .unwrap_or_else(|_| format!("http://localhost:{}/media", base.server_port)),
            image_folder: env::var("MEDIA_IMAGE_FOLDER")
                .unwrap_or_else(|_| "showroom_images".to_string()),
            file_folder: env::var("MEDIA_FILE_FOLDER")
                .unwrap_or_else(|_| "showroom_files".to_string()),
            video_folder: env::var("MEDIA_VIDEO_FOLDER")
                .unwrap_or_else(|_| "showroom_videos".to_string()),
            image_primary_quality: env_or("IMAGE_PRIMARY_QUALITY", IMAGE_PRIMARY_QUALITY),
            image_fallback_quality: env_or("IMAGE_FALLBACK_QUALITY", IMAGE_FALLBACK_QUALITY),
            image_size_threshold_bytes: env_or("IMAGE_SIZE_THRESHOLD_KB", IMAGE_SIZE_THRESHOLD_KB)
                * 1024,
        };

        let upload = UploadConfig {
            temp_dir: PathBuf::from(
                env::var("UPLOAD_TEMP_DIR").unwrap_or_else(|_| "temp-uploads".to_string()),
            ),
            max_file_size_bytes: env_or("UPLOAD_MAX_FILE_SIZE_MB", MAX_FILE_SIZE_MB) * 1024 * 1024,
            max_files_per_field: env_or("UPLOAD_MAX_FILES", MAX_FILES_PER_FIELD),
            max_car_images: env_or("UPLOAD_MAX_CAR_IMAGES", MAX_CAR_IMAGES),
        };

        let cleanup = CleanupConfig {
            initial_delay: Duration::from_millis(env_or(
                "CLEANUP_INITIAL_DELAY_MS",
                CLEANUP_INITIAL_DELAY_MS,
            )),
            max_retries: env_or("CLEANUP_MAX_RETRIES", CLEANUP_MAX_RETRIES),
            base_delay: Duration::from_millis(env_or("CLEANUP_BASE_DELAY_MS", CLEANUP_BASE_DELAY_MS)),
        };

        let visits = VisitConfig {
            cookie_max_age_days: env_or("VISITOR_COOKIE_DAYS", VISITOR_COOKIE_DAYS),
            dedup_window_minutes: env_or("VISIT_DEDUP_MINUTES", VISIT_DEDUP_MINUTES),
            geoip_url: env_opt("GEOIP_URL"),
            trusted_proxy_count: env_or("TRUSTED_PROXY_COUNT", TRUSTED_PROXY_COUNT),
        };

        Ok(Config {
            base,
            database_url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?,
            media,
            upload,
            cleanup,
            visits,
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.base.jwt_secret.len() < 32 {
            return Err(anyhow::anyhow!(
                "JWT_SECRET must be at least 32 characters long"
            ));
        }

        if !self.database_url.starts_with("postgresql://")
            && !self.database_url.starts_with("postgres://")
        {
            return Err(anyhow::anyhow!(
                "DATABASE_URL must be a valid PostgreSQL connection string"
            ));
        }

        if self.is_production() && self.base.cors_origins.iter().any(|o| o == "*") {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot contain '*' in production. Please specify explicit origins."
            ));
        }

        if self.media.backend == MediaBackend::Cloudinary
            && (self.media.cloudinary_cloud_name.is_none()
                || self.media.cloudinary_api_key.is_none()
                || self.media.cloudinary_api_secret.is_none())
        {
            return Err(anyhow::anyhow!(
                "CLOUDINARY_CLOUD_NAME, CLOUDINARY_API_KEY and CLOUDINARY_API_SECRET must be set when using the cloudinary media backend"
            ));
        }

        let quality_range = 1.0..=100.0;
        if !quality_range.contains(&self.media.image_primary_quality)
            || !quality_range.contains(&self.media.image_fallback_quality)
        {
            return Err(anyhow::anyhow!("Image qualities must be between 1 and 100"));
        }

        if self.media.image_fallback_quality > self.media.image_primary_quality {
            return Err(anyhow::anyhow!(
                "IMAGE_FALLBACK_QUALITY must not exceed IMAGE_PRIMARY_QUALITY"
            ));
        }

        if self.upload.max_file_size_bytes == 0 || self.upload.max_files_per_field == 0 {
            return Err(anyhow::anyhow!("Upload limits must be greater than zero"));
        }

        if self.visits.dedup_window_minutes <= 0 || self.visits.cookie_max_age_days <= 0 {
            return Err(anyhow::anyhow!(
                "VISIT_DEDUP_MINUTES and VISITOR_COOKIE_DAYS must be positive"
            ));
        }

        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.base.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.base.server_host, self.base.server_port)
    }

    pub fn jwt_secret(&self) -> &str {
        &self.base.jwt_secret
    }

    pub fn jwt_expiry_hours(&self) -> i64 {
        self.base.jwt_expiry_hours
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.base.cors_origins
    }

    /// Largest multipart body the router accepts: every file at its limit plus form overhead.
    pub fn max_request_body_bytes(&self) -> usize {
        let files = self.upload.max_car_images.max(self.upload.max_files_per_field);
        self.upload
            .max_file_size_bytes
            .saturating_mul(files)
            .saturating_add(1024 * 1024)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Config {
        Config {
            base: BaseConfig {
                server_host: "127.0.0.1".to_string(),
                server_port: 3000,
                cors_origins: vec!["http://localhost:5173".to_string()],
                db_max_connections: 5,
                db_timeout_seconds: 5,
                jwt_secret: "x".repeat(32),
                jwt_expiry_hours: 24,
                environment: "development".to_string(),
            },
            database_url: "postgresql://localhost/showroom".to_string(),
            media: MediaConfig {
                backend: MediaBackend::Local,
                cloudinary_cloud_name: None,
                cloudinary_api_key: None,
                cloudinary_api_secret: None,
                local_media_path: PathBuf::from("media"),
                local_media_base_url: "http://localhost:3000/media".to_string(),
                image_folder: "images".to_string(),
                file_folder: "files".to_string(),
                video_folder: "videos".to_string(),
                image_primary_quality: 80.0,
                image_fallback_quality: 75.0,
                image_size_threshold_bytes: 350 * 1024,
            },
            upload: UploadConfig {
                temp_dir: PathBuf::from("temp-uploads"),
                max_file_size_bytes: 50 * 1024 * 1024,
                max_files_per_field: 10,
                max_car_images: 15,
            },
            cleanup: CleanupConfig {
                initial_delay: Duration::from_millis(500),
                max_retries: 5,
                base_delay: Duration::from_millis(200),
            },
            visits: VisitConfig {
                cookie_max_age_days: 30,
                dedup_window_minutes: 60,
                geoip_url: None,
                trusted_proxy_count: 1,
            },
        }
    }

    #[test]
    fn test_sample_config_is_valid() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn test_short_jwt_secret_rejected() {
        let mut config = sample();
        config.base.jwt_secret = "short".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_cloudinary_requires_credentials() {
        let mut config = sample();
        config.media.backend = MediaBackend::Cloudinary;
        assert!(config.validate().is_err());

        config.media.cloudinary_cloud_name = Some("demo".to_string());
        config.media.cloudinary_api_key = Some("key".to_string());
        config.media.cloudinary_api_secret = Some("secret".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_fallback_quality_above_primary_rejected() {
        let mut config = sample();
        config.media.image_fallback_quality = 90.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_wildcard_cors_rejected_in_production() {
        let mut config = sample();
        config.base.environment = "production".to_string();
        config.base.cors_origins = vec!["*".to_string()];
        assert!(config.is_production());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_body_limit_covers_largest_batch() {
        let config = sample();
        assert!(config.max_request_body_bytes() >= 15 * 50 * 1024 * 1024);
    }
}
