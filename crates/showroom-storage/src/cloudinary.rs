//! Cloudinary upload API client
//!
//! Uses the signed REST endpoints directly: every request carries the API key, a
//! unix timestamp and a SHA-256 signature over the sorted parameters with the
//! API secret appended.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::time::Duration;

use crate::traits::{MediaHost, RemoteAsset, ResourceType, StorageError, StorageResult};

const DEFAULT_API_BASE: &str = "https://api.cloudinary.com/v1_1";

#[derive(Clone)]
pub struct CloudinaryHost {
    client: Client,
    api_base: String,
    cloud_name: String,
    api_key: String,
    api_secret: String,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
    public_id: String,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

impl CloudinaryHost {
    pub fn new(
        cloud_name: impl Into<String>,
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> StorageResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| StorageError::ConfigError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_base: DEFAULT_API_BASE.to_string(),
            cloud_name: cloud_name.into(),
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        })
    }

    /// Point the client at a different API root (a proxy or a local fake).
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self, resource_type: ResourceType, action: &str) -> String {
        format!(
            "{}/{}/{}/{}",
            self.api_base,
            self.cloud_name,
            resource_type.as_str(),
            action
        )
    }

    /// Sign `params` the way the upload API expects: `k1=v1&k2=v2` sorted by key,
    /// secret appended, SHA-256 hex digest.
    fn sign(&self, params: &[(&str, String)]) -> String {
        let mut sorted: Vec<_> = params.iter().filter(|(_, v)| !v.is_empty()).collect();
        sorted.sort_by(|a, b| a.0.cmp(b.0));
        let to_sign = sorted
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");

        let mut hasher = Sha256::new();
        hasher.update(to_sign.as_bytes());
        hasher.update(self.api_secret.as_bytes());
        hex::encode(hasher.finalize())
    }

    fn signed_form(&self, params: Vec<(&'static str, String)>) -> Form {
        let signature = self.sign(&params);
        params
            .into_iter()
            .fold(Form::new(), |form, (k, v)| form.text(k, v))
            .text("api_key", self.api_key.clone())
            .text("signature", signature)
            .text("signature_algorithm", "sha256")
    }

    async fn error_message(response: reqwest::Response) -> String {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        match serde_json::from_str::<ErrorBody>(&text) {
            Ok(body) => format!("{} ({})", body.error.message, status),
            Err(_) if text.is_empty() => status.to_string(),
            Err(_) => format!("{}: {}", status, text),
        }
    }
}

#[async_trait]
impl MediaHost for CloudinaryHost {
    #[tracing::instrument(skip(self, data), fields(host = "cloudinary", size = data.len()))]
    async fn upload(
        &self,
        data: Bytes,
        filename: &str,
        folder: &str,
        resource_type: ResourceType,
    ) -> StorageResult<RemoteAsset> {
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let form = self
            .signed_form(vec![("folder", folder.to_string()), ("timestamp", timestamp)])
            .part(
                "file",
                Part::stream(reqwest::Body::from(data)).file_name(filename.to_string()),
            );

        let response = self
            .client
            .post(self.endpoint(resource_type, "upload"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| StorageError::UploadFailed(format!("Request to media host failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(StorageError::UploadFailed(
                Self::error_message(response).await,
            ));
        }

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| StorageError::BackendError(format!("Unexpected upload response: {}", e)))?;

        tracing::debug!(public_id = %body.public_id, "Asset uploaded");

        Ok(RemoteAsset {
            secure_url: body.secure_url,
            public_id: body.public_id,
        })
    }

    #[tracing::instrument(skip(self), fields(host = "cloudinary"))]
    async fn destroy(&self, public_id: &str, resource_type: ResourceType) -> StorageResult<()> {
        if resource_type == ResourceType::Auto {
            return Err(StorageError::InvalidKey(
                "destroy needs a concrete resource type".to_string(),
            ));
        }

        let timestamp = chrono::Utc::now().timestamp().to_string();
        let form = self.signed_form(vec![
            ("public_id", public_id.to_string()),
            ("timestamp", timestamp),
        ]);

        let response = self
            .client
            .post(self.endpoint(resource_type, "destroy"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| StorageError::DeleteFailed(format!("Request to media host failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(StorageError::DeleteFailed(
                Self::error_message(response).await,
            ));
        }

        let body: DestroyResponse = response
            .json()
            .await
            .map_err(|e| StorageError::BackendError(format!("Unexpected destroy response: {}", e)))?;

        match body.result.as_str() {
            "ok" | "not found" => Ok(()),
            other => Err(StorageError::DeleteFailed(format!(
                "Host refused to delete {}: {}",
                public_id, other
            ))),
        }
    }

    fn name(&self) -> &'static str {
        "cloudinary"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host() -> CloudinaryHost {
        CloudinaryHost::new("demo", "key", "secret").unwrap()
    }

    #[test]
    fn test_signature_sorts_params_and_appends_secret() {
        let host = host();
        let sig = host.sign(&[
            ("timestamp", "1315060510".to_string()),
            ("folder", "showroom_images".to_string()),
        ]);

        let mut hasher = Sha256::new();
        hasher.update(b"folder=showroom_images&timestamp=1315060510secret");
        assert_eq!(sig, hex::encode(hasher.finalize()));
    }

    #[test]
    fn test_signature_skips_empty_values() {
        let host = host();
        assert_eq!(
            host.sign(&[("folder", String::new()), ("timestamp", "1".to_string())]),
            host.sign(&[("timestamp", "1".to_string())])
        );
    }

    #[test]
    fn test_endpoint_layout() {
        let host = host().with_api_base("http://localhost:9000/");
        assert_eq!(
            host.endpoint(ResourceType::Video, "destroy"),
            "http://localhost:9000/demo/video/destroy"
        );
    }
}
