//! Country lookup for visit analytics
//!
//! The lookup is advisory: any failure yields `None` and the visit is stored with
//! an unknown country.

use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use showroom_core::{AppError, Config};

const LOOKUP_TIMEOUT: Duration = Duration::from_secs(2);
const COUNTRY_KEYS: &[&str] = &["country_code", "countryCode", "country"];

#[async_trait]
pub trait GeoLocator: Send + Sync {
    /// Country for a client address, `None` when unknown.
    async fn country(&self, ip: &str) -> Option<String>;
}

/// Used when no lookup service is configured
pub struct NoopGeoLocator;

#[async_trait]
impl GeoLocator for NoopGeoLocator {
    async fn country(&self, _ip: &str) -> Option<String> {
        None
    }
}

/// Queries an HTTP endpoint. The URL may contain `{ip}`; otherwise the address is
/// appended as a path segment. Both JSON bodies (`country_code`, `countryCode` or
/// `country`) and plain-text bodies are understood.
pub struct HttpGeoLocator {
    client: reqwest::Client,
    url_template: String,
}

impl HttpGeoLocator {
    pub fn new(url_template: impl Into<String>) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(LOOKUP_TIMEOUT)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build geo client: {}", e)))?;
        Ok(Self {
            client,
            url_template: url_template.into(),
        })
    }

    fn lookup_url(&self, ip: &str) -> String {
        if self.url_template.contains("{ip}") {
            self.url_template.replace("{ip}", ip)
        } else {
            format!("{}/{}", self.url_template.trim_end_matches('/'), ip)
        }
    }
}

#[async_trait]
impl GeoLocator for HttpGeoLocator {
    async fn country(&self, ip: &str) -> Option<String> {
        let addr: IpAddr = ip.parse().ok()?;
        if !is_public(&addr) {
            return None;
        }

        let response = match self.client.get(self.lookup_url(ip)).send().await {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                tracing::warn!(status = %response.status(), "Geo lookup rejected");
                return None;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Geo lookup failed");
                return None;
            }
        };

        let body = response.text().await.ok()?;
        parse_country(&body)
    }
}

pub fn create_geo_locator(config: &Config) -> Result<Arc<dyn GeoLocator>, AppError> {
    match config.visits.geoip_url.as_deref() {
        Some(url) if !url.trim().is_empty() => {
            tracing::info!("Geo lookup enabled for visit tracking");
            Ok(Arc::new(HttpGeoLocator::new(url.trim())?))
        }
        _ => Ok(Arc::new(NoopGeoLocator)),
    }
}

fn is_public(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => {
            !(v4.is_private()
                || v4.is_loopback()
                || v4.is_link_local()
                || v4.is_unspecified()
                || v4.is_broadcast())
        }
        IpAddr::V6(v6) => {
            !(v6.is_loopback() || v6.is_unspecified() || (v6.segments()[0] & 0xfe00) == 0xfc00)
        }
    }
}

fn parse_country(body: &str) -> Option<String> {
    let body = body.trim();
    if let Ok(serde_json::Value::Object(map)) = serde_json::from_str::<serde_json::Value>(body) {
        return COUNTRY_KEYS
            .iter()
            .filter_map(|key| map.get(*key).and_then(|v| v.as_str()))
            .map(str::trim)
            .find(|v| !v.is_empty())
            .map(str::to_string);
    }

    let plain = body.len() <= 64
        && !body.is_empty()
        && body.chars().all(|c| c.is_alphanumeric() || c == ' ');
    plain.then(|| body.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json_body() {
        assert_eq!(
            parse_country(r#"{"ip":"8.8.8.8","country_code":"US","country":"United States"}"#),
            Some("US".to_string())
        );
        assert_eq!(
            parse_country(r#"{"country":"DE"}"#),
            Some("DE".to_string())
        );
        assert_eq!(parse_country(r#"{"error":true}"#), None);
    }

    #[test]
    fn test_parse_plain_body() {
        assert_eq!(parse_country("GB\n"), Some("GB".to_string()));
        assert_eq!(parse_country("<html>rate limited</html>"), None);
        assert_eq!(parse_country(""), None);
    }

    #[test]
    fn test_lookup_url() {
        let locator = HttpGeoLocator::new("https://geo.example/{ip}/json").unwrap();
        assert_eq!(locator.lookup_url("8.8.8.8"), "https://geo.example/8.8.8.8/json");
        let locator = HttpGeoLocator::new("https://geo.example/lookup/").unwrap();
        assert_eq!(locator.lookup_url("8.8.8.8"), "https://geo.example/lookup/8.8.8.8");
    }

    #[tokio::test]
    async fn test_private_addresses_skip_lookup() {
        let locator = HttpGeoLocator::new("http://127.0.0.1:9/{ip}").unwrap();
        assert_eq!(locator.country("192.168.1.10").await, None);
        assert_eq!(locator.country("127.0.0.1").await, None);
        assert_eq!(locator.country("unknown").await, None);
    }
}
