//! Client IP extraction
//!
//! Behind a reverse proxy the socket address is the proxy's, so the client is read
//! from `X-Forwarded-For` (skipping the configured number of trusted proxies), then
//! `X-Real-IP`, then the socket address.

use axum::http::HeaderMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

pub const UNKNOWN_IP: &str = "unknown";

/// Best-effort client address as a string, `"unknown"` when nothing usable is present.
pub fn extract_client_ip(
    headers: &HeaderMap,
    socket_addr: Option<&SocketAddr>,
    trusted_proxy_count: usize,
) -> String {
    if let Some(ip) = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| extract_from_forwarded_for(v, trusted_proxy_count))
    {
        return normalize_ip(ip).to_string();
    }

    if let Some(ip) = headers
        .get("x-real-ip")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<IpAddr>().ok())
    {
        return normalize_ip(ip).to_string();
    }

    match socket_addr {
        Some(addr) => normalize_ip(addr.ip()).to_string(),
        None => UNKNOWN_IP.to_string(),
    }
}

/// The chain reads `client, proxy1, proxy2`; with N trusted proxies the client sits
/// just before the last N entries. Short chains fall back to the first entry.
fn extract_from_forwarded_for(header_value: &str, trusted_proxy_count: usize) -> Option<IpAddr> {
    let ips: Vec<&str> = header_value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    let position = ips.len().saturating_sub(trusted_proxy_count + 1);
    ips.get(position).and_then(|ip| ip.parse::<IpAddr>().ok())
}

/// Loopback IPv6 becomes `127.0.0.1`; IPv4-mapped IPv6 becomes plain IPv4.
pub fn normalize_ip(ip: IpAddr) -> IpAddr {
    match ip {
        IpAddr::V6(v6) if v6.is_loopback() => IpAddr::V4(Ipv4Addr::LOCALHOST),
        IpAddr::V6(v6) => v6.to_ipv4_mapped().map(IpAddr::V4).unwrap_or(ip),
        v4 => v4,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(name: &'static str, value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(name, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_forwarded_for_with_one_proxy_takes_client() {
        let headers = headers_with("x-forwarded-for", "203.0.113.7, 10.0.0.1");
        assert_eq!(extract_client_ip(&headers, None, 1), "203.0.113.7");
    }

    #[test]
    fn test_single_forwarded_entry() {
        let headers = headers_with("x-forwarded-for", "203.0.113.7");
        assert_eq!(extract_client_ip(&headers, None, 1), "203.0.113.7");
        assert_eq!(extract_client_ip(&headers, None, 0), "203.0.113.7");
    }

    #[test]
    fn test_multiple_proxies() {
        assert_eq!(
            extract_from_forwarded_for("198.51.100.2, 203.0.113.7, 10.0.0.1", 1),
            "203.0.113.7".parse().ok()
        );
        assert_eq!(
            extract_from_forwarded_for("198.51.100.2, 203.0.113.7, 10.0.0.1", 2),
            "198.51.100.2".parse().ok()
        );
    }

    #[test]
    fn test_invalid_forwarded_falls_back_to_real_ip() {
        let mut headers = headers_with("x-forwarded-for", "not-an-ip");
        headers.insert("x-real-ip", HeaderValue::from_static("198.51.100.9"));
        assert_eq!(extract_client_ip(&headers, None, 1), "198.51.100.9");
    }

    #[test]
    fn test_socket_fallback_normalizes_loopback() {
        let addr: SocketAddr = "[::1]:5000".parse().unwrap();
        assert_eq!(extract_client_ip(&HeaderMap::new(), Some(&addr), 1), "127.0.0.1");
        assert_eq!(extract_client_ip(&HeaderMap::new(), None, 1), UNKNOWN_IP);
    }

    #[test]
    fn test_ipv4_mapped_is_unwrapped() {
        let ip: IpAddr = "::ffff:192.0.2.1".parse().unwrap();
        assert_eq!(normalize_ip(ip).to_string(), "192.0.2.1");
    }
}
