//! Recovering host identifiers from delivery URLs

use regex::Regex;
use std::sync::LazyLock;

use crate::traits::ResourceType;

static ASSET_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/upload/(?:v\d+/)?(.+?)\.\w{3,4}$").expect("static public id pattern")
});

// Video containers have longer extensions on occasion (".mpeg", ".webm2"), so
// anything after the final dot is accepted.
static VIDEO_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/upload/(?:v\d+/)?(.+?)\.\w+$").expect("static video public id pattern")
});

// Raw assets keep their extension in the public id.
static RAW_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/upload/(?:v\d+/)?(.+\.\w+)$").expect("static raw public id pattern")
});

/// Extract the public id (folder included) from a delivery URL.
///
/// Returns `None` when the URL does not follow the `/upload/[v123/]id.ext` layout.
/// For raw assets the extension is part of the id.
pub fn extract_public_id(url: &str, resource_type: ResourceType) -> Option<String> {
    let url = url.split(['?', '#']).next().unwrap_or(url);
    let re = match resource_type {
        ResourceType::Video => &VIDEO_ID_RE,
        ResourceType::Raw => &RAW_ID_RE,
        _ => &ASSET_ID_RE,
    };
    re.captures(url)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .filter(|id| !id.is_empty())
}

/// Resource type a stored URL was delivered as.
pub fn resource_type_from_url(url: &str) -> ResourceType {
    if url.contains("/video/upload/") {
        ResourceType::Video
    } else if url.contains("/raw/upload/") {
        ResourceType::Raw
    } else {
        ResourceType::Image
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_versioned_image_id() {
        let url = "https://res.cloudinary.com/demo/image/upload/v1712345678/showroom_images/abc123.webp";
        assert_eq!(
            extract_public_id(url, ResourceType::Image).as_deref(),
            Some("showroom_images/abc123")
        );
    }

    #[test]
    fn test_extract_without_version() {
        let url = "https://res.cloudinary.com/demo/image/upload/showroom_files/report.pdf";
        assert_eq!(
            extract_public_id(url, ResourceType::Image).as_deref(),
            Some("showroom_files/report")
        );
    }

    #[test]
    fn test_extract_video_id() {
        let url = "https://res.cloudinary.com/demo/video/upload/v1/showroom_videos/clip.quicktime";
        assert_eq!(extract_public_id(url, ResourceType::Image), None);
        assert_eq!(
            extract_public_id(url, ResourceType::Video).as_deref(),
            Some("showroom_videos/clip")
        );
    }

    #[test]
    fn test_extract_miss() {
        assert_eq!(
            extract_public_id("https://example.com/some/file.png", ResourceType::Image),
            None
        );
        assert_eq!(
            extract_public_id("https://x/image/upload/v12/noext", ResourceType::Image),
            None
        );
    }

    #[test]
    fn test_raw_id_keeps_extension() {
        let url = "https://res.cloudinary.com/demo/raw/upload/v1712345678/showroom_files/brief.pdf";
        let rt = resource_type_from_url(url);
        assert_eq!(rt, ResourceType::Raw);
        assert_eq!(
            extract_public_id(url, rt).as_deref(),
            Some("showroom_files/brief.pdf")
        );
        assert_eq!(
            extract_public_id("https://x/raw/upload/v1/noext", ResourceType::Raw),
            None
        );
    }

    #[test]
    fn test_query_string_is_ignored() {
        let url = "https://x/image/upload/v12/a/b.png?_a=1";
        assert_eq!(extract_public_id(url, ResourceType::Image).as_deref(), Some("a/b"));
    }

    #[test]
    fn test_resource_type_from_url() {
        assert_eq!(resource_type_from_url("https://x/video/upload/v1/a.mp4"), ResourceType::Video);
        assert_eq!(resource_type_from_url("https://x/raw/upload/v1/a.pdf"), ResourceType::Raw);
        assert_eq!(resource_type_from_url("https://x/image/upload/v1/a.png"), ResourceType::Image);
    }
}
