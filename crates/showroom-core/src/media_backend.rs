use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Remote media host backends
///
/// Defined in core because configuration selects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaBackend {
    Cloudinary,
    Local,
}

impl FromStr for MediaBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cloudinary" => Ok(MediaBackend::Cloudinary),
            "local" => Ok(MediaBackend::Local),
            _ => Err(anyhow::anyhow!("Invalid media backend: {}", s)),
        }
    }
}

impl Display for MediaBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            MediaBackend::Cloudinary => write!(f, "cloudinary"),
            MediaBackend::Local => write!(f, "local"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_backend() {
        assert_eq!("Cloudinary".parse::<MediaBackend>().unwrap(), MediaBackend::Cloudinary);
        assert_eq!(" local ".parse::<MediaBackend>().unwrap(), MediaBackend::Local);
        assert!("s3".parse::<MediaBackend>().is_err());
    }
}
