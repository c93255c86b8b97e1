//! Raster sources: resolve a [`Locator`] into encoded image bytes.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::config::SourceConfig;
use crate::error::SourceError;

/// Where the bytes of an image come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    /// Local file
    Path(PathBuf),
    /// Already in memory
    Bytes(Vec<u8>),
    /// Remote `http(s)` resource
    Url(String),
}

impl Locator {
    /// Parse a user-supplied string.
    ///
    /// `http://` and `https://` become [`Locator::Url`], a base64 `data:` URL is
    /// decoded into [`Locator::Bytes`], anything else is a path (`~` expanded).
    pub fn parse(input: &str) -> Result<Self, SourceError> {
        let lower = input.get(..8).unwrap_or(input).to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            return Ok(Self::Url(input.to_string()));
        }
        if lower.starts_with("data:") {
            return parse_data_url(input).map(Self::Bytes);
        }
        let expanded = shellexpand::tilde(input);
        Ok(Self::Path(PathBuf::from(expanded.into_owned())))
    }

    /// Serialized form: the path or URL as given, bytes as a base64 data URL.
    pub fn to_uri(&self) -> String {
        match self {
            Self::Path(path) => path.to_string_lossy().into_owned(),
            Self::Bytes(bytes) => format!(
                "data:application/octet-stream;base64,{}",
                BASE64.encode(bytes)
            ),
            Self::Url(url) => url.clone(),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => write!(f, "{}", path.display()),
            Self::Bytes(bytes) => write!(f, "<{} bytes>", bytes.len()),
            Self::Url(url) => write!(f, "{url}"),
        }
    }
}

impl From<PathBuf> for Locator {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl From<Vec<u8>> for Locator {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

impl Serialize for Locator {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_uri())
    }
}

impl<'de> Deserialize<'de> for Locator {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Locator::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Accepts `data:<mime>;base64,<payload>` and the `data://` variant.
fn parse_data_url(input: &str) -> Result<Vec<u8>, SourceError> {
    let rest = &input[5..];
    let rest = rest.strip_prefix("//").unwrap_or(rest);
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| SourceError::InvalidDataUrl("missing ','".to_string()))?;
    if !meta.to_ascii_lowercase().ends_with(";base64") {
        return Err(SourceError::InvalidDataUrl(
            "only base64 payloads are supported".to_string(),
        ));
    }
    BASE64
        .decode(payload.trim())
        .map_err(|e| SourceError::InvalidDataUrl(e.to_string()))
}

/// Trait that all raster sources implement.
///
/// Uses `async_trait` so sources can live behind `Arc<dyn RasterSource>`.
#[async_trait]
pub trait RasterSource: Send + Sync {
    /// Resolve a locator into the raw (still encoded) image bytes.
    async fn load(&self, locator: &Locator) -> Result<Vec<u8>, SourceError>;
}

/// Filesystem + HTTP source.
pub struct ImageSource {
    client: reqwest::Client,
    fetch_timeout: Duration,
}

impl ImageSource {
    pub fn new(config: &SourceConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            fetch_timeout: Duration::from_millis(config.fetch_timeout_ms),
        }
    }

    async fn fetch(&self, url: &str) -> Result<Vec<u8>, SourceError> {
        let resp = self
            .client
            .get(url)
            .timeout(self.fetch_timeout)
            .send()
            .await
            .map_err(|e| self.request_error(e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(SourceError::FetchFailed {
                status: status.as_u16(),
            });
        }

        let bytes = resp.bytes().await.map_err(|e| self.request_error(e))?;
        Ok(bytes.to_vec())
    }

    fn request_error(&self, e: reqwest::Error) -> SourceError {
        if e.is_timeout() {
            SourceError::Timeout {
                timeout_ms: self.fetch_timeout.as_millis() as u64,
            }
        } else {
            SourceError::Request(e.to_string())
        }
    }
}

impl Default for ImageSource {
    fn default() -> Self {
        Self::new(&SourceConfig::default())
    }
}

#[async_trait]
impl RasterSource for ImageSource {
    async fn load(&self, locator: &Locator) -> Result<Vec<u8>, SourceError> {
        match locator {
            Locator::Path(path) => {
                if !path.is_file() {
                    return Err(SourceError::NotFound);
                }
                Ok(tokio::fs::read(path).await?)
            }
            Locator::Bytes(bytes) => Ok(bytes.clone()),
            Locator::Url(url) => self.fetch(url).await,
        }
    }
}
