//! Async loading of the wind texture and coastline geometry.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use renderer::PixelBuffer;
use reqwest::Client;
use tracing::{debug, instrument};
use windmap_common::LoadError;

/// An input location: a local file or an http(s) URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    File(PathBuf),
    Url(String),
}

impl Source {
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        if s.starts_with("http://") || s.starts_with("https://") {
            Source::Url(s.to_string())
        } else {
            Source::File(PathBuf::from(s))
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::File(path) => write!(f, "{}", path.display()),
            Source::Url(url) => f.write_str(url),
        }
    }
}

/// Fetches and decodes map inputs.
pub struct WindTextureLoader {
    client: Client,
}

impl WindTextureLoader {
    pub fn new(request_timeout: Duration) -> Result<Self, LoadError> {
        let client = Client::builder()
            .timeout(request_timeout)
            .connect_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| LoadError::Transport {
                url: String::new(),
                message: format!("Failed to create HTTP client: {}", e),
            })?;
        Ok(Self { client })
    }

    /// Fetch the raw bytes behind `source`.
    #[instrument(skip(self, source), fields(source = %source))]
    pub async fn fetch(&self, source: &Source) -> Result<Vec<u8>, LoadError> {
        let bytes = match source {
            Source::File(path) => tokio::fs::read(path).await.map_err(|e| LoadError::Io {
                path: path.display().to_string(),
                message: e.to_string(),
            })?,
            Source::Url(url) => self.download(url).await?,
        };
        debug!(bytes = bytes.len(), "Fetched input");
        Ok(bytes)
    }

    /// Load the wind texture as straight RGBA.
    pub async fn load(&self, source: &Source) -> Result<PixelBuffer, LoadError> {
        let bytes = self.fetch(source).await?;
        decode_texture(&bytes, &source.to_string())
    }

    /// Load coastline GeoJSON as text.
    pub async fn load_text(&self, source: &Source) -> Result<String, LoadError> {
        let bytes = self.fetch(source).await?;
        String::from_utf8(bytes).map_err(|e| LoadError::Decode {
            source_name: source.to_string(),
            message: e.to_string(),
        })
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, LoadError> {
        let transport = |e: reqwest::Error| LoadError::Transport {
            url: url.to_string(),
            message: e.to_string(),
        };

        let response = self.client.get(url).send().await.map_err(transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.bytes().await.map_err(transport)?;
        Ok(body.to_vec())
    }
}

/// Decode an encoded image (PNG, JPEG, ...) into an RGBA pixel buffer.
pub fn decode_texture(bytes: &[u8], source_name: &str) -> Result<PixelBuffer, LoadError> {
    let image = image::load_from_memory(bytes).map_err(|e| LoadError::Decode {
        source_name: source_name.to_string(),
        message: e.to_string(),
    })?;
    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    PixelBuffer::new(width, height, rgba.into_raw())
}
