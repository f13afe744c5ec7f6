//! Creative image fetching and decoding
//!
//! [`ImageFetcher`] performs one blocking-from-the-caller's-view HTTP GET
//! per creative, decodes the body into a raster, and applies the display
//! density scale factor. The public [`fetch`](ImageFetcher::fetch) entry
//! collapses every failure — malformed URL, connection error, oversized
//! or empty body, undecodable bytes — into an absent result; nothing
//! escapes to the worker task that drives it.

use crate::config::AdaptorConfig;
use crate::error::{Error, FetchError, Result};
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};
use url::Url;

/// A decoded, density-scaled creative raster
#[derive(Clone, Debug)]
pub struct AdImage {
    inner: DynamicImage,
}

impl AdImage {
    /// Width in pixels after scaling
    pub fn width(&self) -> u32 {
        self.inner.width()
    }

    /// Height in pixels after scaling
    pub fn height(&self) -> u32 {
        self.inner.height()
    }

    /// Borrow the underlying raster for rendering
    pub fn as_image(&self) -> &DynamicImage {
        &self.inner
    }

    /// Consume the wrapper and take the raster
    pub fn into_inner(self) -> DynamicImage {
        self.inner
    }
}

impl From<DynamicImage> for AdImage {
    fn from(inner: DynamicImage) -> Self {
        Self { inner }
    }
}

/// Fetches creative images over HTTP
///
/// One fetcher is shared by every adaptor a factory produces; the inner
/// `reqwest` client pools and reuses connections across fetches.
#[derive(Clone, Debug)]
pub struct ImageFetcher {
    client: reqwest::Client,
    max_image_bytes: u64,
}

impl ImageFetcher {
    /// Build a fetcher from the adaptor configuration
    pub fn new(config: &AdaptorConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.fetch_timeout)
            .build()
            .map_err(|e| Error::Config {
                message: format!("failed to build HTTP client: {e}"),
                key: None,
            })?;
        Ok(Self {
            client,
            max_image_bytes: config.max_image_bytes,
        })
    }

    /// Fetch and decode one creative, scaled by `scale`.
    ///
    /// Returns `None` on any failure; the cause is logged at warn level.
    pub async fn fetch(&self, url: &str, scale: f32) -> Option<AdImage> {
        match self.try_fetch(url, scale).await {
            Ok(image) => Some(image),
            Err(e) => {
                tracing::warn!(url, error = %e, "creative fetch failed");
                None
            }
        }
    }

    pub(crate) async fn try_fetch(
        &self,
        raw_url: &str,
        scale: f32,
    ) -> std::result::Result<AdImage, FetchError> {
        // Tolerate unescaped spaces in server-supplied URLs.
        let escaped = raw_url.replace(' ', "%20");
        let url = Url::parse(&escaped).map_err(|e| FetchError::MalformedUrl(e.to_string()))?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        let body = self.read_body(response).await?;
        if body.is_empty() {
            return Err(FetchError::EmptyBody);
        }

        let decoded =
            image::load_from_memory(&body).map_err(|e| FetchError::Decode(e.to_string()))?;
        Ok(AdImage::from(scale_image(decoded, scale)))
    }

    /// Drain the response body chunk by chunk until end-of-stream.
    ///
    /// The body is pulled explicitly rather than trusting a single
    /// buffered read; a slow connection that stalls mid-body must surface
    /// as a request error, never as a truncated buffer handed to the
    /// decoder.
    async fn read_body(
        &self,
        mut response: reqwest::Response,
    ) -> std::result::Result<Vec<u8>, FetchError> {
        let mut body: Vec<u8> = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| FetchError::Request(e.to_string()))?
        {
            if body.len() as u64 + chunk.len() as u64 > self.max_image_bytes {
                return Err(FetchError::TooLarge {
                    limit: self.max_image_bytes,
                });
            }
            body.extend_from_slice(&chunk);
        }
        Ok(body)
    }
}

/// Resize a decoded creative if the scale factor calls for it.
///
/// Bilinear filtering; the identity scale returns the raster untouched.
fn scale_image(image: DynamicImage, scale: f32) -> DynamicImage {
    if (scale - 1.0).abs() < f32::EPSILON {
        return image;
    }
    let width = ((scale * image.width() as f32) as u32).max(1);
    let height = ((scale * image.height() as f32) as u32).max(1);
    image.resize_exact(width, height, FilterType::Triangle)
}
