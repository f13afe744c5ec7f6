//! Configuration types for meganet-adaptor

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// Adaptor behavior configuration
///
/// Everything here has a sensible default; `AdaptorConfig::default()`
/// produces a working configuration for a density-1.0 display with no
/// click-through destination.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AdaptorConfig {
    /// Display density of the host surface (default: 1.0)
    ///
    /// Fetched creatives are scaled by this factor so a logical-pixel
    /// image renders at native resolution. 1.0 means no scaling.
    #[serde(default = "default_display_density")]
    pub display_density: f32,

    /// Timeout for one creative fetch, connect through last body byte (default: 30s)
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout: Duration,

    /// User-Agent header sent with creative requests
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Destination opened when a creative is clicked (None = click is
    /// reported but navigation is skipped)
    #[serde(default)]
    pub click_through_url: Option<String>,

    /// Maximum creative body size in bytes (default: 10 MiB)
    ///
    /// A response exceeding this cap is treated as a fetch failure.
    #[serde(default = "default_max_image_bytes")]
    pub max_image_bytes: u64,
}

impl Default for AdaptorConfig {
    fn default() -> Self {
        Self {
            display_density: default_display_density(),
            fetch_timeout: default_fetch_timeout(),
            user_agent: default_user_agent(),
            click_through_url: None,
            max_image_bytes: default_max_image_bytes(),
        }
    }
}

impl AdaptorConfig {
    /// Validate the configuration
    ///
    /// Returns `Error::Config` naming the offending key on the first
    /// invalid setting found.
    pub fn validate(&self) -> Result<()> {
        if !self.display_density.is_finite() || self.display_density <= 0.0 {
            return Err(Error::Config {
                message: format!(
                    "display_density must be a positive finite number, got {}",
                    self.display_density
                ),
                key: Some("display_density".into()),
            });
        }
        if self.fetch_timeout.is_zero() {
            return Err(Error::Config {
                message: "fetch_timeout must be greater than zero".into(),
                key: Some("fetch_timeout".into()),
            });
        }
        if self.max_image_bytes == 0 {
            return Err(Error::Config {
                message: "max_image_bytes must be greater than zero".into(),
                key: Some("max_image_bytes".into()),
            });
        }
        if let Some(url) = &self.click_through_url
            && let Err(e) = Url::parse(url)
        {
            return Err(Error::Config {
                message: format!("click_through_url is not a valid url: {e}"),
                key: Some("click_through_url".into()),
            });
        }
        Ok(())
    }
}

fn default_display_density() -> f32 {
    1.0
}

fn default_fetch_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_user_agent() -> String {
    format!("meganet-adaptor/{}", env!("CARGO_PKG_VERSION"))
}

fn default_max_image_bytes() -> u64 {
    10 * 1024 * 1024
}
