//! Creative surfaces
//!
//! An [`AdSurface`] is the visual artifact the adaptor hands back to the
//! mediation host: the fetched raster plus the click wiring. It holds
//! only a weak back-reference to its adaptor, so a surface retained by
//! the host (or by the interstitial slot) never keeps a destroyed
//! adaptor alive, and a click on an orphaned surface is a silent no-op.

use crate::adaptor::AdaptorInner;
use crate::fetcher::AdImage;
use crate::utils::lock;
use std::sync::{Mutex, Weak};

/// Host collaborator that navigates to a click-through destination.
///
/// Navigation failure is tolerated: the click is still reported to the
/// mediation host either way.
pub trait ClickNavigator: Send + Sync {
    /// Open the destination; `Err` carries a human-readable cause.
    fn open(&self, url: &str) -> std::result::Result<(), String>;
}

/// Default navigator: records the destination in the log and succeeds.
///
/// Embedders with a real browser or deep-link path provide their own
/// [`ClickNavigator`] through the factory.
pub struct LoggingNavigator;

impl ClickNavigator for LoggingNavigator {
    fn open(&self, url: &str) -> std::result::Result<(), String> {
        tracing::info!(url, "click-through navigation requested");
        Ok(())
    }
}

/// One creative surface produced by an ad request
pub struct AdSurface {
    adaptor: Weak<AdaptorInner>,
    /// Snapshot of the interstitial flag at request time; click reports
    /// must reflect the mode the surface was created for, not whatever
    /// the adaptor mutated to afterwards.
    interstitial: bool,
    image: Mutex<Option<AdImage>>,
}

impl AdSurface {
    pub(crate) fn new(adaptor: Weak<AdaptorInner>, interstitial: bool) -> Self {
        Self {
            adaptor,
            interstitial,
            image: Mutex::new(None),
        }
    }

    /// Whether the creative has finished fetching
    pub fn has_image(&self) -> bool {
        lock(&self.image).is_some()
    }

    /// Clone out the fetched creative, if any
    pub fn image(&self) -> Option<AdImage> {
        lock(&self.image).clone()
    }

    /// Width and height of the fetched creative, if any
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        lock(&self.image)
            .as_ref()
            .map(|image| (image.width(), image.height()))
    }

    /// Whether this surface was created for an interstitial request
    pub fn is_interstitial(&self) -> bool {
        self.interstitial
    }

    pub(crate) fn set_image(&self, image: AdImage) {
        *lock(&self.image) = Some(image);
    }

    /// Report a user click on this creative.
    ///
    /// Navigates to the configured click-through destination (silently
    /// tolerating failure) and notifies the mediation host. No-op once
    /// the owning adaptor is gone or destroyed.
    pub fn click(&self) {
        let Some(adaptor) = self.adaptor.upgrade() else {
            tracing::debug!("click on a surface whose adaptor was released");
            return;
        };
        if adaptor.is_destroyed() {
            tracing::debug!("click on a surface whose adaptor was destroyed");
            return;
        }
        adaptor.handle_click(self.interstitial);
    }
}
