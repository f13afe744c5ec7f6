//! Adaptor production
//!
//! The mediation host creates one [`AdaptorFactory`] per integrated ad
//! network and asks it for an adaptor per placement. The factory owns
//! everything the adaptors share: the pooled HTTP fetcher, the
//! process-wide interstitial slot, the validated configuration, and the
//! host collaborator objects for presentation and click navigation.

use crate::adaptor::MeganetAdaptor;
use crate::config::AdaptorConfig;
use crate::error::Result;
use crate::fetcher::ImageFetcher;
use crate::presenter::{InterstitialPresenter, PresentationLauncher, UnboundLauncher};
use crate::surface::{ClickNavigator, LoggingNavigator};
use std::sync::Arc;

/// Produces wired [`MeganetAdaptor`] instances
pub struct AdaptorFactory {
    config: Arc<AdaptorConfig>,
    fetcher: Arc<ImageFetcher>,
    presenter: InterstitialPresenter,
    launcher: Arc<dyn PresentationLauncher>,
    navigator: Arc<dyn ClickNavigator>,
}

impl std::fmt::Debug for AdaptorFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdaptorFactory").finish_non_exhaustive()
    }
}

impl AdaptorFactory {
    /// Build a factory from a validated configuration.
    ///
    /// Until [`with_launcher`](Self::with_launcher) registers a real
    /// presentation host, interstitial launches fail and are reported
    /// through the listener; clicks log through [`LoggingNavigator`]
    /// until [`with_navigator`](Self::with_navigator) replaces it.
    pub fn new(config: AdaptorConfig) -> Result<Self> {
        config.validate()?;
        let fetcher = Arc::new(ImageFetcher::new(&config)?);
        tracing::info!("adaptor factory initialized");
        Ok(Self {
            config: Arc::new(config),
            fetcher,
            presenter: InterstitialPresenter::new(),
            launcher: Arc::new(UnboundLauncher),
            navigator: Arc::new(LoggingNavigator),
        })
    }

    /// Register the host's full-screen presentation launcher
    pub fn with_launcher(mut self, launcher: Arc<dyn PresentationLauncher>) -> Self {
        self.launcher = launcher;
        self
    }

    /// Register the host's click-through navigator
    pub fn with_navigator(mut self, navigator: Arc<dyn ClickNavigator>) -> Self {
        self.navigator = navigator;
        self
    }

    /// The shared interstitial slot.
    ///
    /// The presentation host uses this handle to fetch the surface to
    /// render ([`InterstitialPresenter::take_surface`]) and to signal
    /// dismissal ([`InterstitialPresenter::on_dismiss`]).
    pub fn presenter(&self) -> InterstitialPresenter {
        self.presenter.clone()
    }

    /// Create an adaptor for one placement.
    ///
    /// `view_id` identifies the host view this adaptor serves (logged,
    /// not interpreted); `network_name` is reported back through every
    /// listener callback.
    pub fn create_adaptor(&self, view_id: &str, network_name: &str) -> MeganetAdaptor {
        MeganetAdaptor::new(
            view_id,
            network_name,
            Arc::clone(&self.config),
            Arc::clone(&self.fetcher),
            self.presenter.clone(),
            Arc::clone(&self.launcher),
            Arc::clone(&self.navigator),
        )
    }
}
