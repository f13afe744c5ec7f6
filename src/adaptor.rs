//! The adaptor contract implementation
//!
//! [`MeganetAdaptor`] adapts server-supplied parameters and the
//! mediation host's load/fail/click listener contract onto the fetch
//! pipeline. Per instance: validate parameters, fetch one creative in
//! the background, then either hand the surface to the host (banner) or
//! route it through the shared [`InterstitialPresenter`] (interstitial).
//!
//! The lifecycle is `created → parameters validated → requesting →
//! loaded | failed`, with `loaded` optionally moving to `presenting` for
//! interstitials. `destroy` may interrupt at any point; afterwards every
//! lifecycle call and every pending fetch completion is a no-op —
//! completions carry only a weak reference here and re-check the
//! destroyed flag before touching anything.

use crate::config::AdaptorConfig;
use crate::coordinator::FetchCoordinator;
use crate::error::{Error, Result};
use crate::fetcher::{AdImage, ImageFetcher};
use crate::presenter::{InterstitialPresenter, PresentationLauncher};
use crate::surface::{AdSurface, ClickNavigator};
use crate::types::{
    AdKind, AdRequestParams, AdaptorAction, AdaptorListener, Delivery, PARAM_IMAGE_URL,
    StaleReason,
};
use crate::utils::lock;
use std::sync::{Arc, Mutex, Weak};

/// Per-instance mutable adaptor state
#[derive(Default)]
struct AdaptorState {
    /// Creative URL stored by a validated transaction
    image_url: Option<String>,
    /// Whether the current transaction is an interstitial
    interstitial: bool,
    /// Whether the current request is precaching (never auto-present)
    precache: bool,
    /// Set exactly once by `destroy`; the final backstop for callbacks
    destroyed: bool,
    /// The surface of the most recent request
    surface: Option<Arc<AdSurface>>,
}

pub(crate) struct AdaptorInner {
    network_name: String,
    config: Arc<AdaptorConfig>,
    presenter: InterstitialPresenter,
    launcher: Arc<dyn PresentationLauncher>,
    navigator: Arc<dyn ClickNavigator>,
    listener: Mutex<Option<Arc<dyn AdaptorListener>>>,
    state: Mutex<AdaptorState>,
    coordinator: Mutex<FetchCoordinator>,
}

/// One ad-network adaptor instance
///
/// Constructed by [`AdaptorFactory`](crate::factory::AdaptorFactory);
/// driven by the mediation host through the operations below. All
/// methods are cheap and non-blocking — fetch work runs on a spawned
/// worker task.
pub struct MeganetAdaptor {
    inner: Arc<AdaptorInner>,
}

impl MeganetAdaptor {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        view_id: &str,
        network_name: &str,
        config: Arc<AdaptorConfig>,
        fetcher: Arc<ImageFetcher>,
        presenter: InterstitialPresenter,
        launcher: Arc<dyn PresentationLauncher>,
        navigator: Arc<dyn ClickNavigator>,
    ) -> Self {
        tracing::debug!(view_id, network_name, "adaptor created");
        Self {
            inner: Arc::new(AdaptorInner {
                network_name: network_name.to_owned(),
                config,
                presenter,
                launcher,
                navigator,
                listener: Mutex::new(None),
                state: Mutex::new(AdaptorState::default()),
                coordinator: Mutex::new(FetchCoordinator::new(fetcher)),
            }),
        }
    }

    /// Register the host's outcome listener
    pub fn set_listener(&self, listener: Arc<dyn AdaptorListener>) {
        *lock(&self.inner.listener) = Some(listener);
    }

    /// Validate server-supplied parameters and store them.
    ///
    /// Fails with a validation error when the image URL is missing or
    /// empty; the interstitial flag is parsed case-insensitively and
    /// defaults to banner. No side effects beyond internal state. A
    /// destroyed adaptor ignores the call.
    pub fn start_transaction(&self, params: &AdRequestParams) -> Result<()> {
        let mut state = lock(&self.inner.state);
        if state.destroyed {
            tracing::debug!("start_transaction on a destroyed adaptor ignored");
            return Ok(());
        }

        let url = match params.image_url() {
            Some(url) if !url.is_empty() => url.to_owned(),
            _ => {
                return Err(Error::Validation {
                    message: format!("parameter '{PARAM_IMAGE_URL}' can not be null"),
                    key: Some(PARAM_IMAGE_URL.into()),
                });
            }
        };

        state.interstitial = params.is_interstitial();
        state.image_url = Some(url);
        tracing::debug!(
            interstitial = state.interstitial,
            "transaction started with parameters from server"
        );
        Ok(())
    }

    /// Request a fresh ad for immediate display.
    ///
    /// Starts a background fetch and returns the surface right away for
    /// banners; interstitials return `None` and are presented on fetch
    /// completion instead of being embedded inline.
    pub fn request_new_ad(&self) -> Option<Arc<AdSurface>> {
        self.begin_request(false)
    }

    /// Request an ad without presenting it on load.
    ///
    /// Identical to [`request_new_ad`](Self::request_new_ad) except the
    /// precache flag suppresses auto-presentation; an interstitial
    /// fetched this way waits for
    /// [`present_precached_interstitial`](Self::present_precached_interstitial).
    pub fn request_precached_ad(&self) -> Option<Arc<AdSurface>> {
        self.begin_request(true)
    }

    /// Present a previously precached interstitial.
    ///
    /// Reports load-failure with reason `"no precached ad available"`
    /// when no fetched creative is ready.
    pub fn present_precached_interstitial(&self) {
        let inner = &self.inner;
        let (surface, destroyed) = {
            let state = lock(&inner.state);
            (state.surface.clone(), state.destroyed)
        };
        if destroyed {
            tracing::debug!("present_precached_interstitial on a destroyed adaptor ignored");
            return;
        }

        match surface.filter(|s| s.has_image()) {
            Some(surface) => inner.start_interstitial(surface),
            None => inner.report_load_failed(true, "no precached ad available"),
        }
    }

    /// Cancel any in-flight fetch owned by this adaptor
    pub fn stop(&self) {
        lock(&self.inner.coordinator).cancel();
    }

    /// The host closed the current transaction; the outcome code is
    /// recorded in the log only
    pub fn end_transaction(&self, end_code: &str) {
        tracing::debug!(end_code, "transaction ended");
    }

    /// The host began a view session for this placement; nothing to do
    /// for this network
    pub fn start_view_session(&self) {
        tracing::debug!("view session started");
    }

    /// The host ended the view session; nothing to do for this network
    pub fn end_view_session(&self) {
        tracing::debug!("view session ended");
    }

    /// The host's view went off screen; nothing to do for this network
    pub fn pause(&self) {
        tracing::debug!("adaptor paused");
    }

    /// The host's view came back on screen; nothing to do for this network
    pub fn resume(&self) {
        tracing::debug!("adaptor resumed");
    }

    /// Tear the adaptor down. Idempotent.
    ///
    /// Cancels any in-flight fetch, releases the surface (including the
    /// shared interstitial slot's reference if this adaptor put it
    /// there) and clears the interstitial flag. Every later lifecycle
    /// call and every late fetch completion becomes a no-op.
    pub fn destroy(&self) {
        let surface = {
            let mut state = lock(&self.inner.state);
            if state.destroyed {
                return;
            }
            state.destroyed = true;
            state.interstitial = false;
            state.image_url = None;
            state.surface.take()
        };

        if let Some(surface) = &surface {
            self.inner.presenter.release_surface(surface);
        }
        lock(&self.inner.coordinator).cancel();
        tracing::debug!("adaptor destroyed");
    }

    /// The ad-network name this adaptor reports to the host
    pub fn network_name(&self) -> &str {
        &self.inner.network_name
    }

    /// Classification of the ad the current transaction serves
    pub fn ad_type(&self) -> AdKind {
        if lock(&self.inner.state).interstitial {
            AdKind::Interstitial
        } else {
            AdKind::Banner
        }
    }

    /// Capability query: can this adaptor perform `action` right now?
    ///
    /// Banners support every action. Interstitial precache is a real
    /// capability of this adaptor, but only meaningful — and therefore
    /// only advertised — while the adaptor is in interstitial mode.
    /// Unknown action codes are reported as supported.
    pub fn supports(&self, action: &str) -> bool {
        let interstitial = lock(&self.inner.state).interstitial;
        match AdaptorAction::from_code(action) {
            Some(AdaptorAction::PrecacheInterstitial) => interstitial,
            Some(_) | None => true,
        }
    }

    /// Whether `destroy` has been called
    pub fn is_destroyed(&self) -> bool {
        self.inner.is_destroyed()
    }

    /// The surface of the most recent ad request, if any
    pub fn surface(&self) -> Option<Arc<AdSurface>> {
        lock(&self.inner.state).surface.clone()
    }

    /// Shared request path for new and precached ads
    fn begin_request(&self, precache: bool) -> Option<Arc<AdSurface>> {
        let inner = &self.inner;
        let (surface, url, interstitial) = {
            let mut state = lock(&inner.state);
            if state.destroyed {
                tracing::debug!("ad request on a destroyed adaptor ignored");
                return None;
            }
            state.precache = precache;
            let interstitial = state.interstitial;

            let Some(url) = state.image_url.clone() else {
                drop(state);
                tracing::warn!("ad requested before a transaction supplied an image url");
                inner.report_load_failed(interstitial, "");
                return None;
            };

            let surface = Arc::new(AdSurface::new(Arc::downgrade(inner), interstitial));
            state.surface = Some(Arc::clone(&surface));
            (surface, url, interstitial)
        };

        inner.start_fetch(url, Arc::clone(&surface), interstitial);

        if interstitial { None } else { Some(surface) }
    }
}

impl AdaptorInner {
    pub(crate) fn is_destroyed(&self) -> bool {
        lock(&self.state).destroyed
    }

    /// Start a background fetch for the stored creative URL.
    ///
    /// The completion closure holds only a weak reference back here plus
    /// the surface of its own request; the adaptor may be dropped,
    /// destroyed, or serving a newer request by the time the fetch lands.
    fn start_fetch(self: &Arc<Self>, url: String, surface: Arc<AdSurface>, interstitial: bool) {
        let weak = Arc::downgrade(self);
        let scale = self.config.display_density;
        lock(&self.coordinator).start(url, scale, move |image| {
            AdaptorInner::deliver(&weak, &surface, interstitial, image);
        });
    }

    /// Route one fetch completion to the surface of the request that
    /// started it.
    ///
    /// The returned [`Delivery`] makes the stale-discard an explicit,
    /// observable branch: a completion for a released or destroyed
    /// adaptor, or for a request a newer one has replaced, mutates
    /// nothing and notifies nobody.
    pub(crate) fn deliver(
        adaptor: &Weak<AdaptorInner>,
        surface: &Arc<AdSurface>,
        interstitial: bool,
        image: Option<AdImage>,
    ) -> Delivery {
        let Some(inner) = adaptor.upgrade() else {
            tracing::debug!("dropping fetch result for a released adaptor");
            return Delivery::Stale(StaleReason::AdaptorGone);
        };

        let (current, precache, destroyed) = {
            let state = lock(&inner.state);
            (state.surface.clone(), state.precache, state.destroyed)
        };
        if destroyed {
            tracing::debug!("dropping fetch result for a destroyed adaptor");
            return Delivery::Stale(StaleReason::Destroyed);
        }
        // The fetched image belongs to the request that captured this
        // surface; a newer request must never receive it.
        if !current.is_some_and(|c| Arc::ptr_eq(&c, surface)) {
            tracing::debug!("dropping fetch result for a superseded request");
            return Delivery::Stale(StaleReason::Superseded);
        }

        match image {
            Some(image) => {
                surface.set_image(image);
                if interstitial && !precache {
                    inner.start_interstitial(Arc::clone(surface));
                } else {
                    tracing::info!(network = inner.network_name, "loaded ad");
                    inner.report_loaded(interstitial);
                }
            }
            None => {
                tracing::info!(network = inner.network_name, "creative was not fetched");
                inner.report_load_failed(interstitial, "");
            }
        }
        Delivery::Delivered
    }

    /// Attempt to present an interstitial surface and report the outcome
    fn start_interstitial(&self, surface: Arc<AdSurface>) {
        match self.presenter.present(surface, self.launcher.as_ref()) {
            Ok(()) => {
                tracing::info!(network = self.network_name, "started interstitial ad");
                self.report_loaded(true);
            }
            Err(e) => self.report_load_failed(true, &e.to_string()),
        }
    }

    /// A surface belonging to this adaptor was clicked
    pub(crate) fn handle_click(&self, interstitial: bool) {
        match &self.config.click_through_url {
            Some(url) => {
                if let Err(cause) = self.navigator.open(url) {
                    tracing::warn!(url, %cause, "click-through navigation failed");
                }
            }
            None => tracing::debug!("no click-through destination configured"),
        }

        tracing::info!(network = self.network_name, "ad was clicked");
        if let Some(listener) = self.listener() {
            listener.on_clicked(&self.network_name, interstitial);
        }
    }

    fn listener(&self) -> Option<Arc<dyn AdaptorListener>> {
        let listener = lock(&self.listener).clone();
        if listener.is_none() {
            tracing::debug!("no adaptor listener registered, outcome not reported");
        }
        listener
    }

    fn report_loaded(&self, interstitial: bool) {
        if let Some(listener) = self.listener() {
            listener.on_loaded(&self.network_name, interstitial);
        }
    }

    fn report_load_failed(&self, interstitial: bool, reason: &str) {
        if let Some(listener) = self.listener() {
            listener.on_load_failed(&self.network_name, interstitial, reason);
        }
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::presenter::UnboundLauncher;
    use crate::surface::LoggingNavigator;
    use crate::types::PARAM_IS_INTERSTITIAL;
    use image::DynamicImage;
    use std::sync::Mutex as StdMutex;

    #[derive(Debug, PartialEq, Eq, Clone)]
    enum Report {
        Loaded(String, bool),
        LoadFailed(String, bool, String),
        Clicked(String, bool),
    }

    #[derive(Default)]
    struct RecordingListener {
        reports: StdMutex<Vec<Report>>,
    }

    impl RecordingListener {
        fn reports(&self) -> Vec<Report> {
            self.reports.lock().unwrap().clone()
        }
    }

    impl AdaptorListener for RecordingListener {
        fn on_loaded(&self, network_name: &str, interstitial: bool) {
            self.reports
                .lock()
                .unwrap()
                .push(Report::Loaded(network_name.into(), interstitial));
        }

        fn on_load_failed(&self, network_name: &str, interstitial: bool, reason: &str) {
            self.reports.lock().unwrap().push(Report::LoadFailed(
                network_name.into(),
                interstitial,
                reason.into(),
            ));
        }

        fn on_clicked(&self, network_name: &str, interstitial: bool) {
            self.reports
                .lock()
                .unwrap()
                .push(Report::Clicked(network_name.into(), interstitial));
        }
    }

    struct OkLauncher;

    impl PresentationLauncher for OkLauncher {
        fn launch(&self) -> std::result::Result<(), String> {
            Ok(())
        }
    }

    fn adaptor_with(launcher: Arc<dyn PresentationLauncher>) -> MeganetAdaptor {
        let config = Arc::new(AdaptorConfig::default());
        let fetcher = Arc::new(ImageFetcher::new(&config).unwrap());
        MeganetAdaptor::new(
            "view-1",
            "Meganet",
            config,
            fetcher,
            InterstitialPresenter::new(),
            launcher,
            Arc::new(LoggingNavigator),
        )
    }

    fn adaptor() -> MeganetAdaptor {
        adaptor_with(Arc::new(UnboundLauncher))
    }

    fn image() -> AdImage {
        AdImage::from(DynamicImage::new_rgba8(2, 2))
    }

    #[test]
    fn transaction_with_image_url_succeeds() {
        let adaptor = adaptor();
        let params = AdRequestParams::new().with(PARAM_IMAGE_URL, "http://x/a.png");
        adaptor.start_transaction(&params).unwrap();
        assert_eq!(adaptor.ad_type(), AdKind::Banner);
    }

    #[test]
    fn transaction_without_image_url_is_rejected() {
        let adaptor = adaptor();
        let err = adaptor
            .start_transaction(&AdRequestParams::new())
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Validation { key: Some(ref k), .. } if k == PARAM_IMAGE_URL
        ));
    }

    #[test]
    fn transaction_with_empty_image_url_is_rejected() {
        let adaptor = adaptor();
        let params = AdRequestParams::new().with(PARAM_IMAGE_URL, "");
        assert!(adaptor.start_transaction(&params).is_err());
    }

    #[test]
    fn interstitial_flag_switches_ad_type() {
        let adaptor = adaptor();
        let params = AdRequestParams::new()
            .with(PARAM_IMAGE_URL, "http://x/a.png")
            .with(PARAM_IS_INTERSTITIAL, "Yes");
        adaptor.start_transaction(&params).unwrap();
        assert_eq!(adaptor.ad_type(), AdKind::Interstitial);
    }

    #[test]
    fn supports_excludes_interstitial_precache_in_banner_mode() {
        let adaptor = adaptor();
        let params = AdRequestParams::new().with(PARAM_IMAGE_URL, "http://x/a.png");
        adaptor.start_transaction(&params).unwrap();

        assert!(adaptor.supports(AdaptorAction::Precache.code()));
        assert!(adaptor.supports(AdaptorAction::Show.code()));
        assert!(!adaptor.supports(AdaptorAction::PrecacheInterstitial.code()));
    }

    #[test]
    fn supports_includes_interstitial_precache_in_interstitial_mode() {
        let adaptor = adaptor();
        let params = AdRequestParams::new()
            .with(PARAM_IMAGE_URL, "http://x/a.png")
            .with(PARAM_IS_INTERSTITIAL, "yes");
        adaptor.start_transaction(&params).unwrap();

        assert!(adaptor.supports(AdaptorAction::PrecacheInterstitial.code()));
    }

    #[test]
    fn supports_tolerates_unknown_actions() {
        assert!(adaptor().supports("somethingNew"));
    }

    #[test]
    fn destroy_is_idempotent_and_clears_interstitial_mode() {
        let adaptor = adaptor();
        let params = AdRequestParams::new()
            .with(PARAM_IMAGE_URL, "http://x/a.png")
            .with(PARAM_IS_INTERSTITIAL, "yes");
        adaptor.start_transaction(&params).unwrap();

        adaptor.destroy();
        adaptor.destroy();
        assert!(adaptor.is_destroyed());
        assert_eq!(adaptor.ad_type(), AdKind::Banner);
        assert!(adaptor.surface().is_none());
    }

    #[test]
    fn lifecycle_calls_after_destroy_are_no_ops() {
        let listener = Arc::new(RecordingListener::default());
        let adaptor = adaptor();
        adaptor.set_listener(listener.clone());
        adaptor.destroy();

        let params = AdRequestParams::new().with(PARAM_IMAGE_URL, "http://x/a.png");
        adaptor.start_transaction(&params).unwrap();
        adaptor.present_precached_interstitial();
        adaptor.pause();
        adaptor.resume();
        adaptor.end_transaction("completed");
        adaptor.start_view_session();
        adaptor.end_view_session();
        adaptor.stop();

        assert!(listener.reports().is_empty());
    }

    #[test]
    fn session_and_transaction_hooks_are_silent_no_ops() {
        let listener = Arc::new(RecordingListener::default());
        let adaptor = adaptor();
        adaptor.set_listener(listener.clone());

        adaptor.start_view_session();
        adaptor.end_transaction("completed");
        adaptor.end_view_session();

        assert!(listener.reports().is_empty());
        assert!(!adaptor.is_destroyed());
    }

    #[test]
    fn delivery_to_dropped_adaptor_is_stale() {
        let weak = {
            let adaptor = adaptor();
            Arc::downgrade(&adaptor.inner)
        };
        let surface = Arc::new(AdSurface::new(Weak::new(), false));
        let delivery = AdaptorInner::deliver(&weak, &surface, false, Some(image()));
        assert_eq!(delivery, Delivery::Stale(StaleReason::AdaptorGone));
    }

    #[tokio::test]
    async fn delivery_to_destroyed_adaptor_is_stale() {
        let listener = Arc::new(RecordingListener::default());
        let adaptor = adaptor();
        adaptor.set_listener(listener.clone());
        let params = AdRequestParams::new().with(PARAM_IMAGE_URL, "http://127.0.0.1:1/a.png");
        adaptor.start_transaction(&params).unwrap();
        let surface = adaptor.request_new_ad().unwrap();
        adaptor.destroy();

        let weak = Arc::downgrade(&adaptor.inner);
        let delivery = AdaptorInner::deliver(&weak, &surface, false, Some(image()));

        assert_eq!(delivery, Delivery::Stale(StaleReason::Destroyed));
        assert!(!surface.has_image(), "stale delivery must not mutate the surface");
        assert!(listener.reports().is_empty());
    }

    #[tokio::test]
    async fn delivery_for_a_superseded_request_is_stale() {
        let listener = Arc::new(RecordingListener::default());
        let adaptor = adaptor();
        adaptor.set_listener(listener.clone());

        let params = AdRequestParams::new().with(PARAM_IMAGE_URL, "http://127.0.0.1:1/a.png");
        adaptor.start_transaction(&params).unwrap();
        let first = adaptor.request_new_ad().unwrap();
        let params = AdRequestParams::new().with(PARAM_IMAGE_URL, "http://127.0.0.1:1/b.png");
        adaptor.start_transaction(&params).unwrap();
        let second = adaptor.request_new_ad().unwrap();
        adaptor.stop();

        let weak = Arc::downgrade(&adaptor.inner);
        let delivery = AdaptorInner::deliver(&weak, &first, false, Some(image()));

        assert_eq!(delivery, Delivery::Stale(StaleReason::Superseded));
        assert!(!first.has_image());
        assert!(
            !second.has_image(),
            "a stale delivery must not stamp the replacement surface"
        );
        assert!(listener.reports().is_empty());

        let delivery = AdaptorInner::deliver(&weak, &second, false, Some(image()));
        assert_eq!(delivery, Delivery::Delivered);
        assert!(second.has_image());
        assert_eq!(
            listener.reports(),
            vec![Report::Loaded("Meganet".into(), false)]
        );
    }

    #[tokio::test]
    async fn banner_delivery_reports_loaded() {
        let listener = Arc::new(RecordingListener::default());
        let adaptor = adaptor();
        adaptor.set_listener(listener.clone());
        let params = AdRequestParams::new().with(PARAM_IMAGE_URL, "http://127.0.0.1:1/a.png");
        adaptor.start_transaction(&params).unwrap();
        let surface = adaptor.request_new_ad().unwrap();
        adaptor.stop();

        let delivery =
            AdaptorInner::deliver(&Arc::downgrade(&adaptor.inner), &surface, false, Some(image()));

        assert_eq!(delivery, Delivery::Delivered);
        assert!(surface.has_image());
        assert_eq!(
            listener.reports(),
            vec![Report::Loaded("Meganet".into(), false)]
        );
    }

    #[tokio::test]
    async fn failed_delivery_reports_empty_reason() {
        let listener = Arc::new(RecordingListener::default());
        let adaptor = adaptor();
        adaptor.set_listener(listener.clone());
        let params = AdRequestParams::new().with(PARAM_IMAGE_URL, "http://127.0.0.1:1/a.png");
        adaptor.start_transaction(&params).unwrap();
        let surface = adaptor.request_new_ad().unwrap();
        adaptor.stop();

        AdaptorInner::deliver(&Arc::downgrade(&adaptor.inner), &surface, false, None);

        assert_eq!(
            listener.reports(),
            vec![Report::LoadFailed("Meganet".into(), false, String::new())]
        );
    }

    #[tokio::test]
    async fn interstitial_delivery_with_failing_launcher_reports_failure() {
        let listener = Arc::new(RecordingListener::default());
        let adaptor = adaptor();
        adaptor.set_listener(listener.clone());
        let params = AdRequestParams::new()
            .with(PARAM_IMAGE_URL, "http://127.0.0.1:1/a.png")
            .with(PARAM_IS_INTERSTITIAL, "yes");
        adaptor.start_transaction(&params).unwrap();
        assert!(adaptor.request_new_ad().is_none());
        adaptor.stop();
        let surface = adaptor.surface().unwrap();

        AdaptorInner::deliver(&Arc::downgrade(&adaptor.inner), &surface, true, Some(image()));

        let reports = listener.reports();
        assert_eq!(reports.len(), 1);
        match &reports[0] {
            Report::LoadFailed(network, true, reason) => {
                assert_eq!(network, "Meganet");
                assert!(reason.contains("no interstitial presentation host registered"));
            }
            other => panic!("expected interstitial load failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn interstitial_delivery_with_working_launcher_presents_and_loads() {
        let listener = Arc::new(RecordingListener::default());
        let adaptor = adaptor_with(Arc::new(OkLauncher));
        adaptor.set_listener(listener.clone());
        let params = AdRequestParams::new()
            .with(PARAM_IMAGE_URL, "http://127.0.0.1:1/a.png")
            .with(PARAM_IS_INTERSTITIAL, "yes");
        adaptor.start_transaction(&params).unwrap();
        assert!(adaptor.request_new_ad().is_none());
        adaptor.stop();
        let surface = adaptor.surface().unwrap();

        AdaptorInner::deliver(&Arc::downgrade(&adaptor.inner), &surface, true, Some(image()));

        assert_eq!(
            listener.reports(),
            vec![Report::Loaded("Meganet".into(), true)]
        );
        assert!(adaptor.inner.presenter.is_showing());
    }

    #[tokio::test]
    async fn precached_interstitial_is_not_auto_presented() {
        let listener = Arc::new(RecordingListener::default());
        let adaptor = adaptor_with(Arc::new(OkLauncher));
        adaptor.set_listener(listener.clone());
        let params = AdRequestParams::new()
            .with(PARAM_IMAGE_URL, "http://127.0.0.1:1/a.png")
            .with(PARAM_IS_INTERSTITIAL, "yes");
        adaptor.start_transaction(&params).unwrap();
        assert!(adaptor.request_precached_ad().is_none());
        adaptor.stop();
        let surface = adaptor.surface().unwrap();

        AdaptorInner::deliver(&Arc::downgrade(&adaptor.inner), &surface, true, Some(image()));

        assert!(!adaptor.inner.presenter.is_showing());
        assert_eq!(
            listener.reports(),
            vec![Report::Loaded("Meganet".into(), true)]
        );

        adaptor.present_precached_interstitial();
        assert!(adaptor.inner.presenter.is_showing());
    }

    #[test]
    fn present_precached_without_fetch_reports_no_ad() {
        let listener = Arc::new(RecordingListener::default());
        let adaptor = adaptor_with(Arc::new(OkLauncher));
        adaptor.set_listener(listener.clone());

        adaptor.present_precached_interstitial();

        assert_eq!(
            listener.reports(),
            vec![Report::LoadFailed(
                "Meganet".into(),
                true,
                "no precached ad available".into()
            )]
        );
    }

    #[tokio::test]
    async fn request_without_transaction_reports_failure() {
        let listener = Arc::new(RecordingListener::default());
        let adaptor = adaptor();
        adaptor.set_listener(listener.clone());

        assert!(adaptor.request_new_ad().is_none());

        assert_eq!(
            listener.reports(),
            vec![Report::LoadFailed("Meganet".into(), false, String::new())]
        );
    }

    #[tokio::test]
    async fn click_is_reported_with_the_surface_snapshot() {
        let listener = Arc::new(RecordingListener::default());
        let adaptor = adaptor();
        adaptor.set_listener(listener.clone());
        let params = AdRequestParams::new().with(PARAM_IMAGE_URL, "http://127.0.0.1:1/a.png");
        adaptor.start_transaction(&params).unwrap();
        let surface = adaptor.request_new_ad().unwrap();
        adaptor.stop();

        surface.click();

        assert_eq!(
            listener.reports(),
            vec![Report::Clicked("Meganet".into(), false)]
        );
    }

    #[tokio::test]
    async fn click_after_destroy_is_a_no_op() {
        let listener = Arc::new(RecordingListener::default());
        let adaptor = adaptor();
        adaptor.set_listener(listener.clone());
        let params = AdRequestParams::new().with(PARAM_IMAGE_URL, "http://127.0.0.1:1/a.png");
        adaptor.start_transaction(&params).unwrap();
        let surface = adaptor.request_new_ad().unwrap();
        adaptor.destroy();

        surface.click();

        assert!(listener.reports().is_empty());
    }
}
