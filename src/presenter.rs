//! Interstitial presentation arbitration
//!
//! A process hosts at most one full-screen interstitial at a time. The
//! [`InterstitialPresenter`] is the shared slot that enforces this: every
//! adaptor a factory produces holds a clone of the same presenter, and
//! `present` is the only way into the "showing" state. The presenter is
//! an injected object rather than a process static so tests (and
//! embedders running several mediation stacks) get fresh, resettable
//! state.

use crate::error::PresentationError;
use crate::surface::AdSurface;
use crate::utils::lock;
use std::sync::{Arc, Mutex};

/// Host collaborator that launches the full-screen presentation.
///
/// The analog of starting a full-screen activity: the host owns whatever
/// window or navigation machinery displays the surface. Returning an
/// error (e.g. no presentation host is wired up) aborts the presentation
/// and frees the slot.
pub trait PresentationLauncher: Send + Sync {
    /// Attempt to launch the full-screen presentation.
    ///
    /// On success the host is expected to call
    /// [`InterstitialPresenter::take_surface`] to obtain the creative and
    /// [`InterstitialPresenter::on_dismiss`] when presentation ends.
    fn launch(&self) -> std::result::Result<(), String>;
}

/// Default launcher used until the host registers a real one; always
/// fails, mirroring a full-screen surface that cannot be resolved.
pub struct UnboundLauncher;

impl PresentationLauncher for UnboundLauncher {
    fn launch(&self) -> std::result::Result<(), String> {
        Err("no interstitial presentation host registered".into())
    }
}

#[derive(Default)]
struct Slot {
    showing: bool,
    surface: Option<Arc<AdSurface>>,
}

/// Process-wide interstitial slot
///
/// Cloning yields another handle to the same slot. Invariant: a stored
/// surface implies `showing`, except for the hand-off window between a
/// successful launch and the host's `take_surface` call.
#[derive(Clone, Default)]
pub struct InterstitialPresenter {
    slot: Arc<Mutex<Slot>>,
}

impl InterstitialPresenter {
    /// Create a fresh, empty slot
    pub fn new() -> Self {
        Self::default()
    }

    /// Attempt to present `surface` full-screen.
    ///
    /// Exactly one concurrent caller can transition the slot to showing;
    /// everyone else gets [`PresentationError::AlreadyShowing`] with no
    /// state change. A failed launch leaves the slot empty. The slot is
    /// reserved before the launcher runs and no lock is held during the
    /// launch call, so a launcher may synchronously call
    /// [`take_surface`](Self::take_surface) or
    /// [`on_dismiss`](Self::on_dismiss) on this presenter.
    pub fn present(
        &self,
        surface: Arc<AdSurface>,
        launcher: &dyn PresentationLauncher,
    ) -> std::result::Result<(), PresentationError> {
        {
            // Reserve the slot first; a racing present sees AlreadyShowing
            // while the launcher runs.
            let mut slot = lock(&self.slot);
            if slot.showing {
                return Err(PresentationError::AlreadyShowing);
            }
            slot.showing = true;
            slot.surface = Some(surface);
        }

        match launcher.launch() {
            Ok(()) => {
                tracing::info!("started interstitial presentation");
                Ok(())
            }
            Err(cause) => {
                let mut slot = lock(&self.slot);
                slot.showing = false;
                slot.surface = None;
                tracing::warn!(%cause, "failed to launch interstitial presentation");
                Err(PresentationError::LaunchFailed(cause))
            }
        }
    }

    /// Hand the stored surface to the presentation host.
    ///
    /// Clears the stored reference while leaving the slot in the showing
    /// state; the host renders the returned surface until dismissal.
    pub fn take_surface(&self) -> Option<Arc<AdSurface>> {
        lock(&self.slot).surface.take()
    }

    /// Presentation ended; the slot becomes available again.
    pub fn on_dismiss(&self) {
        let mut slot = lock(&self.slot);
        slot.showing = false;
        slot.surface = None;
        tracing::debug!("interstitial dismissed");
    }

    /// Whether an interstitial currently occupies the slot
    pub fn is_showing(&self) -> bool {
        lock(&self.slot).showing
    }

    /// Drop the stored surface if it is the one given.
    ///
    /// Used by an adaptor tearing down its own creative; the showing flag
    /// is left for the presentation host to clear on dismissal.
    pub(crate) fn release_surface(&self, surface: &Arc<AdSurface>) {
        let mut slot = lock(&self.slot);
        if slot
            .surface
            .as_ref()
            .is_some_and(|stored| Arc::ptr_eq(stored, surface))
        {
            slot.surface = None;
        }
    }
}
