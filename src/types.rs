//! Core types for meganet-adaptor
//!
//! Ad-request parameters, ad classification, the capability-query action
//! codes, the tagged stale-callback result, and the listener contract the
//! mediation host implements to observe adaptor outcomes.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Parameter key carrying the creative image URL (required)
pub const PARAM_IMAGE_URL: &str = "imageUrl";

/// Parameter key carrying the interstitial flag (optional)
pub const PARAM_IS_INTERSTITIAL: &str = "isInterstitial";

/// The only value of [`PARAM_IS_INTERSTITIAL`] that means "interstitial",
/// matched case-insensitively
const INTERSTITIAL_AFFIRMATIVE: &str = "yes";

/// Server-supplied ad-request parameters
///
/// An immutable string-keyed map handed to the adaptor at ad-request time.
/// Only [`PARAM_IMAGE_URL`] and [`PARAM_IS_INTERSTITIAL`] are interpreted;
/// unknown keys are carried but ignored.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AdRequestParams(HashMap<String, String>);

impl AdRequestParams {
    /// Create an empty parameter set
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insertion
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Look up a raw parameter value
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// The creative image URL, if present
    pub fn image_url(&self) -> Option<&str> {
        self.get(PARAM_IMAGE_URL)
    }

    /// Whether the request asks for an interstitial
    ///
    /// True only for a case-insensitive `"yes"`; an absent key or any
    /// other value means banner.
    pub fn is_interstitial(&self) -> bool {
        self.get(PARAM_IS_INTERSTITIAL)
            .is_some_and(|v| v.eq_ignore_ascii_case(INTERSTITIAL_AFFIRMATIVE))
    }
}

impl From<HashMap<String, String>> for AdRequestParams {
    fn from(map: HashMap<String, String>) -> Self {
        Self(map)
    }
}

impl FromIterator<(String, String)> for AdRequestParams {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Classification of the ad an adaptor currently serves
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdKind {
    /// Inline creative embedded in the host's view hierarchy
    Banner,
    /// Full-screen creative, mutually exclusive process-wide
    Interstitial,
}

impl std::fmt::Display for AdKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AdKind::Banner => write!(f, "banner"),
            AdKind::Interstitial => write!(f, "interstitial"),
        }
    }
}

/// Actions the mediation host may probe via the capability query
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdaptorAction {
    /// Prepare a creative without presenting it
    Precache,
    /// Present a creative immediately
    Show,
    /// Prepare an interstitial for a later explicit show call
    PrecacheInterstitial,
}

impl AdaptorAction {
    /// The wire code the host passes to the capability query
    pub fn code(&self) -> &'static str {
        match self {
            AdaptorAction::Precache => "precache",
            AdaptorAction::Show => "show",
            AdaptorAction::PrecacheInterstitial => "precacheInterstitial",
        }
    }

    /// Parse a wire code; unknown codes yield `None`
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "precache" => Some(AdaptorAction::Precache),
            "show" => Some(AdaptorAction::Show),
            "precacheInterstitial" => Some(AdaptorAction::PrecacheInterstitial),
            _ => None,
        }
    }
}

/// Why a fetch completion was discarded instead of delivered
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StaleReason {
    /// The owning adaptor has been dropped entirely
    AdaptorGone,
    /// The owning adaptor was destroyed before the completion arrived
    Destroyed,
    /// A newer request replaced this one before the completion arrived
    Superseded,
}

/// Outcome of routing one fetch completion to its adaptor
///
/// A stale completion is a deliberate, silent no-op — the discard is an
/// explicit branch here rather than a scatter of null checks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Delivery {
    /// The completion reached a live adaptor and was acted on
    Delivered,
    /// The completion was dropped without touching any adaptor state
    Stale(StaleReason),
}

/// Outcome listener the mediation host registers on each adaptor
///
/// Callbacks are invoked from the adaptor's completion path with no
/// adaptor state locks held, so implementations may call back into the
/// adaptor, with one exception: deliveries hold the fetch claim that a
/// new ad request must take, so a synchronous re-request from inside a
/// callback deadlocks. Defer re-requests to another task.
/// Implementations must be cheap; they run on the fetch worker.
pub trait AdaptorListener: Send + Sync {
    /// A creative finished loading (and, for an immediate interstitial,
    /// presentation was launched)
    fn on_loaded(&self, network_name: &str, interstitial: bool);

    /// A creative failed to load or present; `reason` may be empty
    fn on_load_failed(&self, network_name: &str, interstitial: bool, reason: &str);

    /// The user clicked the creative
    fn on_clicked(&self, network_name: &str, interstitial: bool);
}
