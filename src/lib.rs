//! # meganet-adaptor
//!
//! Asynchronous ad-network adaptor library implementing a mediation
//! host's plugin contract: fetch one creative image by URL on a worker
//! task, surface it as an inline banner or a full-screen interstitial,
//! and report load/fail/click outcomes through a listener.
//!
//! ## Design Philosophy
//!
//! - **Contract-first** - The host drives the adaptor; the adaptor only
//!   ever answers through the listener, exactly once per fetch
//! - **Host-agnostic** - Rendering, full-screen presentation, and click
//!   navigation are collaborator traits, not toolkit bindings
//! - **Destruction-safe** - A fetch can outlive the adaptor that started
//!   it; completions hold weak references and stale ones are dropped
//! - **No globals** - The process-wide interstitial slot is an injected,
//!   resettable object shared through the factory
//!
//! ## Quick Start
//!
//! ```no_run
//! use meganet_adaptor::{AdaptorConfig, AdaptorFactory, AdRequestParams, PARAM_IMAGE_URL};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let factory = AdaptorFactory::new(AdaptorConfig::default())?;
//!     let adaptor = factory.create_adaptor("banner-slot-1", "Meganet");
//!
//!     let params = AdRequestParams::new().with(PARAM_IMAGE_URL, "https://ads.example.com/a.png");
//!     adaptor.start_transaction(&params)?;
//!
//!     // Returns the surface immediately; the creative arrives through
//!     // the registered listener once the background fetch completes.
//!     let surface = adaptor.request_new_ad();
//!     println!("banner surface ready: {}", surface.is_some());
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Adaptor contract implementation
pub mod adaptor;
/// Configuration types
pub mod config;
/// Fetch lifecycle coordination (cancellation, supersession)
pub mod coordinator;
/// Error types
pub mod error;
/// Adaptor production and shared collaborators
pub mod factory;
/// Creative image fetching and decoding
pub mod fetcher;
/// Interstitial presentation arbitration
pub mod presenter;
/// Creative surfaces and click handling
pub mod surface;
/// Core types, parameters, and the listener contract
pub mod types;
/// Utility functions
mod utils;

// Re-export commonly used types
pub use adaptor::MeganetAdaptor;
pub use config::AdaptorConfig;
pub use coordinator::FetchCoordinator;
pub use error::{Error, FetchError, PresentationError, Result};
pub use factory::AdaptorFactory;
pub use fetcher::{AdImage, ImageFetcher};
pub use presenter::{InterstitialPresenter, PresentationLauncher, UnboundLauncher};
pub use surface::{AdSurface, ClickNavigator, LoggingNavigator};
pub use types::{
    AdKind, AdRequestParams, AdaptorAction, AdaptorListener, Delivery, PARAM_IMAGE_URL,
    PARAM_IS_INTERSTITIAL, StaleReason,
};
