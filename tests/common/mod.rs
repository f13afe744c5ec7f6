//! Common test utilities for meganet-adaptor integration tests

use meganet_adaptor::{AdaptorListener, PresentationLauncher};
use std::io::Cursor;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// One listener callback as observed by [`RecordingListener`]
#[derive(Clone, Debug, PartialEq, Eq)]
#[allow(dead_code)]
pub enum Report {
    Loaded {
        network: String,
        interstitial: bool,
    },
    LoadFailed {
        network: String,
        interstitial: bool,
        reason: String,
    },
    Clicked {
        network: String,
        interstitial: bool,
    },
}

/// Listener double that records every callback in order
#[derive(Default)]
pub struct RecordingListener {
    reports: Mutex<Vec<Report>>,
}

#[allow(dead_code)]
impl RecordingListener {
    pub fn reports(&self) -> Vec<Report> {
        self.reports.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.reports.lock().unwrap().len()
    }

    /// Poll until at least `count` reports arrived or `timeout` elapses
    pub async fn wait_for(&self, count: usize, timeout: Duration) -> bool {
        let deadline = tokio::time::Instant::now() + timeout;
        while tokio::time::Instant::now() < deadline {
            if self.len() >= count {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        self.len() >= count
    }
}

impl AdaptorListener for RecordingListener {
    fn on_loaded(&self, network_name: &str, interstitial: bool) {
        self.reports.lock().unwrap().push(Report::Loaded {
            network: network_name.into(),
            interstitial,
        });
    }

    fn on_load_failed(&self, network_name: &str, interstitial: bool, reason: &str) {
        self.reports.lock().unwrap().push(Report::LoadFailed {
            network: network_name.into(),
            interstitial,
            reason: reason.into(),
        });
    }

    fn on_clicked(&self, network_name: &str, interstitial: bool) {
        self.reports.lock().unwrap().push(Report::Clicked {
            network: network_name.into(),
            interstitial,
        });
    }
}

/// Launcher double: succeeds or fails on demand, counting launches
pub struct TestLauncher {
    fail: bool,
    launches: AtomicUsize,
}

#[allow(dead_code)]
impl TestLauncher {
    pub fn ok() -> Self {
        Self {
            fail: false,
            launches: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            launches: AtomicUsize::new(0),
        }
    }

    pub fn launches(&self) -> usize {
        self.launches.load(Ordering::SeqCst)
    }
}

impl PresentationLauncher for TestLauncher {
    fn launch(&self) -> Result<(), String> {
        self.launches.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            Err("presentation surface could not be resolved".into())
        } else {
            Ok(())
        }
    }
}

/// Encode a solid-color PNG of the given dimensions
#[allow(dead_code)]
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba([200, 100, 50, 255]));
    let mut buf = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut buf, image::ImageFormat::Png)
        .unwrap();
    buf.into_inner()
}

/// Mount a PNG creative at `route`, optionally delayed
#[allow(dead_code)]
pub async fn serve_png(server: &MockServer, route: &str, delay: Duration) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(png_bytes(8, 8), "image/png")
                .set_delay(delay),
        )
        .mount(server)
        .await;
}
