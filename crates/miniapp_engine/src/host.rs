//! Host platform integration: launch data in, ready/expand and navigation out.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use miniapp_core::UserIdentity;
use miniapp_logging::{miniapp_debug, miniapp_info, miniapp_warn};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HostError {
    #[error("host call {call} failed: {message}")]
    CallFailed { call: &'static str, message: String },
    #[error("invalid launch data: {0}")]
    InvalidLaunchData(#[from] serde_json::Error),
}

/// What the session controller needs from the host at startup.
pub trait LaunchContext: Send + Sync {
    /// The signed launch payload, or an empty string when unavailable.
    fn read_launch_token(&self) -> String;
    fn read_user(&self) -> Option<UserIdentity>;
    /// Cosmetic; failures are swallowed.
    fn signal_ready(&self);
}

/// The host's web-app object as exposed to the page.
pub trait HostWebApp: Send + Sync {
    fn init_data(&self) -> Option<String>;
    fn init_data_unsafe(&self) -> Option<InitDataUnsafe>;
    fn ready(&self) -> Result<(), HostError>;
    fn expand(&self) -> Result<(), HostError>;
}

/// Unverified projection of the launch payload.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct InitDataUnsafe {
    #[serde(default)]
    pub user: Option<UserIdentity>,
}

/// Launch data handed over by the host, shaped like its web-app object.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct LaunchData {
    #[serde(rename = "initData", default)]
    pub init_data: String,
    #[serde(rename = "initDataUnsafe", default)]
    pub init_data_unsafe: InitDataUnsafe,
}

impl LaunchData {
    pub fn from_json(raw: &str) -> Result<Self, HostError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Launch data carrying only the signed payload.
    pub fn from_init_data(init_data: impl Into<String>) -> Self {
        Self {
            init_data: init_data.into(),
            init_data_unsafe: InitDataUnsafe::default(),
        }
    }
}

impl HostWebApp for LaunchData {
    fn init_data(&self) -> Option<String> {
        Some(self.init_data.clone()).filter(|data| !data.is_empty())
    }

    fn init_data_unsafe(&self) -> Option<InitDataUnsafe> {
        Some(self.init_data_unsafe.clone())
    }

    fn ready(&self) -> Result<(), HostError> {
        miniapp_debug!("host: ready");
        Ok(())
    }

    fn expand(&self) -> Result<(), HostError> {
        miniapp_debug!("host: expand");
        Ok(())
    }
}

/// Reads launch context from an optional host object.
///
/// `None` means the app was not started from inside the host platform.
pub struct HostLaunchContext<H> {
    host: Option<H>,
}

impl<H: HostWebApp> HostLaunchContext<H> {
    pub fn new(host: Option<H>) -> Self {
        Self { host }
    }

    pub fn is_attached(&self) -> bool {
        self.host.is_some()
    }
}

impl<H: HostWebApp> LaunchContext for HostLaunchContext<H> {
    fn read_launch_token(&self) -> String {
        self.host
            .as_ref()
            .and_then(|host| host.init_data())
            .unwrap_or_default()
    }

    fn read_user(&self) -> Option<UserIdentity> {
        self.host
            .as_ref()
            .and_then(|host| host.init_data_unsafe())
            .and_then(|unsafe_data| unsafe_data.user)
    }

    fn signal_ready(&self) {
        let Some(host) = self.host.as_ref() else {
            miniapp_debug!("No host attached; skipping ready/expand");
            return;
        };
        if let Err(err) = host.ready().and_then(|()| host.expand()) {
            miniapp_warn!("Ignoring host ready/expand failure: {}", err);
        }
    }
}

/// Fixed launch context for tests and offline runs.
#[derive(Debug, Default)]
pub struct StaticLaunchContext {
    launch_token: String,
    user: Option<UserIdentity>,
    ready_calls: AtomicUsize,
}

impl StaticLaunchContext {
    pub fn new(launch_token: impl Into<String>, user: Option<UserIdentity>) -> Self {
        Self {
            launch_token: launch_token.into(),
            user,
            ready_calls: AtomicUsize::new(0),
        }
    }

    /// No launch data at all, as when opened outside the host.
    pub fn absent() -> Self {
        Self::default()
    }

    pub fn ready_calls(&self) -> usize {
        self.ready_calls.load(Ordering::Relaxed)
    }
}

impl LaunchContext for StaticLaunchContext {
    fn read_launch_token(&self) -> String {
        self.launch_token.clone()
    }

    fn read_user(&self) -> Option<UserIdentity> {
        self.user.clone()
    }

    fn signal_ready(&self) {
        self.ready_calls.fetch_add(1, Ordering::Relaxed);
    }
}

/// Sends the user to an external page (the payment provider).
pub trait Navigator: Send + Sync {
    fn open(&self, url: &str);
}

/// Remembers every URL it was asked to open.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    opened: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn opened(&self) -> Vec<String> {
        self.opened
            .lock()
            .map(|opened| opened.clone())
            .unwrap_or_default()
    }
}

impl Navigator for RecordingNavigator {
    fn open(&self, url: &str) {
        miniapp_info!("Navigating to {}", url);
        if let Ok(mut opened) = self.opened.lock() {
            opened.push(url.to_string());
        }
    }
}
