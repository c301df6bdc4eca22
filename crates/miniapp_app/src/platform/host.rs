use std::fs;
use std::path::Path;

use anyhow::Context;
use miniapp_engine::{HostLaunchContext, LaunchData, Navigator};
use miniapp_logging::{miniapp_info, miniapp_warn};

pub const ENV_INIT_DATA: &str = "MINIAPP_INIT_DATA";

/// Finds the host's launch object: the launch file first, then `MINIAPP_INIT_DATA`.
///
/// Neither being present is not an error; the session reports it instead.
pub fn load_launch_context(
    launch_file: Option<&Path>,
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<HostLaunchContext<LaunchData>> {
    if let Some(path) = launch_file {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading launch file {}", path.display()))?;
        let data = LaunchData::from_json(&raw)
            .with_context(|| format!("parsing launch file {}", path.display()))?;
        miniapp_info!("Loaded launch data from {:?}", path);
        return Ok(HostLaunchContext::new(Some(data)));
    }

    match env(ENV_INIT_DATA).filter(|value| !value.is_empty()) {
        Some(init_data) => {
            miniapp_info!("Using launch data from {}", ENV_INIT_DATA);
            Ok(HostLaunchContext::new(Some(LaunchData::from_init_data(
                init_data,
            ))))
        }
        None => {
            miniapp_warn!("No launch data; running outside the host");
            Ok(HostLaunchContext::new(None))
        }
    }
}

/// Prints the payment page instead of switching a browser tab.
pub struct TerminalNavigator;

impl Navigator for TerminalNavigator {
    fn open(&self, url: &str) {
        miniapp_info!("Payment redirect to {}", url);
        println!("Open {url} to continue the payment.");
    }
}
