//! Service configuration.

use serde::Deserialize;
use serde_json::{Map, Value};

/// Tunnel configuration supplied by the host test runner.
///
/// Wire names follow the WebDriver service convention (`browserstackLocal`,
/// `forcedStop`, ...). Every field defaults, so a missing config section
/// means "tunnel disabled". Immutable once the launcher is constructed.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LocalConfig {
	/// Whether to open a local tunnel at all.
	#[serde(rename = "browserstackLocal")]
	pub enabled: bool,

	/// Kill the tunnel process by signal instead of asking it to stop.
	pub forced_stop: bool,

	/// BrowserStack access key handed to the tunnel binary.
	pub key: String,

	/// Extra options forwarded verbatim to the tunnel binary. May override
	/// `key`.
	pub opts: Map<String, Value>,
}

impl LocalConfig {
	/// Creates a disabled configuration.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets whether the tunnel is enabled.
	pub fn enabled(mut self, enabled: bool) -> Self {
		self.enabled = enabled;
		self
	}

	/// Sets the access key.
	pub fn key(mut self, key: impl Into<String>) -> Self {
		self.key = key.into();
		self
	}

	/// Sets whether `on_complete` signals the process instead of stopping
	/// it gracefully.
	pub fn forced_stop(mut self, forced: bool) -> Self {
		self.forced_stop = forced;
		self
	}

	/// Adds one extra tunnel option.
	pub fn opt(mut self, name: impl Into<String>, value: Value) -> Self {
		self.opts.insert(name.into(), value);
		self
	}
}
