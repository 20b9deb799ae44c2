//! The tunnel subprocess contract.
//!
//! The lifecycle controller never names a concrete tunnel type; it works
//! against [`Tunnel`] and obtains handles through a [`TunnelFactory`]. The
//! production implementations live in [`crate::local`], the test doubles in
//! [`crate::testing`].

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::Result;

/// Options passed to [`Tunnel::start`].
///
/// A string-keyed option map. The connection key goes in first; extra
/// options are merged afterwards and may override it.
#[derive(Debug, Clone, Default)]
pub struct StartOptions {
	entries: Map<String, Value>,
}

impl StartOptions {
	/// Creates options holding only the connection key.
	pub fn with_key(key: impl Into<String>) -> Self {
		let mut entries = Map::new();
		entries.insert("key".to_string(), Value::String(key.into()));
		Self { entries }
	}

	/// Merges `extra` on top of the existing entries. Later keys win.
	pub fn extend(&mut self, extra: &Map<String, Value>) {
		for (name, value) in extra {
			self.entries.insert(name.clone(), value.clone());
		}
	}

	/// Returns the value for `name`, if set.
	pub fn get(&self, name: &str) -> Option<&Value> {
		self.entries.get(name)
	}

	/// Renders the options as command-line arguments for the tunnel binary.
	///
	/// `true` renders as a bare `--name` flag, `false` and `null` are
	/// omitted, everything else becomes `--name value`.
	pub fn to_args(&self) -> Vec<String> {
		let mut args = Vec::new();
		for (name, value) in &self.entries {
			match value {
				Value::Bool(true) => args.push(format!("--{name}")),
				Value::Bool(false) | Value::Null => {}
				Value::String(text) => {
					args.push(format!("--{name}"));
					args.push(text.clone());
				}
				other => {
					args.push(format!("--{name}"));
					args.push(other.to_string());
				}
			}
		}
		args
	}
}

/// Contract of the external tunnel subprocess.
///
/// The binary itself is opaque: it exposes an asynchronous start and stop,
/// a liveness probe, and its OS process id. Handles are shared behind
/// [`Arc`], so every method takes `&self`.
#[async_trait]
pub trait Tunnel: Send + Sync {
	/// Starts the tunnel. Resolves once the tunnel is up.
	async fn start(&self, opts: StartOptions) -> Result<()>;

	/// Stops the tunnel gracefully.
	async fn stop(&self) -> Result<()>;

	/// Returns true while the tunnel process is alive.
	fn is_running(&self) -> bool;

	/// OS process id of the running tunnel, if any.
	fn pid(&self) -> Option<u32>;
}

/// Creates tunnel handles for the lifecycle controller.
pub trait TunnelFactory: Send + Sync {
	/// Creates a fresh, unstarted tunnel handle.
	fn create(&self) -> Result<Arc<dyn Tunnel>>;
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	#[test]
	fn key_renders_as_argument_pair() {
		let opts = StartOptions::with_key("secret");
		assert_eq!(opts.to_args(), vec!["--key", "secret"]);
	}

	#[test]
	fn extra_options_override_key() {
		let mut opts = StartOptions::with_key("from-config");
		let extra = json!({ "key": "override" });
		opts.extend(extra.as_object().unwrap());
		assert_eq!(opts.get("key"), Some(&json!("override")));
	}

	#[test]
	fn boolean_and_null_rendering() {
		let mut opts = StartOptions::with_key("k");
		let extra = json!({
			"force-local": true,
			"only-automate": false,
			"proxy-host": null,
			"parallel-runs": 2,
		});
		opts.extend(extra.as_object().unwrap());
		let args = opts.to_args();
		assert!(args.contains(&"--force-local".to_string()));
		assert!(!args.iter().any(|a| a.contains("only-automate")));
		assert!(!args.iter().any(|a| a.contains("proxy-host")));
		let at = args.iter().position(|a| a == "--parallel-runs").unwrap();
		assert_eq!(args[at + 1], "2");
	}
}
