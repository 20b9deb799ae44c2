//! Tunnel lifecycle controller.
//!
//! Sits between the host test runner's lifecycle hooks and the tunnel
//! subprocess: `on_prepare` annotates capabilities and boots the tunnel
//! under a deadline, `on_complete` tears it down under another. The host
//! invokes the hooks strictly in sequence, so the single handle slot needs
//! no coordination beyond the mutex.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use serde_json::Value;
use tracing::{info, warn};

use bstack_protocol::{tag_local, tag_service_version};
use bstack_runtime::{
	LocalTunnelFactory, ProcessControl, Result, StartOptions, SystemProcessControl, Tunnel,
	TunnelFactory, deadline,
};

use crate::config::LocalConfig;

/// Version stamped into every capability descriptor, read from build
/// metadata.
pub const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Deadline for the tunnel's external start and stop calls. Policy, not
/// configuration.
const TUNNEL_DEADLINE: Duration = Duration::from_secs(60);

/// Tunnel lifecycle controller.
///
/// Owns at most one tunnel handle per instance: created in
/// [`on_prepare`](Self::on_prepare), released in
/// [`on_complete`](Self::on_complete). A disabled config never creates a
/// handle and makes both hooks no-ops.
pub struct Launcher {
	config: LocalConfig,
	tunnel: Mutex<Option<Arc<dyn Tunnel>>>,
	factory: Arc<dyn TunnelFactory>,
	process: Arc<dyn ProcessControl>,
}

impl Launcher {
	/// Creates the controller and stamps the service version into every
	/// capability descriptor.
	///
	/// `webdriver_major` selects the option-naming convention: 7 and above
	/// nest the version inside `bstack:options`, 6 and below use the
	/// flattened `browserstack.wdioService` key.
	///
	/// # Errors
	///
	/// Fails if `capabilities` is neither an object nor an array.
	pub fn new(config: LocalConfig, capabilities: &mut Value, webdriver_major: u8) -> Result<Self> {
		Self::with_collaborators(
			config,
			capabilities,
			webdriver_major,
			Arc::new(LocalTunnelFactory),
			Arc::new(SystemProcessControl),
		)
	}

	/// Like [`Launcher::new`] with injected tunnel and process-control
	/// collaborators. This is the seam the tests use.
	pub fn with_collaborators(
		config: LocalConfig,
		capabilities: &mut Value,
		webdriver_major: u8,
		factory: Arc<dyn TunnelFactory>,
		process: Arc<dyn ProcessControl>,
	) -> Result<Self> {
		tag_service_version(capabilities, SERVICE_VERSION, webdriver_major)?;
		Ok(Self {
			config,
			tunnel: Mutex::new(None),
			factory,
			process,
		})
	}

	/// Starts the tunnel before any session is created.
	///
	/// Tags every descriptor with `bstack:options.local = true`, merges the
	/// access key with the configured extra options, then boots the tunnel
	/// subprocess raced against the deadline. Capabilities are mutated in
	/// place, visible to the host afterwards. On success the boot duration
	/// is logged in milliseconds.
	///
	/// # Errors
	///
	/// - malformed capabilities fail before any handle is created;
	/// - a start exceeding the deadline yields [`Error::Timeout`], with the
	///   in-flight start abandoned, not cancelled;
	/// - any error the tunnel itself reports propagates verbatim.
	///
	/// [`Error::Timeout`]: bstack_runtime::Error::Timeout
	pub async fn on_prepare(&self, capabilities: &mut Value) -> Result<()> {
		if !self.config.enabled {
			info!("browserstackLocal is not enabled - skipping...");
			return Ok(());
		}

		tag_local(capabilities)?;

		let mut opts = StartOptions::with_key(self.config.key.as_str());
		opts.extend(&self.config.opts);

		let tunnel = self.factory.create()?;
		*self.tunnel.lock() = Some(Arc::clone(&tunnel));

		let boot = Instant::now();
		let start = {
			let tunnel = Arc::clone(&tunnel);
			async move { tunnel.start(opts).await }
		};
		deadline::race(start, TUNNEL_DEADLINE, "start").await?;

		info!(
			boot_ms = boot.elapsed().as_millis() as u64,
			"BrowserStack Local successfully started"
		);
		Ok(())
	}

	/// Stops the tunnel after every session has finished.
	///
	/// A no-op when the tunnel was never started or is no longer running -
	/// both are success, not errors. With `forced_stop` set, the process is
	/// signalled by pid and the graceful stop is never invoked; otherwise
	/// the stop call is raced against the deadline.
	///
	/// # Errors
	///
	/// - a stop exceeding the deadline yields [`Error::Timeout`];
	/// - a stop failure reported by the tunnel propagates verbatim;
	/// - a failed signal delivery on forced stop yields [`Error::Signal`].
	///
	/// [`Error::Timeout`]: bstack_runtime::Error::Timeout
	/// [`Error::Signal`]: bstack_runtime::Error::Signal
	pub async fn on_complete(&self) -> Result<()> {
		let tunnel = self.tunnel.lock().clone();
		let Some(tunnel) = tunnel else {
			return Ok(());
		};
		if !tunnel.is_running() {
			return Ok(());
		}

		if self.config.forced_stop {
			return match tunnel.pid() {
				Some(pid) => self.process.kill(pid),
				None => {
					warn!("tunnel reports running but has no pid; nothing to signal");
					Ok(())
				}
			};
		}

		let stop = {
			let tunnel = Arc::clone(&tunnel);
			async move { tunnel.stop().await }
		};
		deadline::race(stop, TUNNEL_DEADLINE, "stop").await
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	#[test]
	fn service_version_matches_build_metadata() {
		assert_eq!(SERVICE_VERSION, env!("CARGO_PKG_VERSION"));
		assert!(!SERVICE_VERSION.is_empty());
	}

	#[test]
	fn constructor_tags_version_into_capabilities() {
		let mut caps = json!([{ "browserName": "chrome" }]);
		Launcher::new(LocalConfig::new(), &mut caps, 7).unwrap();
		assert_eq!(
			caps[0]["bstack:options"]["wdioService"],
			json!(SERVICE_VERSION)
		);
	}

	#[test]
	fn constructor_rejects_malformed_capabilities() {
		let mut caps = json!("not capabilities");
		assert!(Launcher::new(LocalConfig::new(), &mut caps, 7).is_err());
	}
}
