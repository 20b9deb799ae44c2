//! Production tunnel adapter.
//!
//! Wraps the BrowserStack Local binary as a tokio child process. Start
//! spawns the binary with the rendered option arguments and gives it a
//! short window to fail fast; stop kills and reaps it. Readiness
//! negotiation beyond process liveness is the binary's own concern.

use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::process::{Child, Command};
use tracing::debug;

use crate::binary::locate_binary;
use crate::error::{Error, Result};
use crate::tunnel::{StartOptions, Tunnel, TunnelFactory};

/// How long a freshly spawned tunnel process gets to crash before start is
/// considered successful.
const SPAWN_SETTLE: Duration = Duration::from_millis(100);

/// Tunnel handle backed by a real BrowserStack Local child process.
pub struct LocalTunnel {
	binary: PathBuf,
	child: Mutex<Option<Child>>,
}

impl LocalTunnel {
	/// Creates a handle for the binary at `binary`.
	pub fn new(binary: PathBuf) -> Self {
		Self {
			binary,
			child: Mutex::new(None),
		}
	}

	/// Creates a handle, locating the binary on this machine.
	///
	/// # Errors
	///
	/// Returns [`Error::BinaryNotFound`] if the binary cannot be located.
	pub fn locate() -> Result<Self> {
		Ok(Self::new(locate_binary()?))
	}
}

#[async_trait]
impl Tunnel for LocalTunnel {
	async fn start(&self, opts: StartOptions) -> Result<()> {
		if self.child.lock().is_some() {
			return Err(Error::LaunchFailed("tunnel already started".to_string()));
		}

		let args = opts.to_args();
		debug!(binary = %self.binary.display(), "spawning BrowserStack Local");
		let mut child = Command::new(&self.binary)
			.args(&args)
			.stdin(Stdio::null())
			.stdout(Stdio::piped())
			.stderr(Stdio::inherit())
			.spawn()
			.map_err(|e| Error::LaunchFailed(format!("failed to spawn process: {}", e)))?;

		// Give the binary a moment to reject bad arguments or a bad key.
		tokio::time::sleep(SPAWN_SETTLE).await;

		match child.try_wait() {
			Ok(Some(status)) => {
				return Err(Error::LaunchFailed(format!(
					"process exited during startup with status {}",
					status
				)));
			}
			Ok(None) => {}
			Err(e) => {
				return Err(Error::LaunchFailed(format!(
					"failed to check process status: {}",
					e
				)));
			}
		}

		*self.child.lock() = Some(child);
		Ok(())
	}

	async fn stop(&self) -> Result<()> {
		let child = self.child.lock().take();
		let Some(mut child) = child else {
			return Ok(());
		};

		#[cfg(windows)]
		{
			// On windows tokio services child stdio on a blocking pool;
			// pipes must close before the kill or the reap can hang.
			drop(child.stdin.take());
			drop(child.stdout.take());
			drop(child.stderr.take());
		}

		child
			.kill()
			.await
			.map_err(|e| Error::StopFailed(format!("failed to kill process: {}", e)))?;
		let _ = child.wait().await;

		Ok(())
	}

	fn is_running(&self) -> bool {
		let mut child = self.child.lock();
		match child.as_mut() {
			Some(child) => matches!(child.try_wait(), Ok(None)),
			None => false,
		}
	}

	fn pid(&self) -> Option<u32> {
		self.child.lock().as_ref().and_then(|child| child.id())
	}
}

/// Creates [`LocalTunnel`] handles, one per [`create`](TunnelFactory::create).
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalTunnelFactory;

impl TunnelFactory for LocalTunnelFactory {
	fn create(&self) -> Result<Arc<dyn Tunnel>> {
		Ok(Arc::new(LocalTunnel::locate()?))
	}
}

#[cfg(test)]
mod tests {
	use std::fs;
	#[cfg(unix)]
	use std::os::unix::fs::PermissionsExt;
	use std::path::Path;

	use tempfile::TempDir;

	use super::*;

	#[cfg(unix)]
	fn write_mock_binary(path: &Path, script: &str) {
		fs::write(path, script).unwrap();
		let mut perms = fs::metadata(path).unwrap().permissions();
		perms.set_mode(0o755);
		fs::set_permissions(path, perms).unwrap();
	}

	#[test]
	fn unstarted_handle_reports_idle() {
		let tunnel = LocalTunnel::new(PathBuf::from("/nonexistent"));
		assert!(!tunnel.is_running());
		assert_eq!(tunnel.pid(), None);
	}

	#[cfg(unix)]
	#[tokio::test]
	async fn start_and_stop_long_running_binary() {
		let temp = TempDir::new().unwrap();
		let binary = temp.path().join("BrowserStackLocal");
		write_mock_binary(&binary, "#!/bin/sh\nsleep 30\n");

		let tunnel = LocalTunnel::new(binary);
		tunnel.start(StartOptions::with_key("k")).await.unwrap();
		assert!(tunnel.is_running());
		assert!(tunnel.pid().is_some());

		tunnel.stop().await.unwrap();
		assert!(!tunnel.is_running());
		assert_eq!(tunnel.pid(), None);
	}

	#[cfg(unix)]
	#[tokio::test]
	async fn immediate_exit_fails_start() {
		let temp = TempDir::new().unwrap();
		let binary = temp.path().join("BrowserStackLocal");
		write_mock_binary(&binary, "#!/bin/sh\nexit 3\n");

		let tunnel = LocalTunnel::new(binary);
		let err = tunnel.start(StartOptions::with_key("k")).await.unwrap_err();
		assert!(matches!(err, Error::LaunchFailed(_)));
		assert!(!tunnel.is_running());
	}

	#[cfg(unix)]
	#[tokio::test]
	async fn second_start_is_rejected() {
		let temp = TempDir::new().unwrap();
		let binary = temp.path().join("BrowserStackLocal");
		write_mock_binary(&binary, "#!/bin/sh\nsleep 30\n");

		let tunnel = LocalTunnel::new(binary);
		tunnel.start(StartOptions::with_key("k")).await.unwrap();
		let err = tunnel.start(StartOptions::with_key("k")).await.unwrap_err();
		assert!(matches!(err, Error::LaunchFailed(_)));

		tunnel.stop().await.unwrap();
	}

	#[tokio::test]
	async fn stop_without_start_is_a_noop() {
		let tunnel = LocalTunnel::new(PathBuf::from("/nonexistent"));
		tunnel.stop().await.unwrap();
	}

	#[tokio::test]
	async fn missing_binary_fails_spawn() {
		let tunnel = LocalTunnel::new(PathBuf::from("/nonexistent/BrowserStackLocal"));
		let err = tunnel.start(StartOptions::with_key("k")).await.unwrap_err();
		assert!(matches!(err, Error::LaunchFailed(_)));
	}
}
