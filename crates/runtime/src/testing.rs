//! Testing infrastructure for the tunnel runtime.
//!
//! Provides mock implementations for exercising the lifecycle controller
//! without a real subprocess or real OS signals:
//! - [`MockTunnel`]: configurable delays and failures, records every call
//! - [`MockTunnelFactory`]: hands out a shared [`MockTunnel`]
//! - [`MockProcessControl`]: records signalled pids
//!
//! # Example
//!
//! ```ignore
//! use bstack_runtime::testing::{MockTunnel, MockTunnelFactory};
//! use std::sync::Arc;
//!
//! let tunnel = Arc::new(MockTunnel::new());
//! tunnel.set_start_delay(std::time::Duration::from_secs(120));
//! let factory = MockTunnelFactory::new(Arc::clone(&tunnel));
//! // ... drive the controller with the factory, assert on tunnel.actions()
//! ```

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::process::ProcessControl;
use crate::tunnel::{StartOptions, Tunnel, TunnelFactory};

/// Action recorded by [`MockTunnel`] for test assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockAction {
	/// `start` was invoked with these rendered arguments.
	Start { args: Vec<String> },
	/// `stop` was invoked.
	Stop,
}

/// Mock tunnel with configurable delays and failures.
///
/// Starts out stopped with pid 4242. Configure behavior with the `set_*`
/// and `fail_*` methods, then assert on [`actions()`](Self::actions).
pub struct MockTunnel {
	running: Mutex<bool>,
	pid: Mutex<Option<u32>>,
	start_delay: Mutex<Duration>,
	stop_delay: Mutex<Duration>,
	start_error: Mutex<Option<String>>,
	stop_error: Mutex<Option<String>>,
	actions: Mutex<Vec<MockAction>>,
}

impl Default for MockTunnel {
	fn default() -> Self {
		Self::new()
	}
}

impl MockTunnel {
	/// Creates a stopped mock tunnel with pid 4242.
	pub fn new() -> Self {
		Self {
			running: Mutex::new(false),
			pid: Mutex::new(Some(4242)),
			start_delay: Mutex::new(Duration::ZERO),
			stop_delay: Mutex::new(Duration::ZERO),
			start_error: Mutex::new(None),
			stop_error: Mutex::new(None),
			actions: Mutex::new(Vec::new()),
		}
	}

	/// Overrides the running flag.
	pub fn set_running(&self, running: bool) {
		*self.running.lock().unwrap() = running;
	}

	/// Overrides the reported pid.
	pub fn set_pid(&self, pid: Option<u32>) {
		*self.pid.lock().unwrap() = pid;
	}

	/// Makes `start` sleep for `delay` before settling.
	pub fn set_start_delay(&self, delay: Duration) {
		*self.start_delay.lock().unwrap() = delay;
	}

	/// Makes `stop` sleep for `delay` before settling.
	pub fn set_stop_delay(&self, delay: Duration) {
		*self.stop_delay.lock().unwrap() = delay;
	}

	/// Makes `start` fail with [`Error::LaunchFailed`].
	pub fn fail_start(&self, message: &str) {
		*self.start_error.lock().unwrap() = Some(message.to_string());
	}

	/// Makes `stop` fail with [`Error::StopFailed`].
	pub fn fail_stop(&self, message: &str) {
		*self.stop_error.lock().unwrap() = Some(message.to_string());
	}

	/// Returns all recorded actions (for test assertions).
	pub fn actions(&self) -> Vec<MockAction> {
		self.actions.lock().unwrap().clone()
	}

	/// Returns true if `stop` was ever invoked.
	pub fn stop_was_called(&self) -> bool {
		self.actions().iter().any(|a| *a == MockAction::Stop)
	}

	fn record(&self, action: MockAction) {
		self.actions.lock().unwrap().push(action);
	}
}

#[async_trait]
impl Tunnel for MockTunnel {
	async fn start(&self, opts: StartOptions) -> Result<()> {
		self.record(MockAction::Start {
			args: opts.to_args(),
		});

		let delay = *self.start_delay.lock().unwrap();
		if !delay.is_zero() {
			tokio::time::sleep(delay).await;
		}

		if let Some(message) = self.start_error.lock().unwrap().clone() {
			return Err(Error::LaunchFailed(message));
		}

		*self.running.lock().unwrap() = true;
		Ok(())
	}

	async fn stop(&self) -> Result<()> {
		self.record(MockAction::Stop);

		let delay = *self.stop_delay.lock().unwrap();
		if !delay.is_zero() {
			tokio::time::sleep(delay).await;
		}

		if let Some(message) = self.stop_error.lock().unwrap().clone() {
			return Err(Error::StopFailed(message));
		}

		*self.running.lock().unwrap() = false;
		Ok(())
	}

	fn is_running(&self) -> bool {
		*self.running.lock().unwrap()
	}

	fn pid(&self) -> Option<u32> {
		*self.pid.lock().unwrap()
	}
}

/// Factory handing out one shared [`MockTunnel`].
pub struct MockTunnelFactory {
	tunnel: Arc<MockTunnel>,
	creates: Mutex<usize>,
}

impl MockTunnelFactory {
	/// Creates a factory that always returns `tunnel`.
	pub fn new(tunnel: Arc<MockTunnel>) -> Self {
		Self {
			tunnel,
			creates: Mutex::new(0),
		}
	}

	/// Number of times [`create`](TunnelFactory::create) was invoked.
	pub fn create_count(&self) -> usize {
		*self.creates.lock().unwrap()
	}
}

impl TunnelFactory for MockTunnelFactory {
	fn create(&self) -> Result<Arc<dyn Tunnel>> {
		*self.creates.lock().unwrap() += 1;
		Ok(Arc::clone(&self.tunnel) as Arc<dyn Tunnel>)
	}
}

/// [`ProcessControl`] that records pids instead of signalling.
#[derive(Default)]
pub struct MockProcessControl {
	killed: Mutex<Vec<u32>>,
	error: Mutex<Option<String>>,
}

impl MockProcessControl {
	/// Creates a process control that accepts every kill.
	pub fn new() -> Self {
		Self::default()
	}

	/// Makes every kill fail with [`Error::Signal`].
	pub fn fail_with(&self, message: &str) {
		*self.error.lock().unwrap() = Some(message.to_string());
	}

	/// Returns the pids that were signalled, in order.
	pub fn killed(&self) -> Vec<u32> {
		self.killed.lock().unwrap().clone()
	}
}

impl ProcessControl for MockProcessControl {
	fn kill(&self, pid: u32) -> Result<()> {
		self.killed.lock().unwrap().push(pid);
		if let Some(message) = self.error.lock().unwrap().clone() {
			return Err(Error::Signal { pid, message });
		}
		Ok(())
	}
}
