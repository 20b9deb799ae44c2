//! Error types for the tunnel runtime.

use thiserror::Error;

/// Result type alias for runtime operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while managing the tunnel.
#[derive(Debug, Error)]
pub enum Error {
	/// BrowserStack Local binary was not found.
	#[error("BrowserStack Local binary not found. Install it or set BROWSERSTACK_LOCAL_BINARY.")]
	BinaryNotFound,

	/// Failed to launch the tunnel process.
	#[error("failed to launch BrowserStack Local: {0}")]
	LaunchFailed(String),

	/// The tunnel process reported an error while stopping.
	#[error("failed to stop BrowserStack Local: {0}")]
	StopFailed(String),

	/// An external start/stop call outlived its deadline.
	#[error("BrowserStack Local failed to {op} within {secs} seconds")]
	Timeout { op: &'static str, secs: u64 },

	/// A deadline-raced task died before settling.
	#[error("tunnel {op} task failed: {message}")]
	TaskFailed { op: &'static str, message: String },

	/// Sending an OS signal to the tunnel process failed.
	#[error("failed to signal tunnel process {pid}: {message}")]
	Signal { pid: u32, message: String },

	/// Capabilities could not be annotated.
	#[error(transparent)]
	Capabilities(#[from] bstack_protocol::CapabilitiesError),

	/// I/O error.
	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),
}

impl Error {
	/// Returns true if this error is a deadline expiry rather than a
	/// failure reported by the tunnel itself.
	pub fn is_timeout(&self) -> bool {
		matches!(self, Error::Timeout { .. })
	}
}
