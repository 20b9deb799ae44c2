//! OS process control.
//!
//! Forced stop bypasses the tunnel's graceful shutdown and signals the
//! process directly. Kept behind a trait so the lifecycle controller can be
//! exercised without sending real signals.

use crate::error::{Error, Result};

/// Sends termination signals to tunnel processes by pid.
pub trait ProcessControl: Send + Sync {
	/// Sends a termination signal to `pid`.
	///
	/// # Errors
	///
	/// Returns [`Error::Signal`] if the signal could not be delivered.
	fn kill(&self, pid: u32) -> Result<()>;
}

/// [`ProcessControl`] backed by the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProcessControl;

impl ProcessControl for SystemProcessControl {
	#[cfg(unix)]
	fn kill(&self, pid: u32) -> Result<()> {
		let rc = unsafe { libc::kill(pid as libc::pid_t, libc::SIGTERM) };
		if rc == 0 {
			Ok(())
		} else {
			Err(Error::Signal {
				pid,
				message: std::io::Error::last_os_error().to_string(),
			})
		}
	}

	#[cfg(not(unix))]
	fn kill(&self, pid: u32) -> Result<()> {
		let status = std::process::Command::new("taskkill")
			.args(["/PID", &pid.to_string(), "/F"])
			.status()
			.map_err(|e| Error::Signal {
				pid,
				message: e.to_string(),
			})?;
		if status.success() {
			Ok(())
		} else {
			Err(Error::Signal {
				pid,
				message: format!("taskkill exited with {}", status),
			})
		}
	}
}
