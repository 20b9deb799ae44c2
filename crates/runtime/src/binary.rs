//! Locating the BrowserStack Local binary.

use std::path::PathBuf;
use std::process::Command;

use crate::error::{Error, Result};

/// Environment variable overriding the binary location.
pub const BINARY_ENV: &str = "BROWSERSTACK_LOCAL_BINARY";

#[cfg(not(windows))]
const BINARY_NAME: &str = "BrowserStackLocal";
#[cfg(windows)]
const BINARY_NAME: &str = "BrowserStackLocal.exe";

/// Locates the BrowserStack Local binary.
///
/// Checks in order:
/// 1. `BROWSERSTACK_LOCAL_BINARY` environment variable (runtime override)
/// 2. `which`/`where` lookup on PATH
/// 3. Common install locations
///
/// # Errors
///
/// Returns [`Error::BinaryNotFound`] if no candidate exists on disk.
pub fn locate_binary() -> Result<PathBuf> {
	if let Ok(overridden) = std::env::var(BINARY_ENV) {
		let path = PathBuf::from(overridden);
		if path.exists() {
			return Ok(path);
		}
	}

	#[cfg(not(windows))]
	let which_cmd = "which";
	#[cfg(windows)]
	let which_cmd = "where";

	if let Ok(output) = Command::new(which_cmd).arg(BINARY_NAME).output() {
		if output.status.success() {
			let found = String::from_utf8_lossy(&output.stdout).trim().to_string();
			if !found.is_empty() {
				let path = PathBuf::from(found.lines().next().unwrap_or(&found));
				if path.exists() {
					return Ok(path);
				}
			}
		}
	}

	#[cfg(not(windows))]
	let common_locations = [
		"/usr/local/bin/BrowserStackLocal",
		"/usr/bin/BrowserStackLocal",
		"/opt/homebrew/bin/BrowserStackLocal",
	];

	#[cfg(windows)]
	let common_locations = [
		"C:\\Program Files\\BrowserStackLocal\\BrowserStackLocal.exe",
		"C:\\Program Files (x86)\\BrowserStackLocal\\BrowserStackLocal.exe",
	];

	for location in &common_locations {
		let path = PathBuf::from(location);
		if path.exists() {
			return Ok(path);
		}
	}

	Err(Error::BinaryNotFound)
}

#[cfg(test)]
mod tests {
	use std::fs;
	use std::sync::Mutex;

	use tempfile::TempDir;

	use super::*;

	/// Serializes tests that touch the process environment.
	static ENV_LOCK: Mutex<()> = Mutex::new(());

	fn lock_env() -> std::sync::MutexGuard<'static, ()> {
		ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner())
	}

	#[test]
	fn env_override_wins() {
		let _lock = lock_env();
		let temp = TempDir::new().unwrap();
		let binary = temp.path().join("BrowserStackLocal");
		fs::write(&binary, "#!/bin/sh\n").unwrap();

		unsafe { std::env::set_var(BINARY_ENV, &binary) };
		let located = locate_binary();
		unsafe { std::env::remove_var(BINARY_ENV) };

		assert_eq!(located.unwrap(), binary);
	}

	#[test]
	fn missing_env_override_falls_through() {
		let _lock = lock_env();
		unsafe { std::env::set_var(BINARY_ENV, "/nonexistent/set-by-test") };
		let located = locate_binary();
		unsafe { std::env::remove_var(BINARY_ENV) };

		match located {
			Ok(path) => {
				// A real installation happened to be present.
				assert!(path.exists());
			}
			Err(Error::BinaryNotFound) => {}
			Err(e) => panic!("Unexpected error: {:?}", e),
		}
	}
}
