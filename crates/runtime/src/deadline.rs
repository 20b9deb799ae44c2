//! Deadline races for external tunnel calls.
//!
//! The tunnel binary's start and stop calls have no built-in timeout; an
//! unresponsive process would otherwise hang the host's lifecycle hooks
//! forever. Every external call is raced against a timer instead.

use std::future::Future;
use std::time::Duration;

use crate::error::{Error, Result};

/// Races `op` against `limit`, propagating whichever settles first.
///
/// On timeout the caller gets [`Error::Timeout`] while `op` keeps running
/// as a detached task; its eventual result is discarded. The loser is
/// abandoned, not cancelled - an in-flight start that loses its race may
/// still leave a process behind.
///
/// # Errors
///
/// - [`Error::Timeout`] when `limit` elapses first
/// - [`Error::TaskFailed`] when `op` panics
/// - whatever `op` itself returns otherwise
pub async fn race<T, F>(op: F, limit: Duration, op_name: &'static str) -> Result<T>
where
	F: Future<Output = Result<T>> + Send + 'static,
	T: Send + 'static,
{
	let task = tokio::spawn(op);
	match tokio::time::timeout(limit, task).await {
		Ok(Ok(result)) => result,
		Ok(Err(join)) => Err(Error::TaskFailed {
			op: op_name,
			message: join.to_string(),
		}),
		Err(_) => Err(Error::Timeout {
			op: op_name,
			secs: limit.as_secs(),
		}),
	}
}
