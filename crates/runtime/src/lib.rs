//! BrowserStack Local runtime - tunnel process lifecycle
//!
//! This crate provides the low-level infrastructure for running the
//! BrowserStack Local tunnel binary:
//!
//! - **Subprocess contract**: the [`Tunnel`] trait every tunnel handle
//!   implements (start, stop, liveness, pid)
//! - **Production adapter**: [`LocalTunnel`] spawning the real binary
//! - **Binary discovery**: locating the tunnel binary on this machine
//! - **Deadline races**: bounding external start/stop calls in time
//! - **Process control**: sending OS termination signals for forced stop
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │   bstack    │  Launcher (lifecycle controller)
//! └──────┬──────┘
//!        │ depends on traits, not concrete handles
//! ┌──────▼────────┐
//! │ bstack-runtime│  This crate
//! │  ┌─────────┐  │
//! │  │ Tunnel  │  │  subprocess contract
//! │  └─────────┘  │
//! │  ┌─────────┐  │
//! │  │ deadline│  │  timeout races
//! │  └─────────┘  │
//! │  ┌─────────┐  │
//! │  │ process │  │  OS signals
//! │  └─────────┘  │
//! └───────────────┘
//! ```
//!
//! The [`testing`] module carries mock implementations of every trait so
//! the controller can be exercised without a real subprocess or real OS
//! signals.

pub mod binary;
pub mod deadline;
pub mod error;
pub mod local;
pub mod process;
pub mod testing;
pub mod tunnel;

// Re-export key types at crate root
pub use binary::locate_binary;
pub use deadline::race;
pub use error::{Error, Result};
pub use local::{LocalTunnel, LocalTunnelFactory};
pub use process::{ProcessControl, SystemProcessControl};
pub use tunnel::{StartOptions, Tunnel, TunnelFactory};
