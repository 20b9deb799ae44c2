//! BrowserStack Local tunnel service.
//!
//! Exposes a developer's local web server to the BrowserStack grid: tags
//! outgoing capability descriptors so the grid routes sessions through a
//! local tunnel, and runs the tunnel subprocess around the host test
//! runner's lifecycle hooks.
//!
//! # Example
//!
//! ```ignore
//! use bstack::{Launcher, LocalConfig};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> bstack::Result<()> {
//!     let config = LocalConfig::new().enabled(true).key("<access key>");
//!     let mut caps = json!([{ "browserName": "chrome" }]);
//!
//!     // Construction stamps the service version into every descriptor.
//!     let launcher = Launcher::new(config, &mut caps, 7)?;
//!
//!     // Before sessions: tag `local`, boot the tunnel under a deadline.
//!     launcher.on_prepare(&mut caps).await?;
//!
//!     // ... run sessions against the grid ...
//!
//!     // After sessions: stop the tunnel under a deadline.
//!     launcher.on_complete().await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod launcher;

pub use bstack_protocol::{CapabilitiesError, tag_local, tag_service_version};
pub use bstack_runtime::{Error, Result};
pub use config::LocalConfig;
pub use launcher::{Launcher, SERVICE_VERSION};
