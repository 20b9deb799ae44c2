//! Wire types for BrowserStack WebDriver capabilities.
//!
//! This crate knows the shapes capability descriptors take on the wire and
//! how BrowserStack's option-naming conventions changed across WebDriver
//! generations. Nothing else in the workspace needs that knowledge: callers
//! hand over a capabilities value in whatever shape the host produced and
//! get back annotated descriptors.
//!
//! # Design Philosophy
//!
//! Types in this crate are:
//! - **Pure data**: no I/O, no async, no subprocess handling
//! - **Shape-polymorphic**: one classification routine covers the single,
//!   array, and multiremote collection shapes
//! - **Generation-aware**: the WebDriver 7+ vendor block vs. the flattened
//!   legacy keys of WebDriver 6 and below live here and only here

pub mod annotate;
pub mod capabilities;

pub use annotate::{tag_local, tag_service_version};
pub use capabilities::{
	CapabilitiesError, CapabilitiesShape, LEGACY_SERVICE_KEY, LOCAL_FIELD, SERVICE_FIELD,
	VENDOR_OPTIONS_KEY, for_each_descriptor,
};
