//! Capability annotation.
//!
//! Two annotations are stamped onto every descriptor during a test run's
//! lifecycle: the service version at construction time and the
//! route-through-local-tunnel flag before sessions start. Where the version
//! lands depends on the WebDriver generation; the local flag always lives
//! in the vendor options block.

use serde_json::{Map, Value};

use crate::capabilities::{
	LEGACY_SERVICE_KEY, LOCAL_FIELD, Result, SERVICE_FIELD, VENDOR_OPTIONS_KEY,
	for_each_descriptor,
};

/// Stamps `version` into every descriptor of the collection.
///
/// A pre-existing `bstack:options` block gets its `wdioService` field
/// overwritten and nothing else touched. Without a block, WebDriver 7+
/// descriptors get a fresh block holding only the version; WebDriver 6 and
/// below get the flattened top-level `browserstack.wdioService` key and no
/// block at all.
///
/// # Errors
///
/// Fails without mutating anything if the collection is neither an object
/// nor an array, or a descriptor slot holds a non-object.
pub fn tag_service_version(caps: &mut Value, version: &str, webdriver_major: u8) -> Result<()> {
	for_each_descriptor(caps, |descriptor| {
		if let Some(block) = vendor_options_mut(descriptor) {
			block.insert(SERVICE_FIELD.to_string(), Value::String(version.to_string()));
		} else if webdriver_major >= 7 {
			let mut block = Map::new();
			block.insert(SERVICE_FIELD.to_string(), Value::String(version.to_string()));
			descriptor.insert(VENDOR_OPTIONS_KEY.to_string(), Value::Object(block));
		} else {
			descriptor.insert(
				LEGACY_SERVICE_KEY.to_string(),
				Value::String(version.to_string()),
			);
		}
	})
}

/// Routes every descriptor through the local tunnel.
///
/// Ensures a `bstack:options` block exists on each descriptor and sets its
/// `local` field to `true`. The flattened legacy key is never written here:
/// the flag is understood by the grid for every WebDriver generation.
///
/// # Errors
///
/// Same contract as [`tag_service_version`].
pub fn tag_local(caps: &mut Value) -> Result<()> {
	for_each_descriptor(caps, |descriptor| {
		let block = descriptor
			.entry(VENDOR_OPTIONS_KEY)
			.or_insert_with(|| Value::Object(Map::new()));
		if !block.is_object() {
			// A scalar in the block's slot can hold nothing; replace it.
			*block = Value::Object(Map::new());
		}
		if let Value::Object(block) = block {
			block.insert(LOCAL_FIELD.to_string(), Value::Bool(true));
		}
	})
}

fn vendor_options_mut(descriptor: &mut Map<String, Value>) -> Option<&mut Map<String, Value>> {
	descriptor
		.get_mut(VENDOR_OPTIONS_KEY)
		.and_then(Value::as_object_mut)
}
