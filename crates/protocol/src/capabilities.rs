//! Capability collection shapes.
//!
//! A WebDriver host hands the service its capabilities in one of three
//! shapes, and nothing in the value says which one ahead of time:
//!
//! - a single descriptor object,
//! - an array of descriptor objects (multiremote-by-array),
//! - a map from session name to a wrapper object holding the descriptor
//!   under a `"capabilities"` key (multiremote-by-name).
//!
//! [`CapabilitiesShape::classify`] is the single place that discriminates;
//! [`for_each_descriptor`] walks every descriptor regardless of shape.

use serde_json::{Map, Value};
use thiserror::Error;

/// Key of the BrowserStack vendor options block inside a descriptor.
pub const VENDOR_OPTIONS_KEY: &str = "bstack:options";

/// Service-version field inside the vendor options block.
pub const SERVICE_FIELD: &str = "wdioService";

/// Flattened top-level service-version key used by WebDriver 6 and below.
pub const LEGACY_SERVICE_KEY: &str = "browserstack.wdioService";

/// Field inside the vendor options block that routes the session through a
/// local tunnel.
pub const LOCAL_FIELD: &str = "local";

/// Key under which a multiremote session wrapper holds its descriptor.
const MULTIREMOTE_CAPS_KEY: &str = "capabilities";

/// Result type alias for capability operations.
pub type Result<T> = std::result::Result<T, CapabilitiesError>;

/// Errors raised while walking a capability collection.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CapabilitiesError {
	/// The collection is neither a JSON object nor a JSON array.
	#[error("capabilities should be an object or an array, got {found}")]
	InvalidCollection { found: &'static str },

	/// An array element is not a descriptor object.
	#[error("capability at index {index} should be an object, got {found}")]
	InvalidDescriptor { index: usize, found: &'static str },

	/// A multiremote entry's inner descriptor is not an object.
	#[error("multiremote session {session:?} has no capabilities object")]
	InvalidEntry { session: String },
}

/// The three shapes a capability collection can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapabilitiesShape {
	/// One descriptor object.
	Single,
	/// Array of descriptor objects.
	Sequence,
	/// Session-name map of `{ "capabilities": <descriptor> }` wrappers.
	NamedMap,
}

impl CapabilitiesShape {
	/// Classifies a capabilities value.
	///
	/// A non-empty object whose every value is an object carrying a
	/// `"capabilities"` key is multiremote-by-name; any other object is a
	/// single descriptor.
	///
	/// # Errors
	///
	/// Returns [`CapabilitiesError::InvalidCollection`] for anything that
	/// is neither an object nor an array.
	pub fn classify(caps: &Value) -> Result<Self> {
		match caps {
			Value::Array(_) => Ok(Self::Sequence),
			Value::Object(map) => {
				let named = !map.is_empty()
					&& map.values().all(|entry| {
						entry
							.as_object()
							.is_some_and(|wrapper| wrapper.contains_key(MULTIREMOTE_CAPS_KEY))
					});
				if named {
					Ok(Self::NamedMap)
				} else {
					Ok(Self::Single)
				}
			}
			other => Err(CapabilitiesError::InvalidCollection {
				found: json_type_name(other),
			}),
		}
	}
}

/// Applies `visit` to every descriptor in the collection, exactly once each.
///
/// The whole collection is validated before the first descriptor is touched,
/// so an error means nothing was mutated.
pub fn for_each_descriptor<F>(caps: &mut Value, mut visit: F) -> Result<()>
where
	F: FnMut(&mut Map<String, Value>),
{
	let shape = CapabilitiesShape::classify(caps)?;
	match caps {
		Value::Array(items) => {
			for (index, item) in items.iter().enumerate() {
				if !item.is_object() {
					return Err(CapabilitiesError::InvalidDescriptor {
						index,
						found: json_type_name(item),
					});
				}
			}
			for item in items {
				if let Value::Object(descriptor) = item {
					visit(descriptor);
				}
			}
		}
		Value::Object(map) if shape == CapabilitiesShape::NamedMap => {
			for (session, entry) in map.iter() {
				let has_descriptor = entry
					.get(MULTIREMOTE_CAPS_KEY)
					.is_some_and(Value::is_object);
				if !has_descriptor {
					return Err(CapabilitiesError::InvalidEntry {
						session: session.clone(),
					});
				}
			}
			for entry in map.values_mut() {
				if let Some(Value::Object(descriptor)) = entry.get_mut(MULTIREMOTE_CAPS_KEY) {
					visit(descriptor);
				}
			}
		}
		Value::Object(descriptor) => visit(descriptor),
		other => {
			// classify() already rejected this arm.
			return Err(CapabilitiesError::InvalidCollection {
				found: json_type_name(other),
			});
		}
	}
	Ok(())
}

fn json_type_name(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "a boolean",
		Value::Number(_) => "a number",
		Value::String(_) => "a string",
		Value::Array(_) => "an array",
		Value::Object(_) => "an object",
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	#[test]
	fn classify_array_as_sequence() {
		let caps = json!([{ "browserName": "chrome" }]);
		assert_eq!(
			CapabilitiesShape::classify(&caps).unwrap(),
			CapabilitiesShape::Sequence
		);
	}

	#[test]
	fn classify_wrapper_map_as_named() {
		let caps = json!({
			"browserA": { "capabilities": { "browserName": "chrome" } },
			"browserB": { "capabilities": { "browserName": "firefox" } },
		});
		assert_eq!(
			CapabilitiesShape::classify(&caps).unwrap(),
			CapabilitiesShape::NamedMap
		);
	}

	#[test]
	fn classify_plain_object_as_single() {
		let caps = json!({ "browserName": "chrome" });
		assert_eq!(
			CapabilitiesShape::classify(&caps).unwrap(),
			CapabilitiesShape::Single
		);
	}

	#[test]
	fn classify_empty_object_as_single() {
		let caps = json!({});
		assert_eq!(
			CapabilitiesShape::classify(&caps).unwrap(),
			CapabilitiesShape::Single
		);
	}

	#[test]
	fn classify_mixed_object_as_single() {
		// One value lacks the wrapper key, so this is not a multiremote map.
		let caps = json!({
			"browserA": { "capabilities": {} },
			"browserName": "chrome",
		});
		assert_eq!(
			CapabilitiesShape::classify(&caps).unwrap(),
			CapabilitiesShape::Single
		);
	}

	#[test]
	fn classify_rejects_scalars() {
		for caps in [json!(42), json!("chrome"), json!(null), json!(true)] {
			let err = CapabilitiesShape::classify(&caps).unwrap_err();
			assert!(matches!(err, CapabilitiesError::InvalidCollection { .. }));
		}
	}

	#[test]
	fn visits_each_array_descriptor_once() {
		let mut caps = json!([{ "a": 1 }, { "b": 2 }, { "c": 3 }]);
		let mut visited = 0;
		for_each_descriptor(&mut caps, |_| visited += 1).unwrap();
		assert_eq!(visited, 3);
	}

	#[test]
	fn visits_inner_descriptors_of_named_map() {
		let mut caps = json!({
			"a": { "capabilities": { "browserName": "chrome" } },
			"b": { "capabilities": { "browserName": "firefox" } },
		});
		let mut names = Vec::new();
		for_each_descriptor(&mut caps, |descriptor| {
			names.push(descriptor["browserName"].clone());
		})
		.unwrap();
		assert_eq!(names, vec![json!("chrome"), json!("firefox")]);
	}

	#[test]
	fn rejects_non_object_array_element_before_mutating() {
		let mut caps = json!([{ "a": 1 }, "oops"]);
		let before = caps.clone();
		let err = for_each_descriptor(&mut caps, |descriptor| {
			descriptor.insert("touched".to_string(), json!(true));
		})
		.unwrap_err();
		assert_eq!(
			err,
			CapabilitiesError::InvalidDescriptor {
				index: 1,
				found: "a string"
			}
		);
		assert_eq!(caps, before);
	}

	#[test]
	fn rejects_non_object_inner_descriptor_before_mutating() {
		let mut caps = json!({
			"a": { "capabilities": { "browserName": "chrome" } },
			"b": { "capabilities": 5 },
		});
		let before = caps.clone();
		let err = for_each_descriptor(&mut caps, |descriptor| {
			descriptor.insert("touched".to_string(), json!(true));
		})
		.unwrap_err();
		assert_eq!(
			err,
			CapabilitiesError::InvalidEntry {
				session: "b".to_string()
			}
		);
		assert_eq!(caps, before);
	}
}
