//! Error types for page-data loading and configuration.

/// Failure to read JSON embedded in the page.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
	/// `web_sys::window()` returned nothing (not running in a browser).
	#[error("no browser window available")]
	NoWindow,
	/// No element with this id in the document.
	#[error("element #{id} not found")]
	MissingElement {
		/// Element id looked up.
		id: String,
	},
	/// The element exists but is not a `<script>`.
	#[error("element #{id} is not a <script>")]
	NotAScript {
		/// Element id looked up.
		id: String,
	},
	/// The script text is not valid JSON for the expected type.
	#[error("failed to parse #{id}: {source}")]
	Parse {
		/// Element id whose text failed to parse.
		id: String,
		/// Underlying JSON error.
		#[source]
		source: serde_json::Error,
	},
}

/// An out-of-range layout parameter.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid layout parameter `{field}`: {reason}")]
pub struct ConfigError {
	/// Config field that was rejected.
	pub field: &'static str,
	/// Why it was rejected.
	pub reason: &'static str,
}

impl ConfigError {
	pub(crate) fn new(field: &'static str, reason: &'static str) -> Self {
		Self { field, reason }
	}
}
