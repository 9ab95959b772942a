use thiserror::Error;
use wasm_bindgen::JsValue;

/// Reasons a drawing surface could not be brought up.
///
/// None of these reach the page: the component logs them and renders no
/// animation.
#[derive(Debug, Error)]
pub enum SurfaceError {
	/// `window` is missing (not running in a browser).
	#[error("no window available")]
	NoWindow,
	/// The window has no document.
	#[error("no document available")]
	NoDocument,
	/// The canvas cannot provide a 2D context.
	#[error("2d drawing context unavailable")]
	ContextUnavailable,
	/// A DOM call threw.
	#[error("DOM operation failed: {0}")]
	Dom(String),
}

impl From<JsValue> for SurfaceError {
	fn from(value: JsValue) -> Self {
		Self::Dom(value.as_string().unwrap_or_else(|| format!("{value:?}")))
	}
}
