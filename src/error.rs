use crate::notify::Severity;
use thiserror::Error;
use wasm_bindgen::JsValue;

/// Everything that can go wrong between a frame arriving and the page changing.
///
/// The [`Display`](`core::fmt::Display`) text of each variant is exactly what the user sees in the alert area,
/// so keep it short and actionable.
#[derive(Debug, Error)]
pub enum Error {
	/// The host has no `WebSocket` constructor.
	#[error("Your browser does not support WebSockets. Sorry.")]
	Unsupported,

	/// `window.moat.host` is missing.
	#[error("Internal error! Please try again later.")]
	MissingHost,

	/// The `WebSocket` constructor rejected the address.
	#[error("Internal error! Please try again later.")]
	Socket(String),

	#[error("Malformed message: {0}")]
	Decode(#[source] serde_json::Error),

	/// Valid JSON, but without an `action`. Carries the raw frame.
	#[error("Unknown message: {0}")]
	MissingAction(String),

	#[error("Unknown action: {0}")]
	UnknownAction(String),

	#[error("Binary frames are not supported.")]
	BinaryFrame,

	/// A target without parent (or an `update` target) resolved to nothing.
	#[error("Content ID {0} not found.")]
	NotFound(String),

	#[error("Content ID {id}/{parent} not found.")]
	NotFoundUnder { id: String, parent: String },

	#[error("Bad markup: {0}")]
	Markup(String),

	#[error("DOM operation failed: {0}")]
	Dom(String),

	/// The outbound bridge is disabled.
	#[error("Not connected. Reload before doing this.")]
	NotConnected,

	#[error("Could not encode command: {0}")]
	Encode(String),

	#[error("Send failed: {0}")]
	Send(String),
}

impl Error {
	/// How loudly this should be surfaced.
	#[must_use]
	pub fn severity(&self) -> Severity {
		match self {
			Error::Unsupported => Severity::Info,
			Error::Decode(_) | Error::MissingAction(_) | Error::UnknownAction(_) | Error::BinaryFrame | Error::NotConnected | Error::Encode(_) => Severity::Warning,
			Error::MissingHost | Error::Socket(_) | Error::NotFound(_) | Error::NotFoundUnder { .. } | Error::Markup(_) | Error::Dom(_) | Error::Send(_) => Severity::Danger,
		}
	}

	pub(crate) fn dom(error: &JsValue) -> Self {
		Error::Dom(format!("{:?}", error))
	}
}

pub type Result<T, E = Error> = core::result::Result<T, E>;
