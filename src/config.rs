use crate::{
	error::{Error, Result},
	notify::ALERT_TIMEOUT,
	patch::FADE,
};
use core::{convert::TryFrom, time::Duration};
use serde::Deserialize;
use tracing::{debug, warn};
use wasm_bindgen::JsValue;

/// Which server endpoint (and therefore which inbound handler) a page uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
	/// Generic patches, see [`Interpreter`](`crate::Interpreter`).
	Control,
	/// Charger telemetry, see [`ChargerRenderer`](`crate::ChargerRenderer`).
	Charger,
}
impl Endpoint {
	#[must_use]
	pub fn path(self) -> &'static str {
		match self {
			Endpoint::Control => "/api/control",
			Endpoint::Charger => "/api/laden",
		}
	}
}

/// Page-supplied settings, read from the global `moat` object.
///
/// Everything except `host` has a default. Without `host` there's nothing to connect to.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
	/// `host[:port]` of the server.
	pub host: Option<String>,
	/// Forces `wss://` (`true`) or `ws://` (`false`). Follows the page's protocol if unset.
	pub secure: Option<bool>,
	/// Identifier of the element alerts are shown in.
	pub alert_container: String,
	/// Identifier of the element scrolled to the top when an alert appears.
	pub scroll_container: String,
	pub alert_timeout_ms: u32,
	pub alert_fade_ms: u32,
	pub fade_ms: u32,
}
impl Default for Config {
	fn default() -> Self {
		Self {
			host: None,
			secure: None,
			alert_container: "info".to_owned(),
			scroll_container: "page".to_owned(),
			alert_timeout_ms: millis(ALERT_TIMEOUT),
			alert_fade_ms: 300,
			fade_ms: millis(FADE),
		}
	}
}

pub(crate) fn millis(duration: Duration) -> u32 {
	u32::try_from(duration.as_millis()).unwrap_or(u32::MAX)
}

impl Config {
	/// Parses a JSON object. Unknown keys are ignored.
	///
	/// # Errors
	///
	/// [`Error::Decode`] if `json` isn't an object of the expected shape.
	pub fn from_json(json: &str) -> Result<Self> {
		serde_json::from_str(json).map_err(Error::Decode)
	}

	/// Reads `window.moat`, falling back to [`Config::default`] if it's missing or unreadable.
	#[must_use]
	pub fn from_window(window: &web_sys::Window) -> Self {
		let moat = match js_sys::Reflect::get(window, &JsValue::from_str("moat")) {
			Ok(moat) if moat.is_object() => moat,
			_ => {
				debug!("No `moat` object on `window`. Using defaults.");
				return Self::default();
			}
		};
		let json = match js_sys::JSON::stringify(&moat).ok().and_then(|json| json.as_string()) {
			Some(json) => json,
			None => {
				warn!("`window.moat` can't be serialized. Using defaults.");
				return Self::default();
			}
		};
		Self::from_json(&json).unwrap_or_else(|error| {
			warn!("Invalid `window.moat` ({}). Using defaults.", error);
			Self::default()
		})
	}

	/// The socket address for `endpoint`, given the page's `location.protocol`.
	///
	/// # Errors
	///
	/// [`Error::MissingHost`] if no host is configured.
	pub fn url(&self, endpoint: Endpoint, page_protocol: &str) -> Result<String> {
		let host = self.host.as_deref().filter(|host| !host.is_empty()).ok_or(Error::MissingHost)?;
		let secure = self.secure.unwrap_or(page_protocol == "https:");
		Ok(format!("{}://{}{}", if secure { "wss" } else { "ws" }, host, endpoint.path()))
	}

	#[must_use]
	pub fn alert_timeout(&self) -> Duration {
		Duration::from_millis(self.alert_timeout_ms.into())
	}

	#[must_use]
	pub fn alert_fade(&self) -> Duration {
		Duration::from_millis(self.alert_fade_ms.into())
	}

	#[must_use]
	pub fn fade(&self) -> Duration {
		Duration::from_millis(self.fade_ms.into())
	}
}
