//! Charger telemetry, as spoken on `/api/laden`.
//!
//! Unlike [`patch`](`crate::patch`), this writes text into a known page layout and never restructures the tree.
//! Records for chargers the page doesn't show are dropped without a word.

use crate::{
	document::Document,
	error::{Error, Result},
	notify::Notifier,
	session::Handler,
};
use core::fmt;
use serde::Deserialize;
use serde_json::Value;
use tracing::{instrument, trace};

/// Placeholder for quantities that don't apply in the current state.
pub const NOT_APPLICABLE: &str = "—";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChargerRecord {
	pub name: String,
	pub state: String,
	pub amp_avail: f64,
	pub charging: bool,
	pub connected: bool,
	pub amp: f64,
	pub power: f64,
	pub power_factor: f64,
	#[serde(rename = "charge_Wh")]
	pub charge_wh: f64,
	pub charge_sec: f64,
}
impl ChargerRecord {
	/// Identifier of the element showing this charger.
	#[must_use]
	pub fn element_id(&self) -> String {
		format!("charger_{}", self.name)
	}

	/// `(slot class, text)` for every field, in wire order.
	#[must_use]
	pub fn slots(&self) -> [(&'static str, String); 9] {
		let while_charging = |text: String| if self.charging { text } else { NOT_APPLICABLE.to_owned() };
		let while_connected = |text: String| if self.connected { text } else { NOT_APPLICABLE.to_owned() };
		[
			("state", self.state.clone()),
			("amp_avail", format!("{:.1}", self.amp_avail)),
			("charging", yes_no(self.charging).to_owned()),
			("connected", yes_no(self.connected).to_owned()),
			("amp", while_charging(format!("{:.1}", self.amp))),
			("power", while_charging(format!("{:.0}", self.power))),
			("power_factor", while_charging(format!("{:.2}", self.power_factor))),
			("charge_Wh", while_connected(format!("{:.0}", self.charge_wh))),
			("charge_sec", while_connected(Clock(self.charge_sec).to_string())),
		]
	}
}

fn yes_no(flag: bool) -> &'static str {
	if flag {
		"yes"
	} else {
		"no"
	}
}

/// Seconds as `H:MM:SS`. Negative and non-finite values show as zero.
#[derive(Debug, Clone, Copy)]
pub struct Clock(pub f64);
impl fmt::Display for Clock {
	#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let total = if self.0.is_finite() && self.0 > 0.0 { self.0.round() as u64 } else { 0 };
		write!(f, "{}:{:02}:{:02}", total / 3600, total / 60 % 60, total % 60)
	}
}

/// Writes [`ChargerRecord`]s into `charger_<name>` elements.
pub struct ChargerRenderer<D: Document> {
	document: D,
	notifier: Notifier,
}
impl<D: Document> fmt::Debug for ChargerRenderer<D> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ChargerRenderer").finish()
	}
}
impl<D: Document> ChargerRenderer<D> {
	#[must_use]
	pub fn new(document: D, notifier: Notifier) -> Self {
		Self { document, notifier }
	}

	/// Decodes and renders one frame.
	///
	/// # Errors
	///
	/// [`Error::Decode`] for invalid JSON or a charger update with missing or ill-typed fields.
	/// Frames of any other class or action are skipped and are not an error.
	#[instrument(skip(self, text))]
	pub fn apply(&self, text: &str) -> Result<()> {
		let value: Value = serde_json::from_str(text).map_err(Error::Decode)?;
		if value.get("class").and_then(Value::as_str) != Some("charger") || value.get("action").and_then(Value::as_str) != Some("update") {
			trace!("Not a charger update. Skipping.");
			return Ok(());
		}
		let record: ChargerRecord = serde_json::from_value(value).map_err(Error::Decode)?;
		self.render(&record);
		Ok(())
	}

	/// Writes `record` into its element, if the page has one.
	pub fn render(&self, record: &ChargerRecord) {
		let id = record.element_id();
		let root = match self.document.get(&id) {
			Some(root) => root,
			None => return trace!(%id, "No element for this charger."),
		};
		for (name, text) in record.slots().iter() {
			match self.document.slot(&root, name) {
				Some(slot) => self.document.set_text(&slot, text),
				None => trace!(%id, slot = *name, "Slot missing."),
			}
		}
	}
}

impl<D: Document> Handler for ChargerRenderer<D> {
	fn handle(&mut self, text: &str) {
		if let Err(error) = self.apply(text) {
			self.notifier.announce(error.severity(), &error);
		}
	}
}
