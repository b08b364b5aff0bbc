//! The generic patch protocol spoken on `/api/control`.

use crate::{
	document::Document,
	error::{Error, Result},
	notify::{Notifier, Severity},
	resolve::{self, resolve, Hit, Keys, Placement},
	session::Handler,
};
use core::{cell::RefCell, fmt, time::Duration};
use hashbrown::HashMap;
use serde::Deserialize;
use serde_json::Value;
use std::rc::Rc;
use tracing::{debug, error, instrument, trace};

/// Default duration of each half of an `update` cross-fade.
pub const FADE: Duration = Duration::from_millis(500);

const ACTIONS: &[&str] = &["error", "replace", "update"];

/// A decoded inbound message.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum Patch {
	/// Server-side failure to show as-is.
	Error { msg: String },
	Replace {
		id: String,
		#[serde(default)]
		parent: Option<String>,
		data: String,
	},
	Update { id: String, data: String },
}
impl Patch {
	/// # Errors
	///
	/// [`Error::Decode`] for invalid JSON or missing fields,
	/// [`Error::MissingAction`] if there's no `action` at all,
	/// [`Error::UnknownAction`] if it isn't one of `error`, `replace` or `update`.
	pub fn decode(text: &str) -> Result<Self> {
		let value: Value = serde_json::from_str(text).map_err(Error::Decode)?;
		let action = match value.get("action") {
			None => return Err(Error::MissingAction(text.to_owned())),
			Some(Value::String(action)) => action.as_str(),
			Some(other) => return Err(Error::UnknownAction(other.to_string())),
		};
		if !ACTIONS.contains(&action) {
			debug!("IN {}", text);
			return Err(Error::UnknownAction(action.to_owned()));
		}
		serde_json::from_value(value).map_err(Error::Decode)
	}
}

/// An `update` waiting for its anchor to finish fading out.
struct Pending<N> {
	generation: u64,
	old: N,
	new: N,
}

/// Fades in flight, keyed by the identifier their anchor was resolved under.
struct Transitions<N> {
	last_generation: u64,
	pending: HashMap<String, Pending<N>>,
}

/// Applies [`Patch`]es to a [`Document`], one message at a time and in arrival order.
pub struct Interpreter<D: Document> {
	document: D,
	notifier: Notifier,
	fade: Duration,
	transitions: Rc<RefCell<Transitions<D::Node>>>,
}
impl<D: Document> fmt::Debug for Interpreter<D> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Interpreter")
			.field("fade", &self.fade)
			.field("pending_transitions", &self.pending_transitions())
			.finish()
	}
}
impl<D: Document> Interpreter<D> {
	#[must_use]
	pub fn new(document: D, notifier: Notifier) -> Self {
		Self {
			document,
			notifier,
			fade: FADE,
			transitions: Rc::new(RefCell::new(Transitions {
				last_generation: 0,
				pending: HashMap::new(),
			})),
		}
	}

	#[must_use]
	pub fn with_fade(self, fade: Duration) -> Self {
		Self { fade, ..self }
	}

	/// Number of `update` swaps still waiting on a fade-out.
	#[must_use]
	pub fn pending_transitions(&self) -> usize {
		self.transitions.borrow().pending.len()
	}

	/// Decodes and applies one message.
	///
	/// # Errors
	///
	/// Decoding and resolution failures. Nothing is mutated in that case.
	#[instrument(skip(self, text))]
	pub fn apply(&mut self, text: &str) -> Result<()> {
		match Patch::decode(text)? {
			Patch::Error { msg } => {
				self.notifier.announce(Severity::Danger, msg);
				Ok(())
			}
			Patch::Replace { id, parent, data } => self.replace(&id, parent.as_deref(), &data),
			Patch::Update { id, data } => self.update(&id, &data),
		}
	}

	fn replace(&mut self, id: &str, parent: Option<&str>, data: &str) -> Result<()> {
		// An empty parent is no parent.
		let parent = parent.filter(|parent| !parent.is_empty());
		let fragment = self.document.parse(data)?;
		self.document.set_id(&fragment, id);
		let hit = resolve(&self.document, resolve::REPLACE, Keys { target: id, parent, declared: None })?;
		self.place(hit, fragment)
	}

	fn update(&mut self, id: &str, data: &str) -> Result<()> {
		let fragment = self.document.parse(data)?;
		let hit = match self.document.declared_id(&fragment) {
			Some(declared) => resolve(
				&self.document,
				resolve::UPDATE_DECLARED,
				Keys {
					target: id,
					parent: None,
					declared: Some(&declared),
				},
			)?,
			None => {
				let hit = resolve(&self.document, resolve::UPDATE, Keys { target: id, parent: None, declared: None })?;
				// Keep whichever naming the page used for this slot.
				self.document.set_id(&fragment, &hit.id);
				hit
			}
		};
		self.place(hit, fragment)
	}

	fn place(&mut self, Hit { node, id, placement }: Hit<D::Node>, fragment: D::Node) -> Result<()> {
		match placement {
			Placement::Replace => self.document.replace(&node, &fragment),
			Placement::Append => self.document.append(&node, &fragment),
			Placement::CrossFade => {
				self.cross_fade(id, node, fragment);
				Ok(())
			}
		}
	}

	/// Hides `new`, fades `old` out, swaps them and fades `new` in.
	///
	/// If `old` is already fading out for an earlier message, `new` just replaces that message's payload.
	/// The swap then happens once, with whatever arrived last.
	fn cross_fade(&mut self, key: String, old: D::Node, new: D::Node) {
		self.document.hide(&new);

		let generation = {
			let mut transitions = self.transitions.borrow_mut();
			if let Some(pending) = transitions.pending.get_mut(&key) {
				if pending.old == old {
					trace!(%key, "Superseding a pending update.");
					pending.new = new;
					return;
				}
			}
			transitions.last_generation += 1;
			let generation = transitions.last_generation;
			transitions.pending.insert(
				key.clone(),
				Pending {
					generation,
					old: old.clone(),
					new,
				},
			);
			generation
		};

		let document = self.document.clone();
		let notifier = self.notifier.clone();
		let transitions = Rc::clone(&self.transitions);
		let fade = self.fade;
		self.document.fade_out(
			&old,
			fade,
			Box::new(move || {
				let pending = {
					let mut transitions = transitions.borrow_mut();
					if transitions.pending.get(&key).map(|pending| pending.generation) == Some(generation) {
						transitions.pending.remove(&key)
					} else {
						None
					}
				};
				let Pending { old, new, .. } = match pending {
					Some(pending) => pending,
					None => return debug!(%key, "Stale fade-out finished. Its anchor was replaced in the meantime."),
				};
				match document.replace(&old, &new) {
					Ok(()) => document.fade_in(&new, fade),
					Err(error) => {
						error!(%key, "Swap after fade-out failed.");
						notifier.announce(error.severity(), &error);
					}
				}
			}),
		);
	}
}

impl<D: Document> Handler for Interpreter<D> {
	fn handle(&mut self, text: &str) {
		if let Err(error) = self.apply(text) {
			self.notifier.announce(error.severity(), &error);
		}
	}
}
