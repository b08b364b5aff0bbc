//! The one outbound path from the page to the server.

use crate::{
	error::{Error, Result},
	notify::Notifier,
};
use core::{cell::RefCell, fmt};
use serde::Serialize;
use std::rc::Rc;
use tracing::{error, instrument, trace};

/// Something that can put a text frame on the wire.
pub trait Transport {
	fn send(&self, text: &str) -> Result<()>;
}

/// Commands this crate sends on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum Command<'a> {
	/// Tells the server which part of the page is shown, so it can send the matching content.
	Locate { location: &'a str },
}

enum Route {
	Disabled,
	Live(Rc<dyn Transport>),
}

/// Swappable send capability.
///
/// Clones share the same route, so rebinding through any of them (which only the session does) is seen by all.
/// While disabled, every send shows a warning alert and fails with [`Error::NotConnected`]. Nothing is dropped silently.
#[derive(Clone)]
pub struct Bridge {
	route: Rc<RefCell<Route>>,
	notifier: Notifier,
}
impl fmt::Debug for Bridge {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Bridge").field("live", &self.is_live()).finish()
	}
}
impl Bridge {
	/// Creates a disabled bridge.
	#[must_use]
	pub fn new(notifier: Notifier) -> Self {
		Self {
			route: Rc::new(RefCell::new(Route::Disabled)),
			notifier,
		}
	}

	#[must_use]
	pub fn is_live(&self) -> bool {
		matches!(*self.route.borrow(), Route::Live(_))
	}

	pub(crate) fn connect(&self, transport: Rc<dyn Transport>) {
		trace!("Bridge live.");
		*self.route.borrow_mut() = Route::Live(transport);
	}

	pub(crate) fn disconnect(&self) {
		trace!("Bridge disabled.");
		*self.route.borrow_mut() = Route::Disabled;
	}

	/// Serializes `command` as JSON and sends it.
	///
	/// # Errors
	///
	/// [`Error::NotConnected`] while disabled (after showing a warning),
	/// [`Error::Encode`] if `command` can't be serialized,
	/// or whatever the transport reports.
	pub fn send<C: ?Sized + Serialize>(&self, command: &C) -> Result<()> {
		let text = serde_json::to_string(command).map_err(|error| Error::Encode(error.to_string()))?;
		self.send_text(&text)
	}

	/// Sends an already serialized command.
	///
	/// # Errors
	///
	/// See [`send`](`Bridge::send`).
	#[instrument(skip(self))]
	pub fn send_text(&self, text: &str) -> Result<()> {
		// Clone out of the cell so a transport calling back into the bridge can't trip the borrow.
		let transport = match &*self.route.borrow() {
			Route::Live(transport) => Some(Rc::clone(transport)),
			Route::Disabled => None,
		};
		match transport {
			Some(transport) => transport.send(text).map_err(|error| {
				error!("{}", error);
				error
			}),
			None => {
				let error = Error::NotConnected;
				self.notifier.announce(error.severity(), &error);
				Err(error)
			}
		}
	}
}
