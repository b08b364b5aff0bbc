//! Connection lifecycle.
//!
//! ```text
//! Connecting ──open──▶ Open ──error──▶ Errored
//!      │                 │
//!      └─────error/close─┴──close──▶ Closed
//! ```
//!
//! There is no reconnect. Once `Errored` or `Closed`, only a page reload helps.

use crate::{
	bridge::{Bridge, Command, Transport},
	error::Error,
	notify::{Notifier, Severity},
};
use core::fmt;
use std::rc::Rc;
use tracing::{debug, error, instrument, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
	Connecting,
	Open,
	Closed,
	Errored,
}

/// Consumes inbound text frames.
///
/// Implementations must not let failures escape: everything ends up as an alert or a log line.
pub trait Handler {
	fn handle(&mut self, text: &str);
}

/// One connection's worth of lifecycle bookkeeping.
///
/// The host wires its socket events to [`opened`](`Session::opened`), [`received`](`Session::received`),
/// [`failed`](`Session::failed`) and [`closed`](`Session::closed`).
pub struct Session<H> {
	state: State,
	errored: bool,
	transport: Rc<dyn Transport>,
	bridge: Bridge,
	notifier: Notifier,
	location: String,
	handler: H,
}
impl<H> fmt::Debug for Session<H> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Session")
			.field("state", &self.state)
			.field("errored", &self.errored)
			.field("bridge", &self.bridge)
			.field("location", &self.location)
			.finish()
	}
}
impl<H: Handler> Session<H> {
	/// Enters [`State::Connecting`] and says so.
	///
	/// `location` is sent along with the initial `locate` command once the connection opens.
	pub fn new(transport: Rc<dyn Transport>, handler: H, notifier: Notifier, location: impl Into<String>) -> Self {
		notifier.announce(Severity::Info, "Connecting …");
		Self {
			state: State::Connecting,
			errored: false,
			transport,
			bridge: Bridge::new(notifier.clone()),
			notifier,
			location: location.into(),
			handler,
		}
	}

	#[must_use]
	pub fn state(&self) -> State {
		self.state
	}

	/// A handle to this session's outbound bridge. Stays valid across transitions.
	#[must_use]
	pub fn bridge(&self) -> &Bridge {
		&self.bridge
	}

	#[must_use]
	pub fn handler(&self) -> &H {
		&self.handler
	}

	#[instrument]
	pub fn opened(&mut self) {
		self.state = State::Open;
		self.errored = false;
		self.notifier.announce(Severity::Success, "Connected. Waiting for instructions …");
		self.bridge.connect(Rc::clone(&self.transport));
		if let Err(error) = self.bridge.send(&Command::Locate { location: &self.location }) {
			error!("Could not send `locate`: {}", error);
		}
	}

	#[instrument(skip(self, text))]
	pub fn received(&mut self, text: &str) {
		trace!(len = text.len(), "Frame received.");
		self.handler.handle(text);
	}

	/// Binary frames carry nothing this client understands. They are reported and dropped.
	#[instrument]
	pub fn received_binary(&mut self) {
		let error = Error::BinaryFrame;
		self.notifier.announce(error.severity(), &error);
	}

	#[instrument]
	pub fn failed(&mut self) {
		self.state = State::Errored;
		self.errored = true;
		self.bridge.disconnect();
		self.notifier.announce(Severity::Danger, "Connection error! Please reload this page.");
	}

	#[instrument]
	pub fn closed(&mut self) {
		if self.errored {
			return debug!("Closed after an error. Keeping the error alert.");
		}
		self.state = State::Closed;
		self.bridge.disconnect();
		self.notifier.announce(Severity::Danger, "Connection closed.");
	}
}
