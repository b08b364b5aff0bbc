//! The alert area: one held danger alert plus short-lived everything else.

use core::{cell::RefCell, fmt, time::Duration};
use std::rc::Rc;
use tracing::{error, info, instrument, warn};

/// Default lifetime of non-danger alerts.
pub const ALERT_TIMEOUT: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
	Info,
	Success,
	Warning,
	/// Held until the next danger alert.
	Danger,
}
impl Severity {
	/// Suffix of the `alert-*` class used when rendering.
	#[must_use]
	pub fn as_str(self) -> &'static str {
		match self {
			Severity::Info => "info",
			Severity::Success => "success",
			Severity::Warning => "warning",
			Severity::Danger => "danger",
		}
	}
}
impl fmt::Display for Severity {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
	/// Unique per [`Notifier`], starting at 1.
	pub sequence: u64,
	pub severity: Severity,
	pub text: String,
}

/// Where alerts end up.
///
/// Implementations own presentation only. Which alerts to dismiss and when is decided by [`Notifier`].
pub trait AlertSurface {
	/// Clears the visible set and shows `alert` in its place.
	fn show(&mut self, alert: &Alert);

	/// Removes the alert with `sequence` if it is still present. Must tolerate unknown or already removed alerts.
	fn dismiss(&mut self, sequence: u64);

	/// Schedules [`dismiss`](`AlertSurface::dismiss`) after `delay`. Fire-and-forget.
	fn dismiss_after(&mut self, sequence: u64, delay: Duration);
}

struct Channel {
	last_sequence: u64,
	held: Option<u64>,
	timeout: Duration,
	surface: Box<dyn AlertSurface>,
}

/// Cheaply clonable handle to the page's single alert channel.
#[derive(Clone)]
pub struct Notifier(Rc<RefCell<Channel>>);
impl fmt::Debug for Notifier {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let channel = self.0.borrow();
		f.debug_struct("Notifier")
			.field("last_sequence", &channel.last_sequence)
			.field("held", &channel.held)
			.field("timeout", &channel.timeout)
			.finish()
	}
}
impl Notifier {
	pub fn new(surface: impl 'static + AlertSurface) -> Self {
		Self::with_timeout(surface, ALERT_TIMEOUT)
	}

	pub fn with_timeout(surface: impl 'static + AlertSurface, timeout: Duration) -> Self {
		Self(Rc::new(RefCell::new(Channel {
			last_sequence: 0,
			held: None,
			timeout,
			surface: Box::new(surface),
		})))
	}

	/// Shows a new alert and returns its sequence number.
	///
	/// A [`Severity::Danger`] alert first dismisses the previously held one and then becomes the held alert itself.
	/// Anything else leaves the held alert alone and expires on its own.
	#[instrument(skip(self, text))]
	pub fn announce(&self, severity: Severity, text: impl fmt::Display) -> u64 {
		let text = text.to_string();
		match severity {
			Severity::Info | Severity::Success => info!("{}", text),
			Severity::Warning => warn!("{}", text),
			Severity::Danger => error!("{}", text),
		}

		let mut channel = self.0.borrow_mut();
		channel.last_sequence += 1;
		let sequence = channel.last_sequence;
		let alert = Alert { sequence, severity, text };

		if severity == Severity::Danger {
			if let Some(previous) = channel.held.replace(sequence) {
				channel.surface.dismiss(previous);
			}
			channel.surface.show(&alert);
		} else {
			channel.surface.show(&alert);
			let timeout = channel.timeout;
			channel.surface.dismiss_after(sequence, timeout);
		}
		sequence
	}

	/// Sequence number of the currently held danger alert.
	#[must_use]
	pub fn held(&self) -> Option<u64> {
		self.0.borrow().held
	}
}
