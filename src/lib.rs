//! A WebSocket client that patches the live page by element identifier.
//!
//! The server pushes small JSON messages; each one is resolved against the *current* DOM and applied in arrival order.
//! Connection state and failures show up in a single alert area.
//!
//! Start one of the two deployments from JavaScript with `startControl()` (generic patches, see [`Interpreter`])
//! or `startCharger()` (charger telemetry, see [`ChargerRenderer`]).
//! Page scripts can then send commands through the global `to_moat(command)`.

#![doc(html_root_url = "https://docs.rs/livepatch-dom/0.1.0")]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

#[cfg(doctest)]
pub mod readme {
	doc_comment::doctest!("../README.md");
}

pub mod bridge;
pub mod charger;
pub mod config;
pub mod document;
pub mod dom;
mod error;
pub mod notify;
pub mod patch;
pub mod resolve;
pub mod session;
pub mod socket;

pub use bridge::{Bridge, Command, Transport};
pub use charger::{ChargerRecord, ChargerRenderer};
pub use config::{Config, Endpoint};
pub use document::Document;
pub use error::{Error, Result};
pub use notify::{Alert, AlertSurface, Notifier, Severity};
pub use patch::{Interpreter, Patch};
pub use session::{Handler, Session, State};
