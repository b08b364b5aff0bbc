//! WebSocket wiring and the JavaScript entry points.

use crate::{
	bridge::Transport,
	charger::ChargerRenderer,
	config::{Config, Endpoint},
	dom::{WebAlerts, WebDocument},
	error::{Error, Result},
	notify::Notifier,
	patch::Interpreter,
	session::{Handler, Session},
};
use core::cell::RefCell;
use std::{rc::Rc, sync::Once};
use tracing::{error, info, instrument, warn};
use wasm_bindgen::{closure::Closure, prelude::wasm_bindgen, JsCast, JsValue};
use web_sys::{MessageEvent, WebSocket, Window};

/// Name of the global function page scripts send commands through.
pub const BRIDGE_GLOBAL: &str = "to_moat";

/// Everything that has to outlive `start_*` for the socket's callbacks to stay callable.
struct Connection {
	_socket: WebSocket,
	_on_open: Closure<dyn FnMut(JsValue)>,
	_on_message: Closure<dyn FnMut(MessageEvent)>,
	_on_error: Closure<dyn FnMut(JsValue)>,
	_on_close: Closure<dyn FnMut(JsValue)>,
	_to_moat: Closure<dyn Fn(JsValue) -> bool>,
}

thread_local! {
	static CONNECTION: RefCell<Option<Connection>> = RefCell::new(None);
}

struct SocketTransport(WebSocket);
impl Transport for SocketTransport {
	fn send(&self, text: &str) -> Result<()> {
		self.0.send_with_str(text).map_err(|error| Error::Send(format!("{:?}", error)))
	}
}

fn init_logging() {
	static INIT: Once = Once::new();
	INIT.call_once(|| {
		console_error_panic_hook::set_once();
		tracing_wasm::set_as_global_default();
	});
}

/// Connects to `/api/control` and applies generic patches.
#[wasm_bindgen(js_name = startControl)]
pub fn start_control() {
	start(Endpoint::Control);
}

/// Connects to `/api/laden` and renders charger telemetry.
#[wasm_bindgen(js_name = startCharger)]
pub fn start_charger() {
	start(Endpoint::Charger);
}

/// Sets up alerts, then connects. Failures to do the latter are shown once; there is no retry.
#[instrument]
pub fn start(endpoint: Endpoint) {
	init_logging();

	if CONNECTION.with(|connection| connection.borrow().is_some()) {
		return warn!("Already started. Ignoring.");
	}

	let window = match web_sys::window() {
		Some(window) => window,
		None => return error!("No `window`. Not running on a page?"),
	};
	let document = match window.document() {
		Some(document) => document,
		None => return error!("No `document` on `window`."),
	};

	let config = Config::from_window(&window);
	let notifier = Notifier::with_timeout(WebAlerts::new(document.clone(), &config), config.alert_timeout());
	if let Err(error) = connect(endpoint, &window, WebDocument::new(document), &config, &notifier) {
		notifier.announce(error.severity(), &error);
	}
}

fn connect(endpoint: Endpoint, window: &Window, document: WebDocument, config: &Config, notifier: &Notifier) -> Result<()> {
	if !js_sys::Reflect::has(window, &JsValue::from_str("WebSocket")).unwrap_or(false) {
		return Err(Error::Unsupported);
	}

	let location = window.location();
	let url = config.url(endpoint, &location.protocol().unwrap_or_default())?;
	info!("Connecting to {}", url);
	let socket = WebSocket::new(&url).map_err(|error| Error::Socket(format!("{:?}", error)))?;
	let fragment = location.hash().unwrap_or_default();

	match endpoint {
		Endpoint::Control => wire(window, socket, Interpreter::new(document, notifier.clone()).with_fade(config.fade()), notifier, fragment),
		Endpoint::Charger => wire(window, socket, ChargerRenderer::new(document, notifier.clone()), notifier, fragment),
	}
}

fn wire<H: 'static + Handler>(window: &Window, socket: WebSocket, handler: H, notifier: &Notifier, location: String) -> Result<()> {
	let transport: Rc<dyn Transport> = Rc::new(SocketTransport(socket.clone()));
	let session = Rc::new(RefCell::new(Session::new(transport, handler, notifier.clone(), location)));
	let bridge = session.borrow().bridge().clone();

	let to_moat = {
		let notifier = notifier.clone();
		Closure::wrap(Box::new(move |command: JsValue| {
			let text = match js_sys::JSON::stringify(&command).ok().and_then(|text| text.as_string()) {
				Some(text) => text,
				None => {
					let error = Error::Encode(format!("{:?}", command));
					notifier.announce(error.severity(), &error);
					return false;
				}
			};
			bridge.send_text(&text).is_ok()
		}) as Box<dyn Fn(JsValue) -> bool>)
	};
	// No handlers are attached to the socket yet.
	match js_sys::Reflect::set(window, &JsValue::from_str(BRIDGE_GLOBAL), to_moat.as_ref()) {
		Ok(true) => (),
		outcome => {
			if let Err(error) = socket.close() {
				warn!("Could not close the unused socket: {:?}", error);
			}
			return Err(match outcome {
				Err(error) => Error::dom(&error),
				Ok(_) => Error::Dom(format!("`window.{}` is read-only", BRIDGE_GLOBAL)),
			});
		}
	}

	let on_open = {
		let session = Rc::clone(&session);
		Closure::wrap(Box::new(move |_: JsValue| session.borrow_mut().opened()) as Box<dyn FnMut(JsValue)>)
	};
	let on_message = {
		let session = Rc::clone(&session);
		Closure::wrap(Box::new(move |event: MessageEvent| match event.data().as_string() {
			Some(text) => session.borrow_mut().received(&text),
			None => session.borrow_mut().received_binary(),
		}) as Box<dyn FnMut(MessageEvent)>)
	};
	let on_error = {
		let session = Rc::clone(&session);
		Closure::wrap(Box::new(move |_: JsValue| session.borrow_mut().failed()) as Box<dyn FnMut(JsValue)>)
	};
	let on_close = Closure::wrap(Box::new(move |_: JsValue| session.borrow_mut().closed()) as Box<dyn FnMut(JsValue)>);

	socket.set_onopen(Some(on_open.as_ref().unchecked_ref()));
	socket.set_onmessage(Some(on_message.as_ref().unchecked_ref()));
	socket.set_onerror(Some(on_error.as_ref().unchecked_ref()));
	socket.set_onclose(Some(on_close.as_ref().unchecked_ref()));

	CONNECTION.with(|connection| {
		*connection.borrow_mut() = Some(Connection {
			_socket: socket,
			_on_open: on_open,
			_on_message: on_message,
			_on_error: on_error,
			_on_close: on_close,
			_to_moat: to_moat,
		});
	});
	Ok(())
}
