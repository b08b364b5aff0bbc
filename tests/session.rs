use core::cell::RefCell;
use livepatch_dom::{Error, Handler, Session, Severity, State};
use serde_json::{json, Value};
use std::rc::Rc;

use mock_::{notifier, MockSurface, MockTransport};

#[derive(Default)]
struct Recorder(Rc<RefCell<Vec<String>>>);
impl Handler for Recorder {
	fn handle(&mut self, text: &str) {
		self.0.borrow_mut().push(text.to_owned());
	}
}

fn session(location: &str) -> (Session<Recorder>, MockTransport, MockSurface, Rc<RefCell<Vec<String>>>) {
	let (notifier, surface) = notifier();
	let transport = MockTransport::default();
	let received = Rc::new(RefCell::new(Vec::new()));
	let session = Session::new(Rc::new(transport.clone()), Recorder(Rc::clone(&received)), notifier, location);
	(session, transport, surface, received)
}

fn sent_json(transport: &MockTransport) -> Vec<Value> {
	transport.sent().iter().map(|text| serde_json::from_str(text).unwrap()).collect()
}

#[test]
fn starts_connecting() {
	let (session, transport, surface, _) = session("#x");
	assert_eq!(session.state(), State::Connecting);
	assert_eq!(surface.shown_with(Severity::Info), ["Connecting …"]);
	assert!(!session.bridge().is_live());
	assert!(transport.sent().is_empty());
}

#[test]
fn bridge_warns_before_open() {
	let (session, transport, surface, _) = session("");
	let result = session.bridge().send(&json!({"action": "toggle"}));
	assert!(matches!(result, Err(Error::NotConnected)));
	assert_eq!(surface.shown_with(Severity::Warning), ["Not connected. Reload before doing this."]);
	assert!(transport.sent().is_empty());
}

#[test]
fn open_sends_exactly_one_locate() {
	let (mut session, transport, surface, _) = session("#garden");
	session.opened();

	assert_eq!(session.state(), State::Open);
	assert_eq!(surface.shown_with(Severity::Success), ["Connected. Waiting for instructions …"]);
	assert_eq!(sent_json(&transport), [json!({"action": "locate", "location": "#garden"})]);
}

#[test]
fn locate_without_fragment_sends_empty_location() {
	let (mut session, transport, _, _) = session("");
	session.opened();
	assert_eq!(sent_json(&transport), [json!({"action": "locate", "location": ""})]);
}

#[test]
fn bridge_is_live_after_open() {
	let (mut session, transport, surface, _) = session("");
	let bridge = session.bridge().clone();
	session.opened();

	bridge.send(&json!({"action": "toggle", "id": "7"})).unwrap();
	session.bridge().send_text(r#"{"action":"ping"}"#).unwrap();

	assert_eq!(
		sent_json(&transport),
		[json!({"action": "locate", "location": ""}), json!({"action": "toggle", "id": "7"}), json!({"action": "ping"})]
	);
	assert!(surface.shown_with(Severity::Warning).is_empty());
}

#[test]
fn transport_failures_reach_the_caller() {
	let (mut session, transport, _, _) = session("");
	session.opened();
	transport.break_it();
	assert!(matches!(session.bridge().send(&json!({})), Err(Error::Send(_))));
}

#[test]
fn frames_go_to_the_handler_in_order() {
	let (mut session, _, _, received) = session("");
	session.opened();
	session.received("one");
	session.received("two");
	assert_eq!(*received.borrow(), ["one", "two"]);
}

#[test]
fn binary_frames_warn_and_skip_the_handler() {
	let (mut session, _, surface, received) = session("");
	session.opened();
	session.received_binary();
	session.received("text");

	assert_eq!(surface.shown_with(Severity::Warning), ["Binary frames are not supported."]);
	assert_eq!(*received.borrow(), ["text"]);
	assert_eq!(session.state(), State::Open);
}

#[test]
fn error_disables_the_bridge() {
	let (mut session, transport, surface, _) = session("");
	let bridge = session.bridge().clone();
	session.opened();
	session.failed();

	assert_eq!(session.state(), State::Errored);
	assert_eq!(surface.shown_with(Severity::Danger), ["Connection error! Please reload this page."]);
	assert!(matches!(bridge.send(&json!({"action": "toggle"})), Err(Error::NotConnected)));
	assert_eq!(surface.shown_with(Severity::Warning), ["Not connected. Reload before doing this."]);
	assert_eq!(transport.sent().len(), 1);
}

#[test]
fn close_after_error_keeps_the_error_alert() {
	let (mut session, _, surface, _) = session("");
	session.opened();
	session.failed();
	let held = surface.shown().last().unwrap().sequence;
	session.closed();

	assert_eq!(session.state(), State::Errored);
	assert_eq!(surface.shown_with(Severity::Danger), ["Connection error! Please reload this page."]);
	assert_eq!(surface.shown().last().unwrap().sequence, held);
}

#[test]
fn close_without_error() {
	let (mut session, _, surface, _) = session("");
	session.opened();
	session.closed();

	assert_eq!(session.state(), State::Closed);
	assert_eq!(surface.shown_with(Severity::Danger), ["Connection closed."]);
	assert!(!session.bridge().is_live());
}

#[test]
fn error_while_connecting() {
	let (mut session, transport, surface, _) = session("");
	session.failed();
	session.closed();

	assert_eq!(session.state(), State::Errored);
	assert_eq!(surface.shown_with(Severity::Danger), ["Connection error! Please reload this page."]);
	assert!(transport.sent().is_empty());
}
