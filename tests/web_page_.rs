#![cfg(target_arch = "wasm32")]
#![allow(dead_code)]

use js_sys::{Function, Reflect, JSON};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{window, Document, Window};

/// Resets the body to an empty alert area and sets `window.moat` to `moat`, or removes it.
pub fn page(moat: Option<&str>) -> (Window, Document) {
	let window = window().unwrap();
	let document = window.document().unwrap();
	document.body().unwrap().set_inner_html(r#"<div id="page"><div id="info"></div></div>"#);

	let key = JsValue::from_str("moat");
	match moat {
		Some(moat) => assert!(Reflect::set(&window, &key, &JSON::parse(moat).unwrap()).unwrap()),
		None => assert!(Reflect::delete_property(&window, &key).unwrap()),
	}
	(window, document)
}

/// Class and text of each alert currently shown.
pub fn alerts(document: &Document) -> Vec<(String, String)> {
	let mut alerts = Vec::new();
	let mut next = document.get_element_by_id("info").unwrap().first_element_child();
	while let Some(alert) = next {
		alerts.push((alert.class_name(), alert.text_content().unwrap_or_default()));
		next = alert.next_element_sibling();
	}
	alerts
}

/// Calls the page-global `to_moat` like a page script would.
pub fn to_moat(window: &Window, command: &JsValue) -> Option<bool> {
	Reflect::get(window, &JsValue::from_str("to_moat"))
		.unwrap()
		.dyn_into::<Function>()
		.ok()?
		.call1(&JsValue::NULL, command)
		.unwrap()
		.as_bool()
}
