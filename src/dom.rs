//! `web-sys` bindings for [`Document`] and [`AlertSurface`].

use crate::{
	config::{millis, Config},
	document::Document,
	error::{Error, Result},
	notify::{Alert, AlertSurface},
};
use core::time::Duration;
use gloo_timers::callback::Timeout;
use tracing::{error, instrument, trace, warn};
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement, HtmlTemplateElement, Node};

/// Sets an inline style property. Non-HTML elements (SVG, MathML) have no inline style here and are skipped.
fn set_style(element: &Element, property: &str, value: &str) {
	if let Some(html_element) = element.dyn_ref::<HtmlElement>() {
		if let Err(error) = html_element.style().set_property(property, value) {
			warn!("Could not set {}: {} on {:?}: {:?}", property, value, element, error);
		}
	}
}

fn show(element: &Element) {
	if let Some(html_element) = element.dyn_ref::<HtmlElement>() {
		if let Err(error) = html_element.style().remove_property("display") {
			warn!("Could not unhide {:?}: {:?}", element, error);
		}
	}
}

fn fade_in(element: &Element, duration: Duration) {
	show(element);
	set_style(element, "opacity", "0");
	set_style(element, "transition", &format!("opacity {}ms", millis(duration)));
	if let Some(html_element) = element.dyn_ref::<HtmlElement>() {
		// Forces a style flush so the transition starts from 0.
		let _ = html_element.offset_width();
	}
	set_style(element, "opacity", "1");
}

/// Whether `element` is the only thing in its fragment worth keeping. Comments and blank text don't count.
fn is_sole_content(element: &Element) -> bool {
	let insignificant = |node: &Node| match node.node_type() {
		Node::COMMENT_NODE => true,
		Node::TEXT_NODE => node.text_content().map_or(true, |text| text.trim().is_empty()),
		_ => false,
	};
	let mut before = element.previous_sibling();
	while let Some(node) = before {
		if !insignificant(&node) {
			return false;
		}
		before = node.previous_sibling();
	}
	let mut after = element.next_sibling();
	while let Some(node) = after {
		if !insignificant(&node) {
			return false;
		}
		after = node.next_sibling();
	}
	true
}

/// The page's live DOM.
#[derive(Debug, Clone)]
pub struct WebDocument {
	document: web_sys::Document,
}
impl WebDocument {
	#[must_use]
	pub fn new(document: web_sys::Document) -> Self {
		Self { document }
	}
}

impl Document for WebDocument {
	type Node = Element;

	fn get(&self, id: &str) -> Option<Element> {
		self.document.get_element_by_id(id)
	}

	#[instrument(skip(self, markup))]
	fn parse(&self, markup: &str) -> Result<Element> {
		let template = self
			.document
			.create_element("template")
			.map_err(|error| Error::dom(&error))?
			.dyn_into::<HtmlTemplateElement>()
			.map_err(|element| Error::Dom(format!("Expected `HtmlTemplateElement` but found {:?}", element)))?;
		template.set_inner_html(markup.trim());
		let element = template.content().first_element_child().ok_or_else(|| Error::Markup(markup.to_owned()))?;
		if !is_sole_content(&element) {
			return Err(Error::Markup(markup.to_owned()));
		}
		Ok(element)
	}

	fn declared_id(&self, node: &Element) -> Option<String> {
		Some(node.id()).filter(|id| !id.is_empty())
	}

	fn set_id(&self, node: &Element, id: &str) {
		node.set_id(id);
	}

	fn replace(&self, old: &Element, new: &Element) -> Result<()> {
		if old.parent_node().is_none() {
			trace!("Replacing a detached node. Nothing to do.");
			return Ok(());
		}
		old.replace_with_with_node_1(new).map_err(|error| Error::dom(&error))
	}

	fn append(&self, parent: &Element, child: &Element) -> Result<()> {
		parent.append_child(child).map(drop).map_err(|error| Error::dom(&error))
	}

	fn hide(&self, node: &Element) {
		set_style(node, "display", "none");
	}

	fn fade_out(&self, node: &Element, duration: Duration, done: Box<dyn FnOnce()>) {
		set_style(node, "transition", &format!("opacity {}ms", millis(duration)));
		set_style(node, "opacity", "0");
		let node = node.clone();
		Timeout::new(millis(duration), move || {
			set_style(&node, "display", "none");
			done();
		})
		.forget();
	}

	fn fade_in(&self, node: &Element, duration: Duration) {
		fade_in(node, duration);
	}

	fn slot(&self, root: &Element, name: &str) -> Option<Element> {
		match root.query_selector(&format!(".{}", name)) {
			Ok(slot) => slot,
			Err(error) => {
				error!("Invalid slot selector {:?}: {:?}", name, error);
				None
			}
		}
	}

	fn set_text(&self, node: &Element, text: &str) {
		node.set_text_content(Some(text));
	}
}

fn alert_id(sequence: u64) -> String {
	format!("alert-{}", sequence)
}

/// Renders alerts as `<div id="alert-N" class="alert alert-SEVERITY">` into the configured container.
#[derive(Debug, Clone)]
pub struct WebAlerts {
	document: web_sys::Document,
	container: String,
	scroll_container: String,
	fade: Duration,
}
impl WebAlerts {
	#[must_use]
	pub fn new(document: web_sys::Document, config: &Config) -> Self {
		Self {
			document,
			container: config.alert_container.clone(),
			scroll_container: config.scroll_container.clone(),
			fade: config.alert_fade(),
		}
	}

	fn try_show(&self, alert: &Alert) -> Result<()> {
		let container = self
			.document
			.get_element_by_id(&self.container)
			.ok_or_else(|| Error::Dom(format!("No alert container #{}", self.container)))?;
		container.set_inner_html("");

		let element = self.document.create_element("div").map_err(|error| Error::dom(&error))?;
		element.set_id(&alert_id(alert.sequence));
		element.set_class_name(&format!("alert alert-{}", alert.severity));
		element.set_attribute("role", "alert").map_err(|error| Error::dom(&error))?;
		element.set_text_content(Some(&alert.text));
		set_style(&element, "display", "none");
		container.prepend_with_node_1(&element).map_err(|error| Error::dom(&error))?;
		fade_in(&element, self.fade);

		if let Some(page) = self.document.get_element_by_id(&self.scroll_container) {
			page.set_scroll_top(0);
		}
		Ok(())
	}
}

impl AlertSurface for WebAlerts {
	fn show(&mut self, alert: &Alert) {
		if let Err(error) = self.try_show(alert) {
			// Nowhere else to put it.
			error!("Could not show alert {:?}: {}", alert, error);
		}
	}

	fn dismiss(&mut self, sequence: u64) {
		if let Some(element) = self.document.get_element_by_id(&alert_id(sequence)) {
			element.remove();
		}
	}

	fn dismiss_after(&mut self, sequence: u64, delay: Duration) {
		let document = self.document.clone();
		Timeout::new(millis(delay), move || {
			if let Some(element) = document.get_element_by_id(&alert_id(sequence)) {
				element.remove();
			}
		})
		.forget();
	}
}
