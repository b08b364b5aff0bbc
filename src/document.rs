use crate::error::Result;
use core::{fmt::Debug, time::Duration};

/// The slice of a live document tree that patches need.
///
/// Node handles are looked up fresh for every message and must compare equal exactly when they refer to the same node.
/// Implementations are cheap handles: [`Clone`] is expected to share the underlying tree.
pub trait Document: 'static + Clone {
	type Node: 'static + Clone + Debug + PartialEq;

	/// The attached node with identifier `id`, if any.
	fn get(&self, id: &str) -> Option<Self::Node>;

	/// Parses `markup` into a detached element.
	///
	/// # Errors
	///
	/// [`Error::Markup`](`crate::Error::Markup`) unless `markup` is exactly one element, give or take comments and
	/// surrounding whitespace.
	fn parse(&self, markup: &str) -> Result<Self::Node>;

	/// The identifier `node` already carries, if any. An empty identifier counts as none.
	fn declared_id(&self, node: &Self::Node) -> Option<String>;

	fn set_id(&self, node: &Self::Node, id: &str);

	/// Puts `new` where `old` is. A no-op if `old` is detached.
	///
	/// # Errors
	///
	/// [`Error::Dom`](`crate::Error::Dom`) if the host refuses.
	fn replace(&self, old: &Self::Node, new: &Self::Node) -> Result<()>;

	/// Appends `child` as the last child of `parent`.
	///
	/// # Errors
	///
	/// [`Error::Dom`](`crate::Error::Dom`) if the host refuses.
	fn append(&self, parent: &Self::Node, child: &Self::Node) -> Result<()>;

	/// Makes `node` invisible without removing it.
	fn hide(&self, node: &Self::Node);

	/// Fades `node` out over `duration`, then hides it and calls `done`.
	///
	/// `node` stays in place (and interactive) until then. `done` must not be called synchronously.
	fn fade_out(&self, node: &Self::Node, duration: Duration, done: Box<dyn FnOnce()>);

	/// Unhides `node` and fades it in over `duration`.
	fn fade_in(&self, node: &Self::Node, duration: Duration);

	/// The first descendant of `root` with class `name`.
	fn slot(&self, root: &Self::Node, name: &str) -> Option<Self::Node>;

	fn set_text(&self, node: &Self::Node, text: &str);
}
