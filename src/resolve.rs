//! Identifier fallback chains.
//!
//! Each action resolves its target by walking a fixed table of [`Lookup`]s and taking the first hit.
//! `replace` and `update` walk different tables on purpose; don't merge them.

use crate::{
	document::Document,
	error::{Error, Result},
};
use tracing::trace;

/// Which message field a lookup reads its identifier from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
	Target,
	Parent,
	/// The identifier declared inside the payload markup.
	Declared,
}

/// What to do with the payload once its anchor node is found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
	/// Swap the anchor for the payload immediately.
	Replace,
	/// Append the payload as the anchor's last child.
	Append,
	/// Fade the anchor out, then swap and fade the payload in.
	CrossFade,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lookup {
	pub prefix: &'static str,
	pub source: Source,
	pub placement: Placement,
}
impl Lookup {
	const fn new(prefix: &'static str, source: Source, placement: Placement) -> Self {
		Self { prefix, source, placement }
	}
}

/// Target itself, then the parent's `c`-prefixed container, then the parent.
pub const REPLACE: &[Lookup] = &[
	Lookup::new("", Source::Target, Placement::Replace),
	Lookup::new("c", Source::Parent, Placement::Append),
	Lookup::new("", Source::Parent, Placement::Append),
];

/// The target's `c`-prefixed container, then the target.
pub const UPDATE: &[Lookup] = &[
	Lookup::new("c", Source::Target, Placement::CrossFade),
	Lookup::new("", Source::Target, Placement::CrossFade),
];

/// Payloads that carry their own identifier are looked up by exactly that.
pub const UPDATE_DECLARED: &[Lookup] = &[Lookup::new("", Source::Declared, Placement::CrossFade)];

/// The identifiers a message makes available to a chain.
#[derive(Debug, Clone, Copy)]
pub struct Keys<'a> {
	pub target: &'a str,
	pub parent: Option<&'a str>,
	pub declared: Option<&'a str>,
}
impl<'a> Keys<'a> {
	fn get(&self, source: Source) -> Option<&'a str> {
		match source {
			Source::Target => Some(self.target),
			Source::Parent => self.parent,
			Source::Declared => self.declared,
		}
	}
}

/// A successful lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct Hit<N> {
	pub node: N,
	/// The identifier that matched, prefix included.
	pub id: String,
	pub placement: Placement,
}

/// Walks `chain` in order and returns the first attached node.
///
/// Lookups whose [`Source`] the message doesn't provide are skipped.
///
/// # Errors
///
/// [`Error::NotFoundUnder`] if a parent was given, [`Error::NotFound`] otherwise.
pub fn resolve<D: Document>(document: &D, chain: &[Lookup], keys: Keys<'_>) -> Result<Hit<D::Node>> {
	for lookup in chain {
		let key = match keys.get(lookup.source) {
			Some(key) => key,
			None => continue,
		};
		let id = format!("{}{}", lookup.prefix, key);
		if let Some(node) = document.get(&id) {
			trace!(?lookup, %id, "Resolved.");
			return Ok(Hit { node, id, placement: lookup.placement });
		}
		trace!(?lookup, %id, "Not found, falling back.");
	}

	Err(match keys.parent {
		Some(parent) => Error::NotFoundUnder {
			id: keys.target.to_owned(),
			parent: parent.to_owned(),
		},
		None => Error::NotFound(keys.target.to_owned()),
	})
}
