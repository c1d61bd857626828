//! An in-memory DOM tree with stable node identity.
//!
//! Nodes live in an arena and are addressed by [`NodeId`]. An id stays valid, and keeps referring
//! to the same node, until that node is removed; comparing ids is comparing node identity.

use crate::coerce::{escape_attribute, escape_text};
use indextree::Arena;
use smallvec::SmallVec;
use std::rc::Rc;
use tracing::{error, trace};

pub use indextree::NodeId;

/// Elements whose serialization has no end tag and no content.
const VOID_ELEMENTS: &[&str] = &[
	"area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source", "track", "wbr",
];

/// Elements whose text content is serialized without escaping.
const RAW_TEXT_ELEMENTS: &[&str] = &["iframe", "noembed", "noframes", "plaintext", "script", "style", "xmp"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
	pub name: Rc<str>,
	pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
	/// Always lowercase.
	pub tag: Rc<str>,
	/// In insertion order.
	pub attributes: SmallVec<[Attribute; 4]>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
	/// The container everything is rendered into. Never serialized itself.
	Root,
	Element(Element),
	Text(String),
	Comment(String),
}

/// A DOM tree plus a count of the mutations applied to its connected part.
#[derive(Debug)]
pub struct Document {
	arena: Arena<NodeKind>,
	root: NodeId,
	mutations: u64,
}

impl Default for Document {
	fn default() -> Self {
		Self::new()
	}
}

impl Document {
	#[must_use]
	pub fn new() -> Self {
		let mut arena = Arena::new();
		let root = arena.new_node(NodeKind::Root);
		Self { arena, root, mutations: 0 }
	}

	#[must_use]
	pub fn root(&self) -> NodeId {
		self.root
	}

	/// The number of mutations (insertions, removals, text and attribute changes) applied so far.
	///
	/// Only changes to nodes connected to the root are counted. Building a detached subtree is free,
	/// inserting it counts once. Writes that don't change anything are not counted either.
	#[must_use]
	pub fn mutations(&self) -> u64 {
		self.mutations
	}

	/// Creates a detached element. `tag` is lowercased.
	pub fn create_element(&mut self, tag: &str) -> NodeId {
		self.arena.new_node(NodeKind::Element(Element {
			tag: tag.to_ascii_lowercase().into(),
			attributes: SmallVec::new(),
		}))
	}

	/// Creates a detached text node.
	pub fn create_text(&mut self, text: &str) -> NodeId {
		self.arena.new_node(NodeKind::Text(text.to_owned()))
	}

	/// Creates a detached comment.
	pub fn create_comment(&mut self, comment: &str) -> NodeId {
		self.arena.new_node(NodeKind::Comment(comment.to_owned()))
	}

	/// Whether `node` exists and has not been removed.
	#[must_use]
	pub fn contains(&self, node: NodeId) -> bool {
		self.arena.get(node).map_or(false, |node| !node.is_removed())
	}

	/// Whether `node` exists and the root is among its ancestors (or it is the root).
	#[must_use]
	pub fn is_connected(&self, node: NodeId) -> bool {
		self.contains(node) && node.ancestors(&self.arena).any(|ancestor| ancestor == self.root)
	}

	fn count_mutation(&mut self, connected: bool) {
		if connected {
			self.mutations += 1;
		}
	}

	#[must_use]
	pub fn kind(&self, node: NodeId) -> Option<&NodeKind> {
		self.arena.get(node)?.try_get()
	}

	fn kind_mut(&mut self, node: NodeId) -> Option<&mut NodeKind> {
		self.arena.get_mut(node)?.try_get_mut()
	}

	#[must_use]
	pub fn parent(&self, node: NodeId) -> Option<NodeId> {
		self.arena.get(node)?.parent()
	}

	#[must_use]
	pub fn first_child(&self, node: NodeId) -> Option<NodeId> {
		self.arena.get(node)?.first_child()
	}

	#[must_use]
	pub fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
		self.arena.get(node)?.next_sibling()
	}

	/// The children of `node`, in order. Empty for removed nodes.
	pub fn children(&self, node: NodeId) -> impl '_ + Iterator<Item = NodeId> {
		let first = self.first_child(node);
		core::iter::successors(first, move |&child| self.next_sibling(child))
	}

	/// Inserts the detached node `child` into `parent`, before `reference` or at the end.
	pub fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: Option<NodeId>) {
		let result = match reference {
			Some(reference) => {
				if self.parent(reference) != Some(parent) {
					error!(?parent, ?reference, "Insertion reference is not a child of the parent. Appending instead.");
					parent.checked_append(child, &mut self.arena)
				} else {
					reference.checked_insert_before(child, &mut self.arena)
				}
			}
			None => parent.checked_append(child, &mut self.arena),
		};
		match result {
			Ok(()) => {
				trace!(?parent, ?child, ?reference, "Inserted node.");
				self.count_mutation(self.is_connected(parent));
			}
			Err(error) => error!(?parent, ?child, "Failed to insert node: {:?}", error),
		}
	}

	pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
		self.insert_before(parent, child, None)
	}

	/// Removes `node` and its descendants. Their ids become invalid.
	pub fn remove(&mut self, node: NodeId) {
		if node == self.root {
			return error!("Tried to remove the document root. Ignoring.");
		}
		if !self.contains(node) {
			return error!(?node, "Tried to remove a node that doesn't exist (anymore). Ignoring.");
		}
		let connected = self.is_connected(node);
		node.remove_subtree(&mut self.arena);
		trace!(?node, "Removed node.");
		self.count_mutation(connected);
	}

	/// The data of a text node.
	#[must_use]
	pub fn text(&self, node: NodeId) -> Option<&str> {
		match self.kind(node)? {
			NodeKind::Text(text) => Some(text),
			_ => None,
		}
	}

	/// Replaces the data of a text node in place. Returns `false` if `node` is not a text node.
	pub fn set_text(&mut self, node: NodeId, text: &str) -> bool {
		let connected = self.is_connected(node);
		match self.kind_mut(node) {
			Some(NodeKind::Text(data)) => {
				if *data != text {
					text.clone_into(data);
					self.count_mutation(connected);
				}
				true
			}
			other => {
				error!(?node, "Expected to update text node but found {:?}.", other);
				false
			}
		}
	}

	#[must_use]
	pub fn tag_name(&self, node: NodeId) -> Option<&str> {
		match self.kind(node)? {
			NodeKind::Element(element) => Some(&element.tag),
			_ => None,
		}
	}

	/// The attributes of an element, in insertion order. Empty for anything else.
	#[must_use]
	pub fn attributes(&self, node: NodeId) -> &[Attribute] {
		match self.kind(node) {
			Some(NodeKind::Element(element)) => &element.attributes,
			_ => &[],
		}
	}

	#[must_use]
	pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
		self.attributes(node).iter().find(|attribute| &*attribute.name == name).map(|attribute| attribute.value.as_str())
	}

	/// Sets (or adds) an attribute on an element.
	pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
		let connected = self.is_connected(node);
		let element = match self.kind_mut(node) {
			Some(NodeKind::Element(element)) => element,
			other => return error!(?node, name, "Expected to set attribute on element but found {:?}.", other),
		};
		match element.attributes.iter_mut().find(|attribute| &*attribute.name == name) {
			Some(attribute) if attribute.value == value => return,
			Some(attribute) => value.clone_into(&mut attribute.value),
			None => element.attributes.push(Attribute {
				name: name.into(),
				value: value.to_owned(),
			}),
		}
		self.count_mutation(connected);
	}

	/// Removes an attribute from an element. Returns whether it was present.
	pub fn remove_attribute(&mut self, node: NodeId, name: &str) -> bool {
		let connected = self.is_connected(node);
		let element = match self.kind_mut(node) {
			Some(NodeKind::Element(element)) => element,
			other => {
				error!(?node, name, "Expected to remove attribute from element but found {:?}.", other);
				return false;
			}
		};
		let before = element.attributes.len();
		element.attributes.retain(|attribute| &*attribute.name != name);
		let removed = element.attributes.len() != before;
		if removed {
			self.count_mutation(connected);
		}
		removed
	}

	/// The concatenated data of all descendant text nodes.
	#[must_use]
	pub fn text_content(&self, node: NodeId) -> String {
		if !self.contains(node) {
			return String::new();
		}
		node.descendants(&self.arena)
			.filter_map(|descendant| match self.kind(descendant) {
				Some(NodeKind::Text(data)) => Some(data.as_str()),
				_ => None,
			})
			.collect()
	}

	/// Serializes the children of `node` as HTML.
	#[must_use]
	pub fn inner_html(&self, node: NodeId) -> String {
		let mut html = String::new();
		let raw = self.tag_name(node).map_or(false, |tag| RAW_TEXT_ELEMENTS.contains(&tag));
		for child in self.children(node) {
			self.serialize(child, raw, &mut html);
		}
		html
	}

	/// Serializes `node` itself as HTML.
	#[must_use]
	pub fn outer_html(&self, node: NodeId) -> String {
		let mut html = String::new();
		self.serialize(node, false, &mut html);
		html
	}

	fn serialize(&self, node: NodeId, raw_text: bool, html: &mut String) {
		match self.kind(node) {
			None => error!(?node, "Tried to serialize a node that doesn't exist (anymore)."),
			Some(NodeKind::Root) => {
				for child in self.children(node) {
					self.serialize(child, false, html)
				}
			}
			Some(NodeKind::Text(text)) => {
				if raw_text {
					html.push_str(text)
				} else {
					html.push_str(&escape_text(text))
				}
			}
			Some(NodeKind::Comment(comment)) => {
				html.push_str("<!--");
				html.push_str(comment);
				html.push_str("-->");
			}
			Some(NodeKind::Element(Element { tag, attributes })) => {
				html.push('<');
				html.push_str(tag);
				for Attribute { name, value } in attributes {
					html.push(' ');
					html.push_str(name);
					html.push_str("=\"");
					html.push_str(&escape_attribute(value));
					html.push('"');
				}
				html.push('>');
				if VOID_ELEMENTS.contains(&&**tag) {
					return;
				}
				let raw = RAW_TEXT_ELEMENTS.contains(&&**tag);
				for child in self.children(node) {
					self.serialize(child, raw, html)
				}
				html.push_str("</");
				html.push_str(tag);
				html.push('>');
			}
		}
	}
}
