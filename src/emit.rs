//! Emitting templates into a [`Document`] and keeping the emitted content nodes up to date.
//!
//! Every child position of a template is a slot. Static nodes fill their slot once, dynamic
//! text fills it with zero or one text node and trusted content with any number of nodes.
//! Insertions into a slot go before the first node of the next occupied sibling slot, or are appended.

use crate::{
	coerce::Rendered,
	dom::{Document, NodeId},
	error::{Error, Result},
	interpolate::Interpolation,
	markup,
	reference::{Reference, ValueSource},
	template::{AttributeTemplate, TemplateNode},
	value::Value,
};
use core::mem;
use smallvec::SmallVec;
use std::rc::Rc;
use tracing::{error, field, instrument, trace, trace_span, warn};

/// Identifies a child position within one [`Emitter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotId(usize);

#[derive(Debug)]
struct Slot {
	parent: NodeId,
	next: Option<SlotId>,
	nodes: SmallVec<[NodeId; 1]>,
}

#[derive(Debug, Default)]
struct Slots {
	slots: Vec<Slot>,
}

impl Slots {
	/// Allocates `count` linked sibling slots under `parent`.
	fn push_siblings(&mut self, parent: NodeId, count: usize) -> impl Iterator<Item = SlotId> {
		let first = self.slots.len();
		self.slots.extend((first..first + count).map(|i| Slot {
			parent,
			next: (i + 1 < first + count).then(|| SlotId(i + 1)),
			nodes: SmallVec::new(),
		}));
		(first..first + count).map(SlotId)
	}

	fn nodes(&self, slot: SlotId) -> &[NodeId] {
		&self.slots[slot.0].nodes
	}

	fn anchor(&self, document: &Document, slot: SlotId) -> Option<NodeId> {
		let mut next = self.slots[slot.0].next;
		while let Some(id) = next {
			let sibling = &self.slots[id.0];
			if let Some(&node) = sibling.nodes.iter().find(|&&node| document.contains(node)) {
				return Some(node);
			}
			next = sibling.next;
		}
		None
	}

	/// Inserts detached `nodes` at the end of `slot`.
	fn insert(&mut self, document: &mut Document, slot: SlotId, nodes: impl IntoIterator<Item = NodeId>) {
		let anchor = self.anchor(document, slot);
		let parent = self.slots[slot.0].parent;
		for node in nodes {
			document.insert_before(parent, node, anchor);
			self.slots[slot.0].nodes.push(node);
		}
	}

	/// Removes all nodes of `slot` from the document.
	fn clear(&mut self, document: &mut Document, slot: SlotId) {
		for node in mem::take(&mut self.slots[slot.0].nodes) {
			if document.contains(node) {
				document.remove(node)
			}
		}
	}

	/// Forgets nodes that were removed or moved behind the emitter's back. Returns whether there were any.
	fn repair(&mut self, document: &Document, slot: SlotId) -> bool {
		let slot = &mut self.slots[slot.0];
		let parent = slot.parent;
		let before = slot.nodes.len();
		slot.nodes.retain(|&mut node| document.contains(node) && document.parent(node) == Some(parent));
		let damaged = slot.nodes.len() != before;
		if damaged {
			error!(?parent, "Expected {} node(s) in slot but found only {}. Recreating the content.", before, slot.nodes.len());
		}
		damaged
	}
}

/// One dynamic position in the emitted DOM.
#[derive(Debug)]
pub enum ContentNode {
	/// `{{…}}` in content position.
	Text { slot: SlotId, reference: Reference },
	/// `{{{…}}}` in content position. `depth_limit` is what remains for the parsed markup.
	Trusted { slot: SlotId, reference: Reference, depth_limit: usize },
	Attribute { element: NodeId, name: Rc<str>, binding: AttributeBinding },
}

#[derive(Debug)]
pub enum AttributeBinding {
	/// Unquoted single binding.
	Single(Reference),
	Interpolated(Interpolation),
}

/// The live state of one emitted template.
#[derive(Debug, Default)]
pub struct Emitter {
	container: Option<NodeId>,
	slots: Slots,
	content: Vec<ContentNode>,
}

impl Emitter {
	/// Emits `template` into `container`, after any children it already has.
	///
	/// # Errors
	///
	/// [`Error::DepthLimit`] if the template (including trusted markup) nests deeper than `depth_limit`.
	/// Anything emitted up to that point is removed again.
	#[instrument(skip(document, template, source))]
	pub fn emit(document: &mut Document, container: NodeId, template: &[TemplateNode], source: &dyn ValueSource, depth_limit: usize) -> Result<Self> {
		let mut emitter = Self {
			container: Some(container),
			..Self::default()
		};
		match emitter.emit_nodes(document, container, template, source, depth_limit) {
			Ok(()) => {
				trace!("Emitted {} content node(s) into {} slot(s).", emitter.content.len(), emitter.slots.slots.len());
				Ok(emitter)
			}
			Err(error) => {
				emitter.teardown(document);
				Err(error)
			}
		}
	}

	/// The content nodes, in source order.
	#[must_use]
	pub fn content(&self) -> &[ContentNode] {
		&self.content
	}

	/// The DOM nodes currently held by `slot`.
	#[must_use]
	pub fn slot_nodes(&self, slot: SlotId) -> &[NodeId] {
		self.slots.nodes(slot)
	}

	fn emit_nodes(&mut self, document: &mut Document, parent: NodeId, nodes: &[TemplateNode], source: &dyn ValueSource, depth_limit: usize) -> Result<()> {
		if nodes.is_empty() {
			return Ok(());
		} else if depth_limit == 0 {
			error!("Depth limit reached");
			return Err(Error::DepthLimit);
		}

		let slots: SmallVec<[SlotId; 8]> = self.slots.push_siblings(parent, nodes.len()).collect();
		for (&slot, node) in slots.iter().zip(nodes) {
			match node {
				TemplateNode::Text(text) => {
					let node = document.create_text(text);
					self.slots.insert(document, slot, [node]);
				}
				TemplateNode::Comment(comment) => {
					let node = document.create_comment(comment);
					self.slots.insert(document, slot, [node]);
				}
				TemplateNode::Element(template) => {
					let span = trace_span!("Emitting element", tag = &*template.tag);
					let _enter = span.enter();
					let element = document.create_element(&template.tag);
					self.slots.insert(document, slot, [element]);
					for attribute in &template.attributes {
						self.emit_attribute(document, element, attribute, source);
					}
					self.emit_nodes(document, element, &template.children, source, depth_limit - 1)?;
				}
				TemplateNode::Append { expression, trusted: false } => {
					let mut reference = Reference::new(expression.clone());
					if let Rendered::Text(text) = reference.initialize(source) {
						let node = document.create_text(text);
						self.slots.insert(document, slot, [node]);
					}
					self.content.push(ContentNode::Text { slot, reference });
				}
				TemplateNode::Append { expression, trusted: true } => {
					let mut reference = Reference::new(expression.clone());
					if let Rendered::Text(html) = reference.initialize(source) {
						let nodes = markup::parse_fragment(document, html, depth_limit)?;
						self.slots.insert(document, slot, nodes);
					}
					self.content.push(ContentNode::Trusted { slot, reference, depth_limit });
				}
			}
		}
		Ok(())
	}

	fn emit_attribute(&mut self, document: &mut Document, element: NodeId, attribute: &AttributeTemplate, source: &dyn ValueSource) {
		match attribute {
			AttributeTemplate::Static { name, value } => document.set_attribute(element, name, value),
			AttributeTemplate::Bound { name, expression } => {
				let mut reference = Reference::new(expression.clone());
				reference.initialize(source);
				apply_single(document, element, name, &reference);
				self.content.push(ContentNode::Attribute {
					element,
					name: name.clone(),
					binding: AttributeBinding::Single(reference),
				});
			}
			AttributeTemplate::Interpolated { name, fragments } => {
				let mut interpolation = Interpolation::new(fragments);
				let value = interpolation.initialize(source);
				document.set_attribute(element, name, &value);
				self.content.push(ContentNode::Attribute {
					element,
					name: name.clone(),
					binding: AttributeBinding::Interpolated(interpolation),
				});
			}
		}
	}

	/// Re-evaluates every content node in source order and applies the minimal DOM update for each.
	///
	/// Returns the number of content nodes visited.
	///
	/// # Errors
	///
	/// [`Error::DepthLimit`] if updated trusted markup nests too deeply. That content node is left empty.
	pub fn revalidate(&mut self, document: &mut Document, source: &dyn ValueSource) -> Result<usize> {
		let Self { slots, content, .. } = self;
		for content_node in content.iter_mut() {
			match content_node {
				ContentNode::Text { slot, reference } => {
					let span = trace_span!("Revalidating text", ?slot, text = field::Empty);
					let _enter = span.enter();
					let changed = reference.revalidate(source);
					if cfg!(feature = "dangerous-logging") {
						span.record("text", reference.rendered().as_str_or_empty());
					}
					slots.repair(document, *slot);

					match (slots.nodes(*slot).first().copied(), reference.rendered()) {
						(None, Rendered::Nothing) => (),
						(None, Rendered::Text(text)) => {
							let node = document.create_text(text);
							slots.insert(document, *slot, [node]);
						}
						(Some(_), Rendered::Nothing) => slots.clear(document, *slot),
						(Some(node), Rendered::Text(text)) => {
							if !changed && document.text(node) != Some(text.as_str()) {
								warn!(?node, "Text node was modified outside of revalidation. Restoring it.");
							}
							document.set_text(node, text);
						}
					}
				}

				ContentNode::Trusted { slot, reference, depth_limit } => {
					let span = trace_span!("Revalidating trusted content", ?slot, markup = field::Empty);
					let _enter = span.enter();
					let previous = reference.rendered().clone();
					let changed = reference.revalidate(source) && *reference.rendered() != previous;
					if cfg!(feature = "dangerous-logging") {
						span.record("markup", reference.rendered().as_str_or_empty());
					}
					let damaged = slots.repair(document, *slot);

					// Only a different markup string (or outside damage) replaces the subtree.
					if changed || damaged {
						slots.clear(document, *slot);
						if let Rendered::Text(html) = reference.rendered() {
							let nodes = markup::parse_fragment(document, html, *depth_limit)?;
							slots.insert(document, *slot, nodes);
						}
					}
				}

				ContentNode::Attribute { element, name, binding } => {
					let span = trace_span!("Revalidating attribute", ?element, name = &**name);
					let _enter = span.enter();
					if !document.contains(*element) {
						error!("Expected to update an attribute on an element that doesn't exist (anymore). Skipping.");
						continue;
					}

					match binding {
						AttributeBinding::Single(reference) => {
							reference.revalidate(source);
							apply_single(document, *element, name, reference);
						}
						AttributeBinding::Interpolated(interpolation) => {
							interpolation.revalidate(source);
							let value = interpolation.assemble();
							if document.attribute(*element, name) != Some(value.as_str()) {
								document.set_attribute(*element, name, &value);
							}
						}
					}
				}
			}
		}
		Ok(content.len())
	}

	/// Removes everything this emitter inserted into its container.
	///
	/// Attributes set on the container itself are not touched.
	#[instrument(skip(self, document))]
	pub fn teardown(&mut self, document: &mut Document) {
		let container = match self.container.take() {
			Some(container) => container,
			None => return trace!("Nothing to tear down."),
		};
		for index in 0..self.slots.slots.len() {
			if self.slots.slots[index].parent == container {
				self.slots.clear(document, SlotId(index));
			}
		}
		self.slots.slots.clear();
		self.content.clear();
	}
}

/// `undefined`, `null` and `false` remove the attribute, `true` sets it to `""`.
fn apply_single(document: &mut Document, element: NodeId, name: &str, reference: &Reference) {
	let value = match reference.value() {
		Value::Undefined | Value::Null | Value::Boolean(false) => None,
		Value::Boolean(true) => Some(""),
		_ => Some(reference.rendered().as_str_or_empty()),
	};
	match value {
		Some(value) => document.set_attribute(element, name, value),
		None => {
			document.remove_attribute(element, name);
		}
	}
}
