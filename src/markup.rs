//! Loading trusted markup into [`Document`] nodes.

use crate::{
	dom::{Document, NodeId},
	error::{Error, Result},
	template::{AttributeTemplate, ElementTemplate, TemplateNode},
};
use html5ever::{tendril::TendrilSink, Attribute, LocalName, Namespace, ParseOpts, QualName};
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use tracing::{error, instrument, trace, warn};

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// Parses `markup` as the content of a `<body>` element and loads the result into `document`.
///
/// The returned nodes are detached and in document order.
///
/// # Errors
///
/// Iff the markup nests deeper than `depth_limit`. No nodes are leaked into the tree in that case,
/// but the arena may hold detached garbage until the document is dropped.
#[instrument(skip(document, markup))]
pub fn parse_fragment(document: &mut Document, markup: &str, depth_limit: usize) -> Result<Vec<NodeId>> {
	let parsed = parse_body_fragment(markup);
	match fragment_root(&parsed) {
		Some(html) => load_child_nodes(document, &html, depth_limit),
		None => Ok(Vec::new()),
	}
}

/// Parses `markup` as the content of a `<body>` element and converts it into static template nodes.
///
/// Doctypes and processing instructions are dropped.
///
/// # Errors
///
/// Iff the markup nests deeper than `depth_limit`.
#[instrument(skip(markup))]
pub fn load_template_nodes(markup: &str, depth_limit: usize) -> Result<Vec<TemplateNode>> {
	fn convert_children(parent: &Handle, depth_limit: usize) -> Result<Vec<TemplateNode>> {
		let children = parent.children.borrow();
		if children.is_empty() {
			return Ok(Vec::new());
		} else if depth_limit == 0 {
			error!("Depth limit reached");
			return Err(Error::DepthLimit);
		}

		let mut nodes = Vec::with_capacity(children.len());
		for child in children.iter() {
			nodes.push(match &child.data {
				NodeData::Text { contents } => TemplateNode::Text((&**contents.borrow()).into()),
				NodeData::Comment { contents } => TemplateNode::Comment((&**contents).into()),
				NodeData::Element { name, attrs, .. } => TemplateNode::Element(ElementTemplate {
					tag: (&*name.local).into(),
					attributes: attrs
						.borrow()
						.iter()
						.map(|attribute| AttributeTemplate::Static {
							name: (&*attribute.name.local).into(),
							value: (&*attribute.value).into(),
						})
						.collect(),
					children: convert_children(child, depth_limit - 1)?,
				}),
				NodeData::Document | NodeData::Doctype { .. } | NodeData::ProcessingInstruction { .. } => continue,
			});
		}
		Ok(nodes)
	}

	let parsed = parse_body_fragment(markup);
	match fragment_root(&parsed) {
		Some(html) => convert_children(&html, depth_limit),
		None => Ok(Vec::new()),
	}
}

/// Dropping an [`RcDom`] empties every node it contains, so it must outlive any walk over its handles.
fn parse_body_fragment(markup: &str) -> RcDom {
	let context = QualName::new(None, Namespace::from(HTML_NAMESPACE), LocalName::from("body"));
	let parsed = html5ever::parse_fragment(RcDom::default(), ParseOpts::default(), context, Vec::new()).one(markup);

	for error in &parsed.errors {
		trace!("Markup parse error (recovered): {}", error);
	}
	parsed
}

/// The synthetic `<html>` element fragment parsing wraps its result in.
fn fragment_root(parsed: &RcDom) -> Option<Handle> {
	let html = parsed.document.children.borrow().first().cloned();
	if html.is_none() {
		warn!("Fragment parser produced no root element.");
	}
	html
}

/// Loads the children of `parent` as detached nodes.
pub fn load_child_nodes(document: &mut Document, parent: &Handle, depth_limit: usize) -> Result<Vec<NodeId>> {
	let children = parent.children.borrow();
	if children.is_empty() {
		return Ok(Vec::new());
	} else if depth_limit == 0 {
		return Err(Error::DepthLimit);
	}

	let mut nodes = Vec::with_capacity(children.len());
	for child in children.iter() {
		if let Some(node) = load_node(document, child, depth_limit)? {
			nodes.push(node)
		}
	}
	Ok(nodes)
}

fn load_node(document: &mut Document, handle: &Handle, depth_limit: usize) -> Result<Option<NodeId>> {
	Ok(Some(match &handle.data {
		NodeData::Text { contents } => document.create_text(&contents.borrow()),
		NodeData::Comment { contents } => document.create_comment(contents),
		NodeData::Element { name, attrs, .. } => load_element(document, handle, name, &attrs.borrow(), depth_limit)?,
		NodeData::Document | NodeData::Doctype { .. } | NodeData::ProcessingInstruction { .. } => {
			trace!("Skipping non-content markup node.");
			return Ok(None);
		}
	}))
}

fn load_element(document: &mut Document, handle: &Handle, name: &QualName, attributes: &[Attribute], depth_limit: usize) -> Result<NodeId> {
	let element = document.create_element(&name.local);
	load_attributes(document, element, attributes);
	for child in load_child_nodes(document, handle, depth_limit - 1)? {
		document.append_child(element, child);
	}
	Ok(element)
}

fn load_attributes(document: &mut Document, element: NodeId, attributes: &[Attribute]) {
	for attribute in attributes {
		document.set_attribute(element, &attribute.name.local, &attribute.value);
	}
}
