//! Compiled templates: static markup interleaved with bindings.
//!
//! Templates are built with the constructor functions in this module, for example
//!
//! ```
//! use bound_dom::template::{append, element, fragment, path, text, Template};
//!
//! let template = Template::new([
//! 	element("div")
//! 		.interpolate("class", [fragment(path("model.foo")), "  static   ".into(), fragment(path("model.bar"))])
//! 		.child(text("Hello, "))
//! 		.child(append(path("name")))
//! 		.into(),
//! ]);
//! # drop(template);
//! ```

use crate::{
	error::{Error, Result},
	markup,
	path::Path,
	reference::Expression,
	value::Value,
};
use std::rc::Rc;

/// A compiled template: a list of sibling nodes.
#[derive(Debug, Clone, Default)]
pub struct Template {
	nodes: Vec<TemplateNode>,
}

impl Template {
	pub fn new(nodes: impl IntoIterator<Item = TemplateNode>) -> Self {
		Self {
			nodes: nodes.into_iter().collect(),
		}
	}

	/// Imports binding-free HTML as a template. Whitespace-only text is kept verbatim.
	///
	/// # Errors
	///
	/// [`Error::DepthLimit`] if the markup nests deeper than `depth_limit`.
	pub fn from_static_markup(markup: &str, depth_limit: usize) -> Result<Self> {
		Ok(Self {
			nodes: markup::load_template_nodes(markup, depth_limit)?,
		})
	}

	#[must_use]
	pub fn nodes(&self) -> &[TemplateNode] {
		&self.nodes
	}

	/// Checks every path expression in the template.
	///
	/// # Errors
	///
	/// [`Error::InvalidPath`] for the first path that has an empty segment.
	pub fn validate(&self) -> Result<()> {
		fn validate_expression(expression: &Expression) -> Result<()> {
			match expression.paths().find(|path| !path.is_valid()) {
				Some(path) => Err(Error::InvalidPath { path: path.to_string() }),
				None => Ok(()),
			}
		}

		// Preorder, without recursion. Depth is only limited when emitting.
		let mut pending: Vec<&TemplateNode> = self.nodes.iter().rev().collect();
		while let Some(node) = pending.pop() {
			match node {
				TemplateNode::Text(_) | TemplateNode::Comment(_) => (),
				TemplateNode::Append { expression, .. } => validate_expression(expression)?,
				TemplateNode::Element(element) => {
					for attribute in &element.attributes {
						match attribute {
							AttributeTemplate::Static { .. } => (),
							AttributeTemplate::Bound { expression, .. } => validate_expression(expression)?,
							AttributeTemplate::Interpolated { fragments, .. } => {
								for fragment in fragments {
									if let FragmentTemplate::Dynamic(expression) = fragment {
										validate_expression(expression)?
									}
								}
							}
						}
					}
					pending.extend(element.children.iter().rev());
				}
			}
		}
		Ok(())
	}
}

#[derive(Debug, Clone)]
pub enum TemplateNode {
	Text(Rc<str>),
	Comment(Rc<str>),
	Element(ElementTemplate),
	/// A binding in content position. `trusted` content is parsed as markup instead of becoming text.
	Append { expression: Expression, trusted: bool },
}

impl From<ElementTemplate> for TemplateNode {
	fn from(element: ElementTemplate) -> Self {
		Self::Element(element)
	}
}

#[derive(Debug, Clone)]
pub struct ElementTemplate {
	pub tag: Rc<str>,
	pub attributes: Vec<AttributeTemplate>,
	pub children: Vec<TemplateNode>,
}

impl ElementTemplate {
	/// Adds a static attribute.
	#[must_use]
	pub fn attribute(mut self, name: &str, value: &str) -> Self {
		self.attributes.push(AttributeTemplate::Static {
			name: name.into(),
			value: value.into(),
		});
		self
	}

	/// Adds an attribute whose entire value is one unquoted binding, as in `class={{…}}`.
	#[must_use]
	pub fn bind(mut self, name: &str, expression: Expression) -> Self {
		self.attributes.push(AttributeTemplate::Bound { name: name.into(), expression });
		self
	}

	/// Adds a quoted attribute consisting of a single binding, as in `class="{{…}}"`.
	#[must_use]
	pub fn quoted(self, name: &str, expression: Expression) -> Self {
		self.interpolate(name, [FragmentTemplate::Dynamic(expression)])
	}

	/// Adds a quoted attribute composed of literal and dynamic fragments.
	#[must_use]
	pub fn interpolate(mut self, name: &str, fragments: impl IntoIterator<Item = FragmentTemplate>) -> Self {
		self.attributes.push(AttributeTemplate::Interpolated {
			name: name.into(),
			fragments: fragments.into_iter().collect(),
		});
		self
	}

	#[must_use]
	pub fn child(mut self, child: impl Into<TemplateNode>) -> Self {
		self.children.push(child.into());
		self
	}

	#[must_use]
	pub fn children(mut self, children: impl IntoIterator<Item = TemplateNode>) -> Self {
		self.children.extend(children);
		self
	}
}

#[derive(Debug, Clone)]
pub enum AttributeTemplate {
	Static { name: Rc<str>, value: Rc<str> },
	/// Unquoted single binding. Removed while the value is `undefined`, `null` or `false`.
	Bound { name: Rc<str>, expression: Expression },
	/// Quoted. Always present, with nothing-valued fragments contributing `""`.
	Interpolated { name: Rc<str>, fragments: Vec<FragmentTemplate> },
}

#[derive(Debug, Clone)]
pub enum FragmentTemplate {
	Literal(Rc<str>),
	Dynamic(Expression),
}

impl From<&str> for FragmentTemplate {
	fn from(literal: &str) -> Self {
		Self::Literal(literal.into())
	}
}

#[must_use]
pub fn text(text: &str) -> TemplateNode {
	TemplateNode::Text(text.into())
}

#[must_use]
pub fn comment(comment: &str) -> TemplateNode {
	TemplateNode::Comment(comment.into())
}

#[must_use]
pub fn element(tag: &str) -> ElementTemplate {
	ElementTemplate {
		tag: tag.into(),
		attributes: Vec::new(),
		children: Vec::new(),
	}
}

/// `{{expression}}`
#[must_use]
pub fn append(expression: Expression) -> TemplateNode {
	TemplateNode::Append { expression, trusted: false }
}

/// `{{{expression}}}`
#[must_use]
pub fn trusted(expression: Expression) -> TemplateNode {
	TemplateNode::Append { expression, trusted: true }
}

/// A dotted path read from the context. Malformed paths are reported by [`Template::validate`].
#[must_use]
pub fn path(path: &str) -> Expression {
	Expression::Path(Path::dotted(path))
}

#[must_use]
pub fn literal(value: impl Into<Value>) -> Expression {
	Expression::Literal(value.into())
}

/// `(if condition consequent)`
#[must_use]
pub fn if_(condition: Expression, consequent: Expression) -> Expression {
	Expression::If {
		condition: Box::new(condition),
		consequent: Box::new(consequent),
		alternative: None,
	}
}

/// `(if condition consequent alternative)`
#[must_use]
pub fn if_else(condition: Expression, consequent: Expression, alternative: Expression) -> Expression {
	Expression::If {
		condition: Box::new(condition),
		consequent: Box::new(consequent),
		alternative: Some(Box::new(alternative)),
	}
}

/// `(concat part…)`
///
/// Nothing-valued parts contribute `""`. An empty result is itself nothing, so it creates no text node
/// and removes an unquoted attribute. Use [`ElementTemplate::quoted`] to keep `class=""` instead.
#[must_use]
pub fn concat(parts: impl IntoIterator<Item = Expression>) -> Expression {
	Expression::Concat(parts.into_iter().collect())
}

/// A dynamic interpolation fragment. Literal fragments convert from `&str`.
#[must_use]
pub fn fragment(expression: Expression) -> FragmentTemplate {
	FragmentTemplate::Dynamic(expression)
}
