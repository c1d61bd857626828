//! Binding references: expressions evaluated against a context, cached for stability checks.

use crate::{
	coerce::{self, is_truthy, Rendered},
	object::Object,
	path::{self, Path},
	value::Value,
};
use tracing::trace;

/// Pull-based access to the current state of a context.
///
/// The renderer calls this once per binding and pass. Invalidation of anything the source caches
/// is the source's own responsibility.
pub trait ValueSource {
	fn current_value(&self, path: &Path) -> Value;
}

impl ValueSource for Value {
	fn current_value(&self, path: &Path) -> Value {
		path::resolve(self, path)
	}
}

impl ValueSource for Object {
	fn current_value(&self, path: &Path) -> Value {
		path::resolve(&Value::Object(self.clone()), path)
	}
}

/// A compiled binding expression.
#[derive(Debug, Clone)]
pub enum Expression {
	/// A property path read from the context.
	Path(Path),
	Literal(Value),
	/// The `if` helper: `consequent` if `condition` is truthy, otherwise `alternative` (or `undefined`).
	If {
		condition: Box<Expression>,
		consequent: Box<Expression>,
		alternative: Option<Box<Expression>>,
	},
	/// The `concat` helper: joins the display text of each part. Parts that display as nothing
	/// contribute `""`, and an empty result displays as nothing.
	Concat(Vec<Expression>),
}

impl Expression {
	#[must_use]
	pub fn evaluate(&self, source: &dyn ValueSource) -> Value {
		match self {
			Self::Path(path) => source.current_value(path),
			Self::Literal(value) => value.clone(),
			Self::If {
				condition,
				consequent,
				alternative,
			} => {
				if is_truthy(&condition.evaluate(source)) {
					consequent.evaluate(source)
				} else {
					alternative.as_ref().map_or(Value::Undefined, |alternative| alternative.evaluate(source))
				}
			}
			Self::Concat(parts) => {
				let joined: String = parts.iter().map(|part| coerce::render(&part.evaluate(source)).as_str_or_empty().to_owned()).collect();
				if joined.is_empty() {
					Value::Undefined
				} else {
					Value::String(joined.into())
				}
			}
		}
	}

	/// Every path this expression reads, in evaluation order.
	pub fn paths(&self) -> Box<dyn '_ + Iterator<Item = &Path>> {
		match self {
			Self::Path(path) => Box::new(core::iter::once(path)),
			Self::Literal(_) => Box::new(core::iter::empty()),
			Self::If {
				condition,
				consequent,
				alternative,
			} => Box::new(condition.paths().chain(consequent.paths()).chain(alternative.iter().flat_map(|alternative| alternative.paths()))),
			Self::Concat(parts) => Box::new(parts.iter().flat_map(Expression::paths)),
		}
	}
}

/// A live binding: an [`Expression`] plus the value and display text it had on the last pass.
#[derive(Debug)]
pub struct Reference {
	expression: Expression,
	value: Value,
	rendered: Rendered,
	revision: u64,
}

impl Reference {
	/// Creates an unevaluated reference. [`Reference::initialize`] must run before the cached state is meaningful.
	#[must_use]
	pub fn new(expression: Expression) -> Self {
		Self {
			expression,
			value: Value::Undefined,
			rendered: Rendered::Nothing,
			revision: 0,
		}
	}

	/// Evaluates the expression for the initial render.
	pub fn initialize(&mut self, source: &dyn ValueSource) -> &Rendered {
		self.value = self.expression.evaluate(source);
		self.rendered = coerce::render(&self.value);
		self.revision = 0;
		&self.rendered
	}

	/// Re-evaluates the expression.
	///
	/// Returns whether anything observable changed: the value is no longer the same value, or its display text differs.
	/// Re-evaluating against an unchanged context is side-effect-free and returns `false`.
	pub fn revalidate(&mut self, source: &dyn ValueSource) -> bool {
		let value = self.expression.evaluate(source);
		let rendered = coerce::render(&value);
		let changed = !value.same_value(&self.value) || rendered != self.rendered;
		if changed {
			trace!(revision = self.revision + 1, "Reference changed.");
			self.value = value;
			self.rendered = rendered;
			self.revision += 1;
		}
		changed
	}

	#[must_use]
	pub fn expression(&self) -> &Expression {
		&self.expression
	}

	#[must_use]
	pub fn value(&self) -> &Value {
		&self.value
	}

	#[must_use]
	pub fn rendered(&self) -> &Rendered {
		&self.rendered
	}

	/// How often this reference has changed since it was initialized.
	#[must_use]
	pub fn revision(&self) -> u64 {
		self.revision
	}
}
