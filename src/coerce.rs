//! Value coercion: how a bound value is displayed.
//!
//! Display only ever consults an object's custom string conversion, never its primitive
//! conversion (`value_of`). Escaping happens when the DOM is serialized, so text and attribute
//! nodes always hold the verbatim string.

use crate::{object::Object, value::Value};
use std::borrow::Cow;

/// The outcome of displaying a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
	/// No content at all. Distinct from the empty string.
	Nothing,
	Text(String),
}

impl Rendered {
	#[must_use]
	pub fn is_nothing(&self) -> bool {
		matches!(self, Self::Nothing)
	}

	#[must_use]
	pub fn as_text(&self) -> Option<&str> {
		match self {
			Self::Nothing => None,
			Self::Text(text) => Some(text),
		}
	}

	/// The text, or `""` for [`Rendered::Nothing`].
	#[must_use]
	pub fn as_str_or_empty(&self) -> &str {
		self.as_text().unwrap_or_default()
	}
}

/// A value classified by how it can be displayed.
#[derive(Debug, Clone, Copy)]
pub enum Displayable<'a> {
	/// Anything that isn't an [`Object`].
	Primitive(&'a Value),
	/// An object without a custom string conversion, including null-prototype dictionaries.
	Structured(&'a Object),
	/// An object with a custom string conversion.
	CustomStringified(&'a Object),
}

impl<'a> Displayable<'a> {
	#[must_use]
	pub fn of(value: &'a Value) -> Self {
		match value {
			Value::Object(object) if object.has_custom_string() => Self::CustomStringified(object),
			Value::Object(object) => Self::Structured(object),
			primitive => Self::Primitive(primitive),
		}
	}

	pub fn accept<V: DisplayVisitor>(self, visitor: &mut V) -> V::Output {
		match self {
			Self::Primitive(value) => visitor.visit_primitive(value),
			Self::Structured(object) => visitor.visit_structured(object),
			Self::CustomStringified(object) => visitor.visit_custom(object),
		}
	}
}

/// One way of displaying each [`Displayable`] variant.
pub trait DisplayVisitor {
	type Output;

	fn visit_primitive(&mut self, value: &Value) -> Self::Output;
	fn visit_structured(&mut self, object: &Object) -> Self::Output;
	fn visit_custom(&mut self, object: &Object) -> Self::Output;
}

/// The canonical text display.
struct TextVisitor;

impl DisplayVisitor for TextVisitor {
	type Output = Rendered;

	fn visit_primitive(&mut self, value: &Value) -> Rendered {
		Rendered::Text(match value {
			Value::Undefined | Value::Null => return Rendered::Nothing,
			Value::Boolean(true) => "true".to_owned(),
			Value::Boolean(false) => "false".to_owned(),
			&Value::Number(n) => number_to_string(n),
			Value::String(s) => s.to_string(),
			Value::Symbol(symbol) => format!("Symbol({})", symbol.description().unwrap_or_default()),
			Value::Date(date) => date.format("%a %b %d %Y %H:%M:%S GMT%z").to_string(),
			Value::Object(object) => return self.visit_structured(object),
		})
	}

	fn visit_structured(&mut self, _: &Object) -> Rendered {
		Rendered::Text("[object Object]".to_owned())
	}

	fn visit_custom(&mut self, object: &Object) -> Rendered {
		object.custom_string().map_or_else(|| self.visit_structured(object), Rendered::Text)
	}
}

/// Displays `value`.
///
/// `undefined` and `null` display as nothing. Dates display in their own offset as
/// `Sat Jan 01 2000 00:00:00 GMT+0000`, without a trailing zone name, since a fixed offset has none.
#[must_use]
pub fn render(value: &Value) -> Rendered {
	Displayable::of(value).accept(&mut TextVisitor)
}

/// Formats a number the way it is displayed in templates: `NaN`, `Infinity`, `-Infinity`,
/// `0` for either zero, no fraction for integral values and exponent notation outside `[1e-6, 1e21)`.
#[must_use]
pub fn number_to_string(n: f64) -> String {
	if n.is_nan() {
		return "NaN".to_owned();
	}
	if n == 0.0 {
		return "0".to_owned();
	}
	if n.is_infinite() {
		return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_owned();
	}

	let magnitude = n.abs();
	if (1e-6..1e21).contains(&magnitude) {
		n.to_string()
	} else {
		let exponential = format!("{:e}", n);
		match exponential.split_once('e') {
			Some((mantissa, exponent)) if !exponent.starts_with('-') => format!("{}e+{}", mantissa, exponent),
			_ => exponential,
		}
	}
}

/// Truthiness as used by the `if` helper.
///
/// `undefined`, `null`, `false`, `0`, `-0`, `NaN` and `""` are falsy. Everything else, including
/// every object, is truthy.
#[must_use]
pub fn is_truthy(value: &Value) -> bool {
	match value {
		Value::Undefined | Value::Null => false,
		&Value::Boolean(b) => b,
		&Value::Number(n) => n != 0.0 && !n.is_nan(),
		Value::String(s) => !s.is_empty(),
		Value::Symbol(_) | Value::Date(_) | Value::Object(_) => true,
	}
}

/// Escapes text node data for HTML serialization.
#[must_use]
pub fn escape_text(text: &str) -> Cow<'_, str> {
	escape(text, false)
}

/// Escapes a double-quoted attribute value for HTML serialization.
#[must_use]
pub fn escape_attribute(value: &str) -> Cow<'_, str> {
	escape(value, true)
}

fn escape(s: &str, attribute_mode: bool) -> Cow<'_, str> {
	let needs_escape = |c: char| match c {
		'&' | '\u{a0}' => true,
		'"' => attribute_mode,
		'<' | '>' => !attribute_mode,
		_ => false,
	};
	if !s.contains(needs_escape) {
		return Cow::Borrowed(s);
	}

	let mut escaped = String::with_capacity(s.len() + 8);
	for c in s.chars() {
		match c {
			'&' => escaped.push_str("&amp;"),
			'\u{a0}' => escaped.push_str("&nbsp;"),
			'"' if attribute_mode => escaped.push_str("&quot;"),
			'<' if !attribute_mode => escaped.push_str("&lt;"),
			'>' if !attribute_mode => escaped.push_str("&gt;"),
			c => escaped.push(c),
		}
	}
	Cow::Owned(escaped)
}
