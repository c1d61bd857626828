//! Dynamically-typed values as read from a rendering context.

use crate::object::Object;
use chrono::{DateTime, FixedOffset};
use core::fmt::{self, Debug, Formatter};
use num_traits::ToPrimitive;
use std::rc::Rc;

/// A value that can be stored in an [`Object`] property and bound into a template.
///
/// Cloning is cheap: strings and symbols are reference-counted and [`Object`]s are shared handles.
#[derive(Clone, Debug)]
pub enum Value {
	Undefined,
	Null,
	Boolean(bool),
	Number(f64),
	String(Rc<str>),
	Symbol(Symbol),
	Date(DateTime<FixedOffset>),
	Object(Object),
}

impl Default for Value {
	fn default() -> Self {
		Self::Undefined
	}
}

impl Value {
	/// Converts any primitive number into a [`Value::Number`].
	///
	/// Values that don't fit into an [`f64`] become `NaN`.
	pub fn number(n: impl ToPrimitive) -> Self {
		Self::Number(n.to_f64().unwrap_or(f64::NAN))
	}

	#[must_use]
	pub fn string(s: impl Into<Rc<str>>) -> Self {
		Self::String(s.into())
	}

	/// `true` for `undefined` and `null`.
	#[must_use]
	pub fn is_nullish(&self) -> bool {
		matches!(self, Self::Undefined | Self::Null)
	}

	#[must_use]
	pub fn as_object(&self) -> Option<&Object> {
		match self {
			Self::Object(object) => Some(object),
			_ => None,
		}
	}

	#[must_use]
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::String(s) => Some(s),
			_ => None,
		}
	}

	/// The `typeof`-style name of this value's kind, used in error messages.
	#[must_use]
	pub fn type_name(&self) -> &'static str {
		match self {
			Self::Undefined => "undefined",
			Self::Null => "null",
			Self::Boolean(_) => "boolean",
			Self::Number(_) => "number",
			Self::String(_) => "string",
			Self::Symbol(_) => "symbol",
			Self::Date(_) | Self::Object(_) => "object",
		}
	}

	/// Identity comparison: objects and symbols by reference, `NaN` equal to itself, `0` distinct from `-0`.
	#[must_use]
	pub fn same_value(&self, other: &Self) -> bool {
		match (self, other) {
			(Self::Undefined, Self::Undefined) | (Self::Null, Self::Null) => true,
			(Self::Boolean(a), Self::Boolean(b)) => a == b,
			(Self::Number(a), Self::Number(b)) => a.to_bits() == b.to_bits() || (a.is_nan() && b.is_nan()),
			(Self::String(a), Self::String(b)) => a == b,
			(Self::Symbol(a), Self::Symbol(b)) => a.ptr_eq(b),
			(Self::Date(a), Self::Date(b)) => a == b,
			(Self::Object(a), Self::Object(b)) => a.ptr_eq(b),
			_ => false,
		}
	}
}

impl From<bool> for Value {
	fn from(value: bool) -> Self {
		Self::Boolean(value)
	}
}

impl From<&str> for Value {
	fn from(value: &str) -> Self {
		Self::String(value.into())
	}
}

impl From<String> for Value {
	fn from(value: String) -> Self {
		Self::String(value.into())
	}
}

impl From<Rc<str>> for Value {
	fn from(value: Rc<str>) -> Self {
		Self::String(value)
	}
}

macro_rules! from_number {
	($($t:ty),*$(,)?) => {$(
		impl From<$t> for Value {
			fn from(value: $t) -> Self {
				Self::number(value)
			}
		}
	)*};
}
from_number!(f32, f64, i8, i16, i32, i64, u8, u16, u32, u64, usize, isize);

impl From<Symbol> for Value {
	fn from(value: Symbol) -> Self {
		Self::Symbol(value)
	}
}

impl From<DateTime<FixedOffset>> for Value {
	fn from(value: DateTime<FixedOffset>) -> Self {
		Self::Date(value)
	}
}

impl From<Object> for Value {
	fn from(value: Object) -> Self {
		Self::Object(value)
	}
}

/// `None` maps to `null`, not `undefined`.
impl<T: Into<Value>> From<Option<T>> for Value {
	fn from(value: Option<T>) -> Self {
		value.map_or(Self::Null, Into::into)
	}
}

/// A unique atomic value with an optional debug description.
///
/// Two symbols are only ever the same value if one is a clone of the other.
#[derive(Clone)]
pub struct Symbol(Rc<Option<Box<str>>>);

impl Symbol {
	#[must_use]
	pub fn new(description: Option<&str>) -> Self {
		Self(Rc::new(description.map(Into::into)))
	}

	#[must_use]
	pub fn description(&self) -> Option<&str> {
		self.0.as_deref()
	}

	#[must_use]
	pub fn ptr_eq(&self, other: &Self) -> bool {
		Rc::ptr_eq(&self.0, &other.0)
	}
}

impl Debug for Symbol {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		write!(f, "Symbol({})", self.description().unwrap_or_default())
	}
}
