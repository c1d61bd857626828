//! Dotted path expressions and their side-effect-free resolution.

use crate::{
	error::{Error, Result},
	value::Value,
};
use core::{
	fmt::{self, Debug, Display, Formatter},
	str::FromStr,
};
use smallvec::SmallVec;
use std::rc::Rc;
use tracing::trace;

/// An ordered sequence of property names, written `a.b.c`.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Path {
	source: Rc<str>,
	segments: SmallVec<[Rc<str>; 4]>,
}

impl Path {
	/// Parses a dotted path.
	///
	/// # Errors
	///
	/// Iff any segment is empty.
	pub fn parse(source: &str) -> Result<Self> {
		let path = Self::dotted(source);
		if path.is_valid() {
			Ok(path)
		} else {
			Err(Error::InvalidPath { path: source.to_owned() })
		}
	}

	/// Splits without validation. Template builders use this and defer the check to render time.
	pub(crate) fn dotted(source: &str) -> Self {
		Self {
			source: source.into(),
			segments: source.split('.').map(Into::into).collect(),
		}
	}

	#[must_use]
	pub fn is_valid(&self) -> bool {
		self.segments.iter().all(|segment| !segment.is_empty())
	}

	#[must_use]
	pub fn segments(&self) -> &[Rc<str>] {
		&self.segments
	}

	#[must_use]
	pub fn as_str(&self) -> &str {
		&self.source
	}

	/// Splits off the last segment, returning the parent segments and the dotted text they were written as.
	#[must_use]
	pub fn split_last(&self) -> Option<(&Rc<str>, &[Rc<str>], &str)> {
		let (last, parent) = self.segments.split_last()?;
		let parent_len = self.source.len() - last.len();
		Some((last, parent, self.source[..parent_len].trim_end_matches('.')))
	}
}

impl FromStr for Path {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self> {
		Self::parse(s)
	}
}

impl Display for Path {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.write_str(&self.source)
	}
}

impl Debug for Path {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		write!(f, "Path({:?})", &*self.source)
	}
}

/// Reads `path` starting at `context`.
///
/// Each segment is a property read. As soon as the current value is not an object, the result is
/// [`Value::Undefined`]; this never fails. Computed properties are evaluated as they are read.
#[must_use]
pub fn resolve(context: &Value, path: &Path) -> Value {
	let mut current = context.clone();
	for (i, segment) in path.segments.iter().enumerate() {
		current = match &current {
			Value::Object(object) => object.get(segment),
			other => {
				trace!(path = %path, depth = i, found = other.type_name(), "Path resolution short-circuited.");
				return Value::Undefined;
			}
		};
	}
	current
}
