//! A minimal shared object model: the bindable value source that templates read from.
//!
//! [`Object`]s are single-threaded shared handles. Cloning one shares its identity, so a context
//! can be mutated by whoever holds a handle and the next revalidation pass will observe it.

use crate::{
	coerce::is_truthy,
	error::{Error, Result},
	path::Path,
	value::Value,
};
use core::fmt::{self, Debug, Formatter};
use hashbrown::HashMap;
use std::{cell::RefCell, rc::Rc};
use tracing::trace;

type Getter = Rc<dyn Fn(&Object) -> Value>;
type ToStringHook = Rc<dyn Fn(&Object) -> String>;
type ValueOfHook = Rc<dyn Fn(&Object) -> Value>;

#[derive(Clone)]
enum Property {
	Value(Value),
	/// Evaluated against the owning object on every read.
	Computed(Getter),
}

/// What an object inherits from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prototype {
	/// An ordinary record.
	Object,
	/// A bare dictionary without any inherited behaviour.
	Null,
}

struct ObjectData {
	prototype: Prototype,
	properties: HashMap<Rc<str>, Property>,
	/// Insertion order of `properties`' keys.
	order: Vec<Rc<str>>,
	to_string: Option<ToStringHook>,
	value_of: Option<ValueOfHook>,
}

/// A shared, mutable property bag.
#[derive(Clone)]
pub struct Object(Rc<RefCell<ObjectData>>);

impl Default for Object {
	fn default() -> Self {
		Self::new()
	}
}

impl Object {
	#[must_use]
	pub fn new() -> Self {
		Self::with_prototype(Prototype::Object)
	}

	/// Creates a dictionary that has no prototype.
	#[must_use]
	pub fn null_prototype() -> Self {
		Self::with_prototype(Prototype::Null)
	}

	fn with_prototype(prototype: Prototype) -> Self {
		Self(Rc::new(RefCell::new(ObjectData {
			prototype,
			properties: HashMap::new(),
			order: Vec::new(),
			to_string: None,
			value_of: None,
		})))
	}

	/// Builder-style [`Object::set`].
	#[must_use]
	pub fn with(self, key: &str, value: impl Into<Value>) -> Self {
		self.set(key, value);
		self
	}

	/// Adds a computed property, evaluated against this object whenever it is read.
	#[must_use]
	pub fn with_computed(self, key: &str, getter: impl 'static + Fn(&Object) -> Value) -> Self {
		self.insert(key, Property::Computed(Rc::new(getter)));
		self
	}

	/// Installs a custom string conversion, which is used when this object is displayed.
	#[must_use]
	pub fn with_to_string(self, hook: impl 'static + Fn(&Object) -> String) -> Self {
		self.0.borrow_mut().to_string = Some(Rc::new(hook));
		self
	}

	/// Installs a custom primitive conversion.
	///
	/// This is **not** used for display; see [`coerce::render`](crate::coerce::render).
	#[must_use]
	pub fn with_value_of(self, hook: impl 'static + Fn(&Object) -> Value) -> Self {
		self.0.borrow_mut().value_of = Some(Rc::new(hook));
		self
	}

	#[must_use]
	pub fn prototype(&self) -> Prototype {
		self.0.borrow().prototype
	}

	/// Reads a property. Missing properties are `undefined`, computed ones are evaluated.
	#[must_use]
	pub fn get(&self, key: &str) -> Value {
		// The borrow must end before a getter runs, since getters read from `self` again.
		let property = self.0.borrow().properties.get(key).cloned();
		match property {
			None => Value::Undefined,
			Some(Property::Value(value)) => value,
			Some(Property::Computed(getter)) => getter(self),
		}
	}

	/// Writes a property, replacing a computed property of the same name.
	pub fn set(&self, key: &str, value: impl Into<Value>) {
		self.insert(key, Property::Value(value.into()));
	}

	fn insert(&self, key: &str, property: Property) {
		let mut data = self.0.borrow_mut();
		let key: Rc<str> = key.into();
		if data.properties.insert(Rc::clone(&key), property).is_none() {
			data.order.push(key);
		}
	}

	#[must_use]
	pub fn has(&self, key: &str) -> bool {
		self.0.borrow().properties.contains_key(key)
	}

	/// Own keys in insertion order.
	#[must_use]
	pub fn keys(&self) -> Vec<Rc<str>> {
		self.0.borrow().order.clone()
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.0.borrow().order.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Whether both handles refer to the same object.
	#[must_use]
	pub fn ptr_eq(&self, other: &Self) -> bool {
		Rc::ptr_eq(&self.0, &other.0)
	}

	#[must_use]
	pub fn has_custom_string(&self) -> bool {
		self.0.borrow().to_string.is_some()
	}

	/// Runs the custom string conversion, if there is one.
	#[must_use]
	pub fn custom_string(&self) -> Option<String> {
		let hook = self.0.borrow().to_string.clone()?;
		Some(hook(self))
	}

	/// Runs the custom primitive conversion, if there is one.
	#[must_use]
	pub fn value_of(&self) -> Option<Value> {
		let hook = self.0.borrow().value_of.clone()?;
		Some(hook(self))
	}
}

impl Debug for Object {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		// Values aren't printed, as objects may contain themselves.
		let data = self.0.borrow();
		f.debug_struct("Object")
			.field("prototype", &data.prototype)
			.field("keys", &data.order)
			.field("to_string", &data.to_string.is_some())
			.field("value_of", &data.value_of.is_some())
			.finish()
	}
}

/// Sets the value at `path` below `root`, like a property write at the end of a path read.
///
/// # Errors
///
/// [`Error::InvalidPath`] for malformed paths, [`Error::SetOnNonObject`] iff an intermediate value is not an object.
pub fn set_path(root: &Object, path: &Path, value: impl Into<Value>) -> Result<()> {
	if !path.is_valid() {
		return Err(Error::InvalidPath { path: path.to_string() });
	}
	let (last, parents, parent_text) = path.split_last().ok_or_else(|| Error::InvalidPath { path: path.to_string() })?;

	let mut target = root.clone();
	for segment in parents {
		target = match target.get(segment) {
			Value::Object(object) => object,
			_ => return Err(Error::SetOnNonObject { path: parent_text.to_owned() }),
		};
	}
	trace!(%path, "Setting property.");
	target.set(last, value);
	Ok(())
}

/// Copies the own properties of each source onto `target`, left to right, and returns `target`.
///
/// Falsy sources (`undefined`, `null`, `false`, `0`, `NaN`, `""`) are skipped.
/// Computed properties are copied as their current value.
///
/// # Errors
///
/// Iff a source is truthy but not an object, in which case `target` may already contain the
/// properties of earlier sources.
pub fn assign<'a>(target: &Object, sources: impl IntoIterator<Item = &'a Value>) -> Result<Object> {
	for source in sources {
		if !is_truthy(source) {
			continue;
		}

		let source = match source {
			Value::Object(object) => object,
			Value::Date(_) => continue,
			other => return Err(Error::NonObjectSource { found: other.type_name() }),
		};

		for key in source.keys() {
			target.set(&key, source.get(&key));
		}
	}
	Ok(target.clone())
}
