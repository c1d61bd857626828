//! Quoted attribute values assembled from literal and dynamic fragments.

use crate::{
	reference::{Reference, ValueSource},
	template::FragmentTemplate,
};
use std::rc::Rc;

#[derive(Debug)]
pub enum Fragment {
	Literal(Rc<str>),
	Dynamic(Reference),
}

/// The fragments of one quoted attribute value, in source order.
#[derive(Debug)]
pub struct Interpolation {
	fragments: Vec<Fragment>,
}

impl Interpolation {
	#[must_use]
	pub fn new(fragments: &[FragmentTemplate]) -> Self {
		Self {
			fragments: fragments
				.iter()
				.map(|fragment| match fragment {
					FragmentTemplate::Literal(literal) => Fragment::Literal(literal.clone()),
					FragmentTemplate::Dynamic(expression) => Fragment::Dynamic(Reference::new(expression.clone())),
				})
				.collect(),
		}
	}

	#[must_use]
	pub fn fragments(&self) -> &[Fragment] {
		&self.fragments
	}

	/// Evaluates every dynamic fragment and returns the assembled value.
	pub fn initialize(&mut self, source: &dyn ValueSource) -> String {
		for fragment in &mut self.fragments {
			if let Fragment::Dynamic(reference) = fragment {
				reference.initialize(source);
			}
		}
		self.assemble()
	}

	/// Re-evaluates every dynamic fragment. Returns whether any of them changed.
	///
	/// All fragments are visited even after the first change.
	pub fn revalidate(&mut self, source: &dyn ValueSource) -> bool {
		self.fragments.iter_mut().fold(false, |changed, fragment| match fragment {
			Fragment::Literal(_) => changed,
			Fragment::Dynamic(reference) => reference.revalidate(source) | changed,
		})
	}

	/// Concatenates the fragments: literals verbatim, dynamic fragments as their current text.
	/// Fragments that display as nothing contribute `""`; whitespace is never collapsed.
	#[must_use]
	pub fn assemble(&self) -> String {
		self.fragments
			.iter()
			.map(|fragment| match fragment {
				Fragment::Literal(literal) => &**literal,
				Fragment::Dynamic(reference) => reference.rendered().as_str_or_empty(),
			})
			.collect()
	}
}
