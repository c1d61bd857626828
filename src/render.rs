//! The render/rerender entry points.

use crate::{
	dom::{Document, NodeId},
	emit::Emitter,
	error::{Error, Result},
	object::Object,
	template::Template,
};
use tracing::{info, instrument, trace, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
	/// How deeply templates and trusted markup may nest below the document root.
	///
	/// Rendering fails with [`Error::DepthLimit`] beyond this.
	pub depth_limit: usize,
}

impl Default for Options {
	fn default() -> Self {
		Self { depth_limit: 64 }
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
	/// Nothing is rendered.
	Idle,
	Rendering,
	/// Rendered and up to date with the context as of the last pass.
	Stable,
	Revalidating,
}

/// Statistics of one revalidation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Revalidation {
	/// Content nodes visited. This is always all of them.
	pub visited: usize,
	/// DOM mutations applied.
	pub mutations: u64,
}

#[derive(Debug)]
struct Rendering {
	context: Object,
	emitter: Emitter,
}

/// Owns a [`Document`] and renders one template at a time into its root.
///
/// # Example
///
/// ```
/// use bound_dom::{
/// 	object::Object,
/// 	render::{Options, Renderer},
/// 	template::{append, element, path, Template},
/// };
///
/// let context = Object::new().with("name", "Max");
/// let mut renderer = Renderer::new(Options::default());
/// renderer.render(&Template::new([element("b").child(append(path("name"))).into()]), context.clone())?;
/// assert_eq!(renderer.inner_html(), "<b>Max</b>");
///
/// let revalidation = renderer.run_task(|context| {
/// 	context.set("name", "Moritz");
/// 	Ok(())
/// })?;
/// assert_eq!(renderer.inner_html(), "<b>Moritz</b>");
/// assert_eq!(revalidation.mutations, 1);
/// # Ok::<(), bound_dom::error::Error>(())
/// ```
#[derive(Debug)]
pub struct Renderer {
	options: Options,
	document: Document,
	phase: Phase,
	rendering: Option<Rendering>,
}

impl Renderer {
	#[must_use]
	pub fn new(options: Options) -> Self {
		Self {
			options,
			document: Document::new(),
			phase: Phase::Idle,
			rendering: None,
		}
	}

	/// Renders `template` against `context` into the document root.
	///
	/// Any previous rendering is torn down first.
	///
	/// # Errors
	///
	/// - [`Error::InvalidPath`] if the template contains a malformed path. The previous rendering is kept in that case.
	/// - [`Error::DepthLimit`] if the template or its initial trusted content nests too deeply.
	///   Nothing is rendered afterwards.
	#[instrument(skip(self, template, context))]
	pub fn render(&mut self, template: &Template, context: Object) -> Result<()> {
		template.validate()?;

		if let Some(mut previous) = self.rendering.take() {
			trace!("Tearing down previous rendering.");
			previous.emitter.teardown(&mut self.document);
		}

		self.phase = Phase::Rendering;
		let root = self.document.root();
		match Emitter::emit(&mut self.document, root, template.nodes(), &context, self.options.depth_limit) {
			Ok(emitter) => {
				self.rendering = Some(Rendering { context, emitter });
				self.phase = Phase::Stable;
				Ok(())
			}
			Err(error) => {
				warn!("Rendering failed: {}", error);
				self.phase = Phase::Idle;
				Err(error)
			}
		}
	}

	/// Runs one revalidation pass against the current state of the context.
	///
	/// # Errors
	///
	/// - [`Error::NotRendered`] if nothing is rendered.
	/// - [`Error::DepthLimit`] if updated trusted content nests too deeply.
	///   The rest of the pass is skipped, and the next pass picks up from there.
	#[instrument(skip(self))]
	pub fn rerender(&mut self) -> Result<Revalidation> {
		let rendering = self.rendering.as_mut().ok_or(Error::NotRendered)?;

		self.phase = Phase::Revalidating;
		let before = self.document.mutations();
		let visited = rendering.emitter.revalidate(&mut self.document, &rendering.context);
		self.phase = Phase::Stable;

		let revalidation = Revalidation {
			visited: visited?,
			mutations: self.document.mutations() - before,
		};
		info!("Visited {} content node(s), applied {} mutation(s).", revalidation.visited, revalidation.mutations);
		Ok(revalidation)
	}

	/// Applies `task` to the context, then revalidates once.
	///
	/// # Errors
	///
	/// [`Error::NotRendered`] if nothing is rendered, any error `task` returns (without revalidating),
	/// or any error of [`Renderer::rerender`].
	pub fn run_task(&mut self, task: impl FnOnce(&Object) -> Result<()>) -> Result<Revalidation> {
		let context = self.rendering.as_ref().ok_or(Error::NotRendered)?.context.clone();
		task(&context)?;
		self.rerender()
	}

	#[must_use]
	pub fn options(&self) -> Options {
		self.options
	}

	#[must_use]
	pub fn phase(&self) -> Phase {
		self.phase
	}

	#[must_use]
	pub fn document(&self) -> &Document {
		&self.document
	}

	/// Mutable access to the document, for example to simulate outside interference.
	pub fn document_mut(&mut self) -> &mut Document {
		&mut self.document
	}

	/// The node everything is rendered into.
	#[must_use]
	pub fn root(&self) -> NodeId {
		self.document.root()
	}

	/// The context of the current rendering.
	#[must_use]
	pub fn context(&self) -> Option<&Object> {
		self.rendering.as_ref().map(|rendering| &rendering.context)
	}

	#[must_use]
	pub fn emitter(&self) -> Option<&Emitter> {
		self.rendering.as_ref().map(|rendering| &rendering.emitter)
	}

	/// Serializes everything rendered.
	#[must_use]
	pub fn inner_html(&self) -> String {
		self.document.inner_html(self.document.root())
	}
}
