use thiserror::Error;

/// Result type for fallible `bound-dom` operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Programmer errors surfaced by the object model and the renderer.
///
/// Reading a path never fails (missing or primitive intermediate values resolve to `undefined`).
/// The only error a revalidation pass can report is [`Error::DepthLimit`], from trusted markup.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
	/// [`assign`](crate::object::assign) was handed a source that has no enumerable keys.
	#[error("Tried to retrieve keys of a non-Object (found {found})")]
	NonObjectSource { found: &'static str },

	/// A path expression contained an empty segment, as in `a..b` or `.a`.
	#[error("Invalid path {path:?}: path segments must not be empty")]
	InvalidPath { path: String },

	/// [`set_path`](crate::object::set_path) could not find an object to set the last segment on.
	#[error("Property set failed: object in path {path:?} could not be found or was destroyed")]
	SetOnNonObject { path: String },

	/// [`Renderer::rerender`](crate::render::Renderer::rerender) or
	/// [`Renderer::run_task`](crate::render::Renderer::run_task) was called before anything was rendered.
	#[error("Nothing has been rendered yet")]
	NotRendered,

	/// A template or trusted markup nested deeper than [`Options::depth_limit`](crate::render::Options::depth_limit).
	#[error("Depth limit reached")]
	DepthLimit,
}
