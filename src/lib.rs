#![doc(html_root_url = "https://docs.rs/bound-dom/0.0.1")]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

#[cfg(doctest)]
pub mod readme {
	doc_comment::doctest!("../README.md");
}

pub mod coerce;
pub mod dom;
pub mod emit;
pub mod error;
pub mod interpolate;
pub mod markup;
pub mod object;
pub mod path;
pub mod reference;
pub mod render;
pub mod template;
pub mod value;

pub use error::{Error, Result};
pub use object::Object;
pub use render::{Options, Renderer};
pub use template::Template;
pub use value::Value;
