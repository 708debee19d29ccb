/*! Document transformers.

Transforms documents by rewriting their content or attaching extracted segments.

!*/

mod markup;
mod transform;

pub use markup::{strip_markup, StripMarkup};
pub use transform::Transform;
