//! PDF construction: the page accumulator, object copying between
//! documents, and embedding of external PDF pages.

mod copy;
mod document;
mod embed;

pub use copy::ObjectCopier;
pub use document::{RenderedDocument, TextStyle};
pub use embed::{embed_pdf, PageBox};
