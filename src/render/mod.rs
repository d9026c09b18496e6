//! Text rendering: layout options, fallback serialization, service
//! templates and font encoding.

mod fallback;
mod options;
mod template;
pub mod text;

pub use fallback::render_fallback;
pub use options::{PageSize, ReportOptions};
pub use template::{ServiceTemplate, TemplateRegistry};
