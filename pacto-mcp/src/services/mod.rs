//! Business logic behind the pacto-mcp endpoints

pub mod document_renderer;
pub mod mailer;

pub use document_renderer::render_contract;
pub use mailer::{apply_signature, Mailer};
