pub mod document;

pub use document::{Document, DocumentPath, DocumentWrite};
