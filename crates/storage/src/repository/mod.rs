pub mod document;

pub use document::DocumentRepository;
