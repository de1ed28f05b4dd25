pub mod database;
pub mod error;
pub mod memory;
pub mod models;
pub mod repository;
pub mod store;

pub use database::Database;
pub use error::{Result, StorageError};
pub use memory::MemoryDocumentStore;
pub use models::{Document, DocumentPath, DocumentWrite};
pub use store::DocumentStore;
