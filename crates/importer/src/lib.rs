pub mod config;
pub mod date;
pub mod dom;
pub mod error;
pub mod sources;
pub mod sync;
pub mod traits;

pub use config::FfvbConfig;
pub use error::{ImporterError, Result};
pub use sync::{SyncOrchestrator, SyncReport};
pub use traits::PageSource;
