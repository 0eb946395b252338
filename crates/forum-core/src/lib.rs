pub mod config;
pub mod error;
pub mod message;
pub mod store;
pub mod sync;

// Re-export main types for convenience
pub use config::Config;
pub use error::{ForumError, Result, SyncFailure};
pub use message::{Message, MessageBody};
pub use store::{StoreClient, DEFAULT_ENDPOINT};
pub use sync::{ComposeForm, ForumState, LoadPhase, PendingSubmit, SubmitToken};
