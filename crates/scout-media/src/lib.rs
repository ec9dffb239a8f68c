//! Feed screenshots, avatars and AI feed descriptions.

pub mod enrichment;
pub mod storage;

pub use enrichment::{MediaAdapter, FEED_DESCRIPTION_MAX_TOKENS};
pub use storage::{StorageClient, StorageError};
