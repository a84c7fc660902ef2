pub mod client;
mod de;
pub mod error;
pub mod instagram;
pub mod memory;
pub mod pipeline;
pub mod store;
pub mod tiktok;
pub mod types;
pub mod youtube;

pub use client::{PlatformClient, PlatformEndpoints};
pub use error::{StoreError, SyncError};
pub use memory::MemoryStore;
pub use pipeline::sync_platform;
pub use store::{PgSyncStore, SyncStore};
pub use types::{PlatformBatch, SyncOutcome, SyncRequest};
