pub mod store;

pub use store::{CachedDraft, DraftCacheStore};
