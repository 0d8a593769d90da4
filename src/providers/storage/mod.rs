pub mod implementations;
pub mod trait_records;
pub mod trait_storage;

pub use trait_records::AttachmentRecordProvider;
pub use trait_storage::ObjectStorageProvider;
