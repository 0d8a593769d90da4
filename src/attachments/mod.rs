pub mod manager;

pub use manager::AttachmentManager;
