pub mod manager;

pub use manager::DraftManager;
