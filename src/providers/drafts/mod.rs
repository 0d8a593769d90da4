pub mod implementations;
pub mod trait_drafts;

pub use trait_drafts::DraftProvider;
