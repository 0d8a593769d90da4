pub mod implementations;
pub mod trait_catalog;

pub use trait_catalog::CatalogProvider;
