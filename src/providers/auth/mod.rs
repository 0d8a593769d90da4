pub mod implementations;
pub mod trait_auth;

pub use trait_auth::AuthProvider;
