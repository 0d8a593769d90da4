pub mod test_provider;

pub use test_provider::ScriptedPaymentProvider;
