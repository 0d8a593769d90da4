pub mod implementations;
pub mod trait_payment;

pub use implementations::ScriptedPaymentProvider;
pub use trait_payment::PaymentFlowProvider;
