pub mod session;
pub mod types;

pub use session::WizardSession;
pub use types::{
    CheckoutReceipt, FlowMode, PaymentOutcome, PaymentSession, ServicePricingMeta, StoredObject,
    SubmissionReceipt, TerminalOutcome, UploadFile, UserRef, WizardStatus,
};
