pub mod provider_error;
pub mod wizard_error;

pub use provider_error::ProviderError;
pub use wizard_error::WizardError;
