// servi-domain library entry point
pub mod attachment;
pub mod field_schema;
pub mod phone;
pub mod pricing;
pub mod validation;
pub use attachment::Attachment;
pub use field_schema::{FieldKind, FieldSchema, LocalizedText, SelectOption, StepSchema};
pub use phone::PhoneError;
pub use pricing::{DeliveryType, PricingQuote, ShippingLocation, ShippingSelection, TariffType, UrgencyTier};
