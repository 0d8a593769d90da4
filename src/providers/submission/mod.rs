pub mod implementations;
pub mod trait_submission;

pub use implementations::{RecordingCheckoutProvider, RecordingSubmissionProvider};
pub use trait_submission::{CheckoutProvider, SubmissionProvider};
