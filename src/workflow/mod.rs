pub mod events;
pub mod manager;
pub mod step;

pub use events::{RecordingObserver, WizardEvent, WizardObserver};
pub use manager::{Collaborators, WizardManager};
