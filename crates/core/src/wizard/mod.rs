pub mod actions;
pub mod engine;
pub mod prompts;
pub mod states;

pub use engine::{apply, parse_hourly_range, WizardError};
pub use prompts::{Prompt, PromptOption};
pub use states::{FilterField, Step, Transition, WizardAction, WizardCommand, WizardInput};
