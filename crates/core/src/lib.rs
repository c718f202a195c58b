pub mod config;
pub mod domain;
pub mod errors;
pub mod schema;
pub mod wizard;

pub use config::{AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat};
pub use domain::alert::{Alert, AlertId, FilterDraft, UserId};
pub use errors::{ApplicationError, DomainError, InterfaceError};
pub use schema::{
    category_label, is_known_category, ClientHireBucket, ExperienceLevel, FixedPriceBucket,
    JobType, ProposalsBucket, CATEGORIES,
};
pub use wizard::{
    apply, FilterField, Prompt, PromptOption, Step, Transition, WizardAction, WizardCommand,
    WizardError, WizardInput,
};
