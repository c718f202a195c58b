use serde::{Deserialize, Serialize};

use crate::domain::alert::FilterDraft;
use crate::schema::{
    ClientHireBucket, ExperienceLevel, FixedPriceBucket, JobType, ProposalsBucket,
};

/// Wizard steps. The idle state is the absence of a session; a start event
/// creates a session at `MainMenu`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Step {
    MainMenu,
    AlertMenu,
    AskExperience,
    AskCategory,
    AskJobType,
    AskAmount,
    AskClientHistory,
    AskContractToHire,
    AskPaymentVerification,
    AskProposals,
    AskKeywords,
    Confirm,
}

/// Draft fields reachable from the alert menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterField {
    Experience,
    Category,
    JobType,
    Amount,
    ClientHistory,
    ContractToHire,
    PaymentVerification,
    Proposals,
    Keywords,
}

impl FilterField {
    pub const ALL: [Self; 9] = [
        Self::Experience,
        Self::Category,
        Self::JobType,
        Self::Amount,
        Self::ClientHistory,
        Self::ContractToHire,
        Self::PaymentVerification,
        Self::Proposals,
        Self::Keywords,
    ];

    pub fn ask_step(&self) -> Step {
        match self {
            Self::Experience => Step::AskExperience,
            Self::Category => Step::AskCategory,
            Self::JobType => Step::AskJobType,
            Self::Amount => Step::AskAmount,
            Self::ClientHistory => Step::AskClientHistory,
            Self::ContractToHire => Step::AskContractToHire,
            Self::PaymentVerification => Step::AskPaymentVerification,
            Self::Proposals => Step::AskProposals,
            Self::Keywords => Step::AskKeywords,
        }
    }
}

/// A classified action token. Parsing a raw token into one of these is the
/// router's job; values embedded in tokens are already vocabulary-checked.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WizardAction {
    NewAlert,
    ListAlerts,
    DeleteAlertMenu,
    DeleteAlert(String),
    Configure(FilterField),
    ToggleExperience(ExperienceLevel),
    PickCategory(String),
    PickJobType(JobType),
    PickFixedBucket(FixedPriceBucket),
    PickClientHires(ClientHireBucket),
    PickContractToHire(bool),
    PickPaymentVerified(bool),
    PickProposals(ProposalsBucket),
    Back,
    Confirm,
    ConfirmSave,
    Cancel,
}

/// One inbound interaction as seen by the engine: either a classified
/// action token or free text typed into the chat.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WizardInput {
    Action(WizardAction),
    Text(String),
}

/// Side effect the caller must execute after a transition. The engine
/// itself never touches the store or the session map.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WizardCommand {
    SaveAlert,
    ListAlerts,
    ShowDeleteMenu,
    DeleteAlert(String),
    EndSession,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transition {
    pub from: Step,
    pub to: Step,
    pub draft: FilterDraft,
    pub command: Option<WizardCommand>,
}
