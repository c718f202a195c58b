use thiserror::Error;

use crate::domain::alert::FilterDraft;
use crate::schema::{self, JobType};
use crate::wizard::states::{
    FilterField, Step, Transition, WizardAction, WizardCommand, WizardInput,
};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum WizardError {
    /// The input is not in the current step's legal action set. The draft
    /// must not be mutated; the caller re-prompts the current step.
    #[error("input {input:?} is not legal at step {step:?}")]
    InvalidTransition { step: Step, input: WizardInput },
    /// The input belongs to this step but carries a malformed value. The
    /// caller re-prompts the same step with the message as a notice.
    #[error("{0}")]
    Validation(String),
}

/// Applies one inbound interaction to the wizard. Pure: reads the draft,
/// returns the next step plus the updated draft and any side-effect command.
/// All I/O (store calls, session destruction) is the caller's job.
pub fn apply(
    current: Step,
    draft: &FilterDraft,
    input: &WizardInput,
) -> Result<Transition, WizardError> {
    use Step::*;
    use WizardAction::*;

    // Cancel is legal from every non-idle step and never saves anything.
    if matches!(input, WizardInput::Action(Cancel)) {
        return Ok(Transition {
            from: current,
            to: MainMenu,
            draft: draft.clone(),
            command: Some(WizardCommand::EndSession),
        });
    }

    // Back returns to the alert menu from any ask step (and from the
    // confirm summary) without touching the draft.
    if matches!(input, WizardInput::Action(Back)) && current != MainMenu && current != AlertMenu {
        return Ok(stay_silent(current, AlertMenu, draft));
    }

    let (to, draft, command) = match (current, input) {
        (MainMenu, WizardInput::Action(NewAlert)) => {
            (AlertMenu, FilterDraft::default(), None)
        }
        (MainMenu, WizardInput::Action(ListAlerts)) => {
            (MainMenu, draft.clone(), Some(WizardCommand::ListAlerts))
        }
        (MainMenu, WizardInput::Action(DeleteAlertMenu)) => {
            (MainMenu, draft.clone(), Some(WizardCommand::ShowDeleteMenu))
        }
        (MainMenu, WizardInput::Action(DeleteAlert(alert_id))) => {
            (MainMenu, draft.clone(), Some(WizardCommand::DeleteAlert(alert_id.clone())))
        }

        (AlertMenu, WizardInput::Action(Configure(field))) => {
            if *field == FilterField::Amount && draft.job_type.is_none() {
                return Err(WizardError::Validation(
                    "Select a job type before setting an amount range.".to_owned(),
                ));
            }
            (field.ask_step(), draft.clone(), None)
        }
        // `Confirm` must stay qualified: both glob imports export that name.
        (AlertMenu, WizardInput::Action(WizardAction::Confirm)) => {
            (Step::Confirm, draft.clone(), None)
        }

        (AskExperience, WizardInput::Action(ToggleExperience(level))) => {
            let mut next = draft.clone();
            next.toggle_experience(*level);
            // Multi-select: stay on the step so more levels can be added.
            (AskExperience, next, None)
        }

        (AskCategory, WizardInput::Action(PickCategory(category_id))) => {
            if !schema::is_known_category(category_id) {
                return Err(WizardError::Validation(format!(
                    "Unknown category id `{category_id}`."
                )));
            }
            let mut next = draft.clone();
            next.category = Some(category_id.clone());
            (AlertMenu, next, None)
        }

        (AskJobType, WizardInput::Action(PickJobType(job_type))) => {
            let mut next = draft.clone();
            next.job_type = Some(*job_type);
            // The amount sub-flow follows directly so the user is not sent
            // back to the menu between the two related choices.
            (AskAmount, next, None)
        }

        (AskAmount, WizardInput::Action(PickFixedBucket(bucket))) => {
            if draft.job_type != Some(JobType::Fixed) {
                return Err(invalid(current, input));
            }
            let mut next = draft.clone();
            next.set_fixed_bucket(*bucket);
            (AlertMenu, next, None)
        }
        (AskAmount, WizardInput::Text(text)) => {
            if draft.job_type != Some(JobType::Hourly) {
                return Err(invalid(current, input));
            }
            let mut next = draft.clone();
            next.amount_range = Some(parse_hourly_range(text)?);
            (AlertMenu, next, None)
        }

        (AskClientHistory, WizardInput::Action(PickClientHires(bucket))) => {
            let mut next = draft.clone();
            next.client_hires = Some(*bucket);
            (AlertMenu, next, None)
        }
        (AskContractToHire, WizardInput::Action(PickContractToHire(flag))) => {
            let mut next = draft.clone();
            next.contract_to_hire = Some(*flag);
            (AlertMenu, next, None)
        }
        (AskPaymentVerification, WizardInput::Action(PickPaymentVerified(flag))) => {
            let mut next = draft.clone();
            next.payment_verified = Some(*flag);
            (AlertMenu, next, None)
        }
        (AskProposals, WizardInput::Action(PickProposals(bucket))) => {
            let mut next = draft.clone();
            next.proposals = Some(*bucket);
            (AlertMenu, next, None)
        }

        (AskKeywords, WizardInput::Text(text)) => {
            let keywords = text.trim();
            if keywords.is_empty() {
                return Err(WizardError::Validation(
                    "Keywords cannot be empty. Type a few words or go back.".to_owned(),
                ));
            }
            let mut next = draft.clone();
            next.keywords = Some(keywords.to_owned());
            (AlertMenu, next, None)
        }

        (Step::Confirm, WizardInput::Action(ConfirmSave)) => {
            (MainMenu, draft.clone(), Some(WizardCommand::SaveAlert))
        }

        _ => return Err(invalid(current, input)),
    };

    Ok(Transition { from: current, to, draft, command })
}

/// Validates a free-form hourly range: `min-max`, both non-negative
/// integers, `min <= max`. Returns the normalized `min-max` string.
pub fn parse_hourly_range(text: &str) -> Result<String, WizardError> {
    let malformed = || {
        WizardError::Validation(
            "Enter the hourly rate as `min-max`, e.g. 10-20.".to_owned(),
        )
    };

    let (raw_min, raw_max) = text.trim().split_once('-').ok_or_else(malformed)?;
    let min: u32 = raw_min.trim().parse().map_err(|_| malformed())?;
    let max: u32 = raw_max.trim().parse().map_err(|_| malformed())?;

    if min > max {
        return Err(WizardError::Validation(format!(
            "The minimum rate ({min}) cannot exceed the maximum ({max})."
        )));
    }

    Ok(format!("{min}-{max}"))
}

fn stay_silent(from: Step, to: Step, draft: &FilterDraft) -> Transition {
    Transition { from, to, draft: draft.clone(), command: None }
}

fn invalid(step: Step, input: &WizardInput) -> WizardError {
    WizardError::InvalidTransition { step, input: input.clone() }
}
