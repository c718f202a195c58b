//! Action token grammar.
//!
//! Buttons carry opaque string tokens back through the chat transport.
//! Encoding and parsing live side by side so the rendered keyboards and the
//! inbound router can never disagree about the grammar.

use crate::schema::{
    ClientHireBucket, ExperienceLevel, FixedPriceBucket, JobType, ProposalsBucket,
};
use crate::wizard::states::{FilterField, WizardAction};

const MENU_NEW_ALERT: &str = "menu_new_alert";
const MENU_LIST_ALERTS: &str = "menu_list_alerts";
const MENU_DELETE_ALERT: &str = "menu_delete_alert";
const ALERT_MENU: &str = "alert_menu";
const CONFIRM_ALERT: &str = "confirm_alert";
const SAVE_ALERT: &str = "save_alert";
const CANCEL_ALERT: &str = "cancel_alert";

const SET_PREFIX: &str = "set_";
const EXPERIENCE_PREFIX: &str = "experience_";
const CATEGORY_PREFIX: &str = "category_";
const JOBTYPE_PREFIX: &str = "jobtype_";
const AMOUNT_PREFIX: &str = "amount_";
const CLIENT_HIRES_PREFIX: &str = "client_hires_";
const CONTRACT_TO_HIRE_PREFIX: &str = "contract_to_hire_";
const PAYMENT_VERIFIED_PREFIX: &str = "payment_verified_";
const PROPOSALS_PREFIX: &str = "proposals_";
const DELETE_PREFIX: &str = "delete_";

impl FilterField {
    fn set_suffix(&self) -> &'static str {
        match self {
            Self::Experience => "experience",
            Self::Category => "category",
            Self::JobType => "jobtype",
            Self::Amount => "amount",
            Self::ClientHistory => "client_hires",
            Self::ContractToHire => "contract_to_hire",
            Self::PaymentVerification => "payment_verified",
            Self::Proposals => "proposals",
            Self::Keywords => "keywords",
        }
    }

    fn from_set_suffix(suffix: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.set_suffix() == suffix)
    }
}

pub fn encode(action: &WizardAction) -> String {
    match action {
        WizardAction::NewAlert => MENU_NEW_ALERT.to_owned(),
        WizardAction::ListAlerts => MENU_LIST_ALERTS.to_owned(),
        WizardAction::DeleteAlertMenu => MENU_DELETE_ALERT.to_owned(),
        WizardAction::DeleteAlert(alert_id) => format!("{DELETE_PREFIX}{alert_id}"),
        WizardAction::Configure(field) => format!("{SET_PREFIX}{}", field.set_suffix()),
        WizardAction::ToggleExperience(level) => {
            format!("{EXPERIENCE_PREFIX}{}", level.wire())
        }
        WizardAction::PickCategory(category_id) => format!("{CATEGORY_PREFIX}{category_id}"),
        WizardAction::PickJobType(job_type) => format!("{JOBTYPE_PREFIX}{}", job_type.wire()),
        WizardAction::PickFixedBucket(bucket) => format!("{AMOUNT_PREFIX}{}", bucket.wire()),
        WizardAction::PickClientHires(bucket) => {
            format!("{CLIENT_HIRES_PREFIX}{}", bucket.wire())
        }
        WizardAction::PickContractToHire(flag) => {
            format!("{CONTRACT_TO_HIRE_PREFIX}{}", yes_no(*flag))
        }
        WizardAction::PickPaymentVerified(flag) => {
            format!("{PAYMENT_VERIFIED_PREFIX}{}", yes_no(*flag))
        }
        WizardAction::PickProposals(bucket) => format!("{PROPOSALS_PREFIX}{}", bucket.wire()),
        WizardAction::Back => ALERT_MENU.to_owned(),
        WizardAction::Confirm => CONFIRM_ALERT.to_owned(),
        WizardAction::ConfirmSave => SAVE_ALERT.to_owned(),
        WizardAction::Cancel => CANCEL_ALERT.to_owned(),
    }
}

/// Classifies a raw token. `None` means the token is outside the grammar;
/// the caller logs and drops it without touching any session.
pub fn parse(token: &str) -> Option<WizardAction> {
    match token {
        MENU_NEW_ALERT => return Some(WizardAction::NewAlert),
        MENU_LIST_ALERTS => return Some(WizardAction::ListAlerts),
        MENU_DELETE_ALERT => return Some(WizardAction::DeleteAlertMenu),
        ALERT_MENU => return Some(WizardAction::Back),
        CONFIRM_ALERT => return Some(WizardAction::Confirm),
        SAVE_ALERT => return Some(WizardAction::ConfirmSave),
        CANCEL_ALERT => return Some(WizardAction::Cancel),
        _ => {}
    }

    // Longer prefixes first: `contract_to_hire_` and `payment_verified_`
    // would otherwise never collide, but keep the order explicit anyway.
    if let Some(value) = token.strip_prefix(CONTRACT_TO_HIRE_PREFIX) {
        return parse_yes_no(value).map(WizardAction::PickContractToHire);
    }
    if let Some(value) = token.strip_prefix(PAYMENT_VERIFIED_PREFIX) {
        return parse_yes_no(value).map(WizardAction::PickPaymentVerified);
    }
    if let Some(value) = token.strip_prefix(CLIENT_HIRES_PREFIX) {
        return ClientHireBucket::parse_wire(value).map(WizardAction::PickClientHires);
    }
    if let Some(value) = token.strip_prefix(EXPERIENCE_PREFIX) {
        return ExperienceLevel::parse_wire(value).map(WizardAction::ToggleExperience);
    }
    if let Some(value) = token.strip_prefix(CATEGORY_PREFIX) {
        if value.is_empty() {
            return None;
        }
        return Some(WizardAction::PickCategory(value.to_owned()));
    }
    if let Some(value) = token.strip_prefix(JOBTYPE_PREFIX) {
        return JobType::parse_wire(value).map(WizardAction::PickJobType);
    }
    if let Some(value) = token.strip_prefix(AMOUNT_PREFIX) {
        return FixedPriceBucket::parse_wire(value).map(WizardAction::PickFixedBucket);
    }
    if let Some(value) = token.strip_prefix(PROPOSALS_PREFIX) {
        return ProposalsBucket::parse_wire(value).map(WizardAction::PickProposals);
    }
    if let Some(value) = token.strip_prefix(DELETE_PREFIX) {
        if value.is_empty() {
            return None;
        }
        return Some(WizardAction::DeleteAlert(value.to_owned()));
    }
    if let Some(value) = token.strip_prefix(SET_PREFIX) {
        return FilterField::from_set_suffix(value).map(WizardAction::Configure);
    }

    None
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

fn parse_yes_no(value: &str) -> Option<bool> {
    match value {
        "yes" => Some(true),
        "no" => Some(false),
        _ => None,
    }
}
