//! Step prompts.
//!
//! Pure rendering: each step maps to a prompt body plus keyboard rows of
//! labelled action tokens. The chat surface turns these into transport
//! messages without knowing anything about the transition table.

use crate::domain::alert::{Alert, FilterDraft};
use crate::schema::{
    self, ClientHireBucket, ExperienceLevel, FixedPriceBucket, JobType, ProposalsBucket,
};
use crate::wizard::actions;
use crate::wizard::states::{FilterField, Step, WizardAction};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PromptOption {
    pub label: String,
    pub token: String,
}

impl PromptOption {
    fn new(label: impl Into<String>, action: &WizardAction) -> Self {
        Self { label: label.into(), token: actions::encode(action) }
    }
}

/// What to present for a step: body text, button rows, and whether free
/// text typed in reply is meaningful at this step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Prompt {
    pub text: String,
    pub rows: Vec<Vec<PromptOption>>,
    pub expects_text: bool,
}

pub fn prompt_for(step: Step, draft: &FilterDraft) -> Prompt {
    match step {
        Step::MainMenu => main_menu(),
        Step::AlertMenu => alert_menu(draft),
        Step::AskExperience => ask_experience(draft),
        Step::AskCategory => ask_category(),
        Step::AskJobType => ask_job_type(),
        Step::AskAmount => ask_amount(draft),
        Step::AskClientHistory => ask_client_history(),
        Step::AskContractToHire => yes_no_prompt(
            "Only contract-to-hire jobs?",
            WizardAction::PickContractToHire(true),
            WizardAction::PickContractToHire(false),
        ),
        Step::AskPaymentVerification => yes_no_prompt(
            "Only clients with a verified payment method?",
            WizardAction::PickPaymentVerified(true),
            WizardAction::PickPaymentVerified(false),
        ),
        Step::AskProposals => ask_proposals(),
        Step::AskKeywords => ask_keywords(),
        Step::Confirm => confirm(draft),
    }
}

/// The list shown in response to "my alerts". Read-only, so the only
/// buttons are the main-menu ones.
pub fn alert_list(alerts: &[Alert]) -> Prompt {
    let text = if alerts.is_empty() {
        "You have no saved alerts yet.".to_owned()
    } else {
        let mut lines = vec![format!("You have {} saved alert(s):", alerts.len())];
        for (index, alert) in alerts.iter().enumerate() {
            lines.push(format!("{}. {}", index + 1, describe_filters(&alert.filters)));
        }
        lines.join("\n")
    };

    Prompt { text, rows: main_menu().rows, expects_text: false }
}

/// One delete button per saved alert, plus a way back out.
pub fn delete_menu(alerts: &[Alert]) -> Prompt {
    if alerts.is_empty() {
        return Prompt {
            text: "You have no alerts to delete.".to_owned(),
            rows: main_menu().rows,
            expects_text: false,
        };
    }

    let mut rows: Vec<Vec<PromptOption>> = alerts
        .iter()
        .enumerate()
        .map(|(index, alert)| {
            vec![PromptOption::new(
                format!("Delete #{}: {}", index + 1, describe_filters(&alert.filters)),
                &WizardAction::DeleteAlert(alert.id.0.clone()),
            )]
        })
        .collect();
    rows.push(vec![PromptOption::new("Cancel", &WizardAction::Cancel)]);

    Prompt { text: "Pick an alert to delete:".to_owned(), rows, expects_text: false }
}

/// Short single-line rendering of a saved filter set, for lists and
/// delete menus.
pub fn describe_filters(filters: &FilterDraft) -> String {
    let mut parts = Vec::new();
    if let Some(keywords) = &filters.keywords {
        parts.push(format!("\"{keywords}\""));
    }
    if let Some(category) = &filters.category {
        parts.push(schema::category_label(category).unwrap_or("Unknown category").to_owned());
    }
    if let Some(job_type) = &filters.job_type {
        parts.push(job_type.label().to_owned());
    }
    if let Some(amount) = &filters.amount_range {
        parts.push(format!("${amount}"));
    }
    if parts.is_empty() {
        "all jobs".to_owned()
    } else {
        parts.join(", ")
    }
}

fn main_menu() -> Prompt {
    Prompt {
        text: "What would you like to do?".to_owned(),
        rows: vec![
            vec![PromptOption::new("New alert", &WizardAction::NewAlert)],
            vec![PromptOption::new("My alerts", &WizardAction::ListAlerts)],
            vec![PromptOption::new("Delete an alert", &WizardAction::DeleteAlertMenu)],
        ],
        expects_text: false,
    }
}

fn alert_menu(draft: &FilterDraft) -> Prompt {
    let mut rows: Vec<Vec<PromptOption>> = FilterField::ALL
        .iter()
        .map(|field| vec![PromptOption::new(field_label(field, draft), &WizardAction::Configure(*field))])
        .collect();
    rows.push(vec![
        PromptOption::new("Save alert", &WizardAction::Confirm),
        PromptOption::new("Cancel", &WizardAction::Cancel),
    ]);

    Prompt {
        text: "Configure your job alert:".to_owned(),
        rows,
        expects_text: false,
    }
}

fn field_label(field: &FilterField, draft: &FilterDraft) -> String {
    let (name, set) = match field {
        FilterField::Experience => ("Experience level", !draft.experience_levels.is_empty()),
        FilterField::Category => ("Category", draft.category.is_some()),
        FilterField::JobType => ("Job type", draft.job_type.is_some()),
        FilterField::Amount => ("Amount", draft.amount_range.is_some()),
        FilterField::ClientHistory => ("Client hire history", draft.client_hires.is_some()),
        FilterField::ContractToHire => ("Contract to hire", draft.contract_to_hire.is_some()),
        FilterField::PaymentVerification => {
            ("Payment verified", draft.payment_verified.is_some())
        }
        FilterField::Proposals => ("Number of proposals", draft.proposals.is_some()),
        FilterField::Keywords => ("Keywords", draft.keywords.is_some()),
    };

    if set {
        format!("{name} ✅")
    } else {
        name.to_owned()
    }
}

fn ask_experience(draft: &FilterDraft) -> Prompt {
    let mut rows: Vec<Vec<PromptOption>> = ExperienceLevel::ALL
        .iter()
        .map(|level| {
            let label = if draft.experience_levels.contains(level) {
                format!("{} ✅", level.label())
            } else {
                level.label().to_owned()
            };
            vec![PromptOption::new(label, &WizardAction::ToggleExperience(*level))]
        })
        .collect();
    rows.push(vec![PromptOption::new("Done", &WizardAction::Back)]);

    Prompt {
        text: "Select one or more experience levels:".to_owned(),
        rows,
        expects_text: false,
    }
}

fn ask_category() -> Prompt {
    let mut rows: Vec<Vec<PromptOption>> = schema::CATEGORIES
        .iter()
        .map(|(id, label)| {
            vec![PromptOption::new(*label, &WizardAction::PickCategory((*id).to_owned()))]
        })
        .collect();
    rows.push(vec![PromptOption::new("Back", &WizardAction::Back)]);

    Prompt { text: "Select a category:".to_owned(), rows, expects_text: false }
}

fn ask_job_type() -> Prompt {
    Prompt {
        text: "Select a job type:".to_owned(),
        rows: vec![
            vec![
                PromptOption::new(JobType::Hourly.label(), &WizardAction::PickJobType(JobType::Hourly)),
                PromptOption::new(JobType::Fixed.label(), &WizardAction::PickJobType(JobType::Fixed)),
            ],
            vec![PromptOption::new("Back", &WizardAction::Back)],
        ],
        expects_text: false,
    }
}

fn ask_amount(draft: &FilterDraft) -> Prompt {
    match draft.job_type {
        Some(JobType::Fixed) => {
            let mut rows: Vec<Vec<PromptOption>> = FixedPriceBucket::ALL
                .iter()
                .map(|bucket| {
                    vec![PromptOption::new(bucket.label(), &WizardAction::PickFixedBucket(*bucket))]
                })
                .collect();
            rows.push(vec![PromptOption::new("Back", &WizardAction::Back)]);
            Prompt { text: "Select a budget range:".to_owned(), rows, expects_text: false }
        }
        _ => Prompt {
            text: "Type your hourly rate range as min-max, e.g. 10-20:".to_owned(),
            rows: vec![vec![PromptOption::new("Back", &WizardAction::Back)]],
            expects_text: true,
        },
    }
}

fn ask_client_history() -> Prompt {
    let mut rows: Vec<Vec<PromptOption>> = ClientHireBucket::ALL
        .iter()
        .map(|bucket| {
            vec![PromptOption::new(bucket.label(), &WizardAction::PickClientHires(*bucket))]
        })
        .collect();
    rows.push(vec![PromptOption::new("Back", &WizardAction::Back)]);

    Prompt { text: "How many past hires should the client have?".to_owned(), rows, expects_text: false }
}

fn ask_proposals() -> Prompt {
    let mut rows: Vec<Vec<PromptOption>> = ProposalsBucket::ALL
        .iter()
        .map(|bucket| {
            vec![PromptOption::new(bucket.label(), &WizardAction::PickProposals(*bucket))]
        })
        .collect();
    rows.push(vec![PromptOption::new("Back", &WizardAction::Back)]);

    Prompt {
        text: "How many proposals should the posting have?".to_owned(),
        rows,
        expects_text: false,
    }
}

fn ask_keywords() -> Prompt {
    Prompt {
        text: "Type the keywords to search for:".to_owned(),
        rows: vec![vec![PromptOption::new("Back", &WizardAction::Back)]],
        expects_text: true,
    }
}

fn yes_no_prompt(text: &str, yes: WizardAction, no: WizardAction) -> Prompt {
    Prompt {
        text: text.to_owned(),
        rows: vec![
            vec![PromptOption::new("Yes", &yes), PromptOption::new("No", &no)],
            vec![PromptOption::new("Back", &WizardAction::Back)],
        ],
        expects_text: false,
    }
}

fn confirm(draft: &FilterDraft) -> Prompt {
    Prompt {
        text: format!("Save this alert?\n\n{}", summary(draft)),
        rows: vec![vec![
            PromptOption::new("Save", &WizardAction::ConfirmSave),
            PromptOption::new("Back", &WizardAction::Back),
            PromptOption::new("Cancel", &WizardAction::Cancel),
        ]],
        expects_text: false,
    }
}

/// Multi-line summary shown on the confirm step. Only set fields appear.
pub fn summary(draft: &FilterDraft) -> String {
    let mut lines = Vec::new();

    if !draft.experience_levels.is_empty() {
        let levels: Vec<&str> =
            draft.experience_levels.iter().map(ExperienceLevel::label).collect();
        lines.push(format!("Experience: {}", levels.join(", ")));
    }
    if let Some(category) = &draft.category {
        lines.push(format!(
            "Category: {}",
            schema::category_label(category).unwrap_or("Unknown category")
        ));
    }
    if let Some(job_type) = &draft.job_type {
        lines.push(format!("Job type: {}", job_type.label()));
    }
    if let Some(amount) = &draft.amount_range {
        lines.push(format!("Amount: ${amount}"));
    }
    if let Some(bucket) = &draft.client_hires {
        lines.push(format!("Client hires: {}", bucket.label()));
    }
    if let Some(flag) = &draft.contract_to_hire {
        lines.push(format!("Contract to hire: {}", if *flag { "Yes" } else { "No" }));
    }
    if let Some(flag) = &draft.payment_verified {
        lines.push(format!("Payment verified: {}", if *flag { "Yes" } else { "No" }));
    }
    if let Some(bucket) = &draft.proposals {
        lines.push(format!("Proposals: {}", bucket.label()));
    }
    if let Some(keywords) = &draft.keywords {
        lines.push(format!("Keywords: {keywords}"));
    }

    if lines.is_empty() {
        "No filters set. The alert will match every job.".to_owned()
    } else {
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::{alert_list, delete_menu, prompt_for, summary};
    use crate::domain::alert::{Alert, AlertId, FilterDraft, UserId};
    use crate::schema::{ExperienceLevel, JobType};
    use crate::wizard::states::Step;
    use chrono::Utc;

    fn alert_with(filters: FilterDraft) -> Alert {
        Alert {
            id: AlertId("alert-1".to_owned()),
            user_id: UserId("u-1".to_owned()),
            filters,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn main_menu_offers_the_three_entry_actions() {
        let prompt = prompt_for(Step::MainMenu, &FilterDraft::default());
        let tokens: Vec<&str> =
            prompt.rows.iter().flatten().map(|option| option.token.as_str()).collect();
        assert_eq!(tokens, ["menu_new_alert", "menu_list_alerts", "menu_delete_alert"]);
        assert!(!prompt.expects_text);
    }

    #[test]
    fn category_prompt_lists_all_twelve_categories_plus_back() {
        let prompt = prompt_for(Step::AskCategory, &FilterDraft::default());
        assert_eq!(prompt.rows.len(), 13);
        let last = prompt.rows.last().and_then(|row| row.first()).expect("back row");
        assert_eq!(last.token, "alert_menu");
    }

    #[test]
    fn amount_prompt_depends_on_job_type() {
        let mut hourly = FilterDraft::default();
        hourly.job_type = Some(JobType::Hourly);
        let prompt = prompt_for(Step::AskAmount, &hourly);
        assert!(prompt.expects_text);

        let mut fixed = FilterDraft::default();
        fixed.job_type = Some(JobType::Fixed);
        let prompt = prompt_for(Step::AskAmount, &fixed);
        assert!(!prompt.expects_text);
        assert_eq!(prompt.rows.len(), 6, "five buckets plus back");
    }

    #[test]
    fn experience_prompt_marks_selected_levels() {
        let mut draft = FilterDraft::default();
        draft.toggle_experience(ExperienceLevel::Expert);

        let prompt = prompt_for(Step::AskExperience, &draft);
        let labels: Vec<&str> =
            prompt.rows.iter().flatten().map(|option| option.label.as_str()).collect();
        assert!(labels.contains(&"Expert ✅"));
        assert!(labels.contains(&"Entry Level"));
    }

    #[test]
    fn summary_renders_only_set_fields() {
        let mut draft = FilterDraft::default();
        draft.category = Some("531770282580668419".to_owned());
        draft.job_type = Some(JobType::Fixed);

        let text = summary(&draft);
        assert_eq!(text, "Category: IT & Networking\nJob type: Fixed Price");

        assert_eq!(
            summary(&FilterDraft::default()),
            "No filters set. The alert will match every job."
        );
    }

    #[test]
    fn delete_menu_has_one_button_per_alert() {
        let alerts = vec![alert_with(FilterDraft::default())];
        let prompt = delete_menu(&alerts);
        assert_eq!(prompt.rows.len(), 2, "one alert plus cancel");
        assert_eq!(prompt.rows[0][0].token, "delete_alert-1");

        let empty = delete_menu(&[]);
        assert!(empty.text.contains("no alerts"));
    }

    #[test]
    fn alert_list_describes_saved_filters() {
        let mut filters = FilterDraft::default();
        filters.keywords = Some("rust".to_owned());
        filters.job_type = Some(JobType::Hourly);

        let prompt = alert_list(&[alert_with(filters)]);
        assert!(prompt.text.contains("1. \"rust\", Hourly"));
    }
}
