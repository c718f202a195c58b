use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::{
    ClientHireBucket, ExperienceLevel, FixedPriceBucket, JobType, ProposalsBucket,
};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AlertId(pub String);

impl AlertId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

/// The in-progress filter under construction for one user's wizard session.
///
/// Every field is independently optional; an all-empty draft is valid and
/// persistable. The serialized shape omits unset fields entirely.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterDraft {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub experience_levels: Vec<ExperienceLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_type: Option<JobType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount_range: Option<String>,
    #[serde(rename = "clientHireBucket", default, skip_serializing_if = "Option::is_none")]
    pub client_hires: Option<ClientHireBucket>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_to_hire: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_verified: Option<bool>,
    #[serde(rename = "proposalsBucket", default, skip_serializing_if = "Option::is_none")]
    pub proposals: Option<ProposalsBucket>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
}

impl FilterDraft {
    /// Idempotent multi-select add: repeat taps on a level already present
    /// leave the set unchanged.
    pub fn toggle_experience(&mut self, level: ExperienceLevel) {
        if !self.experience_levels.contains(&level) {
            self.experience_levels.push(level);
        }
    }

    pub fn set_fixed_bucket(&mut self, bucket: FixedPriceBucket) {
        self.amount_range = Some(bucket.wire().to_owned());
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// A saved alert. Immutable after creation except for deletion by id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub id: AlertId,
    pub user_id: UserId,
    pub filters: FilterDraft,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::FilterDraft;
    use crate::schema::{ExperienceLevel, FixedPriceBucket, JobType};

    #[test]
    fn experience_toggle_is_idempotent() {
        let mut draft = FilterDraft::default();
        draft.toggle_experience(ExperienceLevel::Entry);
        draft.toggle_experience(ExperienceLevel::Expert);
        draft.toggle_experience(ExperienceLevel::Entry);

        assert_eq!(
            draft.experience_levels,
            vec![ExperienceLevel::Entry, ExperienceLevel::Expert]
        );
    }

    #[test]
    fn empty_draft_serializes_to_empty_object() {
        let json = serde_json::to_value(FilterDraft::default()).expect("serialize draft");
        assert_eq!(json, serde_json::json!({}));
    }

    #[test]
    fn set_fields_serialize_with_camel_case_keys() {
        let mut draft = FilterDraft::default();
        draft.category = Some("531770282580668419".to_owned());
        draft.job_type = Some(JobType::Fixed);
        draft.set_fixed_bucket(FixedPriceBucket::From100To499);

        let json = serde_json::to_value(&draft).expect("serialize draft");
        assert_eq!(
            json,
            serde_json::json!({
                "category": "531770282580668419",
                "jobType": "fixed",
                "amountRange": "100-499",
            })
        );
    }

    #[test]
    fn draft_round_trips_through_json() {
        let mut draft = FilterDraft::default();
        draft.toggle_experience(ExperienceLevel::Intermediate);
        draft.job_type = Some(JobType::Hourly);
        draft.amount_range = Some("10-20".to_owned());
        draft.contract_to_hire = Some(true);
        draft.keywords = Some("rust backend".to_owned());

        let json = serde_json::to_string(&draft).expect("serialize draft");
        let decoded: FilterDraft = serde_json::from_str(&json).expect("deserialize draft");
        assert_eq!(decoded, draft);
    }
}
