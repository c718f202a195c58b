//! Closed filter vocabularies.
//!
//! Every enum here is a closed set: an inbound token naming a value outside
//! the set is malformed input and must be rejected, never silently accepted.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceLevel {
    Entry,
    Intermediate,
    Expert,
}

impl ExperienceLevel {
    pub const ALL: [Self; 3] = [Self::Entry, Self::Intermediate, Self::Expert];

    /// Wire value carried inside `experience_*` action tokens.
    pub fn wire(&self) -> &'static str {
        match self {
            Self::Entry => "1",
            Self::Intermediate => "2",
            Self::Expert => "3",
        }
    }

    pub fn parse_wire(value: &str) -> Option<Self> {
        match value {
            "1" => Some(Self::Entry),
            "2" => Some(Self::Intermediate),
            "3" => Some(Self::Expert),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Entry => "Entry Level",
            Self::Intermediate => "Intermediate",
            Self::Expert => "Expert",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobType {
    Hourly,
    Fixed,
}

impl JobType {
    pub fn wire(&self) -> &'static str {
        match self {
            Self::Hourly => "hourly",
            Self::Fixed => "fixed",
        }
    }

    pub fn parse_wire(value: &str) -> Option<Self> {
        match value {
            "hourly" => Some(Self::Hourly),
            "fixed" => Some(Self::Fixed),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Hourly => "Hourly",
            Self::Fixed => "Fixed Price",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FixedPriceBucket {
    #[serde(rename = "0-99")]
    Under100,
    #[serde(rename = "100-499")]
    From100To499,
    #[serde(rename = "500-999")]
    From500To999,
    #[serde(rename = "1000-4999")]
    From1kTo5k,
    #[serde(rename = "5000-")]
    Over5k,
}

impl FixedPriceBucket {
    pub const ALL: [Self; 5] =
        [Self::Under100, Self::From100To499, Self::From500To999, Self::From1kTo5k, Self::Over5k];

    pub fn wire(&self) -> &'static str {
        match self {
            Self::Under100 => "0-99",
            Self::From100To499 => "100-499",
            Self::From500To999 => "500-999",
            Self::From1kTo5k => "1000-4999",
            Self::Over5k => "5000-",
        }
    }

    pub fn parse_wire(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|bucket| bucket.wire() == value)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Under100 => "Less than $100",
            Self::From100To499 => "$100 to $500",
            Self::From500To999 => "$500 - $1K",
            Self::From1kTo5k => "$1K - $5K",
            Self::Over5k => "$5K+",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClientHireBucket {
    #[serde(rename = "0")]
    NoHires,
    #[serde(rename = "1-9")]
    OneToNine,
    #[serde(rename = "10+")]
    TenPlus,
}

impl ClientHireBucket {
    pub const ALL: [Self; 3] = [Self::NoHires, Self::OneToNine, Self::TenPlus];

    pub fn wire(&self) -> &'static str {
        match self {
            Self::NoHires => "0",
            Self::OneToNine => "1-9",
            Self::TenPlus => "10+",
        }
    }

    pub fn parse_wire(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|bucket| bucket.wire() == value)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::NoHires => "No hires",
            Self::OneToNine => "1 to 9 hires",
            Self::TenPlus => "10+ hires",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProposalsBucket {
    #[serde(rename = "0-4")]
    ZeroToFour,
    #[serde(rename = "5-9")]
    FiveToNine,
    #[serde(rename = "10+")]
    TenPlus,
}

impl ProposalsBucket {
    pub const ALL: [Self; 3] = [Self::ZeroToFour, Self::FiveToNine, Self::TenPlus];

    pub fn wire(&self) -> &'static str {
        match self {
            Self::ZeroToFour => "0-4",
            Self::FiveToNine => "5-9",
            Self::TenPlus => "10+",
        }
    }

    pub fn parse_wire(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|bucket| bucket.wire() == value)
    }

    pub fn label(&self) -> &'static str {
        self.wire()
    }
}

/// Externally assigned marketplace category ids, keyed id -> label.
/// The id space is owned by the upstream job board; treat it as opaque.
pub const CATEGORIES: [(&str, &str); 12] = [
    ("531770282584862721", "Accounting & Consulting"),
    ("531770282580668416", "Admin Support"),
    ("531770282580668417", "Customer Service"),
    ("531770282580668420", "Data Science & Analytics"),
    ("531770282580668421", "Design & Creative"),
    ("531770282584862722", "Engineering & Architecture"),
    ("531770282580668419", "IT & Networking"),
    ("531770282584862723", "Legal"),
    ("531770282580668422", "Sales & Marketing"),
    ("531770282584862720", "Translation"),
    ("531770282580668418", "Web, Mobile & Software Dev"),
    ("531770282580668423", "Writing"),
];

pub fn category_label(id: &str) -> Option<&'static str> {
    CATEGORIES.iter().find(|(candidate, _)| *candidate == id).map(|(_, label)| *label)
}

pub fn is_known_category(id: &str) -> bool {
    category_label(id).is_some()
}
