//! Canonical, validated project request.
//!
//! Instances are produced by the validator; every string is trimmed and
//! non-empty, and team/deliverable names are unique case-insensitively.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Declared size of a deliverable, scaling its estimates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliverableSize {
    Small,
    Medium,
    Large,
}

impl DeliverableSize {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "small" | "s" => Some(Self::Small),
            "medium" | "m" => Some(Self::Medium),
            "large" | "l" => Some(Self::Large),
            _ => None,
        }
    }
}

impl std::fmt::Display for DeliverableSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeliverableSize::Small => write!(f, "small"),
            DeliverableSize::Medium => write!(f, "medium"),
            DeliverableSize::Large => write!(f, "large"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamEntry {
    pub name: String,
    pub capacity: f64,
}

impl TeamEntry {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            capacity: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliverableEntry {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<DeliverableSize>,
}

impl DeliverableEntry {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            size: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectRequest {
    pub objective: String,
    pub team: Vec<TeamEntry>,
    pub deliverables: Vec<DeliverableEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_start_date: Option<NaiveDate>,
}

impl ProjectRequest {
    pub fn team_names(&self) -> Vec<&str> {
        self.team.iter().map(|m| m.name.as_str()).collect()
    }

    pub fn deliverable_names(&self) -> Vec<&str> {
        self.deliverables.iter().map(|d| d.name.as_str()).collect()
    }
}
