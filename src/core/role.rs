//! Roles, role lookup rules, and team members.

use serde::{Deserialize, Serialize};

/// Capability set a team member is eligible to perform.
///
/// Serialized as a snake_case string for the built-in roles and as
/// `{ "custom": "<label>" }` for everything else.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Pm,
    Copywriter,
    Designer,
    SeoAnalyst,
    Custom(String),
}

impl Role {
    /// Whether a member holding `self` can take a step requiring `required`.
    ///
    /// Custom labels compare case-insensitively.
    pub fn satisfies(&self, required: &Role) -> bool {
        match (self, required) {
            (Role::Custom(have), Role::Custom(want)) => have.to_lowercase() == want.to_lowercase(),
            _ => self == required,
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, Role::Custom(_))
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Pm => write!(f, "PM"),
            Role::Copywriter => write!(f, "Copywriter"),
            Role::Designer => write!(f, "Designer"),
            Role::SeoAnalyst => write!(f, "SEO Analyst"),
            Role::Custom(label) => write!(f, "{}", label),
        }
    }
}

/// One entry of the role lookup table: names containing `label` map to `role`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleRule {
    pub label: String,
    pub role: Role,
}

impl RoleRule {
    pub fn new(label: &str, role: Role) -> Self {
        Self {
            label: label.to_string(),
            role,
        }
    }
}

/// A declared team member with its assigned role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamMember {
    /// Unique key within the team.
    pub name: String,
    pub role: Role,
    /// Relative share of tasks in load balancing; 2.0 receives twice as many as 1.0.
    pub capacity: f64,
}
