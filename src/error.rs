use thiserror::Error;

use crate::core::TaskId;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Validation error in `{field}`: {reason}")]
    Validation { field: String, reason: String },

    #[error("Role table error for label {label:?}: {reason}")]
    RoleAssignment { label: String, reason: String },

    #[error("No team member can perform {kind} for deliverable {deliverable:?} (requires {capability})")]
    NoEligibleAssignee {
        deliverable: String,
        kind: String,
        capability: String,
    },

    #[error("Dependency cycle detected among tasks: {}", join_ids(.tasks))]
    Cycle { tasks: Vec<TaskId> },

    #[error("Missing or invalid configuration: {key}")]
    Configuration { key: String },

    #[error("Task {task} is assigned to unknown team member {assignee:?}")]
    Assembly { task: TaskId, assignee: String },

    #[error("Task {task} lists unknown prerequisite {prerequisite}")]
    UnknownPrerequisite { task: TaskId, prerequisite: TaskId },

    #[error("No home directory")]
    NoHomeDir,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl Error {
    pub(crate) fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn configuration(key: impl Into<String>) -> Self {
        Error::Configuration { key: key.into() }
    }

    /// Short machine-readable name of the error kind, for callers that render errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Validation { .. } => "validation",
            Error::RoleAssignment { .. } => "role_assignment",
            Error::NoEligibleAssignee { .. } => "no_eligible_assignee",
            Error::Cycle { .. } => "cycle",
            Error::Configuration { .. } => "configuration",
            Error::Assembly { .. } => "assembly",
            Error::UnknownPrerequisite { .. } => "unknown_prerequisite",
            Error::NoHomeDir | Error::Io(_) => "io",
            Error::Json(_) => "json",
            Error::TomlParse(_) | Error::TomlSerialize(_) => "toml",
        }
    }
}

fn join_ids(ids: &[TaskId]) -> String {
    ids.iter()
        .map(|id| id.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, Error>;
