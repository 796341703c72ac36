//! Input validation.
//!
//! Raw input arrives as loosely-typed JSON. Team and deliverable entries may be
//! bare strings or objects carrying an optional capacity/size. Every rejection
//! names the exact field path (`team[2].capacity`, `deliverables`, ...).

use crate::core::{DeliverableEntry, DeliverableSize, ProjectRequest, TeamEntry};
use crate::{Error, Result};
use chrono::NaiveDate;
use serde_json::{Map, Value};
use std::collections::HashSet;
use tracing::debug;

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

/// Parse JSON text and validate it into a `ProjectRequest`.
///
/// Malformed JSON surfaces as `Error::Json`; structurally wrong JSON as
/// `Error::Validation` with the offending field.
pub fn parse_request(json: &str) -> Result<ProjectRequest> {
    let raw: Value = serde_json::from_str(json)?;
    validate(&raw)
}

/// Normalize and validate a raw request.
pub fn validate(raw: &Value) -> Result<ProjectRequest> {
    let obj = raw
        .as_object()
        .ok_or_else(|| Error::validation("request", "must be a JSON object"))?;

    let objective = required_text(obj, "objective")?;
    let team = team_entries(obj)?;
    let deliverables = deliverable_entries(obj)?;
    let project_type = optional_text(obj, "project_type")?;
    let industry = optional_text(obj, "industry")?;
    let project_start_date = optional_date(obj, "project_start_date")?;

    debug!(
        team = team.len(),
        deliverables = deliverables.len(),
        "validated project request"
    );

    Ok(ProjectRequest {
        objective,
        team,
        deliverables,
        project_type,
        industry,
        project_start_date,
    })
}

fn required_text(obj: &Map<String, Value>, field: &str) -> Result<String> {
    match obj.get(field) {
        None | Some(Value::Null) => Err(Error::validation(field, "is required")),
        Some(value) => non_empty_text(value, field),
    }
}

fn optional_text(obj: &Map<String, Value>, field: &str) -> Result<Option<String>> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
        }
        Some(_) => Err(Error::validation(field, "must be a string")),
    }
}

fn optional_date(obj: &Map<String, Value>, field: &str) -> Result<Option<NaiveDate>> {
    let Some(text) = optional_text(obj, field)? else {
        return Ok(None);
    };
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(&text, fmt).ok())
        .map(Some)
        .ok_or_else(|| Error::validation(field, format!("unrecognized date {:?}, expected YYYY-MM-DD", text)))
}

fn non_empty_text(value: &Value, field: &str) -> Result<String> {
    let s = value
        .as_str()
        .ok_or_else(|| Error::validation(field, "must be a string"))?;
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(Error::validation(field, "must not be empty"));
    }
    Ok(trimmed.to_string())
}

fn entries<'a>(obj: &'a Map<String, Value>, field: &str, noun: &str) -> Result<&'a Vec<Value>> {
    let list = match obj.get(field) {
        None | Some(Value::Null) => return Err(Error::validation(field, "is required")),
        Some(value) => value
            .as_array()
            .ok_or_else(|| Error::validation(field, "must be a list"))?,
    };
    if list.is_empty() {
        return Err(Error::validation(field, format!("must list at least one {}", noun)));
    }
    Ok(list)
}

/// Split an entry into its name and, for object entries, the remaining fields.
fn entry_name<'a>(value: &'a Value, field: &str) -> Result<(String, Option<&'a Map<String, Value>>)> {
    match value {
        Value::String(_) => Ok((non_empty_text(value, field)?, None)),
        Value::Object(map) => {
            let name_field = format!("{}.name", field);
            let name = map
                .get("name")
                .ok_or_else(|| Error::validation(&name_field, "is required"))?;
            Ok((non_empty_text(name, &name_field)?, Some(map)))
        }
        _ => Err(Error::validation(field, "must be a string or an object with a name")),
    }
}

fn team_entries(obj: &Map<String, Value>) -> Result<Vec<TeamEntry>> {
    let mut seen = HashSet::new();
    let mut team = Vec::new();

    for (i, value) in entries(obj, "team", "team member")?.iter().enumerate() {
        let field = format!("team[{}]", i);
        let (name, extra) = entry_name(value, &field)?;

        let capacity = match extra.and_then(|m| m.get("capacity")) {
            None | Some(Value::Null) => 1.0,
            Some(value) => {
                let capacity_field = format!("{}.capacity", field);
                let capacity = value
                    .as_f64()
                    .ok_or_else(|| Error::validation(&capacity_field, "must be a number"))?;
                if !(capacity.is_finite() && capacity > 0.0) {
                    return Err(Error::validation(&capacity_field, "must be greater than zero"));
                }
                capacity
            }
        };

        if seen.insert(name.to_lowercase()) {
            team.push(TeamEntry { name, capacity });
        } else {
            debug!(member = %name, "dropping duplicate team member");
        }
    }
    Ok(team)
}

fn deliverable_entries(obj: &Map<String, Value>) -> Result<Vec<DeliverableEntry>> {
    let mut seen = HashSet::new();
    let mut deliverables = Vec::new();

    for (i, value) in entries(obj, "deliverables", "deliverable")?.iter().enumerate() {
        let field = format!("deliverables[{}]", i);
        let (name, extra) = entry_name(value, &field)?;

        let size = match extra.and_then(|m| m.get("size")) {
            None | Some(Value::Null) => None,
            Some(value) => {
                let size_field = format!("{}.size", field);
                let text = value
                    .as_str()
                    .ok_or_else(|| Error::validation(&size_field, "must be a string"))?;
                let size = DeliverableSize::parse(text).ok_or_else(|| {
                    Error::validation(&size_field, format!("unknown size {:?}, expected small, medium or large", text))
                })?;
                Some(size)
            }
        };

        if seen.insert(name.to_lowercase()) {
            deliverables.push(DeliverableEntry { name, size });
        } else {
            debug!(deliverable = %name, "dropping duplicate deliverable");
        }
    }
    Ok(deliverables)
}
