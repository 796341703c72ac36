//! Role assignment.
//!
//! Each team member's name is matched against the role lookup table by
//! case-insensitive substring. When several labels match, the longest label
//! wins, and equal lengths fall back to table order. Names matching nothing
//! become `Role::Custom(name)`.

use crate::core::{Role, RoleRule, TeamEntry, TeamMember};
use crate::{Error, Result};
use std::collections::HashSet;
use tracing::{debug, trace};

/// Reject role tables with empty or duplicate (case-insensitive) labels.
pub fn check_rules(rules: &[RoleRule]) -> Result<()> {
    let mut seen = HashSet::new();
    for rule in rules {
        let label = rule.label.trim().to_lowercase();
        if label.is_empty() {
            return Err(Error::RoleAssignment {
                label: rule.label.clone(),
                reason: "label must not be empty".to_string(),
            });
        }
        if !seen.insert(label) {
            return Err(Error::RoleAssignment {
                label: rule.label.clone(),
                reason: "duplicate label".to_string(),
            });
        }
    }
    Ok(())
}

/// Role for a single name under `rules`.
pub fn role_for(name: &str, rules: &[RoleRule]) -> Role {
    let haystack = name.to_lowercase();
    let mut best: Option<(usize, &RoleRule)> = None;

    for rule in rules {
        let label = rule.label.trim().to_lowercase();
        if !haystack.contains(&label) {
            continue;
        }
        let len = label.chars().count();
        if best.map_or(true, |(best_len, _)| len > best_len) {
            best = Some((len, rule));
        }
    }

    match best {
        Some((_, rule)) => {
            trace!(member = name, label = %rule.label, role = %rule.role, "matched role rule");
            rule.role.clone()
        }
        None => Role::Custom(name.to_string()),
    }
}

/// Map each declared team member to a role, preserving team order.
pub fn assign(team: &[TeamEntry], rules: &[RoleRule]) -> Result<Vec<TeamMember>> {
    check_rules(rules)?;

    let members: Vec<TeamMember> = team
        .iter()
        .map(|entry| TeamMember {
            name: entry.name.clone(),
            role: role_for(&entry.name, rules),
            capacity: entry.capacity,
        })
        .collect();

    debug!(
        members = members.len(),
        custom = members.iter().filter(|m| m.role.is_custom()).count(),
        "assigned roles"
    );
    Ok(members)
}
