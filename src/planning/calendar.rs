//! Calendar scheduling of sequenced tasks.
//!
//! Walks tasks in sequence order and gives each a start and end date. A task
//! spans `ceil(duration / hours_per_day)` calendar days (at least one) and
//! starts on the later of the day after its last prerequisite ends and the day
//! after its assignee's previous task ends.

use crate::config::DEFAULT_HOURS_PER_DAY;
use crate::core::{PlannedTask, TaskId};
use crate::{Error, Result};
use chrono::{Days, NaiveDate};
use std::collections::HashMap;
use tracing::debug;

/// Longest span a single task may occupy, roughly a century.
const MAX_SPAN_DAYS: f64 = 36_525.0;

/// Calendar days `task` occupies at `hours_per_day`.
///
/// An over-long span is blamed on the task's base rate when it is too long
/// even at a standard working day, and on `hours_per_day` otherwise.
fn span_days(task: &PlannedTask, hours_per_day: f64) -> Result<u64> {
    let days = (task.duration_hours / hours_per_day).ceil();
    if days.is_finite() && days <= MAX_SPAN_DAYS {
        return Ok((days as u64).max(1));
    }
    if task.duration_hours / DEFAULT_HOURS_PER_DAY > MAX_SPAN_DAYS {
        Err(Error::configuration(format!("rates.{}.hours", task.task.kind)))
    } else {
        Err(Error::configuration("hours_per_day"))
    }
}

fn add_days(date: NaiveDate, days: u64) -> Result<NaiveDate> {
    date.checked_add_days(Days::new(days)).ok_or_else(|| {
        Error::validation(
            "project_start_date",
            format!("schedule from {} runs past the last supported date", date),
        )
    })
}

/// Return copies of `tasks` with `start_date`/`end_date` filled in.
///
/// `tasks` must be in topological order.
///
/// # Errors
/// - `Configuration` if `hours_per_day` is not positive, or a task would span
///   more than a century
/// - `Validation` on `project_start_date` if the schedule leaves chrono's date range
/// - `UnknownPrerequisite` if a prerequisite was not scheduled before its dependent
pub fn schedule(tasks: &[PlannedTask], start: NaiveDate, hours_per_day: f64) -> Result<Vec<PlannedTask>> {
    if !(hours_per_day.is_finite() && hours_per_day > 0.0) {
        return Err(Error::configuration("hours_per_day"));
    }

    let mut ends: HashMap<&TaskId, NaiveDate> = HashMap::new();
    let mut busy_until: HashMap<&str, NaiveDate> = HashMap::new();
    let mut scheduled = Vec::with_capacity(tasks.len());

    for planned in tasks {
        let task = &planned.task;
        let mut begin = match busy_until.get(task.assignee.as_str()) {
            Some(end) => add_days(*end, 1)?,
            None => start,
        };
        for prerequisite in &task.prerequisites {
            let end = ends.get(prerequisite).ok_or_else(|| Error::UnknownPrerequisite {
                task: task.id.clone(),
                prerequisite: prerequisite.clone(),
            })?;
            begin = begin.max(add_days(*end, 1)?);
        }
        let end = add_days(begin, span_days(planned, hours_per_day)? - 1)?;

        ends.insert(&task.id, end);
        busy_until.insert(task.assignee.as_str(), end);
        scheduled.push(PlannedTask {
            start_date: Some(begin),
            end_date: Some(end),
            ..planned.clone()
        });
    }

    if let Some(last) = scheduled.iter().filter_map(|t| t.end_date).max() {
        debug!(start = %start, end = %last, "scheduled tasks");
    }
    Ok(scheduled)
}
