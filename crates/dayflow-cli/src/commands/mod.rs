//! CLI subcommand implementations.

pub mod analyze;
pub mod conflicts;
pub mod constraint;
pub mod export;
pub mod schedule;
pub mod task;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use dayflow_core::{PlannerConfig, PlannerDb, Scheduler};

/// Build an engine from everything in the store.
///
/// Loads the scheduler configuration, the constraint set and the full task
/// list; the caller decides whether to re-run the allocator or adopt the
/// persisted start times.
pub(crate) fn load_engine(db: &PlannerDb) -> Result<Scheduler, Box<dyn std::error::Error>> {
    let config = PlannerConfig::load()?;
    let mut scheduler = Scheduler::with_config(config.scheduler_config());
    scheduler.set_system_constraints(db.list_constraints()?)?;
    scheduler.load_tasks(db.list_tasks()?)?;
    Ok(scheduler)
}

/// Parse a timestamp given as RFC3339 or `YYYY-MM-DDTHH:MM`.
pub(crate) fn parse_datetime(value: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M") {
        return Ok(naive.and_utc());
    }
    Err(format!(
        "invalid timestamp '{value}' (expected RFC3339 or YYYY-MM-DDTHH:MM)"
    ))
}

/// Parse a deadline: a timestamp, or a plain date meaning end of that day.
pub(crate) fn parse_deadline(value: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(dt) = parse_datetime(value) {
        return Ok(dt);
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        if let Some(end_of_day) = date.and_hms_opt(23, 59, 59) {
            return Ok(end_of_day.and_utc());
        }
    }
    Err(format!(
        "invalid deadline '{value}' (expected YYYY-MM-DD, YYYY-MM-DDTHH:MM or RFC3339)"
    ))
}

/// Parse a date argument (`YYYY-MM-DD`).
pub(crate) fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| format!("invalid date '{value}' (expected YYYY-MM-DD)"))
}

/// Parse a comma-separated list (`"a,b,c"`), dropping empty entries.
pub(crate) fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|part| part.trim().to_string())
        .filter(|part| !part.is_empty())
        .collect()
}
