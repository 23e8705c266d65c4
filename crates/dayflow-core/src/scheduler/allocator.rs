//! Greedy slot allocation.
//!
//! Placement is a fallback cascade per task: energy-ordered days are
//! searched for a consecutive run starting in the preferred hour set, then
//! for a run starting at any hour, and finally for any single free slot.
//! Energy and time preference only steer search order; the deadline bounds
//! which days are considered but is not re-checked at commit time, so late
//! placements surface as conflicts instead of failing the run.

use chrono::{DateTime, NaiveDate, Utc};
use tracing::debug;

use super::grid::TimeSlotGrid;
use crate::task::{EnergyLevel, Task, TimePreference};

/// Hours empirically suited to each energy level.
fn energy_hours(level: EnergyLevel) -> &'static [u32] {
    match level {
        EnergyLevel::High => &[9, 10, 15, 16],
        EnergyLevel::Medium => &[11, 12, 14, 17],
        EnergyLevel::Low => &[8, 13, 18, 19],
    }
}

/// Start hours allowed by a time-of-day preference.
fn preference_hours(preference: TimePreference, day_hours: std::ops::Range<u32>) -> Vec<u32> {
    match preference {
        TimePreference::Morning => vec![8, 9, 10, 11, 12],
        TimePreference::Afternoon => vec![14, 15, 16, 17],
        TimePreference::Evening => vec![18, 19],
        TimePreference::None => day_hours.collect(),
    }
}

/// Start hours to try first: the task's preference set with its
/// energy-matched hours moved to the front (each group ascending).
fn preferred_start_hours(task: &Task, day_hours: std::ops::Range<u32>) -> Vec<u32> {
    let energy = energy_hours(task.energy);
    let (matched, rest): (Vec<u32>, Vec<u32>) = preference_hours(task.time_preference, day_hours)
        .into_iter()
        .partition(|hour| energy.contains(hour));
    matched.into_iter().chain(rest).collect()
}

/// Try to place a task on the grid, committing the first fit.
///
/// Returns the committed start time, or None when no slot is free anywhere
/// in the horizon up to the task's deadline date.
pub(crate) fn place_task(task: &Task, grid: &mut TimeSlotGrid) -> Option<DateTime<Utc>> {
    let needed = task.slots_needed();
    let deadline_date = task.deadline.date_naive();
    let candidate_days: Vec<NaiveDate> = grid.dates().filter(|d| *d <= deadline_date).collect();

    // Rank candidate days by how many of the task's energy hours are still
    // free; the sort is stable, so equally-scored days stay chronological.
    let mut scored: Vec<(NaiveDate, usize)> = candidate_days
        .iter()
        .map(|date| (*date, grid.available_count(*date, energy_hours(task.energy))))
        .collect();
    scored.sort_by(|a, b| b.1.cmp(&a.1));

    let preferred = preferred_start_hours(task, grid.day_hours());
    let all_hours: Vec<u32> = grid.day_hours().collect();

    for (date, _) in &scored {
        if let Some(hour) = grid.find_consecutive_start(*date, &preferred, needed) {
            let start = grid.occupy(*date, hour, needed, &task.id)?;
            debug!(task = %task.id, %date, hour, slots = needed, "placed in preferred hours");
            return Some(start);
        }
        if let Some(hour) = grid.find_consecutive_start(*date, &all_hours, needed) {
            let start = grid.occupy(*date, hour, needed, &task.id)?;
            debug!(task = %task.id, %date, hour, slots = needed, "placed outside preferred hours");
            return Some(start);
        }
    }

    // No consecutive run fits anywhere: take the first single free slot in
    // chronological order. Only that slot is reserved; the remaining
    // duration is not, and any resulting interval overlaps are reported by
    // the conflict detector.
    for date in &candidate_days {
        if let Some(hour) = grid.first_available(*date) {
            let start = grid.occupy(*date, hour, 1, &task.id)?;
            debug!(task = %task.id, %date, hour, "placed in single fallback slot");
            return Some(start);
        }
    }

    debug!(task = %task.id, "no slot available in horizon");
    None
}
