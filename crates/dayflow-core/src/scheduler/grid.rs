//! Candidate slot grid for one scheduling run.
//!
//! The grid is generated fresh at the start of every run, mutated in place
//! while tasks are committed, and dropped when the run returns. It is never
//! stored on the engine or shared between runs.

use chrono::{DateTime, Days, NaiveDate, Utc};
use std::collections::BTreeMap;

use super::SchedulerConfig;
use crate::constraint::{is_protected, SystemConstraint};

/// One hourly unit of schedulable time on a given date.
#[derive(Debug, Clone)]
pub struct TimeSlot {
    /// Absolute start of the slot
    pub start: DateTime<Utc>,
    /// Whether the slot can still be assigned
    pub available: bool,
    /// Whether a system constraint blocks the slot
    pub protected: bool,
    /// Id of the task occupying the slot, if any
    pub task_id: Option<String>,
}

/// Hourly slots over the planning horizon.
///
/// BTreeMap keys keep day and hour iteration chronological ascending.
#[derive(Debug)]
pub struct TimeSlotGrid {
    days: BTreeMap<NaiveDate, BTreeMap<u32, TimeSlot>>,
    day_start_hour: u32,
    day_end_hour: u32,
}

impl TimeSlotGrid {
    /// Generate the grid for `config.horizon_days` days starting at `now`'s
    /// date, one slot per hour in `[day_start_hour, day_end_hour)`, marking
    /// constraint-protected hours unavailable.
    pub fn generate(
        constraints: &[SystemConstraint],
        config: &SchedulerConfig,
        now: DateTime<Utc>,
    ) -> Self {
        let mut days = BTreeMap::new();
        let today = now.date_naive();

        for offset in 0..config.horizon_days {
            let Some(date) = today.checked_add_days(Days::new(offset)) else {
                continue;
            };
            let mut hours = BTreeMap::new();
            for hour in config.day_start_hour..config.day_end_hour {
                let Some(start) = date.and_hms_opt(hour, 0, 0) else {
                    continue;
                };
                let protected = is_protected(constraints, date, hour);
                hours.insert(
                    hour,
                    TimeSlot {
                        start: start.and_utc(),
                        available: !protected,
                        protected,
                        task_id: None,
                    },
                );
            }
            days.insert(date, hours);
        }

        Self {
            days,
            day_start_hour: config.day_start_hour,
            day_end_hour: config.day_end_hour,
        }
    }

    /// Dates covered by the grid, chronological ascending.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.days.keys().copied()
    }

    /// The daily hour window as a range.
    pub fn day_hours(&self) -> std::ops::Range<u32> {
        self.day_start_hour..self.day_end_hour
    }

    /// Look up a slot.
    pub fn slot(&self, date: NaiveDate, hour: u32) -> Option<&TimeSlot> {
        self.days.get(&date).and_then(|hours| hours.get(&hour))
    }

    /// How many of the given hours are still available on `date`.
    pub fn available_count(&self, date: NaiveDate, hours: &[u32]) -> usize {
        hours
            .iter()
            .filter(|hour| self.slot(date, **hour).is_some_and(|s| s.available))
            .count()
    }

    /// First start hour from `start_hours` where `needed` consecutive slots
    /// are available on `date`.
    ///
    /// Only the start hour has to be a member of `start_hours`; the run may
    /// extend past the candidate set. A missing or unavailable slot breaks
    /// the run.
    pub fn find_consecutive_start(
        &self,
        date: NaiveDate,
        start_hours: &[u32],
        needed: usize,
    ) -> Option<u32> {
        start_hours.iter().copied().find(|start| {
            (0..needed as u32).all(|offset| {
                self.slot(date, start + offset).is_some_and(|s| s.available)
            })
        })
    }

    /// First available hour on `date`, if any.
    pub fn first_available(&self, date: NaiveDate) -> Option<u32> {
        self.days.get(&date).and_then(|hours| {
            hours
                .iter()
                .find(|(_, slot)| slot.available)
                .map(|(hour, _)| *hour)
        })
    }

    /// Mark `count` slots from `start_hour` occupied by `task_id` and return
    /// the start slot's timestamp.
    pub fn occupy(
        &mut self,
        date: NaiveDate,
        start_hour: u32,
        count: usize,
        task_id: &str,
    ) -> Option<DateTime<Utc>> {
        let hours = self.days.get_mut(&date)?;
        let start = hours.get(&start_hour)?.start;
        for offset in 0..count as u32 {
            if let Some(slot) = hours.get_mut(&(start_hour + offset)) {
                slot.available = false;
                slot.task_id = Some(task_id.to_string());
            }
        }
        Some(start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 3, 7, 30, 0).unwrap()
    }

    #[test]
    fn generates_horizon_times_daily_window() {
        let grid = TimeSlotGrid::generate(&[], &SchedulerConfig::default(), fixed_now());
        let dates: Vec<_> = grid.dates().collect();
        assert_eq!(dates.len(), 14);
        assert_eq!(dates[0], fixed_now().date_naive());
        for date in dates {
            assert_eq!(grid.available_count(date, &(8..20).collect::<Vec<_>>()), 12);
            assert!(grid.slot(date, 7).is_none());
            assert!(grid.slot(date, 20).is_none());
        }
    }

    #[test]
    fn constraint_hours_are_protected() {
        let lunch = SystemConstraint::new("Lunch", vec![0, 1, 2, 3, 4, 5, 6], 13, 14);
        let grid = TimeSlotGrid::generate(&[lunch], &SchedulerConfig::default(), fixed_now());
        for date in grid.dates().collect::<Vec<_>>() {
            let slot = grid.slot(date, 13).unwrap();
            assert!(slot.protected);
            assert!(!slot.available);
            assert!(grid.slot(date, 14).unwrap().available);
        }
    }

    #[test]
    fn consecutive_search_breaks_on_unavailable_slot() {
        let lunch = SystemConstraint::new("Lunch", vec![0, 1, 2, 3, 4, 5, 6], 13, 14);
        let grid = TimeSlotGrid::generate(&[lunch], &SchedulerConfig::default(), fixed_now());
        let date = fixed_now().date_naive();
        // Starting at 12 the run 12,13,14 crosses lunch.
        assert_eq!(grid.find_consecutive_start(date, &[12], 3), None);
        assert_eq!(grid.find_consecutive_start(date, &[12, 14], 3), Some(14));
    }

    #[test]
    fn consecutive_search_may_extend_past_candidate_set() {
        let grid = TimeSlotGrid::generate(&[], &SchedulerConfig::default(), fixed_now());
        let date = fixed_now().date_naive();
        // 11 is in the set; the run occupies 11,12,13 even though only the
        // start hour is a member.
        assert_eq!(grid.find_consecutive_start(date, &[11], 3), Some(11));
        // A run off the end of the day breaks on the missing slot.
        assert_eq!(grid.find_consecutive_start(date, &[19], 2), None);
    }

    #[test]
    fn occupy_marks_slots_and_returns_start() {
        let mut grid = TimeSlotGrid::generate(&[], &SchedulerConfig::default(), fixed_now());
        let date = fixed_now().date_naive();
        let start = grid.occupy(date, 9, 2, "task-1").unwrap();
        assert_eq!(start, date.and_hms_opt(9, 0, 0).unwrap().and_utc());
        assert!(!grid.slot(date, 9).unwrap().available);
        assert!(!grid.slot(date, 10).unwrap().available);
        assert_eq!(grid.slot(date, 10).unwrap().task_id.as_deref(), Some("task-1"));
        assert!(grid.slot(date, 11).unwrap().available);
        assert_eq!(grid.first_available(date), Some(8));
    }
}
