//! Read-only workload analytics.
//!
//! Pure reductions over the raw task list: time-distribution totals, a
//! 7-day overload check, and heuristic delegation/postponement candidate
//! filters.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use crate::task::{EnergyLevel, Task, TaskCategory};

/// Work hours assumed available in a week: 5 working days of 8 hours.
const WEEKLY_CAPACITY_HOURS: f64 = 40.0;

/// Duration-hour totals across the task list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeDistribution {
    pub by_category: BTreeMap<TaskCategory, f64>,
    pub by_priority: BTreeMap<u8, f64>,
    pub by_energy: BTreeMap<EnergyLevel, f64>,
    pub total_scheduled: f64,
    pub total_unscheduled: f64,
    pub completed: f64,
    pub overdue: f64,
    pub upcoming: f64,
}

/// Aggregate duration hours by category, priority, energy and status.
pub fn analyze_time_distribution(tasks: &[Task], now: DateTime<Utc>) -> TimeDistribution {
    let mut by_category: BTreeMap<TaskCategory, f64> =
        TaskCategory::all().into_iter().map(|c| (c, 0.0)).collect();
    let mut by_priority: BTreeMap<u8, f64> = (1..=5).map(|p| (p, 0.0)).collect();
    let mut by_energy: BTreeMap<EnergyLevel, f64> =
        [EnergyLevel::High, EnergyLevel::Medium, EnergyLevel::Low]
            .into_iter()
            .map(|e| (e, 0.0))
            .collect();

    let mut distribution = TimeDistribution {
        by_category: BTreeMap::new(),
        by_priority: BTreeMap::new(),
        by_energy: BTreeMap::new(),
        total_scheduled: 0.0,
        total_unscheduled: 0.0,
        completed: 0.0,
        overdue: 0.0,
        upcoming: 0.0,
    };

    for task in tasks {
        *by_category.entry(task.category).or_insert(0.0) += task.duration;
        *by_priority.entry(task.priority).or_insert(0.0) += task.duration;
        *by_energy.entry(task.energy).or_insert(0.0) += task.duration;

        if task.completed {
            distribution.completed += task.duration;
        } else if task.deadline < now {
            distribution.overdue += task.duration;
        } else {
            distribution.upcoming += task.duration;
        }

        if task.scheduled_start.is_some() {
            distribution.total_scheduled += task.duration;
        } else {
            distribution.total_unscheduled += task.duration;
        }
    }

    distribution.by_category = by_category;
    distribution.by_priority = by_priority;
    distribution.by_energy = by_energy;
    distribution
}

/// Result of the 7-day overload check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverloadReport {
    pub is_overloaded: bool,
    pub urgent_task_count: usize,
    pub high_priority_count: usize,
    pub total_hours_required: f64,
    pub available_hours: f64,
    /// Percent over capacity, floored at zero
    pub overload_percentage: i64,
}

/// Check whether the coming week is overcommitted.
///
/// Considers incomplete tasks due within 7 days (overdue ones included).
/// Overload is flagged when required hours strictly exceed the weekly
/// capacity, or when more than 5 of those tasks are priority 4+.
pub fn check_overload(tasks: &[Task], now: DateTime<Utc>) -> OverloadReport {
    let next_week = now + Duration::days(7);
    let urgent: Vec<&Task> = tasks
        .iter()
        .filter(|t| !t.completed && t.deadline <= next_week)
        .collect();

    let high_priority_count = urgent.iter().filter(|t| t.priority >= 4).count();
    let total_hours_required: f64 = urgent.iter().map(|t| t.duration).sum();

    let overload_percentage =
        (((total_hours_required / WEEKLY_CAPACITY_HOURS) - 1.0) * 100.0).round() as i64;

    OverloadReport {
        is_overloaded: total_hours_required > WEEKLY_CAPACITY_HOURS || high_priority_count > 5,
        urgent_task_count: urgent.len(),
        high_priority_count,
        total_hours_required,
        available_hours: WEEKLY_CAPACITY_HOURS,
        overload_percentage: overload_percentage.max(0),
    }
}

/// Whether a task looks administrative (category or keyword match).
fn is_administrative(task: &Task) -> bool {
    task.category == TaskCategory::Administrative
        || task.title.to_lowercase().contains("admin")
        || task.description.to_lowercase().contains("admin")
}

/// Union of candidate filters, de-duplicated by task id in first-seen order.
fn union_by_id<'a>(groups: &[Vec<&'a Task>]) -> Vec<&'a Task> {
    let mut seen = HashSet::new();
    let mut result = Vec::new();
    for group in groups {
        for task in group {
            if seen.insert(task.id.as_str()) {
                result.push(*task);
            }
        }
    }
    result
}

/// Tasks that could be handed to someone else: low priority, administrative
/// in nature, or free of dependency edges. Sorted by priority ascending.
pub fn delegation_candidates(tasks: &[Task]) -> Vec<Task> {
    let pending: Vec<&Task> = tasks.iter().filter(|t| !t.completed).collect();

    let low_priority: Vec<&Task> = pending.iter().copied().filter(|t| t.priority <= 2).collect();
    let administrative: Vec<&Task> = pending
        .iter()
        .copied()
        .filter(|t| is_administrative(t))
        .collect();
    let no_dependencies: Vec<&Task> = pending
        .iter()
        .copied()
        .filter(|t| t.dependencies.is_empty())
        .collect();

    let mut candidates = union_by_id(&[low_priority, administrative, no_dependencies]);
    candidates.sort_by_key(|t| t.priority);
    candidates.into_iter().cloned().collect()
}

/// Tasks that could wait: low priority, due more than a week out, or not
/// blocking any other pending task. Sorted by priority ascending, then
/// deadline descending (the furthest-out first).
pub fn postponement_candidates(tasks: &[Task], now: DateTime<Utc>) -> Vec<Task> {
    let pending: Vec<&Task> = tasks.iter().filter(|t| !t.completed).collect();

    let low_priority: Vec<&Task> = pending.iter().copied().filter(|t| t.priority <= 2).collect();
    let far_deadline: Vec<&Task> = pending
        .iter()
        .copied()
        .filter(|t| t.deadline - now > Duration::days(7))
        .collect();
    let non_blocking: Vec<&Task> = pending
        .iter()
        .copied()
        .filter(|t| !pending.iter().any(|other| other.dependencies.contains(&t.id)))
        .collect();

    let mut candidates = union_by_id(&[low_priority, far_deadline, non_blocking]);
    candidates.sort_by(|a, b| {
        a.priority
            .cmp(&b.priority)
            .then_with(|| b.deadline.cmp(&a.deadline))
    });
    candidates.into_iter().cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 3, 8, 0, 0).unwrap()
    }

    fn make_task(id: &str, priority: u8, duration: f64, deadline_days: i64) -> Task {
        let mut task = Task::new(id);
        task.id = id.to_string();
        task.priority = priority;
        task.duration = duration;
        task.deadline = fixed_now() + Duration::days(deadline_days);
        task
    }

    #[test]
    fn overload_threshold_is_strict() {
        // 41 hours due this week, nothing high priority: overloaded.
        let tasks: Vec<Task> = (0..41).map(|i| make_task(&format!("t{i}"), 3, 1.0, 3)).collect();
        let report = check_overload(&tasks, fixed_now());
        assert!(report.is_overloaded);
        assert_eq!(report.total_hours_required, 41.0);
        assert_eq!(report.overload_percentage, 3); // 2.5% rounds up

        // Exactly 40 hours: not overloaded.
        let tasks: Vec<Task> = (0..40).map(|i| make_task(&format!("t{i}"), 3, 1.0, 3)).collect();
        let report = check_overload(&tasks, fixed_now());
        assert!(!report.is_overloaded);
        assert_eq!(report.overload_percentage, 0);
    }

    #[test]
    fn overload_on_high_priority_count() {
        // Six priority-4 tasks trigger overload regardless of hours.
        let tasks: Vec<Task> = (0..6).map(|i| make_task(&format!("t{i}"), 4, 1.0, 2)).collect();
        let report = check_overload(&tasks, fixed_now());
        assert!(report.is_overloaded);
        assert_eq!(report.high_priority_count, 6);

        let tasks: Vec<Task> = (0..5).map(|i| make_task(&format!("t{i}"), 4, 1.0, 2)).collect();
        assert!(!check_overload(&tasks, fixed_now()).is_overloaded);
    }

    #[test]
    fn overload_ignores_completed_and_far_out_tasks() {
        let mut done = make_task("done", 5, 50.0, 2);
        done.complete();
        let far = make_task("far", 5, 50.0, 30);
        let report = check_overload(&[done, far], fixed_now());
        assert!(!report.is_overloaded);
        assert_eq!(report.urgent_task_count, 0);
    }

    #[test]
    fn distribution_buckets_sum_durations() {
        let mut meeting = make_task("meeting", 4, 2.0, 1);
        meeting.category = TaskCategory::Professional;
        meeting.energy = EnergyLevel::High;
        meeting.scheduled_start = Some(fixed_now());

        let mut filing = make_task("filing", 2, 1.5, 5);
        filing.category = TaskCategory::Administrative;
        filing.energy = EnergyLevel::Low;

        let mut old = make_task("old", 3, 1.0, -2);
        old.category = TaskCategory::Personal;

        let mut done = make_task("done", 3, 0.5, 2);
        done.complete();

        let d = analyze_time_distribution(&[meeting, filing, old, done], fixed_now());
        assert_eq!(d.by_category[&TaskCategory::Professional], 2.0);
        assert_eq!(d.by_category[&TaskCategory::Administrative], 1.5);
        assert_eq!(d.by_category[&TaskCategory::Learning], 0.0);
        assert_eq!(d.by_priority[&4], 2.0);
        assert_eq!(d.by_energy[&EnergyLevel::Low], 1.5);
        assert_eq!(d.total_scheduled, 2.0);
        assert_eq!(d.total_unscheduled, 3.0);
        assert_eq!(d.overdue, 1.0);
        assert_eq!(d.completed, 0.5);
        assert_eq!(d.upcoming, 3.5);
    }

    #[test]
    fn delegation_candidates_union_and_order() {
        let mut urgent = make_task("urgent", 5, 1.0, 1);
        urgent.dependencies = vec!["other".to_string()];

        let low = make_task("low", 1, 1.0, 3);

        let mut admin = make_task("paperwork", 4, 1.0, 2);
        admin.category = TaskCategory::Administrative;
        admin.dependencies = vec!["low".to_string()];

        let mut done = make_task("done", 1, 1.0, 2);
        done.complete();

        let candidates = delegation_candidates(&[urgent, low, admin, done]);
        let ids: Vec<_> = candidates.iter().map(|t| t.id.as_str()).collect();
        // "low" via priority, "paperwork" via category; "urgent" has a
        // dependency and high priority, "done" is completed.
        assert_eq!(ids, ["low", "paperwork"]);
    }

    #[test]
    fn keyword_match_counts_as_administrative() {
        let mut task = make_task("t", 5, 1.0, 1);
        task.title = "Admin: renew passport".to_string();
        task.dependencies = vec!["x".to_string()];
        let candidates = delegation_candidates(&[task]);
        assert_eq!(candidates.len(), 1);
    }

    #[test]
    fn postponement_candidates_union_and_order() {
        // "blocked-on" is blocking "dependent": it only qualifies via priority.
        let mut blocking = make_task("blocking", 2, 1.0, 2);
        blocking.dependencies = vec![];
        let mut dependent = make_task("dependent", 4, 1.0, 2);
        dependent.dependencies = vec!["blocking".to_string()];

        let far = make_task("far", 3, 1.0, 10);
        let mut near_high = make_task("near-high", 5, 1.0, 1);
        near_high.dependencies = vec!["far".to_string()];

        let candidates = postponement_candidates(&[blocking, dependent, far, near_high], fixed_now());
        let ids: Vec<_> = candidates.iter().map(|t| t.id.as_str()).collect();
        // "blocking" via priority, "far" via deadline, "dependent" and
        // "near-high" via the non-blocking filter; priority-ascending order.
        assert_eq!(ids, ["blocking", "far", "dependent", "near-high"]);
    }
}
