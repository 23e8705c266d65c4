//! Scheduling engine.
//!
//! This module assigns concrete start times to pending tasks inside a
//! rolling planning horizon:
//! - Generates an hourly slot grid over the horizon, minus protected windows
//! - Ranks tasks by priority and deadline
//! - Places each task greedily via an energy/preference-guided search
//! - Exposes day/week views and move checks over the committed schedule
//!
//! A scheduling run is synchronous and in-memory; persistence of the
//! returned schedule is the caller's responsibility.

mod allocator;
pub mod grid;
mod rank;

pub use grid::{TimeSlot, TimeSlotGrid};
pub use rank::rank_tasks;

use chrono::{DateTime, Days, NaiveDate, Timelike, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::alternatives::{self, Alternative};
use crate::conflict::{self, Conflict};
use crate::constraint::{is_protected, SystemConstraint};
use crate::error::{SchedulerError, ValidationError};
use crate::task::Task;

/// Engine configuration.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Days in the planning horizon, starting today
    pub horizon_days: u64,
    /// First schedulable hour of each day (inclusive)
    pub day_start_hour: u32,
    /// First non-schedulable hour of each day (exclusive)
    pub day_end_hour: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            horizon_days: 14,
            day_start_hour: 8,
            day_end_hour: 20,
        }
    }
}

/// A task copy with the start time committed by a scheduling run.
///
/// The engine never mutates caller-owned tasks; every run produces fresh
/// snapshots, and `None` means the task could not be placed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledTask {
    pub task: Task,
    pub scheduled_start: Option<DateTime<Utc>>,
}

impl ScheduledTask {
    /// Create a snapshot, keeping the embedded task's start in sync.
    pub fn new(mut task: Task, scheduled_start: Option<DateTime<Utc>>) -> Self {
        task.scheduled_start = scheduled_start;
        Self {
            task,
            scheduled_start,
        }
    }

    /// End of the scheduled interval, or None if unplaced.
    pub fn end_time(&self) -> Option<DateTime<Utc>> {
        self.scheduled_start
            .map(|start| start + self.task.duration_span())
    }

    /// Whether two scheduled intervals intersect (half-open `[start, end)`).
    pub fn overlaps_with(&self, other: &ScheduledTask) -> bool {
        match (
            self.scheduled_start,
            self.end_time(),
            other.scheduled_start,
            other.end_time(),
        ) {
            (Some(start), Some(end), Some(other_start), Some(other_end)) => {
                start < other_end && other_start < end
            }
            _ => false,
        }
    }

    /// Whether the task starts on the given date.
    pub fn falls_on(&self, date: NaiveDate) -> bool {
        self.scheduled_start
            .is_some_and(|start| start.date_naive() == date)
    }
}

/// The scheduling and conflict-resolution engine.
///
/// Owns the current task list, the constraint set and the schedule committed
/// by the last run. Not reentrant: callers must not mutate tasks while a
/// run is in progress.
#[derive(Debug, Default)]
pub struct Scheduler {
    config: SchedulerConfig,
    constraints: Vec<SystemConstraint>,
    tasks: Vec<Task>,
    scheduled: Vec<ScheduledTask>,
}

impl Scheduler {
    /// Create an engine with the default configuration and no constraints.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine with a custom configuration.
    pub fn with_config(config: SchedulerConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Replace the constraint set.
    ///
    /// Every constraint is validated first; on error the previous set is
    /// kept unchanged.
    pub fn set_system_constraints(
        &mut self,
        constraints: Vec<SystemConstraint>,
    ) -> Result<(), ValidationError> {
        for constraint in &constraints {
            constraint.validate()?;
        }
        self.constraints = constraints;
        Ok(())
    }

    /// Replace the task list.
    ///
    /// Every task is validated first; on error the previous list is kept
    /// unchanged. The committed schedule is left as-is until the next run.
    pub fn load_tasks(&mut self, tasks: Vec<Task>) -> Result<(), ValidationError> {
        for task in &tasks {
            task.validate()?;
        }
        self.tasks = tasks;
        Ok(())
    }

    /// Add a single task.
    pub fn add_task(&mut self, task: Task) -> Result<(), ValidationError> {
        task.validate()?;
        self.tasks.push(task);
        Ok(())
    }

    /// Remove a task from the list and from the committed schedule.
    pub fn remove_task(&mut self, id: &str) -> Result<(), SchedulerError> {
        if !self.tasks.iter().any(|t| t.id == id) {
            return Err(SchedulerError::TaskNotFound { id: id.to_string() });
        }
        self.tasks.retain(|t| t.id != id);
        self.scheduled.retain(|t| t.task.id != id);
        Ok(())
    }

    /// The current task list.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// The schedule committed by the last run.
    pub fn scheduled_tasks(&self) -> &[ScheduledTask] {
        &self.scheduled
    }

    /// Run the scheduler with the current wall clock.
    pub fn schedule(&mut self) -> &[ScheduledTask] {
        self.schedule_at(Utc::now())
    }

    /// Run the scheduler with an explicit "now".
    ///
    /// Completed tasks are discarded, the rest are ranked and placed
    /// greedily on a grid generated once for the run. The result replaces
    /// any previous schedule and is deterministic for a fixed `now`.
    pub fn schedule_at(&mut self, now: DateTime<Utc>) -> &[ScheduledTask] {
        let mut grid = TimeSlotGrid::generate(&self.constraints, &self.config, now);

        let mut pending: Vec<Task> = self.tasks.iter().filter(|t| !t.completed).cloned().collect();
        rank::rank_tasks(&mut pending);

        let mut scheduled = Vec::with_capacity(pending.len());
        for task in pending {
            let start = allocator::place_task(&task, &mut grid);
            scheduled.push(ScheduledTask::new(task, start));
        }

        let placed = scheduled.iter().filter(|t| t.scheduled_start.is_some()).count();
        info!(total = scheduled.len(), placed, "scheduling run complete");

        self.scheduled = scheduled;
        &self.scheduled
    }

    /// Rebuild the committed schedule from the start times already carried
    /// by the task list (e.g. reloaded from storage), without re-running
    /// the allocator.
    pub fn restore_schedule(&mut self) -> &[ScheduledTask] {
        self.scheduled = self
            .tasks
            .iter()
            .filter(|t| !t.completed)
            .map(|t| ScheduledTask::new(t.clone(), t.scheduled_start))
            .collect();
        &self.scheduled
    }

    /// Scheduled tasks starting on `date`, ordered by start time.
    pub fn tasks_for_date(&self, date: NaiveDate) -> Vec<ScheduledTask> {
        let mut tasks: Vec<ScheduledTask> = self
            .scheduled
            .iter()
            .filter(|t| t.falls_on(date))
            .cloned()
            .collect();
        tasks.sort_by_key(|t| t.scheduled_start);
        tasks
    }

    /// Scheduled tasks for the 7 days starting at `start`, one entry per
    /// day in chronological order.
    pub fn tasks_for_week(&self, start: NaiveDate) -> Vec<(NaiveDate, Vec<ScheduledTask>)> {
        (0..7)
            .filter_map(|offset| start.checked_add_days(Days::new(offset)))
            .map(|date| (date, self.tasks_for_date(date)))
            .collect()
    }

    /// Whether a scheduled task could move to `new_start`.
    ///
    /// Checks deadline compliance, protected hours and overlap with other
    /// scheduled tasks on the target date. Dependency ordering is not
    /// checked here; the conflict detector reports it after a move.
    pub fn can_move_task(
        &self,
        id: &str,
        new_start: DateTime<Utc>,
    ) -> Result<bool, SchedulerError> {
        let task = self
            .scheduled
            .iter()
            .find(|t| t.task.id == id)
            .ok_or_else(|| SchedulerError::TaskNotFound { id: id.to_string() })?;

        if new_start + task.task.duration_span() > task.task.deadline {
            return Ok(false);
        }

        let date = new_start.date_naive();
        let start_hour = new_start.hour();
        let end_hour = (start_hour as f64 + task.task.duration).ceil() as u32;

        for hour in start_hour..end_hour {
            if is_protected(&self.constraints, date, hour) {
                return Ok(false);
            }
            let occupied = self.scheduled.iter().any(|other| {
                if other.task.id == id {
                    return false;
                }
                let Some(other_start) = other.scheduled_start else {
                    return false;
                };
                if other_start.date_naive() != date {
                    return false;
                }
                let other_start_hour = other_start.hour();
                let other_end_hour = (other_start_hour as f64 + other.task.duration).ceil() as u32;
                hour >= other_start_hour && hour < other_end_hour
            });
            if occupied {
                return Ok(false);
            }
        }

        Ok(true)
    }

    /// Move a scheduled task to `new_start` if [`Self::can_move_task`]
    /// allows it. Returns whether the move was applied.
    pub fn move_task(
        &mut self,
        id: &str,
        new_start: DateTime<Utc>,
    ) -> Result<bool, SchedulerError> {
        if !self.can_move_task(id, new_start)? {
            return Ok(false);
        }
        if let Some(task) = self.scheduled.iter_mut().find(|t| t.task.id == id) {
            task.scheduled_start = Some(new_start);
            task.task.scheduled_start = Some(new_start);
            task.task.updated_at = Utc::now();
        }
        Ok(true)
    }

    /// Find overlaps, deadline violations and dependency-order violations
    /// in the committed schedule.
    pub fn identify_conflicts(&self) -> Vec<Conflict> {
        conflict::find_conflicts(&self.scheduled)
    }

    /// Compute remediation options for detected conflicts without applying
    /// any of them.
    pub fn propose_alternatives(&self, conflicts: &[Conflict]) -> Vec<Alternative> {
        alternatives::propose_alternatives(conflicts)
    }

    /// Duration-hour totals over the raw task list.
    pub fn analyze_time_distribution(&self) -> crate::analytics::TimeDistribution {
        crate::analytics::analyze_time_distribution(&self.tasks, Utc::now())
    }

    /// Overload check over tasks due in the next 7 days.
    pub fn check_overload(&self) -> crate::analytics::OverloadReport {
        crate::analytics::check_overload(&self.tasks, Utc::now())
    }

    /// Tasks that could be delegated.
    pub fn delegation_candidates(&self) -> Vec<Task> {
        crate::analytics::delegation_candidates(&self.tasks)
    }

    /// Tasks that could be postponed.
    pub fn postponement_candidates(&self) -> Vec<Task> {
        crate::analytics::postponement_candidates(&self.tasks, Utc::now())
    }
}
