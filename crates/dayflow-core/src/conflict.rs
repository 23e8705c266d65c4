//! Conflict detection over a committed schedule.
//!
//! Conflicts are derived facts, recomputed on demand from the schedule:
//! interval overlaps, deadline violations and dependency-order violations.
//! Only tasks with a committed start participate; unplaced tasks cannot
//! conflict.

use serde::{Deserialize, Serialize};

use crate::scheduler::ScheduledTask;

/// A detected scheduling conflict.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Conflict {
    /// Two scheduled intervals intersect
    Overlap {
        first: ScheduledTask,
        second: ScheduledTask,
    },
    /// A task ends after its deadline
    DeadlineViolation { task: ScheduledTask },
    /// A task starts before a dependency finishes
    DependencyViolation {
        task: ScheduledTask,
        depends_on: ScheduledTask,
    },
}

impl Conflict {
    /// Human-readable summary of the conflict.
    pub fn description(&self) -> String {
        match self {
            Conflict::Overlap { first, second } => format!(
                "Tasks \"{}\" and \"{}\" overlap",
                first.task.title, second.task.title
            ),
            Conflict::DeadlineViolation { task } => {
                format!("Task \"{}\" is scheduled past its deadline", task.task.title)
            }
            Conflict::DependencyViolation { task, depends_on } => format!(
                "Task \"{}\" is scheduled before its dependency \"{}\" completes",
                task.task.title, depends_on.task.title
            ),
        }
    }
}

/// Scan the committed schedule for conflicts.
///
/// Overlaps are reported once per unordered pair. Deadline checks use the
/// strict comparison `start + duration > deadline`. Dependency checks only
/// consider dependencies that are present in the schedule, incomplete and
/// themselves placed; anything else cannot be verified and is skipped.
pub fn find_conflicts(scheduled: &[ScheduledTask]) -> Vec<Conflict> {
    let mut conflicts = Vec::new();

    for (index, task) in scheduled.iter().enumerate() {
        let Some(start) = task.scheduled_start else {
            continue;
        };

        for other in &scheduled[index + 1..] {
            if other.scheduled_start.is_none() {
                continue;
            }
            if task.overlaps_with(other) {
                conflicts.push(Conflict::Overlap {
                    first: task.clone(),
                    second: other.clone(),
                });
            }
        }

        if start + task.task.duration_span() > task.task.deadline {
            conflicts.push(Conflict::DeadlineViolation { task: task.clone() });
        }

        for dependency_id in &task.task.dependencies {
            let Some(dependency) = scheduled.iter().find(|t| t.task.id == *dependency_id) else {
                continue;
            };
            if dependency.task.completed {
                continue;
            }
            let Some(dependency_end) = dependency.end_time() else {
                continue;
            };
            if start < dependency_end {
                conflicts.push(Conflict::DependencyViolation {
                    task: task.clone(),
                    depends_on: dependency.clone(),
                });
            }
        }
    }

    conflicts
}
