//! Remediation proposals for detected conflicts.
//!
//! Each conflict maps to a fixed menu of suggestions. Nothing here mutates
//! the schedule; applying a suggestion goes through the normal task-update
//! path, after which a new run re-validates the result.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::conflict::Conflict;
use crate::scheduler::ScheduledTask;

/// Buffer left between a moved task and the task it is moved after.
fn move_buffer() -> Duration {
    Duration::minutes(30)
}

/// How disruptive applying a suggestion would be.
///
/// A fixed lookup by action kind, not computed from magnitude.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    Low,
    Medium,
    High,
}

/// A concrete, non-committing remediation action.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum RemedyAction {
    /// Move a task to a new start time
    Move {
        task_id: String,
        new_start: DateTime<Utc>,
    },
    /// Clear the listed tasks and let the next run re-place them
    Reschedule { task_ids: Vec<String> },
    /// Push the deadline out
    ExtendDeadline {
        task_id: String,
        new_deadline: DateTime<Utc>,
    },
    /// Shrink the duration
    ReduceDuration { task_id: String, new_duration: f64 },
    /// Drop a dependency edge
    RemoveDependency {
        task_id: String,
        dependency_id: String,
    },
}

/// One suggested remediation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemedyOption {
    pub description: String,
    pub impact: Impact,
    pub action: RemedyAction,
}

/// The remediation menu for one conflict.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alternative {
    /// Description of the conflict being remediated
    pub conflict: String,
    pub options: Vec<RemedyOption>,
}

/// Map each conflict to its remediation menu.
pub fn propose_alternatives(conflicts: &[Conflict]) -> Vec<Alternative> {
    conflicts
        .iter()
        .map(|conflict| match conflict {
            Conflict::Overlap { first, second } => overlap_alternative(conflict, first, second),
            Conflict::DeadlineViolation { task } => deadline_alternative(conflict, task),
            Conflict::DependencyViolation { task, depends_on } => {
                dependency_alternative(conflict, task, depends_on)
            }
        })
        .collect()
}

/// Start time right after a scheduled task, plus the move buffer.
fn time_after(task: &ScheduledTask) -> Option<DateTime<Utc>> {
    task.end_time().map(|end| end + move_buffer())
}

fn overlap_alternative(
    conflict: &Conflict,
    first: &ScheduledTask,
    second: &ScheduledTask,
) -> Alternative {
    let mut options = Vec::new();

    if let Some(new_start) = time_after(second) {
        options.push(RemedyOption {
            description: format!(
                "Move \"{}\" after \"{}\"",
                first.task.title, second.task.title
            ),
            impact: Impact::Low,
            action: RemedyAction::Move {
                task_id: first.task.id.clone(),
                new_start,
            },
        });
    }
    if let Some(new_start) = time_after(first) {
        options.push(RemedyOption {
            description: format!(
                "Move \"{}\" after \"{}\"",
                second.task.title, first.task.title
            ),
            impact: Impact::Low,
            action: RemedyAction::Move {
                task_id: second.task.id.clone(),
                new_start,
            },
        });
    }
    options.push(RemedyOption {
        description: "Reschedule both tasks".to_string(),
        impact: Impact::Medium,
        action: RemedyAction::Reschedule {
            task_ids: vec![first.task.id.clone(), second.task.id.clone()],
        },
    });

    Alternative {
        conflict: conflict.description(),
        options,
    }
}

fn deadline_alternative(conflict: &Conflict, task: &ScheduledTask) -> Alternative {
    let mut options = vec![RemedyOption {
        description: format!("Move \"{}\" to finish at its deadline", task.task.title),
        impact: Impact::Medium,
        action: RemedyAction::Move {
            task_id: task.task.id.clone(),
            new_start: task.task.deadline - task.task.duration_span(),
        },
    }];

    if let Some(end) = task.end_time() {
        options.push(RemedyOption {
            description: format!("Extend the deadline of \"{}\"", task.task.title),
            impact: Impact::High,
            action: RemedyAction::ExtendDeadline {
                task_id: task.task.id.clone(),
                new_deadline: end + Duration::hours(1),
            },
        });
    }
    options.push(RemedyOption {
        description: format!("Reduce the duration of \"{}\"", task.task.title),
        impact: Impact::High,
        action: RemedyAction::ReduceDuration {
            task_id: task.task.id.clone(),
            new_duration: (task.task.duration * 0.75).max(0.5),
        },
    });

    Alternative {
        conflict: conflict.description(),
        options,
    }
}

fn dependency_alternative(
    conflict: &Conflict,
    task: &ScheduledTask,
    depends_on: &ScheduledTask,
) -> Alternative {
    let mut options = Vec::new();

    if let Some(new_start) = time_after(depends_on) {
        options.push(RemedyOption {
            description: format!(
                "Move \"{}\" after \"{}\"",
                task.task.title, depends_on.task.title
            ),
            impact: Impact::Low,
            action: RemedyAction::Move {
                task_id: task.task.id.clone(),
                new_start,
            },
        });
    }
    options.push(RemedyOption {
        description: format!(
            "Remove the dependency of \"{}\" on \"{}\"",
            task.task.title, depends_on.task.title
        ),
        impact: Impact::High,
        action: RemedyAction::RemoveDependency {
            task_id: task.task.id.clone(),
            dependency_id: depends_on.task.id.clone(),
        },
    });
    if let Some(start) = task.scheduled_start {
        options.push(RemedyOption {
            description: format!("Move \"{}\" earlier", depends_on.task.title),
            impact: Impact::Medium,
            action: RemedyAction::Move {
                task_id: depends_on.task.id.clone(),
                new_start: start - move_buffer() - depends_on.task.duration_span(),
            },
        });
    }

    Alternative {
        conflict: conflict.description(),
        options,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Task;
    use chrono::TimeZone;

    fn base_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 3, 9, 0, 0).unwrap()
    }

    fn make_scheduled(id: &str, start_offset_hours: i64, duration: f64) -> ScheduledTask {
        let mut task = Task::new(id);
        task.id = id.to_string();
        task.title = format!("Task {id}");
        task.duration = duration;
        task.deadline = base_time() + Duration::days(2);
        ScheduledTask::new(task, Some(base_time() + Duration::hours(start_offset_hours)))
    }

    #[test]
    fn overlap_menu_moves_either_task_with_buffer() {
        let first = make_scheduled("a", 0, 2.0);
        let second = make_scheduled("b", 1, 1.0);
        let conflict = Conflict::Overlap {
            first: first.clone(),
            second: second.clone(),
        };

        let alternatives = propose_alternatives(&[conflict]);
        assert_eq!(alternatives.len(), 1);
        let options = &alternatives[0].options;
        assert_eq!(options.len(), 3);

        // "a" moves to b's end plus 30 minutes.
        assert_eq!(
            options[0].action,
            RemedyAction::Move {
                task_id: "a".to_string(),
                new_start: second.end_time().unwrap() + Duration::minutes(30),
            }
        );
        assert_eq!(options[0].impact, Impact::Low);
        assert_eq!(options[1].impact, Impact::Low);
        assert_eq!(
            options[2].action,
            RemedyAction::Reschedule {
                task_ids: vec!["a".to_string(), "b".to_string()],
            }
        );
        assert_eq!(options[2].impact, Impact::Medium);
    }

    #[test]
    fn deadline_menu_offers_move_extend_reduce() {
        let mut task = make_scheduled("late", 0, 2.0);
        task.task.deadline = base_time() + Duration::hours(1);
        let conflict = Conflict::DeadlineViolation { task: task.clone() };

        let options = propose_alternatives(&[conflict]).remove(0).options;
        assert_eq!(options.len(), 3);

        assert_eq!(
            options[0].action,
            RemedyAction::Move {
                task_id: "late".to_string(),
                new_start: task.task.deadline - Duration::hours(2),
            }
        );
        assert_eq!(options[0].impact, Impact::Medium);
        assert_eq!(
            options[1].action,
            RemedyAction::ExtendDeadline {
                task_id: "late".to_string(),
                new_deadline: task.end_time().unwrap() + Duration::hours(1),
            }
        );
        assert_eq!(options[1].impact, Impact::High);
        assert_eq!(
            options[2].action,
            RemedyAction::ReduceDuration {
                task_id: "late".to_string(),
                new_duration: 1.5,
            }
        );
        assert_eq!(options[2].impact, Impact::High);
    }

    #[test]
    fn reduced_duration_never_drops_below_half_an_hour() {
        let mut task = make_scheduled("short", 0, 0.6);
        task.task.deadline = base_time();
        let conflict = Conflict::DeadlineViolation { task };

        let options = propose_alternatives(&[conflict]).remove(0).options;
        let reduce = options
            .iter()
            .find_map(|o| match &o.action {
                RemedyAction::ReduceDuration { new_duration, .. } => Some(*new_duration),
                _ => None,
            })
            .unwrap();
        assert_eq!(reduce, 0.5);
    }

    #[test]
    fn dependency_menu_moves_either_side_or_drops_the_edge() {
        let depends_on = make_scheduled("dep", 1, 2.0);
        let mut task = make_scheduled("main", 0, 1.0);
        task.task.dependencies = vec!["dep".to_string()];
        let conflict = Conflict::DependencyViolation {
            task: task.clone(),
            depends_on: depends_on.clone(),
        };

        let options = propose_alternatives(&[conflict]).remove(0).options;
        assert_eq!(options.len(), 3);

        assert_eq!(
            options[0].action,
            RemedyAction::Move {
                task_id: "main".to_string(),
                new_start: depends_on.end_time().unwrap() + Duration::minutes(30),
            }
        );
        assert_eq!(options[0].impact, Impact::Low);
        assert_eq!(
            options[1].action,
            RemedyAction::RemoveDependency {
                task_id: "main".to_string(),
                dependency_id: "dep".to_string(),
            }
        );
        assert_eq!(options[1].impact, Impact::High);
        // The dependency is proposed to end 30 minutes before the dependent
        // currently starts.
        assert_eq!(
            options[2].action,
            RemedyAction::Move {
                task_id: "dep".to_string(),
                new_start: task.scheduled_start.unwrap()
                    - Duration::minutes(30)
                    - Duration::hours(2),
            }
        );
        assert_eq!(options[2].impact, Impact::Medium);
    }
}
