//! Task model for the scheduling engine.
//!
//! A task carries everything the allocator needs to place it: duration,
//! deadline, priority, energy requirement, time-of-day preference and
//! dependency edges. The engine never mutates caller-owned tasks; scheduling
//! runs operate on copies (see [`crate::scheduler::ScheduledTask`]).

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Energy level a task demands from the person doing it.
///
/// Used only to bias the slot search toward hours empirically suited to
/// that level; never a hard constraint.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum EnergyLevel {
    /// Demanding work (deep focus)
    High,
    /// Regular work (default)
    Medium,
    /// Routine work (admin, chores)
    Low,
}

impl Default for EnergyLevel {
    fn default() -> Self {
        EnergyLevel::Medium
    }
}

impl EnergyLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnergyLevel::High => "high",
            EnergyLevel::Medium => "medium",
            EnergyLevel::Low => "low",
        }
    }
}

impl fmt::Display for EnergyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EnergyLevel {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "high" => Ok(EnergyLevel::High),
            "medium" => Ok(EnergyLevel::Medium),
            "low" => Ok(EnergyLevel::Low),
            other => Err(ValidationError::InvalidValue {
                field: "energy".to_string(),
                message: format!("unknown energy level '{other}'"),
            }),
        }
    }
}

/// Preferred part of the day for a task.
///
/// Restricts which start hours the allocator tries first; placement outside
/// the preferred window is still allowed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TimePreference {
    Morning,
    Afternoon,
    Evening,
    /// No preference; all hours are equally acceptable
    None,
}

impl Default for TimePreference {
    fn default() -> Self {
        TimePreference::None
    }
}

impl TimePreference {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimePreference::Morning => "morning",
            TimePreference::Afternoon => "afternoon",
            TimePreference::Evening => "evening",
            TimePreference::None => "none",
        }
    }
}

impl fmt::Display for TimePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimePreference {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "morning" => Ok(TimePreference::Morning),
            "afternoon" => Ok(TimePreference::Afternoon),
            "evening" => Ok(TimePreference::Evening),
            "none" => Ok(TimePreference::None),
            other => Err(ValidationError::InvalidValue {
                field: "time_preference".to_string(),
                message: format!("unknown time preference '{other}'"),
            }),
        }
    }
}

/// Category of task for analytics and delegation heuristics.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TaskCategory {
    Professional,
    Personal,
    Learning,
    Administrative,
    Other,
}

impl Default for TaskCategory {
    fn default() -> Self {
        TaskCategory::Professional
    }
}

impl TaskCategory {
    /// All categories in display order.
    pub fn all() -> [TaskCategory; 5] {
        [
            TaskCategory::Professional,
            TaskCategory::Personal,
            TaskCategory::Learning,
            TaskCategory::Administrative,
            TaskCategory::Other,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskCategory::Professional => "professional",
            TaskCategory::Personal => "personal",
            TaskCategory::Learning => "learning",
            TaskCategory::Administrative => "administrative",
            TaskCategory::Other => "other",
        }
    }
}

impl fmt::Display for TaskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskCategory {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "professional" => Ok(TaskCategory::Professional),
            "personal" => Ok(TaskCategory::Personal),
            "learning" => Ok(TaskCategory::Learning),
            "administrative" => Ok(TaskCategory::Administrative),
            "other" => Ok(TaskCategory::Other),
            other => Err(ValidationError::InvalidValue {
                field: "category".to_string(),
                message: format!("unknown category '{other}'"),
            }),
        }
    }
}

/// A schedulable task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier, stable across updates
    pub id: String,
    /// Task title
    pub title: String,
    /// Free-text description
    #[serde(default)]
    pub description: String,
    /// Duration in hours (> 0); rounded up to whole-hour slots when placed
    pub duration: f64,
    /// The task must finish no later than this
    pub deadline: DateTime<Utc>,
    /// Priority 1-5, 5 highest
    pub priority: u8,
    /// Ids of tasks that must complete before this one starts
    #[serde(default)]
    pub dependencies: Vec<String>,
    /// Category for analytics and delegation heuristics
    #[serde(default)]
    pub category: TaskCategory,
    /// Energy level the task demands
    #[serde(default)]
    pub energy: EnergyLevel,
    /// Preferred part of the day
    #[serde(default)]
    pub time_preference: TimePreference,
    /// Completed tasks are excluded from scheduling and conflict checks
    #[serde(default)]
    pub completed: bool,
    /// Start time assigned by the last scheduling run (None = unplaced)
    #[serde(default)]
    pub scheduled_start: Option<DateTime<Utc>>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
    /// Completion timestamp (None if not completed)
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

/// Optional field overrides applied by [`Task::update`].
#[derive(Debug, Clone, Default)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub duration: Option<f64>,
    pub deadline: Option<DateTime<Utc>>,
    pub priority: Option<u8>,
    pub dependencies: Option<Vec<String>>,
    pub category: Option<TaskCategory>,
    pub energy: Option<EnergyLevel>,
    pub time_preference: Option<TimePreference>,
}

impl Task {
    /// Create a new task with default values.
    pub fn new(title: impl Into<String>) -> Self {
        let now = Utc::now();
        Task {
            id: format!("task-{}", uuid::Uuid::new_v4()),
            title: title.into(),
            description: String::new(),
            duration: 1.0,
            deadline: now + Duration::days(1),
            priority: 3,
            dependencies: Vec::new(),
            category: TaskCategory::Professional,
            energy: EnergyLevel::Medium,
            time_preference: TimePreference::None,
            completed: false,
            scheduled_start: None,
            created_at: now,
            updated_at: now,
            completed_at: None,
        }
    }

    /// Check the task invariants.
    ///
    /// A valid task has a non-empty title, positive duration and a priority
    /// in 1..=5. Enumerated fields are valid by construction.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::InvalidValue {
                field: "title".to_string(),
                message: "title must not be empty".to_string(),
            });
        }
        if self.duration <= 0.0 || !self.duration.is_finite() {
            return Err(ValidationError::InvalidValue {
                field: "duration".to_string(),
                message: format!("duration must be a positive number of hours, got {}", self.duration),
            });
        }
        if !(1..=5).contains(&self.priority) {
            return Err(ValidationError::InvalidValue {
                field: "priority".to_string(),
                message: format!("priority must be in 1..=5, got {}", self.priority),
            });
        }
        Ok(())
    }

    /// Apply field overrides and bump `updated_at`.
    pub fn update(&mut self, patch: TaskUpdate) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(duration) = patch.duration {
            self.duration = duration;
        }
        if let Some(deadline) = patch.deadline {
            self.deadline = deadline;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(dependencies) = patch.dependencies {
            self.dependencies = dependencies;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(energy) = patch.energy {
            self.energy = energy;
        }
        if let Some(time_preference) = patch.time_preference {
            self.time_preference = time_preference;
        }
        self.updated_at = Utc::now();
    }

    /// Mark the task completed.
    pub fn complete(&mut self) {
        self.completed = true;
        let now = Utc::now();
        self.completed_at = Some(now);
        self.updated_at = now;
    }

    /// Revert a completion.
    pub fn uncomplete(&mut self) {
        self.completed = false;
        self.completed_at = None;
        self.updated_at = Utc::now();
    }

    /// Number of whole-hour slots this task occupies.
    pub fn slots_needed(&self) -> usize {
        (self.duration.ceil() as usize).max(1)
    }

    /// The task's duration as a chrono span.
    pub fn duration_span(&self) -> Duration {
        hours_to_duration(self.duration)
    }

    /// End of the scheduled interval, or None if the task is unplaced.
    pub fn end_time(&self) -> Option<DateTime<Utc>> {
        self.scheduled_start.map(|start| start + self.duration_span())
    }

    /// Whether two scheduled intervals intersect (half-open `[start, end)`).
    pub fn overlaps_with(&self, other: &Task) -> bool {
        match (self.scheduled_start, self.end_time(), other.scheduled_start, other.end_time()) {
            (Some(start), Some(end), Some(other_start), Some(other_end)) => {
                start < other_end && other_start < end
            }
            _ => false,
        }
    }

    /// Whether the deadline has passed without completion.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        !self.completed && now > self.deadline
    }

    /// Whether the task is due within the next 24 hours.
    pub fn is_imminent(&self, now: DateTime<Utc>) -> bool {
        if self.completed {
            return false;
        }
        let remaining = self.deadline - now;
        remaining > Duration::zero() && remaining <= Duration::hours(24)
    }
}

/// Convert a fractional hour count into a chrono span.
pub(crate) fn hours_to_duration(hours: f64) -> Duration {
    Duration::milliseconds((hours * 3_600_000.0).round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_task(title: &str) -> Task {
        let mut task = Task::new(title);
        task.deadline = Utc::now() + Duration::days(3);
        task
    }

    #[test]
    fn new_task_is_valid() {
        assert!(make_task("Write report").validate().is_ok());
    }

    #[test]
    fn blank_title_rejected() {
        let mut task = make_task("  ");
        task.title = "   ".to_string();
        assert!(task.validate().is_err());
    }

    #[test]
    fn non_positive_duration_rejected() {
        let mut task = make_task("Write report");
        task.duration = 0.0;
        assert!(task.validate().is_err());
        task.duration = -2.0;
        assert!(task.validate().is_err());
    }

    #[test]
    fn priority_out_of_range_rejected() {
        let mut task = make_task("Write report");
        task.priority = 0;
        assert!(task.validate().is_err());
        task.priority = 6;
        assert!(task.validate().is_err());
        task.priority = 5;
        assert!(task.validate().is_ok());
    }

    #[test]
    fn slots_round_up() {
        let mut task = make_task("Write report");
        task.duration = 0.5;
        assert_eq!(task.slots_needed(), 1);
        task.duration = 2.0;
        assert_eq!(task.slots_needed(), 2);
        task.duration = 2.1;
        assert_eq!(task.slots_needed(), 3);
    }

    #[test]
    fn overlap_requires_both_scheduled() {
        let start = Utc::now();
        let mut a = make_task("a");
        let b = make_task("b");
        a.scheduled_start = Some(start);
        assert!(!a.overlaps_with(&b));
    }

    #[test]
    fn adjacent_intervals_do_not_overlap() {
        let start = Utc::now();
        let mut a = make_task("a");
        a.duration = 1.0;
        a.scheduled_start = Some(start);
        let mut b = make_task("b");
        b.duration = 1.0;
        b.scheduled_start = Some(start + Duration::hours(1));
        assert!(!a.overlaps_with(&b));
        assert!(!b.overlaps_with(&a));

        b.scheduled_start = Some(start + Duration::minutes(30));
        assert!(a.overlaps_with(&b));
        assert!(b.overlaps_with(&a));
    }

    #[test]
    fn complete_and_uncomplete_track_timestamps() {
        let mut task = make_task("a");
        task.complete();
        assert!(task.completed);
        assert!(task.completed_at.is_some());
        task.uncomplete();
        assert!(!task.completed);
        assert!(task.completed_at.is_none());
    }

    #[test]
    fn overdue_and_imminent() {
        let now = Utc::now();
        let mut task = make_task("a");
        task.deadline = now - Duration::hours(1);
        assert!(task.is_overdue(now));
        assert!(!task.is_imminent(now));

        task.deadline = now + Duration::hours(12);
        assert!(!task.is_overdue(now));
        assert!(task.is_imminent(now));

        task.complete();
        assert!(!task.is_overdue(now));
        assert!(!task.is_imminent(now));
    }

    #[test]
    fn update_patch_applies_only_set_fields() {
        let mut task = make_task("Original");
        let created = task.created_at;
        task.update(TaskUpdate {
            title: Some("Renamed".to_string()),
            priority: Some(5),
            ..Default::default()
        });
        assert_eq!(task.title, "Renamed");
        assert_eq!(task.priority, 5);
        assert_eq!(task.duration, 1.0);
        assert_eq!(task.created_at, created);
    }

    #[test]
    fn enum_round_trips() {
        for level in ["high", "medium", "low"] {
            assert_eq!(level.parse::<EnergyLevel>().unwrap().as_str(), level);
        }
        for pref in ["morning", "afternoon", "evening", "none"] {
            assert_eq!(pref.parse::<TimePreference>().unwrap().as_str(), pref);
        }
        for cat in TaskCategory::all() {
            assert_eq!(cat.as_str().parse::<TaskCategory>().unwrap(), cat);
        }
        assert!("later".parse::<TimePreference>().is_err());
    }
}
