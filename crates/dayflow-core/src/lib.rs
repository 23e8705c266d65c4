//! # Dayflow Core Library
//!
//! This library provides the core business logic for the Dayflow personal
//! task planner. It implements a CLI-first philosophy where every operation
//! is available through a standalone binary built on top of this crate.
//!
//! ## Architecture
//!
//! - **Scheduler**: a greedy slot allocator over a 14-day hourly grid,
//!   guided by task priority, deadline, energy level and time preference
//! - **Conflicts**: detection of overlaps, deadline violations and
//!   dependency-order violations, with non-committing remediation proposals
//! - **Analytics**: workload distribution, overload checks and
//!   delegation/postponement candidates
//! - **Storage**: SQLite-based task store and TOML-based configuration
//!
//! ## Key Components
//!
//! - [`Scheduler`]: the scheduling and conflict-resolution engine
//! - [`Task`] / [`SystemConstraint`]: the input model
//! - [`ScheduledTask`]: a committed (or unplaced) schedule entry
//! - [`PlannerDb`] / [`PlannerConfig`]: caller-side persistence

pub mod alternatives;
pub mod analytics;
pub mod conflict;
pub mod constraint;
pub mod error;
pub mod ics;
pub mod scheduler;
pub mod storage;
pub mod task;

pub use alternatives::{Alternative, Impact, RemedyAction, RemedyOption};
pub use analytics::{OverloadReport, TimeDistribution};
pub use conflict::Conflict;
pub use constraint::SystemConstraint;
pub use error::{ConfigError, CoreError, DatabaseError, SchedulerError, ValidationError};
pub use ics::export_ics;
pub use scheduler::{ScheduledTask, Scheduler, SchedulerConfig, TimeSlot, TimeSlotGrid};
pub use storage::{PlannerConfig, PlannerDb};
pub use task::{EnergyLevel, Task, TaskCategory, TaskUpdate, TimePreference};
