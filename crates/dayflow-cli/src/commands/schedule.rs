//! Scheduling runs and schedule views.

use clap::Subcommand;
use dayflow_core::PlannerDb;

use super::{load_engine, parse_date, parse_datetime};

#[derive(Subcommand)]
pub enum ScheduleAction {
    /// Run the scheduler and persist the committed start times
    Run,
    /// Show scheduled tasks for one day
    Day {
        /// Date (YYYY-MM-DD)
        date: String,
    },
    /// Show scheduled tasks for the 7 days starting at a date
    Week {
        /// First day (YYYY-MM-DD)
        start: String,
    },
    /// Move a scheduled task to a new start time
    Move {
        /// Task ID
        id: String,
        /// New start (YYYY-MM-DDTHH:MM or RFC3339)
        start: String,
    },
}

pub fn run(action: ScheduleAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = PlannerDb::open()?;
    let mut scheduler = load_engine(&db)?;

    match action {
        ScheduleAction::Run => {
            let scheduled = scheduler.schedule().to_vec();
            for task in &scheduled {
                db.set_scheduled_start(&task.task.id, task.scheduled_start)?;
            }
            let placed = scheduled.iter().filter(|t| t.scheduled_start.is_some()).count();
            println!(
                "Scheduled {placed} of {} tasks",
                scheduled.len()
            );
            println!("{}", serde_json::to_string_pretty(&scheduled)?);
        }
        ScheduleAction::Day { date } => {
            scheduler.restore_schedule();
            let tasks = scheduler.tasks_for_date(parse_date(&date)?);
            println!("{}", serde_json::to_string_pretty(&tasks)?);
        }
        ScheduleAction::Week { start } => {
            scheduler.restore_schedule();
            let week = scheduler.tasks_for_week(parse_date(&start)?);
            println!("{}", serde_json::to_string_pretty(&week)?);
        }
        ScheduleAction::Move { id, start } => {
            scheduler.restore_schedule();
            let new_start = parse_datetime(&start)?;
            if !scheduler.move_task(&id, new_start)? {
                return Err(format!(
                    "cannot move task '{id}' to {new_start}: deadline, protected window or another task is in the way"
                )
                .into());
            }
            db.set_scheduled_start(&id, Some(new_start))?;
            println!("Task {id} moved to {new_start}");
        }
    }

    Ok(())
}
