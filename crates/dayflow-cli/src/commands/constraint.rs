//! Protected time window commands.

use clap::Subcommand;
use dayflow_core::{PlannerDb, SystemConstraint};

#[derive(Subcommand)]
pub enum ConstraintAction {
    /// Add or replace a recurring protected window
    Add {
        /// Constraint name ("Lunch", "Standup")
        name: String,
        /// Comma-separated weekday indices, 0=Sunday .. 6=Saturday
        #[arg(long)]
        days: String,
        /// First protected hour (inclusive)
        #[arg(long)]
        start_hour: u32,
        /// First hour after the window (exclusive)
        #[arg(long)]
        end_hour: u32,
    },
    /// List protected windows
    List,
    /// Remove a protected window
    Remove {
        /// Constraint name
        name: String,
    },
}

fn parse_days(value: &str) -> Result<Vec<u8>, String> {
    value
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<u8>()
                .map_err(|_| format!("invalid weekday index '{}'", part.trim()))
        })
        .collect()
}

pub fn run(action: ConstraintAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = PlannerDb::open()?;

    match action {
        ConstraintAction::Add {
            name,
            days,
            start_hour,
            end_hour,
        } => {
            let constraint = SystemConstraint::new(name, parse_days(&days)?, start_hour, end_hour);
            constraint.validate()?;
            db.upsert_constraint(&constraint)?;
            println!("{}", serde_json::to_string_pretty(&constraint)?);
        }
        ConstraintAction::List => {
            let constraints = db.list_constraints()?;
            println!("{}", serde_json::to_string_pretty(&constraints)?);
        }
        ConstraintAction::Remove { name } => {
            if !db.delete_constraint(&name)? {
                return Err(format!("constraint '{name}' not found").into());
            }
            println!("Constraint removed: {name}");
        }
    }

    Ok(())
}
