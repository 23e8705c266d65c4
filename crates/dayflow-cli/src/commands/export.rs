//! Schedule export commands.

use clap::Subcommand;
use dayflow_core::{export_ics, PlannerDb};
use std::path::PathBuf;

use super::load_engine;

#[derive(Subcommand)]
pub enum ExportAction {
    /// Write the committed schedule as iCalendar
    Ics {
        /// Output path; stdout when omitted
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

pub fn run(action: ExportAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = PlannerDb::open()?;
    let mut scheduler = load_engine(&db)?;
    scheduler.restore_schedule();

    match action {
        ExportAction::Ics { output } => {
            let ics = export_ics(scheduler.scheduled_tasks());
            match output {
                Some(path) => {
                    std::fs::write(&path, ics)?;
                    println!("Schedule exported to {}", path.display());
                }
                None => print!("{ics}"),
            }
        }
    }

    Ok(())
}
