//! Workload analytics commands.

use clap::Subcommand;
use dayflow_core::PlannerDb;

use super::load_engine;

#[derive(Subcommand)]
pub enum AnalyzeAction {
    /// Duration-hour totals by category, priority, energy and status
    Distribution,
    /// Check whether the coming week is overcommitted
    Overload,
    /// Tasks that could be handed to someone else
    Delegate,
    /// Tasks that could wait
    Postpone,
}

pub fn run(action: AnalyzeAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = PlannerDb::open()?;
    let scheduler = load_engine(&db)?;

    match action {
        AnalyzeAction::Distribution => {
            let distribution = scheduler.analyze_time_distribution();
            println!("{}", serde_json::to_string_pretty(&distribution)?);
        }
        AnalyzeAction::Overload => {
            let report = scheduler.check_overload();
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        AnalyzeAction::Delegate => {
            let candidates = scheduler.delegation_candidates();
            println!("{}", serde_json::to_string_pretty(&candidates)?);
        }
        AnalyzeAction::Postpone => {
            let candidates = scheduler.postponement_candidates();
            println!("{}", serde_json::to_string_pretty(&candidates)?);
        }
    }

    Ok(())
}
