//! Conflict listing and remediation proposals.

use dayflow_core::PlannerDb;

use super::load_engine;

pub fn run(propose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let db = PlannerDb::open()?;
    let mut scheduler = load_engine(&db)?;
    scheduler.restore_schedule();

    let conflicts = scheduler.identify_conflicts();
    if conflicts.is_empty() {
        println!("No conflicts found");
        return Ok(());
    }

    for conflict in &conflicts {
        println!("- {}", conflict.description());
    }

    if propose {
        let alternatives = scheduler.propose_alternatives(&conflicts);
        println!("{}", serde_json::to_string_pretty(&alternatives)?);
    }

    Ok(())
}
