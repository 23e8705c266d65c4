//! Task management commands.

use clap::Subcommand;
use dayflow_core::{PlannerDb, Task, TaskUpdate};

use super::{parse_deadline, parse_list};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Create a new task
    Add {
        /// Task title
        title: String,
        /// Task description
        #[arg(long, default_value = "")]
        description: String,
        /// Duration in hours
        #[arg(long, default_value = "1.0")]
        duration: f64,
        /// Deadline (YYYY-MM-DD, YYYY-MM-DDTHH:MM or RFC3339)
        #[arg(long)]
        deadline: String,
        /// Priority 1-5, 5 highest
        #[arg(long, default_value = "3")]
        priority: u8,
        /// Category: professional, personal, learning, administrative, other
        #[arg(long, default_value = "professional")]
        category: String,
        /// Energy level: high, medium, low
        #[arg(long, default_value = "medium")]
        energy: String,
        /// Time preference: morning, afternoon, evening, none
        #[arg(long, default_value = "none")]
        time_preference: String,
        /// Comma-separated ids of tasks this one depends on
        #[arg(long)]
        depends_on: Option<String>,
    },
    /// List tasks
    List {
        /// Only tasks that are not completed
        #[arg(long)]
        pending: bool,
    },
    /// Get task details
    Get {
        /// Task ID
        id: String,
    },
    /// Update a task
    Update {
        /// Task ID
        id: String,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// New description
        #[arg(long)]
        description: Option<String>,
        /// New duration in hours
        #[arg(long)]
        duration: Option<f64>,
        /// New deadline
        #[arg(long)]
        deadline: Option<String>,
        /// New priority
        #[arg(long)]
        priority: Option<u8>,
        /// New category
        #[arg(long)]
        category: Option<String>,
        /// New energy level
        #[arg(long)]
        energy: Option<String>,
        /// New time preference
        #[arg(long)]
        time_preference: Option<String>,
        /// New comma-separated dependency ids (replaces the current set)
        #[arg(long)]
        depends_on: Option<String>,
    },
    /// Mark a task completed (or revert with --undo)
    Complete {
        /// Task ID
        id: String,
        /// Revert the completion
        #[arg(long)]
        undo: bool,
    },
    /// Delete a task
    Remove {
        /// Task ID
        id: String,
    },
}

pub fn run(action: TaskAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = PlannerDb::open()?;

    match action {
        TaskAction::Add {
            title,
            description,
            duration,
            deadline,
            priority,
            category,
            energy,
            time_preference,
            depends_on,
        } => {
            let mut task = Task::new(title);
            task.description = description;
            task.duration = duration;
            task.deadline = parse_deadline(&deadline)?;
            task.priority = priority;
            task.category = category.parse()?;
            task.energy = energy.parse()?;
            task.time_preference = time_preference.parse()?;
            task.dependencies = depends_on.as_deref().map(parse_list).unwrap_or_default();
            task.validate()?;

            db.insert_task(&task)?;
            println!("Task created: {}", task.id);
            println!("{}", serde_json::to_string_pretty(&task)?);
        }
        TaskAction::List { pending } => {
            let tasks: Vec<Task> = db
                .list_tasks()?
                .into_iter()
                .filter(|task| !pending || !task.completed)
                .collect();
            println!("{}", serde_json::to_string_pretty(&tasks)?);
        }
        TaskAction::Get { id } => {
            let task = db
                .get_task(&id)?
                .ok_or_else(|| format!("task '{id}' not found"))?;
            println!("{}", serde_json::to_string_pretty(&task)?);
        }
        TaskAction::Update {
            id,
            title,
            description,
            duration,
            deadline,
            priority,
            category,
            energy,
            time_preference,
            depends_on,
        } => {
            let mut task = db
                .get_task(&id)?
                .ok_or_else(|| format!("task '{id}' not found"))?;

            let deadline = deadline.as_deref().map(parse_deadline).transpose()?;
            task.update(TaskUpdate {
                title,
                description,
                duration,
                deadline,
                priority,
                dependencies: depends_on.as_deref().map(parse_list),
                category: category.as_deref().map(str::parse).transpose()?,
                energy: energy.as_deref().map(str::parse).transpose()?,
                time_preference: time_preference.as_deref().map(str::parse).transpose()?,
            });
            task.validate()?;

            db.update_task(&task)?;
            println!("{}", serde_json::to_string_pretty(&task)?);
        }
        TaskAction::Complete { id, undo } => {
            let mut task = db
                .get_task(&id)?
                .ok_or_else(|| format!("task '{id}' not found"))?;
            if undo {
                task.uncomplete();
            } else {
                task.complete();
            }
            db.update_task(&task)?;
            println!("{}", serde_json::to_string_pretty(&task)?);
        }
        TaskAction::Remove { id } => {
            if !db.delete_task(&id)? {
                return Err(format!("task '{id}' not found").into());
            }
            println!("Task removed: {id}");
        }
    }

    Ok(())
}
