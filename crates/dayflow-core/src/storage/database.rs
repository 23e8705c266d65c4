//! SQLite-based storage for tasks and system constraints.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

use super::data_dir;
use crate::constraint::SystemConstraint;
use crate::error::{CoreError, DatabaseError};
use crate::task::{EnergyLevel, Task, TaskCategory, TimePreference};

/// Parse an RFC3339 timestamp, falling back to the current time.
fn parse_datetime_fallback(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

fn parse_optional_datetime(value: Option<String>) -> Option<DateTime<Utc>> {
    value.as_deref().map(parse_datetime_fallback)
}

/// Parse a JSON string list column.
fn parse_string_list(value: &str) -> Vec<String> {
    serde_json::from_str(value).unwrap_or_default()
}

fn row_to_task(row: &rusqlite::Row) -> Result<Task, rusqlite::Error> {
    let deadline: String = row.get(4)?;
    let dependencies: String = row.get(6)?;
    let category: String = row.get(7)?;
    let energy: String = row.get(8)?;
    let time_preference: String = row.get(9)?;
    let scheduled_start: Option<String> = row.get(11)?;
    let created_at: String = row.get(12)?;
    let updated_at: String = row.get(13)?;
    let completed_at: Option<String> = row.get(14)?;

    Ok(Task {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        duration: row.get(3)?,
        deadline: parse_datetime_fallback(&deadline),
        priority: row.get::<_, i64>(5)? as u8,
        dependencies: parse_string_list(&dependencies),
        category: category.parse().unwrap_or(TaskCategory::Other),
        energy: energy.parse().unwrap_or(EnergyLevel::Medium),
        time_preference: time_preference.parse().unwrap_or(TimePreference::None),
        completed: row.get(10)?,
        scheduled_start: parse_optional_datetime(scheduled_start),
        created_at: parse_datetime_fallback(&created_at),
        updated_at: parse_datetime_fallback(&updated_at),
        completed_at: parse_optional_datetime(completed_at),
    })
}

fn row_to_constraint(row: &rusqlite::Row) -> Result<SystemConstraint, rusqlite::Error> {
    let days: String = row.get(1)?;
    Ok(SystemConstraint {
        name: row.get(0)?,
        days: serde_json::from_str(&days).unwrap_or_default(),
        start_hour: row.get::<_, i64>(2)? as u32,
        end_hour: row.get::<_, i64>(3)? as u32,
    })
}

/// SQLite database for planner storage.
///
/// Stores the task list and the recurring system constraints.
pub struct PlannerDb {
    conn: Connection,
}

impl PlannerDb {
    /// Open the planner database at `~/.local/share/dayflow/dayflow.db`.
    ///
    /// Creates tables if they don't exist.
    pub fn open() -> Result<Self, CoreError> {
        let path = data_dir()?.join("dayflow.db");
        Ok(Self::open_at(&path)?)
    }

    /// Open the planner database at an explicit path.
    pub fn open_at(path: &Path) -> Result<Self, DatabaseError> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    #[cfg(test)]
    pub fn open_memory() -> Result<Self, DatabaseError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), DatabaseError> {
        self.conn
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS tasks (
                    id              TEXT PRIMARY KEY,
                    title           TEXT NOT NULL,
                    description     TEXT NOT NULL DEFAULT '',
                    duration        REAL NOT NULL,
                    deadline        TEXT NOT NULL,
                    priority        INTEGER NOT NULL,
                    dependencies    TEXT NOT NULL DEFAULT '[]',
                    category        TEXT NOT NULL DEFAULT 'professional',
                    energy          TEXT NOT NULL DEFAULT 'medium',
                    time_preference TEXT NOT NULL DEFAULT 'none',
                    completed       INTEGER NOT NULL DEFAULT 0,
                    scheduled_start TEXT,
                    created_at      TEXT NOT NULL,
                    updated_at      TEXT NOT NULL,
                    completed_at    TEXT
                );

                CREATE TABLE IF NOT EXISTS system_constraints (
                    name       TEXT PRIMARY KEY,
                    days       TEXT NOT NULL DEFAULT '[]',
                    start_hour INTEGER NOT NULL,
                    end_hour   INTEGER NOT NULL
                );",
            )
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))
    }

    /// Insert a task.
    pub fn insert_task(&self, task: &Task) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT INTO tasks (id, title, description, duration, deadline, priority,
                                dependencies, category, energy, time_preference, completed,
                                scheduled_start, created_at, updated_at, completed_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
            params![
                task.id,
                task.title,
                task.description,
                task.duration,
                task.deadline.to_rfc3339(),
                task.priority as i64,
                serde_json::to_string(&task.dependencies).unwrap_or_else(|_| "[]".to_string()),
                task.category.as_str(),
                task.energy.as_str(),
                task.time_preference.as_str(),
                task.completed,
                task.scheduled_start.map(|dt| dt.to_rfc3339()),
                task.created_at.to_rfc3339(),
                task.updated_at.to_rfc3339(),
                task.completed_at.map(|dt| dt.to_rfc3339()),
            ],
        )?;
        Ok(())
    }

    /// Fetch a task by id.
    pub fn get_task(&self, id: &str) -> Result<Option<Task>, DatabaseError> {
        let task = self
            .conn
            .query_row(
                "SELECT id, title, description, duration, deadline, priority, dependencies,
                        category, energy, time_preference, completed, scheduled_start,
                        created_at, updated_at, completed_at
                 FROM tasks WHERE id = ?1",
                params![id],
                row_to_task,
            )
            .optional()?;
        Ok(task)
    }

    /// List all tasks, oldest first.
    pub fn list_tasks(&self) -> Result<Vec<Task>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, description, duration, deadline, priority, dependencies,
                    category, energy, time_preference, completed, scheduled_start,
                    created_at, updated_at, completed_at
             FROM tasks ORDER BY created_at ASC",
        )?;
        let tasks = stmt
            .query_map([], row_to_task)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tasks)
    }

    /// Update a task row in full. Returns whether a row was updated.
    pub fn update_task(&self, task: &Task) -> Result<bool, DatabaseError> {
        let updated = self.conn.execute(
            "UPDATE tasks
             SET title = ?2, description = ?3, duration = ?4, deadline = ?5, priority = ?6,
                 dependencies = ?7, category = ?8, energy = ?9, time_preference = ?10,
                 completed = ?11, scheduled_start = ?12, updated_at = ?13, completed_at = ?14
             WHERE id = ?1",
            params![
                task.id,
                task.title,
                task.description,
                task.duration,
                task.deadline.to_rfc3339(),
                task.priority as i64,
                serde_json::to_string(&task.dependencies).unwrap_or_else(|_| "[]".to_string()),
                task.category.as_str(),
                task.energy.as_str(),
                task.time_preference.as_str(),
                task.completed,
                task.scheduled_start.map(|dt| dt.to_rfc3339()),
                task.updated_at.to_rfc3339(),
                task.completed_at.map(|dt| dt.to_rfc3339()),
            ],
        )?;
        Ok(updated > 0)
    }

    /// Persist a committed start time. Returns whether a row was updated.
    pub fn set_scheduled_start(
        &self,
        id: &str,
        scheduled_start: Option<DateTime<Utc>>,
    ) -> Result<bool, DatabaseError> {
        let updated = self.conn.execute(
            "UPDATE tasks SET scheduled_start = ?2, updated_at = ?3 WHERE id = ?1",
            params![
                id,
                scheduled_start.map(|dt| dt.to_rfc3339()),
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(updated > 0)
    }

    /// Delete a task. Returns whether a row was deleted.
    pub fn delete_task(&self, id: &str) -> Result<bool, DatabaseError> {
        let deleted = self
            .conn
            .execute("DELETE FROM tasks WHERE id = ?1", params![id])?;
        Ok(deleted > 0)
    }

    /// Insert or replace a constraint, keyed by name.
    pub fn upsert_constraint(&self, constraint: &SystemConstraint) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO system_constraints (name, days, start_hour, end_hour)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                constraint.name,
                serde_json::to_string(&constraint.days).unwrap_or_else(|_| "[]".to_string()),
                constraint.start_hour as i64,
                constraint.end_hour as i64,
            ],
        )?;
        Ok(())
    }

    /// List all constraints, by name.
    pub fn list_constraints(&self) -> Result<Vec<SystemConstraint>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT name, days, start_hour, end_hour FROM system_constraints ORDER BY name ASC",
        )?;
        let constraints = stmt
            .query_map([], row_to_constraint)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(constraints)
    }

    /// Delete a constraint. Returns whether a row was deleted.
    pub fn delete_constraint(&self, name: &str) -> Result<bool, DatabaseError> {
        let deleted = self.conn.execute(
            "DELETE FROM system_constraints WHERE name = ?1",
            params![name],
        )?;
        Ok(deleted > 0)
    }
}
