use tracing::{debug, instrument};

use tarefa_core::ids::TaskId;
use tarefa_core::model::{Completion, NewTask, Task};

use crate::database::Database;
use crate::error::StoreError;
use crate::row_helpers;

/// Repository for the `tasks` table.
///
/// Absence is a value here, never an error: reads return `Option`, and
/// writes addressed at a missing row return `Ok(false)`.
pub struct TaskRepo {
    db: Database,
}

impl TaskRepo {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Insert a new task and return its row id.
    ///
    /// Title, description, and subject must be non-empty; a title already
    /// held by another row is rejected as a constraint violation.
    #[instrument(skip(self, task), fields(title = %task.title))]
    pub fn create(&self, task: &NewTask) -> Result<TaskId, StoreError> {
        require_fields(&task.title, &task.description, &task.subject)?;

        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO tasks (title, description, subject, instructor, due_date, completed)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                rusqlite::params![
                    task.title,
                    task.description,
                    task.subject,
                    task.instructor,
                    task.due_date,
                    task.completed.to_string(),
                ],
            )?;
            Ok(TaskId::from_raw(conn.last_insert_rowid()))
        })
    }

    /// Get a task by id. `None` when no such row exists.
    pub fn get(&self, id: TaskId) -> Result<Option<Task>, StoreError> {
        self.db.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, title, description, subject, instructor, due_date, completed
                 FROM tasks WHERE id = ?1",
            )?;
            let mut rows = stmt.query([id.as_i64()])?;
            match rows.next()? {
                Some(row) => Ok(Some(row_to_task(row)?)),
                None => Ok(None),
            }
        })
    }

    /// Get a task by exact title. `None` when no such row exists.
    pub fn get_by_title(&self, title: &str) -> Result<Option<Task>, StoreError> {
        self.db.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, title, description, subject, instructor, due_date, completed
                 FROM tasks WHERE title = ?1",
            )?;
            let mut rows = stmt.query([title])?;
            match rows.next()? {
                Some(row) => Ok(Some(row_to_task(row)?)),
                None => Ok(None),
            }
        })
    }

    /// List all tasks in natural storage order (rowid order; no ORDER BY).
    pub fn list(&self) -> Result<Vec<Task>, StoreError> {
        self.db.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, title, description, subject, instructor, due_date, completed
                 FROM tasks",
            )?;
            let mut rows = stmt.query([])?;
            let mut results = Vec::new();
            while let Some(row) = rows.next()? {
                results.push(row_to_task(row)?);
            }
            Ok(results)
        })
    }

    /// Substring search on title.
    pub fn search(&self, pattern: &str) -> Result<Vec<Task>, StoreError> {
        self.db.with_conn(|conn| {
            let like = format!("%{}%", row_helpers::escape_like(pattern));
            let mut stmt = conn.prepare(
                "SELECT id, title, description, subject, instructor, due_date, completed
                 FROM tasks WHERE title LIKE ?1 ESCAPE '\\' ORDER BY id",
            )?;
            let mut rows = stmt.query([like])?;
            let mut results = Vec::new();
            while let Some(row) = rows.next()? {
                results.push(row_to_task(row)?);
            }
            Ok(results)
        })
    }

    /// Overwrite every field of the row matched by `task.id`, the title
    /// included. Returns false when no row has that id; retitling onto a
    /// name another row holds is a constraint violation.
    #[instrument(skip(self, task), fields(task_id = %task.id))]
    pub fn update(&self, task: &Task) -> Result<bool, StoreError> {
        require_fields(&task.title, &task.description, &task.subject)?;

        self.db.with_conn(|conn| {
            let rows = conn.execute(
                "UPDATE tasks SET title = ?1, description = ?2, subject = ?3,
                        instructor = ?4, due_date = ?5, completed = ?6
                 WHERE id = ?7",
                rusqlite::params![
                    task.title,
                    task.description,
                    task.subject,
                    task.instructor,
                    task.due_date,
                    task.completed.to_string(),
                    task.id.as_i64(),
                ],
            )?;
            Ok(rows > 0)
        })
    }

    /// Flip the completion flag only. Returns false when no row has that id.
    #[instrument(skip(self), fields(task_id = %id))]
    pub fn set_completed(&self, id: TaskId, completed: Completion) -> Result<bool, StoreError> {
        self.db.with_conn(|conn| {
            let rows = conn.execute(
                "UPDATE tasks SET completed = ?1 WHERE id = ?2",
                rusqlite::params![completed.to_string(), id.as_i64()],
            )?;
            Ok(rows > 0)
        })
    }

    /// Delete a task by id. Absorbing: returns false when nothing matched.
    #[instrument(skip(self), fields(task_id = %id))]
    pub fn delete(&self, id: TaskId) -> Result<bool, StoreError> {
        self.db.with_conn(|conn| {
            let rows = conn.execute("DELETE FROM tasks WHERE id = ?1", [id.as_i64()])?;
            debug!(rows, "delete by id");
            Ok(rows > 0)
        })
    }

    /// Delete a task by exact title. Absorbing, like [`TaskRepo::delete`].
    #[instrument(skip(self))]
    pub fn delete_by_title(&self, title: &str) -> Result<bool, StoreError> {
        self.db.with_conn(|conn| {
            let rows = conn.execute("DELETE FROM tasks WHERE title = ?1", [title])?;
            debug!(rows, "delete by title");
            Ok(rows > 0)
        })
    }

    /// Count stored tasks.
    pub fn count(&self) -> Result<i64, StoreError> {
        self.db.with_conn(|conn| {
            conn.query_row("SELECT COUNT(*) FROM tasks", [], |row| row.get(0))
                .map_err(StoreError::from)
        })
    }
}

fn require_fields(title: &str, description: &str, subject: &str) -> Result<(), StoreError> {
    for (column, value) in [
        ("title", title),
        ("description", description),
        ("subject", subject),
    ] {
        if value.trim().is_empty() {
            return Err(StoreError::Constraint(format!("{column} must not be empty")));
        }
    }
    Ok(())
}

fn row_to_task(row: &rusqlite::Row<'_>) -> Result<Task, StoreError> {
    let completed: String = row_helpers::get(row, 6, "tasks", "completed")?;
    Ok(Task {
        id: TaskId::from_raw(row_helpers::get(row, 0, "tasks", "id")?),
        title: row_helpers::get(row, 1, "tasks", "title")?,
        description: row_helpers::get(row, 2, "tasks", "description")?,
        subject: row_helpers::get(row, 3, "tasks", "subject")?,
        instructor: row_helpers::get(row, 4, "tasks", "instructor")?,
        due_date: row_helpers::get(row, 5, "tasks", "due_date")?,
        completed: row_helpers::parse_enum(&completed, "tasks", "completed")?,
    })
}
