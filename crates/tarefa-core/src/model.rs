use serde::{Deserialize, Serialize};

use crate::ids::TaskId;

/// Completion flag, stored as `"0"`/`"1"` text in the database.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Completion {
    #[default]
    Pending,
    Done,
}

impl Completion {
    pub fn is_done(self) -> bool {
        matches!(self, Self::Done)
    }
}

impl std::fmt::Display for Completion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "0"),
            Self::Done => write!(f, "1"),
        }
    }
}

impl std::str::FromStr for Completion {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "0" => Ok(Self::Pending),
            "1" => Ok(Self::Done),
            other => Err(format!("unknown completion flag: {other}")),
        }
    }
}

/// A stored task.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: String,
    pub subject: String,
    pub instructor: String,
    pub due_date: String,
    pub completed: Completion,
}

/// Fields for a task that has not been inserted yet.
/// `title`, `description`, and `subject` must be non-empty to be accepted by
/// the store; `instructor` and `due_date` may be empty. `due_date` is
/// free-form text, not a validated date.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub subject: String,
    pub instructor: String,
    pub due_date: String,
    pub completed: Completion,
}
