use chrono::{
  DateTime,
  NaiveDate,
  Utc
};
use serde::{
  Deserialize,
  Serialize
};
use uuid::Uuid;

use crate::project::Member;

#[derive(
  Debug,
  Clone,
  Copy,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
#[serde(
  rename_all = "SCREAMING_SNAKE_CASE"
)]
pub enum TaskStatus {
  Todo,
  InProgress,
  Completed,
  Hold
}

impl TaskStatus {
  pub const ORDERED: [TaskStatus; 4] = [
    TaskStatus::Todo,
    TaskStatus::InProgress,
    TaskStatus::Completed,
    TaskStatus::Hold,
  ];

  #[must_use]
  pub fn as_wire(
    &self
  ) -> &'static str {
    match self {
      | TaskStatus::Todo => "TODO",
      | TaskStatus::InProgress => {
        "IN_PROGRESS"
      }
      | TaskStatus::Completed => {
        "COMPLETED"
      }
      | TaskStatus::Hold => "HOLD"
    }
  }

  #[must_use]
  pub fn parse(
    raw: &str
  ) -> Option<Self> {
    match raw
      .trim()
      .to_ascii_uppercase()
      .as_str()
    {
      | "TODO" => {
        Some(TaskStatus::Todo)
      }
      | "IN_PROGRESS" => {
        Some(TaskStatus::InProgress)
      }
      | "COMPLETED" => {
        Some(TaskStatus::Completed)
      }
      | "HOLD" => {
        Some(TaskStatus::Hold)
      }
      | _ => None
    }
  }
}

#[derive(
  Debug,
  Clone,
  Copy,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
#[serde(
  rename_all = "SCREAMING_SNAKE_CASE"
)]
pub enum TaskPriority {
  Low,
  Medium,
  High
}

impl TaskPriority {
  #[must_use]
  pub fn as_wire(
    &self
  ) -> &'static str {
    match self {
      | TaskPriority::Low => "LOW",
      | TaskPriority::Medium => {
        "MEDIUM"
      }
      | TaskPriority::High => "HIGH"
    }
  }
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
)]
#[serde(rename_all = "camelCase")]
pub struct Task {
  pub id:          Uuid,
  pub title:       String,
  pub description: String,
  pub status:      TaskStatus,
  pub priority:    TaskPriority,
  pub assignees:   Vec<Member>,
  pub start_date:  NaiveDate,
  pub due_date:    NaiveDate,
  pub project_id:  Uuid,
  pub created_at:  DateTime<Utc>,
  pub updated_at:  DateTime<Utc>
}

impl Task {
  #[allow(
    clippy::too_many_arguments
  )]
  pub fn new(
    title: &str,
    description: &str,
    status: TaskStatus,
    priority: TaskPriority,
    start_date: NaiveDate,
    due_date: NaiveDate,
    project_id: Uuid,
    now: DateTime<Utc>
  ) -> Self {
    Self {
      id: Uuid::new_v4(),
      title: title.to_string(),
      description: description
        .to_string(),
      status,
      priority,
      assignees: vec![],
      start_date,
      due_date,
      project_id,
      created_at: now,
      updated_at: now
    }
  }

  #[must_use]
  pub fn days_left(
    &self,
    today: NaiveDate
  ) -> i64 {
    (self.due_date - today).num_days()
  }

  #[must_use]
  pub fn is_overdue(
    &self,
    today: NaiveDate
  ) -> bool {
    self.due_date < today
  }
}

#[derive(
  Debug, Clone, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub struct TaskCreate {
  pub title:       String,
  pub description: String,
  pub status:      TaskStatus,
  pub priority:    TaskPriority,
  pub start_date:  NaiveDate,
  pub due_date:    NaiveDate,
  pub project_id:  Uuid
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  Default,
)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
  pub title:       Option<String>,
  pub description: Option<String>,
  pub status:      Option<TaskStatus>,
  pub priority:
    Option<TaskPriority>,
  pub start_date:  Option<NaiveDate>,
  pub due_date:    Option<NaiveDate>
}

impl TaskPatch {
  pub fn apply(
    &self,
    task: &mut Task,
    now: DateTime<Utc>
  ) {
    if let Some(title) = &self.title {
      task.title = title.clone();
    }
    if let Some(description) =
      &self.description
    {
      task.description =
        description.clone();
    }
    if let Some(status) = self.status {
      task.status = status;
    }
    if let Some(priority) =
      self.priority
    {
      task.priority = priority;
    }
    if let Some(start_date) =
      self.start_date
    {
      task.start_date = start_date;
    }
    if let Some(due_date) =
      self.due_date
    {
      task.due_date = due_date;
    }
    task.updated_at = now;
  }
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
  pub id:        Uuid,
  pub author:    String,
  pub content:   String,
  pub timestamp: DateTime<Utc>
}
