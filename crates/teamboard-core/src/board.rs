use tracing::debug;
use uuid::Uuid;

use crate::task::{
  Task,
  TaskStatus
};

#[must_use]
pub fn column_title(
  status: TaskStatus
) -> &'static str {
  match status {
    | TaskStatus::Todo => "To Do",
    | TaskStatus::InProgress => {
      "In Progress"
    }
    | TaskStatus::Completed => {
      "Completed"
    }
    | TaskStatus::Hold => "On Hold"
  }
}

#[derive(Debug, Clone)]
pub struct BoardColumn {
  pub status: TaskStatus,
  pub title:  &'static str,
  pub tasks:  Vec<Task>
}

// Columns come back in fixed board
// order; each column keeps the input
// task order.
#[must_use]
pub fn board_columns(
  tasks: &[Task]
) -> Vec<BoardColumn> {
  TaskStatus::ORDERED
    .into_iter()
    .map(|status| BoardColumn {
      status,
      title: column_title(status),
      tasks: tasks
        .iter()
        .filter(|task| {
          task.status == status
        })
        .cloned()
        .collect()
    })
    .collect()
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub struct StatusChange {
  pub task: Uuid,
  pub from: TaskStatus,
  pub to:   TaskStatus
}

// Resolves a card drop into the status
// change to request, or None when the
// drop is a no-op (unknown card,
// missing target, same column).
#[must_use]
pub fn plan_drop(
  tasks: &[Task],
  active: Uuid,
  over: Option<TaskStatus>
) -> Option<StatusChange> {
  let to = over?;
  let task = tasks
    .iter()
    .find(|task| task.id == active)?;
  if task.status == to {
    return None;
  }
  debug!(
    task = %active,
    from = task.status.as_wire(),
    to = to.as_wire(),
    "card drop planned"
  );
  Some(StatusChange {
    task: active,
    from: task.status,
    to
  })
}

// Swaps the server copy of a task back
// into the local list after an update
// round-trip.
pub fn apply_updated_task(
  tasks: &mut [Task],
  updated: &Task
) {
  if let Some(slot) = tasks
    .iter_mut()
    .find(|task| task.id == updated.id)
  {
    *slot = updated.clone();
  }
}

#[cfg(test)]
mod tests {
  use chrono::{
    NaiveDate,
    TimeZone,
    Utc
  };
  use uuid::Uuid;

  use super::{
    apply_updated_task,
    board_columns,
    plan_drop
  };
  use crate::task::{
    Task,
    TaskPriority,
    TaskStatus
  };

  fn task_with_status(
    title: &str,
    status: TaskStatus
  ) -> Task {
    let now = Utc
      .with_ymd_and_hms(
        2025, 7, 1, 9, 0, 0
      )
      .single()
      .expect("valid now");
    let start = NaiveDate::from_ymd_opt(
      2025, 7, 1
    )
    .expect("valid date");
    let due = NaiveDate::from_ymd_opt(
      2025, 7, 7
    )
    .expect("valid date");
    Task::new(
      title,
      "",
      status,
      TaskPriority::Medium,
      start,
      due,
      Uuid::new_v4(),
      now
    )
  }

  #[test]
  fn columns_keep_board_order() {
    let tasks = vec![
      task_with_status(
        "ship",
        TaskStatus::Completed
      ),
      task_with_status(
        "draft",
        TaskStatus::Todo
      ),
      task_with_status(
        "review",
        TaskStatus::Todo
      ),
    ];

    let columns =
      board_columns(&tasks);
    assert_eq!(columns.len(), 4);
    assert_eq!(
      columns[0].title,
      "To Do"
    );
    assert_eq!(
      columns[0].tasks.len(),
      2
    );
    assert_eq!(
      columns[0].tasks[0].title,
      "draft"
    );
    assert_eq!(
      columns[2].tasks.len(),
      1
    );
    assert!(
      columns[1].tasks.is_empty()
    );
    assert!(
      columns[3].tasks.is_empty()
    );
  }

  #[test]
  fn drop_on_new_column_plans_change()
  {
    let task = task_with_status(
      "draft",
      TaskStatus::Todo
    );
    let tasks = vec![task.clone()];

    let change = plan_drop(
      &tasks,
      task.id,
      Some(TaskStatus::InProgress)
    )
    .expect("change planned");
    assert_eq!(change.task, task.id);
    assert_eq!(
      change.from,
      TaskStatus::Todo
    );
    assert_eq!(
      change.to,
      TaskStatus::InProgress
    );
  }

  #[test]
  fn noop_drops_plan_nothing() {
    let task = task_with_status(
      "draft",
      TaskStatus::Todo
    );
    let tasks = vec![task.clone()];

    assert!(
      plan_drop(&tasks, task.id, None)
        .is_none()
    );
    assert!(
      plan_drop(
        &tasks,
        task.id,
        Some(TaskStatus::Todo)
      )
      .is_none()
    );
    assert!(
      plan_drop(
        &tasks,
        Uuid::new_v4(),
        Some(TaskStatus::Hold)
      )
      .is_none()
    );
  }

  #[test]
  fn updated_task_replaces_local_copy()
  {
    let task = task_with_status(
      "draft",
      TaskStatus::Todo
    );
    let mut tasks =
      vec![task.clone()];

    let mut updated = task;
    updated.status =
      TaskStatus::InProgress;
    apply_updated_task(
      &mut tasks, &updated
    );

    assert_eq!(
      tasks[0].status,
      TaskStatus::InProgress
    );
  }
}
