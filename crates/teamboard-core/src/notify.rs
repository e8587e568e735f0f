use chrono::{
  DateTime,
  Duration,
  NaiveDate,
  TimeZone,
  Utc
};
use tracing::debug;
use uuid::Uuid;

use crate::task::{
  Task,
  TaskPriority
};

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum NotificationKind {
  Mention,
  Assignment,
  Comment
}

#[derive(Debug, Clone)]
pub struct Notification {
  pub id:        Uuid,
  pub kind:      NotificationKind,
  pub content:   String,
  pub timestamp: DateTime<Utc>,
  pub read:      bool,
  // Set when the notification came
  // from a chat channel; opening that
  // channel marks it read.
  pub chat_id:   Option<String>
}

#[derive(Debug, Default)]
pub struct NotificationCenter {
  notifications: Vec<Notification>
}

impl NotificationCenter {
  #[must_use]
  pub fn seeded() -> Self {
    let base = Utc
      .with_ymd_and_hms(
        2025, 7, 10, 9, 0, 0
      )
      .single()
      .unwrap_or_else(Utc::now);

    Self {
      notifications: vec![
        Notification {
          id: Uuid::new_v4(),
          kind:
            NotificationKind::Mention,
          content:
            "Brian Lee mentioned you \
             in #project-updates"
              .to_string(),
          timestamp: base,
          read: false,
          chat_id: Some(
            "project-updates"
              .to_string()
          )
        },
        Notification {
          id: Uuid::new_v4(),
          kind:
            NotificationKind::Assignment,
          content:
            "You were assigned to \
             'Release QA pass'"
              .to_string(),
          timestamp: base
            - Duration::hours(3),
          read: false,
          chat_id: None
        },
        Notification {
          id: Uuid::new_v4(),
          kind:
            NotificationKind::Comment,
          content:
            "New comment on \
             'Homepage layout \
             design'"
              .to_string(),
          timestamp: base
            - Duration::hours(20),
          read: true,
          chat_id: None
        },
      ]
    }
  }

  #[must_use]
  pub fn all(
    &self
  ) -> &[Notification] {
    &self.notifications
  }

  #[must_use]
  pub fn unread_count(
    &self
  ) -> usize {
    self
      .notifications
      .iter()
      .filter(|entry| !entry.read)
      .count()
  }

  pub fn push(
    &mut self,
    notification: Notification
  ) {
    self
      .notifications
      .push(notification);
  }

  pub fn mark_all_read(&mut self) {
    for entry in
      &mut self.notifications
    {
      entry.read = true;
    }
  }

  // Opening a chat channel also
  // settles the notifications that
  // pointed at it.
  pub fn mark_read_for_chat(
    &mut self,
    chat_id: &str
  ) {
    let mut cleared = 0_usize;
    for entry in
      &mut self.notifications
    {
      if entry.chat_id.as_deref()
        == Some(chat_id)
        && !entry.read
      {
        entry.read = true;
        cleared += 1;
      }
    }
    if cleared > 0 {
      debug!(
        chat = chat_id,
        cleared,
        "chat notifications settled"
      );
    }
  }
}

// Due-date digest for one day. Tasks
// land in both buckets when they
// qualify for both.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct DueDigest {
  pub due_today: Vec<Uuid>,
  pub urgent:    Vec<Uuid>
}

#[must_use]
pub fn due_digest(
  tasks: &[Task],
  today: NaiveDate
) -> DueDigest {
  let mut digest =
    DueDigest::default();
  for task in tasks {
    let days_left =
      task.days_left(today);
    if days_left == 0 {
      digest.due_today.push(task.id);
    }
    if days_left <= 3
      && task.priority
        == TaskPriority::High
    {
      digest.urgent.push(task.id);
    }
  }
  digest
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
    NotificationCenter,
    due_digest
  };
  use crate::task::{
    Task,
    TaskPriority,
    TaskStatus
  };

  fn date(
    year: i32,
    month: u32,
    day: u32
  ) -> NaiveDate {
    NaiveDate::from_ymd_opt(
      year, month, day
    )
    .expect("valid date")
  }

  fn task_due(
    title: &str,
    priority: TaskPriority,
    due: NaiveDate
  ) -> Task {
    let now = Utc
      .with_ymd_and_hms(
        2025, 7, 1, 9, 0, 0
      )
      .single()
      .expect("valid now");
    Task::new(
      title,
      "",
      TaskStatus::Todo,
      priority,
      date(2025, 7, 1),
      due,
      Uuid::new_v4(),
      now
    )
  }

  #[test]
  fn seeded_center_counts_unread() {
    let center =
      NotificationCenter::seeded();
    assert_eq!(
      center.all().len(),
      3
    );
    assert_eq!(
      center.unread_count(),
      2
    );
  }

  #[test]
  fn opening_a_chat_settles_its_entries()
   {
    let mut center =
      NotificationCenter::seeded();
    center.mark_read_for_chat(
      "project-updates"
    );
    assert_eq!(
      center.unread_count(),
      1
    );

    center.mark_all_read();
    assert_eq!(
      center.unread_count(),
      0
    );
  }

  #[test]
  fn digest_buckets_by_deadline() {
    let today = date(2025, 7, 10);
    let due_now = task_due(
      "due now",
      TaskPriority::Low,
      date(2025, 7, 10)
    );
    let urgent = task_due(
      "urgent",
      TaskPriority::High,
      date(2025, 7, 12)
    );
    let both = task_due(
      "both",
      TaskPriority::High,
      date(2025, 7, 10)
    );
    let calm = task_due(
      "calm",
      TaskPriority::High,
      date(2025, 7, 20)
    );
    let tasks = vec![
      due_now.clone(),
      urgent.clone(),
      both.clone(),
      calm,
    ];

    let digest =
      due_digest(&tasks, today);
    assert_eq!(
      digest.due_today,
      vec![due_now.id, both.id]
    );
    assert_eq!(
      digest.urgent,
      vec![urgent.id, both.id]
    );
  }
}
