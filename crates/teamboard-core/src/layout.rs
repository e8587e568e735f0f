use chrono::{
  Datelike,
  NaiveDate
};
use tracing::{
  debug,
  warn
};
use uuid::Uuid;

use crate::calendar::{
  WEEK_LEN,
  Week,
  days_until_due
};
use crate::task::Task;

// Computed position of one task bar
// within a week row. Recomputed fresh
// on every layout pass; slot numbers
// carry no meaning across weeks.
#[derive(
  Debug, Clone, PartialEq, Eq,
)]
pub struct Placement {
  pub task:      Uuid,
  pub start_col: usize,
  pub span:      usize,
  pub slot:      usize,
  pub days_left: i64
}

#[must_use]
pub fn layout_week(
  week: &Week,
  tasks: &[Task],
  today: NaiveDate
) -> Vec<Placement> {
  let (
    Some(week_start),
    Some(week_end),
  ) = (
    week.first_day(),
    week.last_day(),
  )
  else {
    return Vec::new();
  };

  let mut in_week: Vec<&Task> = tasks
    .iter()
    .filter(|task| {
      task.start_date <= week_end
        && task.due_date >= week_start
    })
    .collect();
  in_week
    .sort_by_key(|task| {
      task.start_date
    });

  let mut columns: [Vec<
    Option<Uuid>,
  >; WEEK_LEN] = Default::default();
  let mut placements =
    Vec::with_capacity(in_week.len());

  for task in in_week {
    let start_col =
      if task.start_date < week_start {
        0
      } else {
        weekday_col(task.start_date)
      };
    let raw_end =
      if task.due_date > week_end {
        WEEK_LEN - 1
      } else {
        weekday_col(task.due_date)
      };
    let end_col = if raw_end < start_col
    {
      warn!(
        task = %task.id,
        start = %task.start_date,
        due = %task.due_date,
        "task date range is inverted; \
         clamping bar to one column"
      );
      start_col
    } else {
      raw_end
    };
    let span = end_col - start_col + 1;

    let slot = first_free_slot(
      &columns, start_col, end_col
    );
    for column in columns
      .iter_mut()
      .take(end_col + 1)
      .skip(start_col)
    {
      if column.len() <= slot {
        column
          .resize(slot + 1, None);
      }
      column[slot] = Some(task.id);
    }

    placements.push(Placement {
      task: task.id,
      start_col,
      span,
      slot,
      days_left: days_until_due(
        task.due_date,
        today
      )
    });
  }

  debug!(
    week_start = %week_start,
    week_end = %week_end,
    placed = placements.len(),
    "week layout computed"
  );
  placements
}

fn weekday_col(
  date: NaiveDate
) -> usize {
  date
    .weekday()
    .num_days_from_sunday()
    as usize
}

fn first_free_slot(
  columns: &[Vec<Option<Uuid>>;
    WEEK_LEN],
  start_col: usize,
  end_col: usize
) -> usize {
  let mut slot = 0;
  loop {
    let free = (start_col..=end_col)
      .all(|col| {
        columns[col]
          .get(slot)
          .is_none_or(Option::is_none)
      });
    if free {
      return slot;
    }
    slot += 1;
  }
}
