use chrono::{
  Datelike,
  Duration,
  NaiveDate,
  Utc
};
use chrono_tz::Tz;

pub const WEEK_LEN: usize = 7;

pub const WEEKDAY_LABELS:
  [&str; WEEK_LEN] = [
  "Sun", "Mon", "Tue", "Wed", "Thu",
  "Fri", "Sat",
];

// A week row of the month grid.
// Leading and trailing empty slots
// belong to adjacent months but still
// occupy a column.
#[derive(
  Debug, Clone, PartialEq, Eq,
)]
pub struct Week {
  days: [Option<NaiveDate>; WEEK_LEN]
}

impl Week {
  #[must_use]
  pub fn new(
    days: [Option<NaiveDate>; WEEK_LEN]
  ) -> Self {
    Self {
      days
    }
  }

  #[must_use]
  pub fn day(
    &self,
    col: usize
  ) -> Option<NaiveDate> {
    self
      .days
      .get(col)
      .copied()
      .flatten()
  }

  #[must_use]
  pub fn days(
    &self
  ) -> &[Option<NaiveDate>; WEEK_LEN]
  {
    &self.days
  }

  #[must_use]
  pub fn first_day(
    &self
  ) -> Option<NaiveDate> {
    self
      .days
      .iter()
      .find_map(|day| *day)
  }

  #[must_use]
  pub fn last_day(
    &self
  ) -> Option<NaiveDate> {
    self
      .days
      .iter()
      .rev()
      .find_map(|day| *day)
  }
}

#[must_use]
pub fn month_weeks(
  year: i32,
  month: u32
) -> Vec<Week> {
  let first =
    first_day_of_month(year, month);
  let total =
    days_in_month(year, month);
  let lead = first
    .weekday()
    .num_days_from_sunday()
    as usize;

  let mut cells: Vec<
    Option<NaiveDate>,
  > = vec![None; lead];
  for offset in 0..total {
    cells.push(Some(add_days(
      first,
      i64::from(offset)
    )));
  }
  while cells.len() % WEEK_LEN != 0 {
    cells.push(None);
  }

  cells
    .chunks_exact(WEEK_LEN)
    .map(|chunk| {
      let mut days =
        [None; WEEK_LEN];
      days.copy_from_slice(chunk);
      Week::new(days)
    })
    .collect()
}

#[must_use]
pub fn first_day_of_month(
  year: i32,
  month: u32
) -> NaiveDate {
  NaiveDate::from_ymd_opt(
    year, month, 1
  )
  .unwrap_or(NaiveDate::MIN)
}

#[must_use]
pub fn last_day_of_month(
  year: i32,
  month: u32
) -> NaiveDate {
  let (next_year, next_month) =
    if month >= 12 {
      (year.saturating_add(1), 1_u32)
    } else {
      (year, month + 1)
    };
  add_days(
    first_day_of_month(
      next_year, next_month
    ),
    -1
  )
}

#[must_use]
pub fn days_in_month(
  year: i32,
  month: u32
) -> u32 {
  last_day_of_month(year, month).day()
}

#[must_use]
pub fn add_days(
  date: NaiveDate,
  days: i64
) -> NaiveDate {
  date
    .checked_add_signed(Duration::days(
      days
    ))
    .unwrap_or(date)
}

#[must_use]
pub fn shift_months(
  date: NaiveDate,
  months: i32
) -> NaiveDate {
  let mut year = date.year();
  let mut month =
    date.month() as i32 + months;

  while month < 1 {
    month += 12;
    year = year.saturating_sub(1);
  }
  while month > 12 {
    month -= 12;
    year = year.saturating_add(1);
  }

  let month = month as u32;
  let day = date
    .day()
    .min(days_in_month(year, month));
  NaiveDate::from_ymd_opt(
    year, month, day
  )
  .unwrap_or(date)
}

#[must_use]
pub fn days_until_due(
  due: NaiveDate,
  today: NaiveDate
) -> i64 {
  (due - today).num_days()
}

#[must_use]
pub fn today_in_timezone(
  timezone: Tz
) -> NaiveDate {
  Utc::now()
    .with_timezone(&timezone)
    .date_naive()
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;

  use super::{
    WEEK_LEN,
    add_days,
    days_in_month,
    days_until_due,
    month_weeks,
    shift_months
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

  #[test]
  fn july_2025_grid_is_sunday_aligned()
  {
    // July 1st 2025 is a Tuesday, so
    // the first row carries two blank
    // leading cells.
    let weeks = month_weeks(2025, 7);
    assert_eq!(weeks.len(), 5);

    let first = &weeks[0];
    assert_eq!(first.day(0), None);
    assert_eq!(first.day(1), None);
    assert_eq!(
      first.day(2),
      Some(date(2025, 7, 1))
    );
    assert_eq!(
      first.first_day(),
      Some(date(2025, 7, 1))
    );

    let second = &weeks[1];
    assert_eq!(
      second.first_day(),
      Some(date(2025, 7, 6))
    );
    assert_eq!(
      second.last_day(),
      Some(date(2025, 7, 12))
    );

    let last = &weeks[4];
    assert_eq!(
      last.day(3),
      Some(date(2025, 7, 30))
    );
    assert_eq!(last.day(5), None);
  }

  #[test]
  fn every_week_has_seven_slots() {
    for (year, month) in [
      (2025, 2),
      (2024, 2),
      (2025, 12),
      (2026, 1),
    ] {
      for week in
        month_weeks(year, month)
      {
        assert_eq!(
          week.days().len(),
          WEEK_LEN
        );
      }
    }
  }

  #[test]
  fn month_lengths_handle_leap_years()
  {
    assert_eq!(
      days_in_month(2024, 2),
      29
    );
    assert_eq!(
      days_in_month(2025, 2),
      28
    );
    assert_eq!(
      days_in_month(2025, 12),
      31
    );
  }

  #[test]
  fn shifting_months_clamps_day() {
    assert_eq!(
      shift_months(
        date(2025, 7, 31),
        -1
      ),
      date(2025, 6, 30)
    );
    assert_eq!(
      shift_months(
        date(2025, 12, 15),
        1
      ),
      date(2026, 1, 15)
    );
    assert_eq!(
      shift_months(
        date(2025, 1, 10),
        -2
      ),
      date(2024, 11, 10)
    );
  }

  #[test]
  fn day_difference_is_signed() {
    let today = date(2025, 7, 10);
    assert_eq!(
      days_until_due(
        date(2025, 7, 10),
        today
      ),
      0
    );
    assert_eq!(
      days_until_due(
        date(2025, 7, 8),
        today
      ),
      -2
    );
    assert_eq!(
      days_until_due(
        date(2025, 7, 12),
        today
      ),
      2
    );
    assert_eq!(
      add_days(today, -4),
      date(2025, 7, 6)
    );
  }
}
