use std::io::{self, IsTerminal, Write};

use chrono::NaiveDate;
use unicode_width::UnicodeWidthStr;

use crate::board::BoardColumn;
use crate::calendar::{WEEK_LEN, WEEKDAY_LABELS, Week};
use crate::config::AppConfig;
use crate::layout::Placement;
use crate::project::Project;
use crate::task::Task;

const CALENDAR_CELL_WIDTH: usize = 14;

#[derive(Debug, Clone)]
pub struct Renderer {
    color: bool,
}

impl Renderer {
    #[must_use]
    pub fn new(cfg: &AppConfig) -> Self {
        Self { color: cfg.ui.color }
    }

    #[tracing::instrument(skip(self, projects))]
    pub fn print_projects(&self, projects: &[Project]) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();

        let headers = vec![
            "ID".to_string(),
            "Name".to_string(),
            "Members".to_string(),
            "Description".to_string(),
        ];
        let rows = projects
            .iter()
            .map(|project| {
                vec![
                    self.paint(&short_id(&project.id.to_string()), "33"),
                    project.name.clone(),
                    project.members.len().to_string(),
                    project.description.clone().unwrap_or_default(),
                ]
            })
            .collect();

        write_table(&mut out, headers, rows)?;
        Ok(())
    }

    #[tracing::instrument(skip(self, tasks))]
    pub fn print_task_table(&self, tasks: &[Task], today: NaiveDate) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();

        let headers = vec![
            "ID".to_string(),
            "Status".to_string(),
            "Pri".to_string(),
            "Due".to_string(),
            "Title".to_string(),
            "Assignees".to_string(),
        ];

        let mut rows = Vec::with_capacity(tasks.len());
        for task in tasks {
            let due = task.due_date.format("%Y-%m-%d").to_string();
            let due = if task.is_overdue(today) {
                self.paint(&due, "31")
            } else {
                due
            };
            let assignees = task
                .assignees
                .iter()
                .map(|member| member.name.as_str())
                .collect::<Vec<_>>()
                .join(", ");

            rows.push(vec![
                self.paint(&short_id(&task.id.to_string()), "33"),
                task.status.as_wire().to_string(),
                task.priority.as_wire().to_string(),
                due,
                task.title.clone(),
                assignees,
            ]);
        }

        write_table(&mut out, headers, rows)?;
        Ok(())
    }

    #[tracing::instrument(skip(self, columns))]
    pub fn print_board(&self, columns: &[BoardColumn]) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();

        for column in columns {
            writeln!(out, "{} ({})", self.paint(column.title, "1"), column.tasks.len())?;
            for task in &column.tasks {
                writeln!(
                    out,
                    "  {} {} [{}]",
                    self.paint(&short_id(&task.id.to_string()), "33"),
                    task.title,
                    task.priority.as_wire()
                )?;
            }
            if column.tasks.is_empty() {
                writeln!(out, "  (empty)")?;
            }
            writeln!(out)?;
        }

        Ok(())
    }

    /// Month grid: a day-number row per week, then one row per occupied
    /// slot. A bar prints its title in the first cell and dashes across the
    /// rest of its span.
    #[tracing::instrument(skip(self, weeks, placements, tasks))]
    pub fn print_calendar(
        &self,
        year: i32,
        month: u32,
        weeks: &[Week],
        placements: &[Vec<Placement>],
        tasks: &[Task],
    ) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();

        writeln!(out, "{}", self.paint(&format!("{year}-{month:02}"), "1"))?;
        for label in WEEKDAY_LABELS {
            write!(out, "{label:<CALENDAR_CELL_WIDTH$}")?;
        }
        writeln!(out)?;
        writeln!(out, "{}", "-".repeat(CALENDAR_CELL_WIDTH * WEEK_LEN))?;

        for (week, week_placements) in weeks.iter().zip(placements) {
            for col in 0..WEEK_LEN {
                let cell = week
                    .day(col)
                    .map(|day| day.format("%e").to_string())
                    .unwrap_or_default();
                write!(out, "{cell:<CALENDAR_CELL_WIDTH$}")?;
            }
            writeln!(out)?;

            let slot_count = week_placements
                .iter()
                .map(|placement| placement.slot + 1)
                .max()
                .unwrap_or(0);

            for slot in 0..slot_count {
                let mut col = 0;
                while col < WEEK_LEN {
                    let placed = week_placements.iter().find(|placement| {
                        placement.slot == slot && placement.start_col == col
                    });
                    match placed {
                        Some(placement) => {
                            let title = tasks
                                .iter()
                                .find(|task| task.id == placement.task)
                                .map(|task| task.title.as_str())
                                .unwrap_or("?");
                            let width = CALENDAR_CELL_WIDTH * placement.span;
                            let bar = fit_width(&format!("[{title}"), width - 1);
                            write!(out, "{bar:-<rest$}]", rest = width - 1)?;
                            col += placement.span;
                        }
                        None => {
                            write!(out, "{:CALENDAR_CELL_WIDTH$}", "")?;
                            col += 1;
                        }
                    }
                }
                writeln!(out)?;
            }
            writeln!(out)?;
        }

        Ok(())
    }

    fn paint(&self, text: &str, code: &str) -> String {
        if !self.color || !io::stdout().is_terminal() {
            return text.to_string();
        }
        format!("\x1b[{code}m{text}\x1b[0m")
    }
}

fn short_id(id: &str) -> String {
    id.chars().take(8).collect()
}

fn fit_width(text: &str, width: usize) -> String {
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let char_width = UnicodeWidthStr::width(ch.to_string().as_str());
        if used + char_width > width {
            break;
        }
        out.push(ch);
        used += char_width;
    }
    out
}

fn write_table<W: Write>(
    mut writer: W,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
) -> anyhow::Result<()> {
    let column_count = headers.len();
    let mut widths = vec![0usize; column_count];

    for (idx, header) in headers.iter().enumerate() {
        widths[idx] = widths[idx].max(UnicodeWidthStr::width(header.as_str()));
    }

    for row in &rows {
        for (idx, cell) in row.iter().enumerate() {
            widths[idx] = widths[idx].max(UnicodeWidthStr::width(strip_ansi(cell).as_str()));
        }
    }

    for idx in 0..column_count {
        write!(writer, "{:width$} ", headers[idx], width = widths[idx])?;
    }
    writeln!(writer)?;

    for idx in 0..column_count {
        write!(writer, "{:-<width$} ", "", width = widths[idx])?;
    }
    writeln!(writer)?;

    for row in rows {
        for idx in 0..column_count {
            let cell = &row[idx];
            let visible_width = UnicodeWidthStr::width(strip_ansi(cell).as_str());
            let padding = widths[idx].saturating_sub(visible_width);
            write!(writer, "{}{} ", cell, " ".repeat(padding))?;
        }
        writeln!(writer)?;
    }

    Ok(())
}

fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut escaped = false;

    for ch in s.chars() {
        if escaped {
            if ch == 'm' {
                escaped = false;
            }
            continue;
        }

        if ch == '\x1b' {
            escaped = true;
            continue;
        }

        out.push(ch);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::{fit_width, short_id, strip_ansi, write_table};

    #[test]
    fn table_pads_by_visible_width() {
        let mut buffer = Vec::new();
        let headers = vec!["ID".to_string(), "Title".to_string()];
        let rows = vec![vec![
            "\x1b[33mabcd1234\x1b[0m".to_string(),
            "Homepage".to_string(),
        ]];

        write_table(&mut buffer, headers, rows).expect("write table");
        let text = String::from_utf8(buffer).expect("utf8");
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with("ID"));
        assert!(strip_ansi(lines[2]).starts_with("abcd1234"));
    }

    #[test]
    fn short_ids_truncate_uuids() {
        assert_eq!(
            short_id("0b318723-7a1f-4a52-b8f1-cc7e8a1f0000"),
            "0b318723"
        );
        assert_eq!(short_id("abc"), "abc");
    }

    #[test]
    fn bars_clip_to_their_span() {
        assert_eq!(fit_width("[Homepage layout design", 10), "[Homepage ");
        assert_eq!(fit_width("[QA", 10), "[QA");
    }
}
