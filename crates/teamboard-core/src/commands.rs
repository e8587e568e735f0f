use anyhow::{Context, anyhow};
use chrono::{Datelike, NaiveDate};
use regex::Regex;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::api::{Backend, MockBackend};
use crate::auth::Session;
use crate::board;
use crate::calendar;
use crate::chat::ChatStore;
use crate::cli::Invocation;
use crate::config::AppConfig;
use crate::layout;
use crate::notify::{self, NotificationCenter};
use crate::project::Project;
use crate::render::Renderer;
use crate::task::{Task, TaskStatus};

pub fn known_command_names() -> Vec<&'static str> {
    vec![
        "projects",
        "tasks",
        "board",
        "calendar",
        "move",
        "chat",
        "notifications",
        "export",
        "help",
        "version",
    ]
}

pub fn expand_command_abbrev<'a>(token: &'a str, known: &[&'a str]) -> Option<&'a str> {
    if known.contains(&token) {
        return Some(token);
    }

    let mut matches = known.iter().copied().filter(|name| name.starts_with(token));
    let first = matches.next()?;
    if matches.next().is_some() {
        None
    } else {
        Some(first)
    }
}

#[instrument(skip(cfg, renderer, inv))]
pub fn dispatch(cfg: &AppConfig, renderer: &Renderer, inv: Invocation) -> anyhow::Result<()> {
    let today = calendar::today_in_timezone(cfg.timezone());
    let mut backend = MockBackend::seeded();
    let session = Session::login(&mut backend, "admin", "admin123")
        .context("failed to sign in to the demo workspace")?;
    let command = inv.command.as_str();

    debug!(command, args = ?inv.args, %today, "dispatching command");

    match command {
        "projects" => cmd_projects(&backend, &session, renderer),
        "tasks" => cmd_tasks(&backend, &session, renderer, &inv.args, today),
        "board" => cmd_board(&backend, &session, renderer, &inv.args),
        "calendar" => cmd_calendar(&backend, &session, renderer, &inv.args, today),
        "move" => cmd_move(&mut backend, &session, renderer, &inv.args),
        "chat" => cmd_chat(&inv.args),
        "notifications" => cmd_notifications(&backend, &session, today),
        "export" => cmd_export(&backend, &session, &inv.args),
        "help" => cmd_help(),
        "version" => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => Err(anyhow!("unknown command: {other}")),
    }
}

fn cmd_projects(
    backend: &impl Backend,
    session: &Session,
    renderer: &Renderer,
) -> anyhow::Result<()> {
    let projects = backend.projects(&session.token)?;
    renderer.print_projects(&projects)
}

fn cmd_tasks(
    backend: &impl Backend,
    session: &Session,
    renderer: &Renderer,
    args: &[String],
    today: NaiveDate,
) -> anyhow::Result<()> {
    let project = resolve_project(backend, session, args.first())?;
    let tasks = backend.tasks_by_project(&session.token, project.id)?;
    info!(project = %project.name, tasks = tasks.len(), "listing tasks");
    renderer.print_task_table(&tasks, today)
}

fn cmd_board(
    backend: &impl Backend,
    session: &Session,
    renderer: &Renderer,
    args: &[String],
) -> anyhow::Result<()> {
    let project = resolve_project(backend, session, args.first())?;
    let tasks = backend.tasks_by_project(&session.token, project.id)?;
    let columns = board::board_columns(&tasks);
    renderer.print_board(&columns)
}

fn cmd_calendar(
    backend: &impl Backend,
    session: &Session,
    renderer: &Renderer,
    args: &[String],
    today: NaiveDate,
) -> anyhow::Result<()> {
    let (month_arg, project_arg) = match args.first() {
        Some(first) if looks_like_month(first) => (Some(first.as_str()), args.get(1)),
        first => (None, first),
    };
    let (year, month) = match month_arg {
        Some(raw) => parse_month(raw)?,
        None => (today.year(), today.month()),
    };

    let project = resolve_project(backend, session, project_arg)?;
    let tasks = backend.tasks_by_project(&session.token, project.id)?;

    let weeks = calendar::month_weeks(year, month);
    let placements: Vec<_> = weeks
        .iter()
        .map(|week| layout::layout_week(week, &tasks, today))
        .collect();

    renderer.print_calendar(year, month, &weeks, &placements, &tasks)
}

fn cmd_move(
    backend: &mut impl Backend,
    session: &Session,
    renderer: &Renderer,
    args: &[String],
) -> anyhow::Result<()> {
    let [task_arg, status_arg, rest @ ..] = args else {
        return Err(anyhow!("usage: move <task-id> <status> [project]"));
    };
    let status = TaskStatus::parse(status_arg)
        .ok_or_else(|| anyhow!("unknown status: {status_arg}"))?;

    let project = resolve_project(backend, session, rest.first())?;
    let mut tasks = backend.tasks_by_project(&session.token, project.id)?;
    let task = resolve_task(&tasks, task_arg)?;

    let Some(change) = board::plan_drop(&tasks, task, Some(status)) else {
        info!(task = %task, "task already in that column");
        return Ok(());
    };

    let updated = backend.update_task_status(&session.token, change.task, change.to)?;
    info!(
        task = %updated.id,
        from = change.from.as_wire(),
        to = change.to.as_wire(),
        "task moved"
    );
    board::apply_updated_task(&mut tasks, &updated);
    renderer.print_board(&board::board_columns(&tasks))
}

fn cmd_chat(args: &[String]) -> anyhow::Result<()> {
    let mut chat = ChatStore::seeded();
    let mut center = NotificationCenter::seeded();

    let Some(channel) = args.first() else {
        println!("Channels:");
        for entry in chat.channels() {
            println!("  #{} ({} unread)", entry.name, entry.unread_count);
        }
        println!("Direct messages:");
        for entry in chat.direct_messages() {
            println!("  {} ({} unread)", entry.name, entry.unread_count);
        }
        return Ok(());
    };

    let opened = chat.open(channel)?.name.clone();
    center.mark_read_for_chat(channel);

    println!("#{opened}");
    for message in chat.messages(channel) {
        println!(
            "  [{}] {}: {}",
            message.timestamp.format("%H:%M"),
            message.author,
            message.content
        );
    }
    Ok(())
}

fn cmd_notifications(
    backend: &impl Backend,
    session: &Session,
    today: NaiveDate,
) -> anyhow::Result<()> {
    let center = NotificationCenter::seeded();
    println!("Notifications ({} unread):", center.unread_count());
    for entry in center.all() {
        let marker = if entry.read { " " } else { "*" };
        println!(
            "  {marker} [{}] {}",
            entry.timestamp.format("%m-%d %H:%M"),
            entry.content
        );
    }

    let mut all_tasks: Vec<Task> = Vec::new();
    for project in backend.projects(&session.token)? {
        all_tasks.extend(backend.tasks_by_project(&session.token, project.id)?);
    }
    let digest = notify::due_digest(&all_tasks, today);

    if !digest.due_today.is_empty() || !digest.urgent.is_empty() {
        println!("Due dates:");
        for id in &digest.due_today {
            if let Some(task) = all_tasks.iter().find(|task| task.id == *id) {
                println!("  due today: {}", task.title);
            }
        }
        for id in &digest.urgent {
            if let Some(task) = all_tasks.iter().find(|task| task.id == *id) {
                println!("  urgent: {} (due {})", task.title, task.due_date);
            }
        }
    }

    Ok(())
}

fn cmd_export(
    backend: &impl Backend,
    session: &Session,
    args: &[String],
) -> anyhow::Result<()> {
    let project = resolve_project(backend, session, args.first())?;
    let tasks = backend.tasks_by_project(&session.token, project.id)?;
    let json = serde_json::to_string_pretty(&tasks).context("failed to serialize tasks")?;
    println!("{json}");
    Ok(())
}

fn cmd_help() -> anyhow::Result<()> {
    println!("usage: teamboard [flags] <command> [args]");
    println!();
    println!("commands:");
    println!("  projects                    list projects");
    println!("  tasks [project]             list tasks for a project");
    println!("  board [project]             show the kanban board");
    println!("  calendar [YYYY-MM] [project] show the month calendar");
    println!("  move <task-id> <status> [project] move a task between columns");
    println!("  chat [channel]              list channels or read one");
    println!("  notifications               show notifications and due dates");
    println!("  export [project]            dump tasks as JSON");
    println!("  help                        show this message");
    println!("  version                     print the version");
    Ok(())
}

/// Picks a project by name (case-insensitive), by id prefix, or defaults to
/// the first one.
fn resolve_project(
    backend: &impl Backend,
    session: &Session,
    arg: Option<&String>,
) -> anyhow::Result<Project> {
    let projects = backend.projects(&session.token)?;
    let Some(wanted) = arg else {
        return projects
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("no projects available"));
    };

    let lowered = wanted.to_lowercase();
    projects
        .into_iter()
        .find(|project| {
            project.name.to_lowercase() == lowered || project.id.to_string().starts_with(&lowered)
        })
        .ok_or_else(|| anyhow!("no project matches '{wanted}'"))
}

fn resolve_task(tasks: &[Task], prefix: &str) -> anyhow::Result<Uuid> {
    let lowered = prefix.to_lowercase();
    let mut matches = tasks
        .iter()
        .filter(|task| task.id.to_string().starts_with(&lowered));
    let first = matches
        .next()
        .ok_or_else(|| anyhow!("no task matches '{prefix}'"))?;
    if matches.next().is_some() {
        return Err(anyhow!("task id '{prefix}' is ambiguous"));
    }
    Ok(first.id)
}

fn looks_like_month(raw: &str) -> bool {
    parse_month(raw).is_ok()
}

fn parse_month(raw: &str) -> anyhow::Result<(i32, u32)> {
    let pattern = Regex::new(r"^(\d{4})-(\d{2})$").context("invalid month pattern")?;
    let captures = pattern
        .captures(raw)
        .ok_or_else(|| anyhow!("expected YYYY-MM, got: {raw}"))?;
    let year: i32 = captures[1].parse().context("invalid year")?;
    let month: u32 = captures[2].parse().context("invalid month")?;
    if !(1..=12).contains(&month) {
        return Err(anyhow!("month out of range: {month}"));
    }
    Ok((year, month))
}

#[cfg(test)]
mod tests {
    use super::{expand_command_abbrev, known_command_names, parse_month, resolve_task};
    use crate::api::{Backend, MockBackend};
    use crate::auth::Session;

    #[test]
    fn abbreviations_resolve_unique_prefixes() {
        let known = known_command_names();
        assert_eq!(expand_command_abbrev("cal", &known), Some("calendar"));
        assert_eq!(expand_command_abbrev("proj", &known), Some("projects"));
        assert_eq!(expand_command_abbrev("board", &known), Some("board"));
        // "c" could be calendar or chat.
        assert_eq!(expand_command_abbrev("c", &known), None);
        assert_eq!(expand_command_abbrev("zzz", &known), None);
    }

    #[test]
    fn month_arguments_parse_strictly() {
        assert_eq!(parse_month("2025-07").expect("parse"), (2025, 7));
        assert!(parse_month("2025-7").is_err());
        assert!(parse_month("2025-13").is_err());
        assert!(parse_month("july").is_err());
    }

    #[test]
    fn task_prefixes_must_be_unambiguous() {
        let mut backend = MockBackend::seeded();
        let session = Session::login(&mut backend, "admin", "admin123").expect("login");
        let projects = backend.projects(&session.token).expect("projects");
        let tasks = backend
            .tasks_by_project(&session.token, projects[0].id)
            .expect("tasks");

        let full = tasks[0].id.to_string();
        assert_eq!(resolve_task(&tasks, &full[..8]).expect("resolve"), tasks[0].id);
        assert!(resolve_task(&tasks, "zzzzzzzz").is_err());
        assert!(resolve_task(&tasks, "").is_err());
    }
}
