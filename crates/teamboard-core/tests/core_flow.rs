use chrono::NaiveDate;
use teamboard_core::api::{Backend, MockBackend};
use teamboard_core::auth::Session;
use teamboard_core::board;
use teamboard_core::calendar;
use teamboard_core::layout;
use teamboard_core::task::TaskStatus;

#[test]
fn login_board_and_calendar_flow() {
    let mut backend = MockBackend::seeded();
    let mut session = Session::login(&mut backend, "admin", "admin123").expect("login");
    session.validate(&backend).expect("token is valid");

    let projects = backend.projects(&session.token).expect("projects");
    let website = projects
        .iter()
        .find(|project| project.name == "Website Renewal")
        .expect("seeded project");

    let mut tasks = backend
        .tasks_by_project(&session.token, website.id)
        .expect("tasks");
    assert!(!tasks.is_empty());

    // Drag the first To Do card into In Progress.
    let card = tasks
        .iter()
        .find(|task| task.status == TaskStatus::Todo)
        .expect("a todo card")
        .id;
    let change = board::plan_drop(&tasks, card, Some(TaskStatus::InProgress))
        .expect("drop plans a change");
    let updated = backend
        .update_task_status(&session.token, change.task, change.to)
        .expect("status update");
    board::apply_updated_task(&mut tasks, &updated);

    let columns = board::board_columns(&tasks);
    assert!(columns[1].tasks.iter().any(|task| task.id == card));
    assert!(!columns[0].tasks.iter().any(|task| task.id == card));

    // The July calendar places every seeded website task somewhere.
    let today = NaiveDate::from_ymd_opt(2025, 7, 10).expect("valid date");
    let weeks = calendar::month_weeks(2025, 7);
    let placed: usize = weeks
        .iter()
        .map(|week| layout::layout_week(week, &tasks, today).len())
        .sum();
    assert!(placed >= tasks.len());

    for week in &weeks {
        for placement in layout::layout_week(week, &tasks, today) {
            assert!(placement.start_col + placement.span <= 7);
            assert!(placement.span >= 1);
        }
    }
}
