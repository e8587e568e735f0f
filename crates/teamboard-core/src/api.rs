use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::project::{Member, MemberRole, Project, ProjectCreate, ProjectPatch};
use crate::task::{Comment, Task, TaskCreate, TaskPatch, TaskPriority, TaskStatus};

/// Error surface shared by every backend call. `status` mirrors the HTTP
/// status code when the failure maps to one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub message: String,
    pub status: Option<u16>,
}

impl ApiError {
    #[must_use]
    pub fn not_found(message: &str) -> Self {
        Self { message: message.to_string(), status: Some(404) }
    }

    #[must_use]
    pub fn unauthorized(message: &str) -> Self {
        Self { message: message.to_string(), status: Some(401) }
    }

    #[must_use]
    pub fn validation(message: &str) -> Self {
        Self { message: message.to_string(), status: Some(400) }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "{} (status {status})", self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for ApiError {}

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: AuthUser,
}

/// The calls the client core makes against a server. `MockBackend` is the
/// in-memory implementation; a network client would implement the same trait.
pub trait Backend {
    fn login(&mut self, request: &LoginRequest) -> ApiResult<AuthResponse>;
    fn register(&mut self, request: &RegisterRequest) -> ApiResult<AuthResponse>;
    fn current_user(&self, token: &str) -> ApiResult<AuthUser>;

    fn projects(&self, token: &str) -> ApiResult<Vec<Project>>;
    fn create_project(&mut self, token: &str, create: &ProjectCreate) -> ApiResult<Project>;
    fn update_project(
        &mut self,
        token: &str,
        project: Uuid,
        patch: &ProjectPatch,
    ) -> ApiResult<Project>;
    fn delete_project(&mut self, token: &str, project: Uuid) -> ApiResult<()>;
    fn add_member(&mut self, token: &str, project: Uuid, member: Uuid) -> ApiResult<Project>;
    fn remove_member(&mut self, token: &str, project: Uuid, member: Uuid) -> ApiResult<Project>;

    fn tasks_by_project(&self, token: &str, project: Uuid) -> ApiResult<Vec<Task>>;
    fn create_task(&mut self, token: &str, create: &TaskCreate) -> ApiResult<Task>;
    fn update_task(&mut self, token: &str, task: Uuid, patch: &TaskPatch) -> ApiResult<Task>;
    fn update_task_status(
        &mut self,
        token: &str,
        task: Uuid,
        status: TaskStatus,
    ) -> ApiResult<Task>;
    fn delete_task(&mut self, token: &str, task: Uuid) -> ApiResult<()>;
    fn add_assignee(&mut self, token: &str, task: Uuid, member: Uuid) -> ApiResult<Task>;
    fn remove_assignee(&mut self, token: &str, task: Uuid, member: Uuid) -> ApiResult<Task>;

    fn comments(&self, token: &str, task: Uuid) -> ApiResult<Vec<Comment>>;
    fn add_comment(&mut self, token: &str, task: Uuid, content: &str) -> ApiResult<Comment>;
}

#[derive(Debug, Clone)]
struct Account {
    username: String,
    password: String,
    member: Uuid,
}

/// In-memory backend seeded with the demo workspace. Tokens are random UUIDs
/// minted at login and checked on every call.
#[derive(Debug, Default)]
pub struct MockBackend {
    accounts: Vec<Account>,
    sessions: HashMap<String, Uuid>,
    members: Vec<Member>,
    projects: Vec<Project>,
    tasks: Vec<Task>,
    comments: HashMap<Uuid, Vec<Comment>>,
}

impl MockBackend {
    /// Demo workspace: five members, three projects, and the July 2025 task
    /// board. Sign in with `admin` / `admin123`.
    #[must_use]
    pub fn seeded() -> Self {
        let now = seed_time();
        let mut backend = Self::default();

        let alice = Member::new("Alice Kim", "alice@teamboard.dev", MemberRole::Admin);
        let brian = Member::new("Brian Lee", "brian@teamboard.dev", MemberRole::Member);
        let clara = Member::new("Clara Park", "clara@teamboard.dev", MemberRole::Member);
        let david = Member::new("David Choi", "david@teamboard.dev", MemberRole::Member);
        let erin = Member::new("Erin Jung", "erin@teamboard.dev", MemberRole::Member);

        backend.accounts = vec![
            Account {
                username: "admin".to_string(),
                password: "admin123".to_string(),
                member: alice.id,
            },
            Account {
                username: "user1".to_string(),
                password: "user123".to_string(),
                member: brian.id,
            },
            Account {
                username: "user2".to_string(),
                password: "user123".to_string(),
                member: clara.id,
            },
            Account {
                username: "user3".to_string(),
                password: "user123".to_string(),
                member: david.id,
            },
        ];

        let website = Project::new(
            "Website Renewal",
            Some("Full redesign of the corporate site"),
            "#3B82F6",
            vec![alice.clone(), brian.clone(), clara.clone()],
            now,
        );
        let mobile = Project::new(
            "Mobile App Development",
            Some("iOS and Android companion app"),
            "#10B981",
            vec![alice.clone(), david.clone(), erin.clone()],
            now,
        );
        let marketing = Project::new(
            "Marketing Campaign",
            Some("Q3 launch campaign"),
            "#F59E0B",
            vec![brian.clone(), erin.clone()],
            now,
        );

        let tasks = vec![
            seed_task(
                "Homepage layout design",
                "Wireframes and responsive mockups",
                TaskStatus::InProgress,
                TaskPriority::High,
                (7, 1),
                (7, 7),
                website.id,
                vec![alice.clone(), brian.clone()],
                now,
            ),
            seed_task(
                "Design system components",
                "Buttons, forms, and color tokens",
                TaskStatus::Todo,
                TaskPriority::Medium,
                (7, 3),
                (7, 12),
                website.id,
                vec![clara.clone()],
                now,
            ),
            seed_task(
                "Login API integration",
                "Wire the sign-in screen to the auth endpoints",
                TaskStatus::InProgress,
                TaskPriority::High,
                (7, 8),
                (7, 10),
                mobile.id,
                vec![david.clone()],
                now,
            ),
            seed_task(
                "Push notification setup",
                "Device registration and topic routing",
                TaskStatus::Todo,
                TaskPriority::Medium,
                (7, 11),
                (7, 18),
                mobile.id,
                vec![erin.clone()],
                now,
            ),
            seed_task(
                "Landing page copywriting",
                "Hero copy and feature blurbs",
                TaskStatus::Todo,
                TaskPriority::Low,
                (7, 15),
                (7, 22),
                marketing.id,
                vec![brian.clone()],
                now,
            ),
            seed_task(
                "Social media assets",
                "Banner set for the launch week",
                TaskStatus::Hold,
                TaskPriority::Medium,
                (7, 20),
                (7, 23),
                marketing.id,
                vec![erin.clone()],
                now,
            ),
            seed_task(
                "Release QA pass",
                "Regression sweep before the cutover",
                TaskStatus::Todo,
                TaskPriority::High,
                (7, 25),
                (7, 30),
                website.id,
                vec![alice.clone(), clara.clone()],
                now,
            ),
        ];

        backend.comments.insert(
            tasks[0].id,
            vec![Comment {
                id: Uuid::new_v4(),
                author: brian.name.clone(),
                content: "First draft is up, please take a look.".to_string(),
                timestamp: now,
            }],
        );

        backend.members = vec![alice, brian, clara, david, erin];
        backend.projects = vec![website, mobile, marketing];
        backend.tasks = tasks;
        backend
    }

    fn authorize(&self, token: &str) -> ApiResult<Uuid> {
        let token = token.strip_prefix("Bearer ").unwrap_or(token);
        self.sessions
            .get(token)
            .copied()
            .ok_or_else(|| ApiError::unauthorized("invalid or expired token"))
    }

    fn member(&self, id: Uuid) -> ApiResult<&Member> {
        self.members
            .iter()
            .find(|member| member.id == id)
            .ok_or_else(|| ApiError::not_found("member not found"))
    }

    fn auth_user(&self, member: Uuid) -> ApiResult<AuthUser> {
        let member = self.member(member)?;
        Ok(AuthUser {
            id: member.id,
            email: member.email.clone(),
            full_name: member.name.clone(),
        })
    }

    fn open_session(&mut self, member: Uuid) -> ApiResult<AuthResponse> {
        let token = Uuid::new_v4().to_string();
        self.sessions.insert(token.clone(), member);
        let user = self.auth_user(member)?;
        Ok(AuthResponse { token, user })
    }

    fn project_mut(&mut self, id: Uuid) -> ApiResult<&mut Project> {
        self.projects
            .iter_mut()
            .find(|project| project.id == id)
            .ok_or_else(|| ApiError::not_found("project not found"))
    }

    fn task_mut(&mut self, id: Uuid) -> ApiResult<&mut Task> {
        self.tasks
            .iter_mut()
            .find(|task| task.id == id)
            .ok_or_else(|| ApiError::not_found("task not found"))
    }
}

impl Backend for MockBackend {
    #[tracing::instrument(skip(self, request))]
    fn login(&mut self, request: &LoginRequest) -> ApiResult<AuthResponse> {
        let member = self
            .accounts
            .iter()
            .find(|account| {
                account.username == request.username && account.password == request.password
            })
            .map(|account| account.member)
            .ok_or_else(|| {
                warn!(username = %request.username, "login rejected");
                ApiError::unauthorized("invalid username or password")
            })?;
        info!(username = %request.username, "login accepted");
        self.open_session(member)
    }

    #[tracing::instrument(skip(self, request))]
    fn register(&mut self, request: &RegisterRequest) -> ApiResult<AuthResponse> {
        if request.username.trim().is_empty() || request.password.is_empty() {
            return Err(ApiError::validation("username and password are required"));
        }
        if self
            .accounts
            .iter()
            .any(|account| account.username == request.username)
        {
            return Err(ApiError::validation("username is already taken"));
        }

        let member = Member::new(&request.name, &request.email, MemberRole::Member);
        let member_id = member.id;
        self.members.push(member);
        self.accounts.push(Account {
            username: request.username.clone(),
            password: request.password.clone(),
            member: member_id,
        });
        info!(username = %request.username, "account registered");
        self.open_session(member_id)
    }

    fn current_user(&self, token: &str) -> ApiResult<AuthUser> {
        let member = self.authorize(token)?;
        self.auth_user(member)
    }

    fn projects(&self, token: &str) -> ApiResult<Vec<Project>> {
        self.authorize(token)?;
        Ok(self.projects.clone())
    }

    fn create_project(&mut self, token: &str, create: &ProjectCreate) -> ApiResult<Project> {
        let creator = self.authorize(token)?;
        if create.name.trim().is_empty() {
            return Err(ApiError::validation("project name is required"));
        }
        let creator = self.member(creator)?.clone();
        let project = Project::new(
            &create.name,
            create.description.as_deref(),
            &create.color,
            vec![creator],
            Utc::now(),
        );
        debug!(project = %project.id, name = %project.name, "project created");
        self.projects.push(project.clone());
        Ok(project)
    }

    fn update_project(
        &mut self,
        token: &str,
        project: Uuid,
        patch: &ProjectPatch,
    ) -> ApiResult<Project> {
        self.authorize(token)?;
        let now = Utc::now();
        let project = self.project_mut(project)?;
        patch.apply(project, now);
        Ok(project.clone())
    }

    fn delete_project(&mut self, token: &str, project: Uuid) -> ApiResult<()> {
        self.authorize(token)?;
        let before = self.projects.len();
        self.projects.retain(|entry| entry.id != project);
        if self.projects.len() == before {
            return Err(ApiError::not_found("project not found"));
        }
        // Cascade, matching server-side delete semantics.
        let orphaned: Vec<Uuid> = self
            .tasks
            .iter()
            .filter(|task| task.project_id == project)
            .map(|task| task.id)
            .collect();
        for task in &orphaned {
            self.comments.remove(task);
        }
        self.tasks.retain(|task| task.project_id != project);
        debug!(project = %project, tasks = orphaned.len(), "project deleted");
        Ok(())
    }

    fn add_member(&mut self, token: &str, project: Uuid, member: Uuid) -> ApiResult<Project> {
        self.authorize(token)?;
        let member = self.member(member)?.clone();
        let project = self.project_mut(project)?;
        if !project.has_member(member.id) {
            project.members.push(member);
            project.updated_at = Utc::now();
        }
        Ok(project.clone())
    }

    fn remove_member(&mut self, token: &str, project: Uuid, member: Uuid) -> ApiResult<Project> {
        self.authorize(token)?;
        let project = self.project_mut(project)?;
        project.members.retain(|entry| entry.id != member);
        project.updated_at = Utc::now();
        Ok(project.clone())
    }

    fn tasks_by_project(&self, token: &str, project: Uuid) -> ApiResult<Vec<Task>> {
        self.authorize(token)?;
        if !self.projects.iter().any(|entry| entry.id == project) {
            return Err(ApiError::not_found("project not found"));
        }
        Ok(self
            .tasks
            .iter()
            .filter(|task| task.project_id == project)
            .cloned()
            .collect())
    }

    fn create_task(&mut self, token: &str, create: &TaskCreate) -> ApiResult<Task> {
        self.authorize(token)?;
        if create.title.trim().is_empty() {
            return Err(ApiError::validation("task title is required"));
        }
        if !self
            .projects
            .iter()
            .any(|project| project.id == create.project_id)
        {
            return Err(ApiError::not_found("project not found"));
        }
        let task = Task::new(
            &create.title,
            &create.description,
            create.status,
            create.priority,
            create.start_date,
            create.due_date,
            create.project_id,
            Utc::now(),
        );
        debug!(task = %task.id, title = %task.title, "task created");
        self.tasks.push(task.clone());
        Ok(task)
    }

    fn update_task(&mut self, token: &str, task: Uuid, patch: &TaskPatch) -> ApiResult<Task> {
        self.authorize(token)?;
        let now = Utc::now();
        let task = self.task_mut(task)?;
        patch.apply(task, now);
        Ok(task.clone())
    }

    #[tracing::instrument(skip(self))]
    fn update_task_status(
        &mut self,
        token: &str,
        task: Uuid,
        status: TaskStatus,
    ) -> ApiResult<Task> {
        self.authorize(token)?;
        let now = Utc::now();
        let task = self.task_mut(task)?;
        debug!(from = task.status.as_wire(), to = status.as_wire(), "status updated");
        task.status = status;
        task.updated_at = now;
        Ok(task.clone())
    }

    fn delete_task(&mut self, token: &str, task: Uuid) -> ApiResult<()> {
        self.authorize(token)?;
        let before = self.tasks.len();
        self.tasks.retain(|entry| entry.id != task);
        if self.tasks.len() == before {
            return Err(ApiError::not_found("task not found"));
        }
        self.comments.remove(&task);
        Ok(())
    }

    fn add_assignee(&mut self, token: &str, task: Uuid, member: Uuid) -> ApiResult<Task> {
        self.authorize(token)?;
        let member = self.member(member)?.clone();
        let task = self.task_mut(task)?;
        if !task.assignees.iter().any(|entry| entry.id == member.id) {
            task.assignees.push(member);
            task.updated_at = Utc::now();
        }
        Ok(task.clone())
    }

    fn remove_assignee(&mut self, token: &str, task: Uuid, member: Uuid) -> ApiResult<Task> {
        self.authorize(token)?;
        let task = self.task_mut(task)?;
        task.assignees.retain(|entry| entry.id != member);
        task.updated_at = Utc::now();
        Ok(task.clone())
    }

    fn comments(&self, token: &str, task: Uuid) -> ApiResult<Vec<Comment>> {
        self.authorize(token)?;
        if !self.tasks.iter().any(|entry| entry.id == task) {
            return Err(ApiError::not_found("task not found"));
        }
        Ok(self.comments.get(&task).cloned().unwrap_or_default())
    }

    fn add_comment(&mut self, token: &str, task: Uuid, content: &str) -> ApiResult<Comment> {
        let author = self.authorize(token)?;
        if content.trim().is_empty() {
            return Err(ApiError::validation("comment content is required"));
        }
        let author = self.member(author)?.name.clone();
        if !self.tasks.iter().any(|entry| entry.id == task) {
            return Err(ApiError::not_found("task not found"));
        }
        let comment = Comment {
            id: Uuid::new_v4(),
            author,
            content: content.to_string(),
            timestamp: Utc::now(),
        };
        self.comments.entry(task).or_default().push(comment.clone());
        Ok(comment)
    }
}

fn seed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 7, 1, 9, 0, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

#[allow(clippy::too_many_arguments)]
fn seed_task(
    title: &str,
    description: &str,
    status: TaskStatus,
    priority: TaskPriority,
    start: (u32, u32),
    due: (u32, u32),
    project: Uuid,
    assignees: Vec<Member>,
    now: DateTime<Utc>,
) -> Task {
    let start = chrono::NaiveDate::from_ymd_opt(2025, start.0, start.1)
        .unwrap_or(chrono::NaiveDate::MIN);
    let due =
        chrono::NaiveDate::from_ymd_opt(2025, due.0, due.1).unwrap_or(chrono::NaiveDate::MIN);
    let mut task = Task::new(title, description, status, priority, start, due, project, now);
    task.assignees = assignees;
    task
}
