use chrono::{
  DateTime,
  Utc
};
use serde::{
  Deserialize,
  Serialize
};
use uuid::Uuid;

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
pub enum MemberRole {
  Admin,
  Member
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct Member {
  pub id:    Uuid,
  pub name:  String,
  pub email: String,
  pub role:  MemberRole
}

impl Member {
  pub fn new(
    name: &str,
    email: &str,
    role: MemberRole
  ) -> Self {
    Self {
      id: Uuid::new_v4(),
      name: name.to_string(),
      email: email.to_string(),
      role
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
pub struct Project {
  pub id:          Uuid,
  pub name:        String,
  pub description: Option<String>,
  pub color:       String,
  pub members:     Vec<Member>,
  pub created_at:  DateTime<Utc>,
  pub updated_at:  DateTime<Utc>
}

impl Project {
  pub fn new(
    name: &str,
    description: Option<&str>,
    color: &str,
    members: Vec<Member>,
    now: DateTime<Utc>
  ) -> Self {
    Self {
      id: Uuid::new_v4(),
      name: name.to_string(),
      description: description
        .map(str::to_string),
      color: color.to_string(),
      members,
      created_at: now,
      updated_at: now
    }
  }

  #[must_use]
  pub fn has_member(
    &self,
    user: Uuid
  ) -> bool {
    self
      .members
      .iter()
      .any(|member| member.id == user)
  }
}

#[derive(
  Debug, Clone, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub struct ProjectCreate {
  pub name:        String,
  pub description: Option<String>,
  pub color:       String
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  Default,
)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPatch {
  pub name:        Option<String>,
  pub description:
    Option<Option<String>>,
  pub color:       Option<String>
}

impl ProjectPatch {
  pub fn apply(
    &self,
    project: &mut Project,
    now: DateTime<Utc>
  ) {
    if let Some(name) = &self.name {
      project.name = name.clone();
    }
    if let Some(description) =
      &self.description
    {
      project.description =
        description.clone();
    }
    if let Some(color) = &self.color {
      project.color = color.clone();
    }
    project.updated_at = now;
  }
}
