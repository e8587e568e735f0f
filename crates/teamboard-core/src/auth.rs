use tracing::info;

use crate::api::{
  ApiResult,
  AuthUser,
  Backend,
  LoginRequest,
  RegisterRequest
};

// A signed-in session. Dropping it
// forgets the token; there is no
// server-side logout call.
#[derive(Debug, Clone)]
pub struct Session {
  pub token: String,
  pub user:  AuthUser
}

impl Session {
  pub fn login(
    backend: &mut impl Backend,
    username: &str,
    password: &str
  ) -> ApiResult<Self> {
    let response =
      backend.login(&LoginRequest {
        username: username
          .to_string(),
        password: password
          .to_string()
      })?;
    info!(
      user = %response.user.full_name,
      "session opened"
    );
    Ok(Self {
      token: response.token,
      user:  response.user
    })
  }

  pub fn register(
    backend: &mut impl Backend,
    request: &RegisterRequest
  ) -> ApiResult<Self> {
    let response =
      backend.register(request)?;
    Ok(Self {
      token: response.token,
      user:  response.user
    })
  }

  // Re-checks the token against the
  // backend and refreshes the cached
  // user.
  pub fn validate(
    &mut self,
    backend: &impl Backend
  ) -> ApiResult<&AuthUser> {
    self.user = backend
      .current_user(&self.token)?;
    Ok(&self.user)
  }

  #[must_use]
  pub fn authorization_header(
    &self
  ) -> String {
    format!("Bearer {}", self.token)
  }
}

#[cfg(test)]
mod tests {
  use super::Session;
  use crate::api::MockBackend;

  #[test]
  fn login_yields_a_usable_session() {
    let mut backend =
      MockBackend::seeded();
    let mut session = Session::login(
      &mut backend,
      "admin",
      "admin123"
    )
    .expect("login");

    assert_eq!(
      session.user.full_name,
      "Alice Kim"
    );
    assert!(
      session
        .authorization_header()
        .starts_with("Bearer ")
    );

    let user = session
      .validate(&backend)
      .expect("validate");
    assert_eq!(
      user.email,
      "alice@teamboard.dev"
    );
  }

  #[test]
  fn stale_token_fails_validation() {
    let backend =
      MockBackend::seeded();
    let mut session = Session {
      token: "stale".to_string(),
      user:  crate::api::AuthUser {
        id: uuid::Uuid::new_v4(),
        email: String::new(),
        full_name: String::new()
      }
    };

    assert!(
      session
        .validate(&backend)
        .is_err()
    );
  }
}
