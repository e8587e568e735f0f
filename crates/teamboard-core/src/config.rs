use std::fs;
use std::path::{
  Path,
  PathBuf
};

use anyhow::Context;
use chrono_tz::Tz;
use serde::Deserialize;
use tracing::{
  info,
  warn
};

pub const CONFIG_FILE: &str =
  "teamboard.toml";
pub const CONFIG_ENV_VAR: &str =
  "TEAMBOARD_CONFIG";
pub const DEFAULT_TIMEZONE: &str =
  "Asia/Seoul";
pub const DEFAULT_API_BASE_URL: &str =
  "http://localhost:8080/api";

#[derive(
  Debug, Clone, Deserialize,
)]
#[serde(default)]
pub struct ApiSection {
  pub base_url: String
}

impl Default for ApiSection {
  fn default() -> Self {
    Self {
      base_url: DEFAULT_API_BASE_URL
        .to_string()
    }
  }
}

#[derive(
  Debug, Clone, Deserialize,
)]
#[serde(default)]
pub struct UiSection {
  pub color: bool
}

impl Default for UiSection {
  fn default() -> Self {
    Self {
      color: true
    }
  }
}

#[derive(
  Debug, Clone, Default, Deserialize,
)]
#[serde(default)]
pub struct AppConfig {
  pub api:      ApiSection,
  pub timezone: Option<String>,
  pub ui:       UiSection
}

impl AppConfig {
  // An explicit path (flag or env
  // var) must load; the well-known
  // default file is optional.
  #[tracing::instrument(skip(
    override_path
  ))]
  pub fn load(
    override_path: Option<&Path>
  ) -> anyhow::Result<Self> {
    if let Some(path) =
      resolve_explicit_path(
        override_path
      )
    {
      info!(config = %path.display(), "loading config");
      return read_config(&path);
    }

    if let Some(path) = default_path()
      && path.exists()
    {
      info!(config = %path.display(), "loading config");
      return read_config(&path);
    }

    info!(
      "no config file found; using \
       defaults"
    );
    Ok(Self::default())
  }

  #[must_use]
  pub fn timezone(&self) -> Tz {
    let raw = self
      .timezone
      .as_deref()
      .unwrap_or(DEFAULT_TIMEZONE);
    match raw.parse::<Tz>() {
      | Ok(tz) => tz,
      | Err(_) => {
        warn!(
          timezone = raw,
          "unknown timezone; falling \
           back to default"
        );
        DEFAULT_TIMEZONE
          .parse()
          .unwrap_or(chrono_tz::UTC)
      }
    }
  }
}

fn read_config(
  path: &Path
) -> anyhow::Result<AppConfig> {
  let text = fs::read_to_string(path)
    .with_context(|| {
      format!(
        "failed to read {}",
        path.display()
      )
    })?;
  toml::from_str(&text).with_context(
    || {
      format!(
        "failed to parse {}",
        path.display()
      )
    }
  )
}

fn resolve_explicit_path(
  override_path: Option<&Path>
) -> Option<PathBuf> {
  if let Some(path) = override_path {
    return Some(path.to_path_buf());
  }
  std::env::var_os(CONFIG_ENV_VAR)
    .map(PathBuf::from)
}

fn default_path() -> Option<PathBuf> {
  dirs::config_dir().map(|dir| {
    dir
      .join("teamboard")
      .join(CONFIG_FILE)
  })
}

#[cfg(test)]
mod tests {
  use std::fs;

  use super::AppConfig;

  #[test]
  fn defaults_apply_without_a_file() {
    let cfg = AppConfig::default();
    assert_eq!(
      cfg.api.base_url,
      "http://localhost:8080/api"
    );
    assert!(cfg.ui.color);
    assert_eq!(
      cfg.timezone().name(),
      "Asia/Seoul"
    );
  }

  #[test]
  fn loads_an_explicit_file() {
    let dir = tempfile::tempdir()
      .expect("tempdir");
    let path =
      dir.path().join("teamboard.toml");
    fs::write(
      &path,
      "timezone = \"Europe/Berlin\"\n\
       [api]\n\
       base_url = \
       \"https://example.test/api\"\n\
       [ui]\n\
       color = false\n"
    )
    .expect("write config");

    let cfg =
      AppConfig::load(Some(&path))
        .expect("load config");
    assert_eq!(
      cfg.api.base_url,
      "https://example.test/api"
    );
    assert!(!cfg.ui.color);
    assert_eq!(
      cfg.timezone().name(),
      "Europe/Berlin"
    );
  }

  #[test]
  fn explicit_missing_file_is_an_error()
   {
    let dir = tempfile::tempdir()
      .expect("tempdir");
    let path =
      dir.path().join("absent.toml");
    assert!(
      AppConfig::load(Some(&path))
        .is_err()
    );
  }

  #[test]
  fn bad_timezone_falls_back() {
    let cfg = AppConfig {
      timezone: Some(
        "Mars/Olympus".to_string()
      ),
      ..AppConfig::default()
    };
    assert_eq!(
      cfg.timezone().name(),
      "Asia/Seoul"
    );
  }
}
