use serde::{
  Deserialize,
  Serialize
};

use crate::local::DEFAULT_STORAGE_KEY;

pub const DEFAULT_BASE_URL: &str =
  "http://localhost:8800";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_NEAR_DUE_DAYS: u32 = 7;

#[derive(
  Debug,
  Clone,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  Default,
)]
#[serde(default)]
pub struct Settings {
  pub remote:  RemoteSettings,
  pub local:   LocalSettings,
  pub display: DisplaySettings
}

#[derive(
  Debug,
  Clone,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
)]
#[serde(default)]
pub struct RemoteSettings {
  pub base_url:     String,
  pub timeout_secs: u64
}

impl Default for RemoteSettings {
  fn default() -> Self {
    Self {
      base_url:     DEFAULT_BASE_URL
        .to_string(),
      timeout_secs: DEFAULT_TIMEOUT_SECS
    }
  }
}

#[derive(
  Debug,
  Clone,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
)]
#[serde(default)]
pub struct LocalSettings {
  pub storage_key: String,
  /// Directory of the file-backed store; terminal front-end only.
  pub data_dir:    Option<String>
}

impl Default for LocalSettings {
  fn default() -> Self {
    Self {
      storage_key: DEFAULT_STORAGE_KEY
        .to_string(),
      data_dir:    None
    }
  }
}

#[derive(
  Debug,
  Clone,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
)]
#[serde(default)]
pub struct DisplaySettings {
  pub near_due_days: u32
}

impl Default for DisplaySettings {
  fn default() -> Self {
    Self {
      near_due_days: DEFAULT_NEAR_DUE_DAYS
    }
  }
}

impl Settings {
  pub fn from_toml_str(
    raw: &str
  ) -> anyhow::Result<Self> {
    let settings: Settings =
      toml::from_str(raw)?;
    Ok(settings)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_document_yields_defaults() {
    let settings =
      Settings::from_toml_str("")
        .expect("parse empty settings");
    assert_eq!(settings, Settings::default());
    assert_eq!(
      settings.remote.base_url,
      DEFAULT_BASE_URL
    );
    assert_eq!(
      settings.local.storage_key,
      "tasks"
    );
  }

  #[test]
  fn partial_sections_keep_other_defaults() {
    let settings = Settings::from_toml_str(
      r#"
[remote]
base_url = "https://tasks.example.org/api/"

[display]
near_due_days = 3
"#
    )
    .expect("parse settings");

    assert_eq!(
      settings.remote.base_url,
      "https://tasks.example.org/api/"
    );
    assert_eq!(
      settings.remote.timeout_secs,
      DEFAULT_TIMEOUT_SECS
    );
    assert_eq!(
      settings.display.near_due_days,
      3
    );
  }

  #[test]
  fn wrong_types_are_rejected() {
    assert!(
      Settings::from_toml_str(
        "[display]\nnear_due_days = \"soon\""
      )
      .is_err()
    );
  }
}
