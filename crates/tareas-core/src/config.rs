use std::fs;
use std::path::{
  Path,
  PathBuf
};

use anyhow::{
  Context,
  anyhow
};
use tareas_shared::Settings;
use tracing::{
  debug,
  info,
  warn
};

pub const CONFIG_ENV: &str =
  "TAREAS_CONFIG";
const CONFIG_FILE_NAME: &str =
  "tareas.toml";
const APP_DIR_NAME: &str = "tareas";

#[derive(Debug, Clone)]
pub struct Config {
  pub settings:    Settings,
  pub loaded_file: Option<PathBuf>
}

impl Config {
  #[tracing::instrument(skip(
    config_override
  ))]
  pub fn load(
    config_override: Option<&Path>
  ) -> anyhow::Result<Self> {
    let path = resolve_config_path(
      config_override
    )?;

    let Some(path) = path else {
      warn!(
        "no tareas.toml found; using \
         defaults"
      );
      return Ok(Self {
        settings:    Settings::default(),
        loaded_file: None
      });
    };

    info!(config = %path.display(), "loading config");
    let raw = fs::read_to_string(&path)
      .with_context(|| {
        format!(
          "failed to read {}",
          path.display()
        )
      })?;
    let settings =
      Settings::from_toml_str(&raw)
        .with_context(|| {
          format!(
            "failed to parse TOML {}",
            path.display()
          )
        })?;

    Ok(Self {
      settings,
      loaded_file: Some(path)
    })
  }

  #[tracing::instrument(skip(self))]
  pub fn apply_overrides(
    &mut self,
    api: Option<&str>,
    data: Option<&Path>
  ) {
    if let Some(api) = api {
      debug!(base_url = %api, "overriding remote base url");
      self.settings.remote.base_url =
        api.to_string();
    }
    if let Some(data) = data {
      debug!(data_dir = %data.display(), "overriding data directory");
      self.settings.local.data_dir = Some(
        data.to_string_lossy().into_owned()
      );
    }
  }
}

#[tracing::instrument(skip(cfg))]
pub fn resolve_data_dir(
  cfg: &Config
) -> anyhow::Result<PathBuf> {
  let dir = match cfg
    .settings
    .local
    .data_dir
    .as_deref()
  {
    | Some(raw) if !raw.trim().is_empty() => {
      expand_tilde(Path::new(raw.trim()))
    }
    | _ => default_data_dir()?
  };

  if !dir.exists() {
    info!(dir = %dir.display(), "creating data directory");
    fs::create_dir_all(&dir)
      .with_context(|| {
        format!(
          "failed to create {}",
          dir.display()
        )
      })?;
  }

  Ok(dir)
}

#[tracing::instrument(skip(
  override_path
))]
fn resolve_config_path(
  override_path: Option<&Path>
) -> anyhow::Result<Option<PathBuf>> {
  if let Some(path) = override_path {
    let path = expand_tilde(path);
    if !path.is_file() {
      return Err(anyhow!(
        "config file {} does not exist",
        path.display()
      ));
    }
    return Ok(Some(path));
  }

  if let Ok(from_env) =
    std::env::var(CONFIG_ENV)
  {
    if from_env == "/dev/null"
      || from_env.trim().is_empty()
    {
      return Ok(None);
    }
    return Ok(Some(expand_tilde(
      Path::new(&from_env)
    )));
  }

  let candidate = dirs::config_dir()
    .map(|dir| {
      dir
        .join(APP_DIR_NAME)
        .join(CONFIG_FILE_NAME)
    });
  Ok(candidate.filter(|path| path.is_file()))
}

fn default_data_dir()
-> anyhow::Result<PathBuf> {
  let base = dirs::data_dir()
    .or_else(dirs::home_dir)
    .ok_or_else(|| {
      anyhow!(
        "cannot determine a data \
         directory"
      )
    })?;
  Ok(base.join(APP_DIR_NAME))
}

fn expand_tilde(
  path: &Path
) -> PathBuf {
  let text = path.to_string_lossy();
  if let Some(rest) =
    text.strip_prefix("~/")
    && let Some(home) = dirs::home_dir()
  {
    return home.join(rest);
  }
  path.to_path_buf()
}
