mod local;
mod remote;
mod storage;

use tareas_shared::Settings;
use tareas_shared::view::RenderContext;
use yew::{
  Html,
  function_component,
  html
};
use yew_router::prelude::{
  BrowserRouter,
  Redirect,
  Routable,
  Switch
};

use crate::components::NavBar;
use local::LocalApp;
use remote::RemoteApp;

const SETTINGS_TOML: &str =
  include_str!("../assets/tareas.toml");

#[derive(
  Debug, Clone, Copy, PartialEq, Routable,
)]
pub enum Route {
  #[at("/")]
  Remote,
  #[at("/local")]
  Local,
  #[not_found]
  #[at("/404")]
  NotFound
}

fn switch(route: Route) -> Html {
  match route {
    | Route::Remote => {
      html! { <RemoteApp /> }
    }
    | Route::Local => {
      html! { <LocalApp /> }
    }
    | Route::NotFound => {
      html! { <Redirect<Route> to={Route::Remote} /> }
    }
  }
}

#[function_component(App)]
pub fn app() -> Html {
  html! {
      <BrowserRouter>
          <div class="app">
              <NavBar />
              <main class="workspace">
                  <Switch<Route> render={switch} />
              </main>
          </div>
      </BrowserRouter>
  }
}

/// Settings baked in at build time; a broken file falls back to the
/// defaults.
fn load_settings() -> Settings {
  match Settings::from_toml_str(
    SETTINGS_TOML
  ) {
    | Ok(settings) => {
      tracing::info!(
        base_url = %settings.remote.base_url,
        storage_key = %settings.local.storage_key,
        "loaded settings"
      );
      settings
    }
    | Err(error) => {
      tracing::error!(error = %format!("{error:#}"), "failed to parse settings; using defaults");
      Settings::default()
    }
  }
}

fn render_context(
  settings: &Settings
) -> RenderContext {
  RenderContext {
    now:           tareas_shared::datetime::now_local(),
    near_due_days: settings
      .display
      .near_due_days
  }
}

/// Blocking browser confirmation; a missing window counts as "no".
fn confirm_delete() -> bool {
  web_sys::window()
    .and_then(|window| {
      window
        .confirm_with_message(
          tareas_shared::DELETE_CONFIRMATION
        )
        .ok()
    })
    .unwrap_or(false)
}

fn ui_debug(
  event: &str,
  detail: &str
) {
  tracing::debug!(
    event, detail, "ui-debug"
  );
  gloo::console::log!(format!(
    "[ui-debug] {event}: {detail}"
  ));
}
