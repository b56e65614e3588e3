use tareas_shared::{
  LocalSession,
  LocalTaskForm,
  MemoryStore,
  StatusFilter,
  TaskFilter
};
use yew::{
  Callback,
  Html,
  MouseEvent,
  TargetCast,
  function_component,
  html,
  use_force_update,
  use_memo,
  use_mut_ref,
  use_state
};

use super::storage::{
  BrowserStorage,
  PageStorage
};
use super::{
  confirm_delete,
  load_settings,
  render_context,
  ui_debug
};
use crate::components::{
  FilterPanel,
  LocalTaskFormPanel,
  TaskList
};

type PageSession = LocalSession<PageStorage>;

/// Opens the browser's storage, falling back to an empty in-memory list
/// so the page stays usable. Unparseable stored data is left untouched.
fn open_session(
  storage_key: &str
) -> PageSession {
  let storage =
    match BrowserStorage::from_window() {
      | Ok(storage) => {
        PageStorage::Browser(storage)
      }
      | Err(error) => {
        tracing::error!(error = %format!("{error:#}"), "browser storage unavailable; tasks will not persist");
        PageStorage::Memory(
          MemoryStore::new()
        )
      }
    };

  match LocalSession::open(
    storage,
    storage_key
  ) {
    | Ok(session) => {
      tracing::info!(
        count = session.store().tasks().len(),
        "loaded local tasks"
      );
      session
    }
    | Err(error) => {
      tracing::error!(error = %format!("{error:#}"), "stored tasks are unreadable; starting empty");
      LocalSession::empty(
        PageStorage::Memory(
          MemoryStore::new()
        ),
        storage_key
      )
    }
  }
}

#[function_component(LocalApp)]
pub fn local_app() -> Html {
  let settings = use_memo((), |_| {
    load_settings()
  });
  let session = {
    let storage_key = settings
      .local
      .storage_key
      .clone();
    use_mut_ref(move || {
      open_session(&storage_key)
    })
  };
  let redraw = use_force_update();
  let form =
    use_state(LocalTaskForm::default);
  let status_draft =
    use_state(|| {
      StatusFilter::All
        .as_key()
        .to_string()
    });
  let category_draft =
    use_state(String::new);

  let on_submit = {
    let session = session.clone();
    let form = form.clone();
    let redraw = redraw.clone();
    Callback::from(move |_: ()| {
      let mut next = (*form).clone();
      match session
        .borrow_mut()
        .submit(&mut next)
      {
        | Ok(true) => {
          form.set(next);
          redraw.force_update();
        }
        | Ok(false) => {
          ui_debug(
            "local.submit",
            "blank text; nothing to do"
          )
        }
        | Err(error) => {
          tracing::error!(error = %format!("{error:#}"), "failed to save task");
        }
      }
    })
  };

  let on_cancel = {
    let session = session.clone();
    let form = form.clone();
    let redraw = redraw.clone();
    Callback::from(move |_: ()| {
      session
        .borrow_mut()
        .board_mut()
        .cancel_edit();
      form.set(LocalTaskForm::default());
      redraw.force_update();
    })
  };

  let on_toggle = {
    let session = session.clone();
    let redraw = redraw.clone();
    Callback::from(move |key: String| {
      match session
        .borrow_mut()
        .toggle(&key)
      {
        | Ok(completed) => {
          tracing::info!(task_id = %key, completed, "toggled task")
        }
        | Err(error) => {
          tracing::error!(task_id = %key, error = %format!("{error:#}"), "failed to toggle task")
        }
      }
      redraw.force_update();
    })
  };

  let on_edit = {
    let session = session.clone();
    let form = form.clone();
    let redraw = redraw.clone();
    Callback::from(move |key: String| {
      let loaded = session
        .borrow_mut()
        .begin_edit(&key);
      match loaded {
        | Some(loaded) => {
          form.set(loaded);
          redraw.force_update();
        }
        | None => {
          tracing::warn!(task_id = %key, "edit target not found")
        }
      }
    })
  };

  let on_delete = {
    let session = session.clone();
    let redraw = redraw.clone();
    Callback::from(move |key: String| {
      if !confirm_delete() {
        tracing::info!(task_id = %key, "delete canceled");
        return;
      }
      if let Err(error) =
        session.borrow_mut().remove(&key)
      {
        tracing::error!(task_id = %key, error = %format!("{error:#}"), "failed to delete task");
      }
      redraw.force_update();
    })
  };

  let on_status_change = {
    let status_draft =
      status_draft.clone();
    Callback::from(
      move |e: web_sys::Event| {
        let select: web_sys::HtmlSelectElement =
          e.target_unchecked_into();
        status_draft.set(select.value());
      }
    )
  };

  let on_category_input = {
    let category_draft =
      category_draft.clone();
    Callback::from(
      move |e: web_sys::InputEvent| {
        let input: web_sys::HtmlInputElement =
          e.target_unchecked_into();
        category_draft.set(input.value());
      }
    )
  };

  let on_apply = {
    let session = session.clone();
    let redraw = redraw.clone();
    let status_draft =
      status_draft.clone();
    let category_draft =
      category_draft.clone();
    Callback::from(move |_: MouseEvent| {
      session
        .borrow_mut()
        .board_mut()
        .apply_filter(TaskFilter::new(
          StatusFilter::from_key(
            &status_draft
          ),
          &category_draft
        ));
      redraw.force_update();
    })
  };

  let on_clear = {
    let session = session.clone();
    let redraw = redraw.clone();
    let status_draft =
      status_draft.clone();
    let category_draft =
      category_draft.clone();
    Callback::from(move |_: MouseEvent| {
      status_draft.set(
        StatusFilter::All
          .as_key()
          .to_string()
      );
      category_draft.set(String::new());
      session
        .borrow_mut()
        .board_mut()
        .clear_filter();
      redraw.force_update();
    })
  };

  let on_form_change = {
    let form = form.clone();
    Callback::from(
      move |next: LocalTaskForm| {
        form.set(next)
      }
    )
  };

  let ctx = render_context(&settings);
  let (view, editing, filtered) = {
    let session = session.borrow();
    (
      session.view(&ctx),
      session.board().editing().is_some(),
      session.board().filter().is_active()
    )
  };

  html! {
      <div class="page local">
          <LocalTaskFormPanel
              form={(*form).clone()}
              editing={editing}
              on_change={on_form_change}
              on_submit={on_submit}
              on_cancel={on_cancel}
          />
          <FilterPanel
              active={filtered}
              status_value={(*status_draft).clone()}
              on_status_change={on_status_change}
              category_value={(*category_draft).clone()}
              on_category_input={on_category_input}
              on_apply={on_apply}
              on_clear={on_clear}
          />
          <TaskList
              title={"Tasks in this browser".to_string()}
              view={view}
              on_toggle={on_toggle}
              on_edit={on_edit}
              on_delete={on_delete}
          />
      </div>
  }
}
