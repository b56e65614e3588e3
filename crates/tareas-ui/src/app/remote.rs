use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;

use tareas_shared::{
  Board,
  FetchTicket,
  FetchTickets,
  FormError,
  RemoteClient,
  RemoteSession,
  RemoteTask,
  RemoteTaskForm,
  StatusFilter,
  TaskFilter
};
use yew::{
  Callback,
  Html,
  MouseEvent,
  Reducible,
  TargetCast,
  UseReducerDispatcher,
  function_component,
  html,
  use_effect_with,
  use_memo,
  use_mut_ref,
  use_reducer,
  use_state
};

use super::{
  confirm_delete,
  load_settings,
  render_context,
  ui_debug
};
use crate::components::{
  FilterPanel,
  RemoteTaskFormPanel,
  TaskList
};

/// Board of the server-backed page. Async completions are dispatched as
/// actions so they always land on the newest state.
#[derive(Debug, Clone, PartialEq, Default)]
struct RemoteBoard(Board<RemoteTask>);

enum RemoteAction {
  Loaded {
    ticket: FetchTicket,
    tasks:  Vec<RemoteTask>
  },
  BeginEdit(String),
  CancelEdit,
  ApplyFilter(TaskFilter),
  ClearFilter
}

impl Reducible for RemoteBoard {
  type Action = RemoteAction;

  fn reduce(
    self: Rc<Self>,
    action: Self::Action
  ) -> Rc<Self> {
    let mut board = self.0.clone();
    match action {
      | RemoteAction::Loaded {
        ticket,
        tasks
      } => {
        if !board.accept_fetch(ticket, tasks)
        {
          return self;
        }
      }
      | RemoteAction::BeginEdit(key) => {
        if board.begin_edit(&key).is_none() {
          tracing::warn!(task_id = %key, "edit target not found");
          return self;
        }
      }
      | RemoteAction::CancelEdit => {
        board.cancel_edit()
      }
      | RemoteAction::ApplyFilter(filter) => {
        board.apply_filter(filter)
      }
      | RemoteAction::ClearFilter => {
        board.clear_filter()
      }
    }
    Rc::new(Self(board))
  }
}

/// Runs `mutation` and, if it changed anything, fetches the list and
/// installs it unless a newer list already landed. The ticket is taken
/// when the list request starts, not when the user acted.
fn land_tasks<M>(
  action: &'static str,
  session: RemoteSession,
  tickets: Rc<RefCell<FetchTickets>>,
  board: UseReducerDispatcher<RemoteBoard>,
  mutation: M
) where
  M: Future<Output = anyhow::Result<bool>>
    + 'static
{
  wasm_bindgen_futures::spawn_local(
    async move {
      let landed = session
        .then_refresh(mutation, || {
          tickets.borrow_mut().issue()
        })
        .await;
      match landed {
        | Ok(Some((ticket, tasks))) => {
          tracing::info!(
            action,
            count = tasks.len(),
            ?ticket,
            "received task list"
          );
          board.dispatch(
            RemoteAction::Loaded {
              ticket,
              tasks
            }
          );
        }
        | Ok(None) => {
          tracing::debug!(
            action,
            "mutation not applied; list unchanged"
          );
        }
        | Err(error) => {
          tracing::error!(action, error = %format!("{error:#}"), "remote call failed");
        }
      }
    }
  );
}

#[function_component(RemoteApp)]
pub fn remote_app() -> Html {
  let settings = use_memo((), |_| {
    load_settings()
  });
  let session = {
    let base_url = settings
      .remote
      .base_url
      .clone();
    use_memo((), move |_| {
      RemoteSession::new(
        RemoteClient::new(&base_url)
      )
    })
  };
  let tickets =
    use_mut_ref(FetchTickets::default);
  let board =
    use_reducer(RemoteBoard::default);

  let ctx = render_context(&settings);
  let today = ctx.now.date();
  let form = use_state(move || {
    RemoteTaskForm::blank(today)
  });
  let form_error =
    use_state(|| None::<String>);
  let status_draft =
    use_state(|| {
      StatusFilter::All
        .as_key()
        .to_string()
    });
  let category_draft =
    use_state(String::new);

  let refresh = {
    let session = session.clone();
    let tickets = tickets.clone();
    let dispatcher = board.dispatcher();
    Callback::from(move |_: ()| {
      land_tasks(
        "refresh",
        (*session).clone(),
        tickets.clone(),
        dispatcher.clone(),
        std::future::ready(Ok(true))
      );
    })
  };

  {
    let refresh = refresh.clone();
    use_effect_with((), move |_| {
      ui_debug(
        "remote.mounted",
        "fetching initial task list"
      );
      refresh.emit(());
      || ()
    });
  }

  let on_submit = {
    let session = session.clone();
    let tickets = tickets.clone();
    let board = board.clone();
    let form = form.clone();
    let form_error = form_error.clone();
    Callback::from(move |_: ()| {
      let status = board
        .0
        .editing()
        .and_then(|key| board.0.find(key))
        .map(|task| task.status)
        .unwrap_or_default();
      let mut working = board.0.clone();
      let submission = match working
        .submission(form.to_payload(status))
      {
        | Ok(submission) => submission,
        | Err(FormError::MissingName) => {
          ui_debug(
            "remote.submit",
            "blank name; nothing to do"
          );
          return;
        }
        | Err(error) => {
          tracing::warn!(%error, "rejected task form");
          form_error
            .set(Some(error.to_string()));
          return;
        }
      };

      board.dispatch(
        RemoteAction::CancelEdit
      );
      form.set(RemoteTaskForm::blank(
        tareas_shared::datetime::now_local()
          .date()
      ));
      form_error.set(None);

      let sender = (*session).clone();
      land_tasks(
        "submit",
        (*session).clone(),
        tickets.clone(),
        board.dispatcher(),
        async move {
          sender
            .apply(&submission)
            .await?
            .report("submit");
          // The list is re-read even after a rejected submit.
          Ok::<_, anyhow::Error>(true)
        }
      );
    })
  };

  let on_cancel = {
    let board = board.clone();
    let form = form.clone();
    let form_error = form_error.clone();
    Callback::from(move |_: ()| {
      board.dispatch(
        RemoteAction::CancelEdit
      );
      form.set(RemoteTaskForm::blank(
        tareas_shared::datetime::now_local()
          .date()
      ));
      form_error.set(None);
    })
  };

  let on_toggle = {
    let session = session.clone();
    let tickets = tickets.clone();
    let board = board.clone();
    Callback::from(move |key: String| {
      let Some(task) =
        board.0.find(&key).cloned()
      else {
        tracing::warn!(task_id = %key, "toggle target not found");
        return;
      };
      let sender = (*session).clone();
      land_tasks(
        "toggle",
        (*session).clone(),
        tickets.clone(),
        board.dispatcher(),
        async move {
          let outcome =
            sender.toggle(&task).await?;
          Ok::<_, anyhow::Error>(
            outcome.report("toggle")
          )
        }
      );
    })
  };

  let on_edit = {
    let board = board.clone();
    let form = form.clone();
    let form_error = form_error.clone();
    Callback::from(move |key: String| {
      if let Some(task) = board.0.find(&key)
      {
        form.set(RemoteTaskForm::from_task(
          task
        ));
        form_error.set(None);
        board.dispatch(
          RemoteAction::BeginEdit(key)
        );
      }
    })
  };

  let on_delete = {
    let session = session.clone();
    let tickets = tickets.clone();
    let board = board.clone();
    Callback::from(move |key: String| {
      if !confirm_delete() {
        tracing::info!(task_id = %key, "delete canceled");
        return;
      }
      let sender = (*session).clone();
      land_tasks(
        "delete",
        (*session).clone(),
        tickets.clone(),
        board.dispatcher(),
        async move {
          let outcome = sender
            .client()
            .delete(&key)
            .await?;
          Ok::<_, anyhow::Error>(
            outcome.report("delete")
          )
        }
      );
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
    let board = board.clone();
    let status_draft =
      status_draft.clone();
    let category_draft =
      category_draft.clone();
    Callback::from(move |_: MouseEvent| {
      board.dispatch(
        RemoteAction::ApplyFilter(
          TaskFilter::new(
            StatusFilter::from_key(
              &status_draft
            ),
            &category_draft
          )
        )
      );
    })
  };

  let on_clear = {
    let board = board.clone();
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
      board.dispatch(
        RemoteAction::ClearFilter
      );
    })
  };

  let on_form_change = {
    let form = form.clone();
    Callback::from(
      move |next: RemoteTaskForm| {
        form.set(next)
      }
    )
  };

  html! {
      <div class="page remote">
          <RemoteTaskFormPanel
              form={(*form).clone()}
              editing={board.0.editing().is_some()}
              error={(*form_error).clone()}
              on_change={on_form_change}
              on_submit={on_submit}
              on_cancel={on_cancel}
          />
          <FilterPanel
              active={board.0.filter().is_active()}
              status_value={(*status_draft).clone()}
              on_status_change={on_status_change}
              category_value={(*category_draft).clone()}
              on_category_input={on_category_input}
              on_apply={on_apply}
              on_clear={on_clear}
          />
          <TaskList
              title={format!("Tasks on {}", session.client().base_url())}
              view={board.0.view(&ctx)}
              on_toggle={on_toggle}
              on_edit={on_edit}
              on_delete={on_delete}
          />
      </div>
  }
}
