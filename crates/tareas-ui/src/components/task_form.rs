use tareas_shared::{
  LocalTaskForm,
  RemoteTaskForm
};
use yew::{
  Callback,
  Html,
  Properties,
  TargetCast,
  function_component,
  html
};

fn input_field<F: Clone + 'static>(
  form: &F,
  on_change: &Callback<F>,
  apply: fn(&mut F, String)
) -> Callback<web_sys::InputEvent> {
  let form = form.clone();
  let on_change = on_change.clone();
  Callback::from(
    move |e: web_sys::InputEvent| {
      let input: web_sys::HtmlInputElement =
        e.target_unchecked_into();
      let mut next = form.clone();
      apply(&mut next, input.value());
      on_change.emit(next);
    }
  )
}

fn textarea_field<F: Clone + 'static>(
  form: &F,
  on_change: &Callback<F>,
  apply: fn(&mut F, String)
) -> Callback<web_sys::InputEvent> {
  let form = form.clone();
  let on_change = on_change.clone();
  Callback::from(
    move |e: web_sys::InputEvent| {
      let input: web_sys::HtmlTextAreaElement =
        e.target_unchecked_into();
      let mut next = form.clone();
      apply(&mut next, input.value());
      on_change.emit(next);
    }
  )
}

fn submit_handler(
  on_submit: &Callback<()>
) -> Callback<web_sys::SubmitEvent> {
  let on_submit = on_submit.clone();
  Callback::from(
    move |e: web_sys::SubmitEvent| {
      e.prevent_default();
      on_submit.emit(());
    }
  )
}

fn form_actions(
  editing: bool,
  on_cancel: &Callback<()>
) -> Html {
  let on_cancel = on_cancel.clone();
  html! {
      <div class="actions">
          <button class="btn primary" type="submit">
              { if editing { "Save changes" } else { "Add task" } }
          </button>
          {
              if editing {
                  html! {
                      <button class="btn" type="button" onclick={move |_| on_cancel.emit(())}>
                          { "Cancel" }
                      </button>
                  }
              } else {
                  html! {}
              }
          }
      </div>
  }
}

fn form_error(
  error: Option<&str>
) -> Html {
  match error {
    | Some(message) => {
      html! { <div class="form-error">{ message }</div> }
    }
    | None => html! {}
  }
}

#[derive(Properties, PartialEq)]
pub struct RemoteTaskFormPanelProps {
  pub form:      RemoteTaskForm,
  pub editing:   bool,
  pub error:     Option<String>,
  pub on_change: Callback<RemoteTaskForm>,
  pub on_submit: Callback<()>,
  pub on_cancel: Callback<()>
}

#[function_component(RemoteTaskFormPanel)]
pub fn remote_task_form_panel(
  props: &RemoteTaskFormPanelProps
) -> Html {
  let form = &props.form;
  let on_change = &props.on_change;

  html! {
      <form class="panel task-form" onsubmit={submit_handler(&props.on_submit)}>
          <div class="header">
              { if props.editing { "Edit task" } else { "New task" } }
          </div>
          <div class="details">
              <div class="field">
                  <label>{ "Name" }</label>
                  <input
                      value={form.name.clone()}
                      oninput={input_field(form, on_change, |f, v| f.name = v)}
                  />
              </div>
              <div class="field">
                  <label>{ "Category" }</label>
                  <input
                      value={form.category.clone()}
                      oninput={input_field(form, on_change, |f, v| f.category = v)}
                  />
              </div>
              <div class="field">
                  <label>{ "Description" }</label>
                  <textarea
                      value={form.description.clone()}
                      oninput={textarea_field(form, on_change, |f, v| f.description = v)}
                  />
              </div>
              <div class="field">
                  <label>{ "Priority" }</label>
                  <input
                      value={form.priority.clone()}
                      oninput={input_field(form, on_change, |f, v| f.priority = v)}
                  />
              </div>
              <div class="field">
                  <label>{ "Due" }</label>
                  <input
                      type="datetime-local"
                      value={form.due.clone()}
                      oninput={input_field(form, on_change, |f, v| f.due = v)}
                  />
              </div>
              { form_error(props.error.as_deref()) }
              { form_actions(props.editing, &props.on_cancel) }
          </div>
      </form>
  }
}

#[derive(Properties, PartialEq)]
pub struct LocalTaskFormPanelProps {
  pub form:      LocalTaskForm,
  pub editing:   bool,
  pub on_change: Callback<LocalTaskForm>,
  pub on_submit: Callback<()>,
  pub on_cancel: Callback<()>
}

#[function_component(LocalTaskFormPanel)]
pub fn local_task_form_panel(
  props: &LocalTaskFormPanelProps
) -> Html {
  let form = &props.form;
  let on_change = &props.on_change;

  html! {
      <form class="panel task-form" onsubmit={submit_handler(&props.on_submit)}>
          <div class="header">
              { if props.editing { "Edit task" } else { "New task" } }
          </div>
          <div class="details">
              <div class="field">
                  <label>{ "Task" }</label>
                  <input
                      value={form.text.clone()}
                      oninput={input_field(form, on_change, |f, v| f.text = v)}
                  />
              </div>
              <div class="field">
                  <label>{ "Category" }</label>
                  <input
                      value={form.category.clone()}
                      oninput={input_field(form, on_change, |f, v| f.category = v)}
                  />
              </div>
              <div class="field">
                  <label>{ "Description" }</label>
                  <textarea
                      value={form.description.clone()}
                      oninput={textarea_field(form, on_change, |f, v| f.description = v)}
                  />
              </div>
              { form_actions(props.editing, &props.on_cancel) }
          </div>
      </form>
  }
}
