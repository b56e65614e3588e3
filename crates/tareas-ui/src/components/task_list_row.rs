use tareas_shared::TaskRow;
use yew::{
  Callback,
  Html,
  Properties,
  function_component,
  html
};

#[derive(Properties, PartialEq)]
pub struct TaskListRowProps {
  pub row:       TaskRow,
  pub on_toggle: Callback<String>,
  pub on_edit:   Callback<String>,
  pub on_delete: Callback<String>
}

#[function_component(TaskListRow)]
pub fn task_list_row(
  props: &TaskListRowProps
) -> Html {
  let row = &props.row;
  let emit_key = |callback: &Callback<String>| {
    let callback = callback.clone();
    let key = row.key.clone();
    move |_: yew::MouseEvent| {
      callback.emit(key.clone())
    }
  };

  let dot_class = if row.completed {
    "dot done"
  } else {
    "dot pending"
  };

  html! {
      <div class={row.css_class()} data-key={row.key.clone()}>
          <div class={dot_class}></div>
          <div class="task-body">
              <div class="task-title">
                  { &row.title }
                  {
                      match row.category_label.as_deref() {
                          Some(label) => html! { <span class="badge">{ label }</span> },
                          None => html! {}
                      }
                  }
              </div>
              {
                  match row.description.as_deref() {
                      Some(description) => html! { <div class="task-subtitle">{ description }</div> },
                      None => html! {}
                  }
              }
              <div class="task-meta">
                  {
                      match row.priority.as_deref() {
                          Some(priority) => html! { <span class="badge">{ format!("priority: {priority}") }</span> },
                          None => html! {}
                      }
                  }
                  {
                      match row.created.as_deref() {
                          Some(created) => html! { <span class="badge">{ format!("created: {created}") }</span> },
                          None => html! {}
                      }
                  }
                  {
                      match (row.due.as_deref(), row.marker) {
                          (Some(due), Some(marker)) => html! {
                              <span class="badge due">{ format!("due: {due} ({})", marker.label()) }</span>
                          },
                          (None, Some(marker)) => html! {
                              <span class="badge due">{ marker.label() }</span>
                          },
                          _ => html! {}
                      }
                  }
              </div>
          </div>
          <div class="actions">
              <button class="btn" onclick={emit_key(&props.on_toggle)}>{ row.toggle_label() }</button>
              <button class="btn" onclick={emit_key(&props.on_edit)}>{ "Edit" }</button>
              <button class="btn danger" onclick={emit_key(&props.on_delete)}>{ "Delete" }</button>
          </div>
      </div>
  }
}
