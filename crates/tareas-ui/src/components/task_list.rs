use tareas_shared::TaskListView;
use yew::{
  Callback,
  Html,
  Properties,
  function_component,
  html
};

use super::TaskListRow;

#[derive(Properties, PartialEq)]
pub struct TaskListProps {
  pub title:     String,
  pub view:      TaskListView,
  pub on_toggle: Callback<String>,
  pub on_edit:   Callback<String>,
  pub on_delete: Callback<String>
}

#[function_component(TaskList)]
pub fn task_list(
  props: &TaskListProps
) -> Html {
  let body = match &props.view {
    | TaskListView::Empty { message } => {
      html! { <div class="empty">{ *message }</div> }
    }
    | TaskListView::Rows(rows) => {
      rows
        .iter()
        .cloned()
        .map(|row| {
          let key = row.key.clone();
          html! {
            <TaskListRow
                key={key}
                row={row}
                on_toggle={props.on_toggle.clone()}
                on_edit={props.on_edit.clone()}
                on_delete={props.on_delete.clone()}
            />
          }
        })
        .collect::<Html>()
    }
  };

  html! {
      <div class="panel list">
          <div class="header">{ props.title.clone() }</div>
          { body }
      </div>
  }
}
