use tareas_shared::StatusFilter;
use yew::{
  Callback,
  Html,
  MouseEvent,
  Properties,
  function_component,
  html
};

#[derive(Properties, PartialEq)]
pub struct FilterPanelProps {
  pub active:             bool,
  pub status_value:       String,
  pub on_status_change:
    Callback<web_sys::Event>,
  pub category_value:     String,
  pub on_category_input:
    Callback<web_sys::InputEvent>,
  pub on_apply:           Callback<MouseEvent>,
  pub on_clear:           Callback<MouseEvent>
}

const STATUS_OPTIONS: [(StatusFilter, &str); 3] = [
  (StatusFilter::All, "All"),
  (StatusFilter::Pending, "Pending"),
  (StatusFilter::Completed, "Completed")
];

/// Status and category inputs. Edits only take effect on "Apply".
#[function_component(FilterPanel)]
pub fn filter_panel(
  props: &FilterPanelProps
) -> Html {
  let options = STATUS_OPTIONS
    .iter()
    .map(|(status, label)| {
      let key = status.as_key();
      html! {
          <option value={key} selected={props.status_value == key}>{ *label }</option>
      }
    })
    .collect::<Html>();

  html! {
      <div class={if props.active { "panel filters active" } else { "panel filters" }}>
          <div class="header">
              { if props.active { "Filters (applied)" } else { "Filters" } }
          </div>
          <div class="details">
              <div class="field">
                  <label>{ "Status" }</label>
                  <select
                      value={props.status_value.clone()}
                      onchange={props.on_status_change.clone()}
                  >
                      { options }
                  </select>
              </div>
              <div class="field">
                  <label>{ "Category" }</label>
                  <input
                      value={props.category_value.clone()}
                      placeholder="Any category"
                      oninput={props.on_category_input.clone()}
                  />
              </div>
              <div class="actions">
                  <button class="btn" onclick={props.on_apply.clone()}>{ "Apply" }</button>
                  <button class="btn" onclick={props.on_clear.clone()}>{ "Clear" }</button>
              </div>
          </div>
      </div>
  }
}
