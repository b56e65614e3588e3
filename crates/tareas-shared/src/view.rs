//! Pure view model of a task list. Front-ends turn [`TaskListView`] into
//! DOM nodes or terminal rows; nothing here is cached between renders.

use chrono::NaiveDateTime;

use crate::datetime::{
  DueMarker,
  format_display
};
use crate::filter::TaskFilter;
use crate::task::{
  LocalTask,
  RemoteTask,
  TaskRecord
};

pub const EMPTY_PLACEHOLDER: &str =
  "No tasks match the current filters.";

pub const DELETE_CONFIRMATION: &str =
  "Delete this task?";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderContext {
  pub now:           NaiveDateTime,
  pub near_due_days: u32
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaskRow {
  pub key:            String,
  pub title:          String,
  pub category_label: Option<String>,
  pub description:    Option<String>,
  pub completed:      bool,
  pub priority:       Option<String>,
  pub created:        Option<String>,
  pub due:            Option<String>,
  pub marker:         Option<DueMarker>
}

impl TaskRow {
  pub fn toggle_label(
    &self
  ) -> &'static str {
    if self.completed {
      "Mark pending"
    } else {
      "Complete"
    }
  }

  pub fn css_class(&self) -> String {
    match self.marker {
      | Some(marker) => {
        format!(
          "task {}",
          marker.css_class()
        )
      }
      | None => "task".to_string()
    }
  }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TaskListView {
  Empty { message: &'static str },
  Rows(Vec<TaskRow>)
}

impl TaskListView {
  pub fn rows(&self) -> &[TaskRow] {
    match self {
      | TaskListView::Empty { .. } => &[],
      | TaskListView::Rows(rows) => rows
    }
  }

  pub fn is_empty(&self) -> bool {
    matches!(
      self,
      TaskListView::Empty { .. }
    )
  }
}

pub trait RenderRow: TaskRecord {
  fn to_row(
    &self,
    ctx: &RenderContext
  ) -> TaskRow;
}

fn non_empty(text: &str) -> Option<String> {
  let trimmed = text.trim();
  (!trimmed.is_empty())
    .then(|| trimmed.to_string())
}

impl RenderRow for RemoteTask {
  fn to_row(
    &self,
    ctx: &RenderContext
  ) -> TaskRow {
    TaskRow {
      key:            self.key(),
      title:          self.name.clone(),
      category_label: non_empty(
        &self.category
      )
      .map(|category| {
        format!("[{category}]")
      }),
      description:    non_empty(
        &self.description
      ),
      completed:      self
        .status
        .is_completed(),
      priority:       self
        .priority
        .clone(),
      created:        self.created.map(
        |value| {
          format_display(Some(value))
        }
      ),
      due:            self.due.map(|value| {
        format_display(Some(value))
      }),
      marker:         Some(
        DueMarker::classify(
          self.due,
          ctx.now,
          ctx.near_due_days
        )
      )
    }
  }
}

impl RenderRow for LocalTask {
  fn to_row(
    &self,
    _ctx: &RenderContext
  ) -> TaskRow {
    TaskRow {
      key:            self.key(),
      title:          self.text.clone(),
      category_label: non_empty(
        &self.category
      )
      .map(|category| {
        format!("[{category}]")
      }),
      description:    non_empty(
        &self.description
      ),
      completed:      self.completed,
      priority:       None,
      created:        None,
      due:            None,
      marker:         None
    }
  }
}

pub fn render<T: RenderRow>(
  tasks: &[T],
  filter: &TaskFilter,
  ctx: &RenderContext
) -> TaskListView {
  let rows: Vec<TaskRow> = tasks
    .iter()
    .filter(|task| filter.matches(*task))
    .map(|task| task.to_row(ctx))
    .collect();

  if rows.is_empty() {
    TaskListView::Empty {
      message: EMPTY_PLACEHOLDER
    }
  } else {
    TaskListView::Rows(rows)
  }
}
