use std::fmt;

use chrono::NaiveDate;

use crate::datetime::{
  default_due_input,
  format_input,
  parse_timestamp
};
use crate::task::{
  ActividadPayload,
  LocalDraft,
  LocalTask,
  RemoteTask,
  TaskStatus
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormError {
  /// The name/text field was blank after trimming.
  MissingName,
  InvalidDue(String)
}

impl fmt::Display for FormError {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    match self {
      | FormError::MissingName => {
        write!(f, "task name is required")
      }
      | FormError::InvalidDue(raw) => {
        write!(
          f,
          "invalid due date: {raw}"
        )
      }
    }
  }
}

impl std::error::Error for FormError {}

/// Field values of the remote variant's form, as typed.
#[derive(
  Debug, Clone, PartialEq, Eq, Default,
)]
pub struct RemoteTaskForm {
  pub name:        String,
  pub category:    String,
  pub description: String,
  pub priority:    String,
  pub due:         String
}

impl RemoteTaskForm {
  /// A blank form whose due field starts at today's midnight.
  pub fn blank(today: NaiveDate) -> Self {
    Self {
      due: default_due_input(today),
      ..Self::default()
    }
  }

  pub fn from_task(
    task: &RemoteTask
  ) -> Self {
    Self {
      name:        task.name.clone(),
      category:    task.category.clone(),
      description: task
        .description
        .clone(),
      priority:    task
        .priority
        .clone()
        .unwrap_or_default(),
      due:         format_input(task.due)
    }
  }

  pub fn to_payload(
    &self,
    status: TaskStatus
  ) -> Result<ActividadPayload, FormError>
  {
    let name = self.name.trim();
    if name.is_empty() {
      return Err(FormError::MissingName);
    }

    let due_raw = self.due.trim();
    let due = if due_raw.is_empty() {
      None
    } else {
      Some(
        parse_timestamp(due_raw).ok_or_else(
          || {
            FormError::InvalidDue(
              due_raw.to_string()
            )
          }
        )?
      )
    };

    let priority = self.priority.trim();

    Ok(ActividadPayload {
      name: name.to_string(),
      category: self
        .category
        .trim()
        .to_string(),
      description: self
        .description
        .trim()
        .to_string(),
      priority: (!priority.is_empty())
        .then(|| priority.to_string()),
      due,
      status
    })
  }
}

/// Field values of the local variant's form.
#[derive(
  Debug, Clone, PartialEq, Eq, Default,
)]
pub struct LocalTaskForm {
  pub text:        String,
  pub category:    String,
  pub description: String
}

impl LocalTaskForm {
  pub fn from_task(
    task: &LocalTask
  ) -> Self {
    Self {
      text:        task.text.clone(),
      category:    task.category.clone(),
      description: task
        .description
        .clone()
    }
  }

  pub fn to_draft(
    &self
  ) -> Result<LocalDraft, FormError> {
    let text = self.text.trim();
    if text.is_empty() {
      return Err(FormError::MissingName);
    }

    Ok(LocalDraft {
      text:        text.to_string(),
      category:    self
        .category
        .trim()
        .to_string(),
      description: self
        .description
        .trim()
        .to_string()
    })
  }
}
