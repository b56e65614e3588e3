use chrono::NaiveDateTime;
use serde::{
  Deserialize,
  Deserializer,
  Serialize
};
use uuid::Uuid;

use crate::datetime::wire_date;

/// Value older front-ends stored in `Prioridad` to mark a task done.
pub const LEGACY_COMPLETED_PRIORITY:
  &str = "Completada";

#[derive(
  Debug,
  Clone,
  Copy,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
  Default,
)]
pub enum TaskStatus {
  #[default]
  #[serde(rename = "Pendiente")]
  Pending,
  #[serde(rename = "Completada")]
  Completed
}

impl TaskStatus {
  pub fn toggled(self) -> Self {
    match self {
      | TaskStatus::Pending => {
        TaskStatus::Completed
      }
      | TaskStatus::Completed => {
        TaskStatus::Pending
      }
    }
  }

  pub fn is_completed(self) -> bool {
    self == TaskStatus::Completed
  }

  pub fn from_completed(
    completed: bool
  ) -> Self {
    if completed {
      TaskStatus::Completed
    } else {
      TaskStatus::Pending
    }
  }

  pub fn wire_label(
    self
  ) -> &'static str {
    match self {
      | TaskStatus::Pending => {
        "Pendiente"
      }
      | TaskStatus::Completed => {
        "Completada"
      }
    }
  }

  /// Lenient parse of an `Estatus` value.
  pub fn from_wire_label(
    raw: &str
  ) -> Option<Self> {
    match raw.trim().to_lowercase().as_str()
    {
      | "completada" | "completed" => {
        Some(TaskStatus::Completed)
      }
      | "pendiente" | "pending" => {
        Some(TaskStatus::Pending)
      }
      | _ => None
    }
  }
}

/// Common surface the filters, the board and the renderer work against.
pub trait TaskRecord {
  /// Stable identity, never a position in a list.
  fn key(&self) -> String;
  fn status(&self) -> TaskStatus;
  fn category(&self) -> &str;
}

/// A task owned by the REST service.
#[derive(
  Debug, Clone, PartialEq, Deserialize,
)]
#[serde(from = "ActividadRecord")]
pub struct RemoteTask {
  pub id:          String,
  pub name:        String,
  pub category:    String,
  pub description: String,
  pub priority:    Option<String>,
  pub status:      TaskStatus,
  pub created:     Option<NaiveDateTime>,
  pub due:         Option<NaiveDateTime>
}

impl TaskRecord for RemoteTask {
  fn key(&self) -> String {
    self.id.clone()
  }

  fn status(&self) -> TaskStatus {
    self.status
  }

  fn category(&self) -> &str {
    &self.category
  }
}

/// Shape of an `/actividades` document as the service returns it.
#[derive(Debug, Clone, Deserialize)]
pub struct ActividadRecord {
  #[serde(alias = "_id")]
  id:          String,
  #[serde(rename = "Nombre", default)]
  nombre:      String,
  #[serde(
    rename = "Categoria",
    default
  )]
  categoria:   String,
  #[serde(
    rename = "Descripcion",
    default
  )]
  descripcion: String,
  #[serde(
    rename = "Prioridad",
    default,
    deserialize_with = "loose_text"
  )]
  prioridad:   Option<String>,
  #[serde(
    rename = "Estatus",
    default,
    deserialize_with = "loose_text"
  )]
  estatus:     Option<String>,
  #[serde(
    rename = "Fecha",
    default,
    deserialize_with = "wire_date::deserialize"
  )]
  fecha:       Option<NaiveDateTime>,
  #[serde(
    rename = "Fin",
    default,
    deserialize_with = "wire_date::deserialize"
  )]
  fin:         Option<NaiveDateTime>
}

impl From<ActividadRecord>
  for RemoteTask
{
  fn from(
    record: ActividadRecord
  ) -> Self {
    let legacy_completed = record
      .prioridad
      .as_deref()
      .map(|value| {
        value.trim()
          == LEGACY_COMPLETED_PRIORITY
      })
      .unwrap_or(false);

    let status = record
      .estatus
      .as_deref()
      .and_then(
        TaskStatus::from_wire_label
      )
      .unwrap_or_else(|| {
        TaskStatus::from_completed(
          legacy_completed
        )
      });

    let priority = if legacy_completed {
      None
    } else {
      record
        .prioridad
        .filter(|value| {
          !value.trim().is_empty()
        })
    };

    Self {
      id: record.id,
      name: record.nombre,
      category: record.categoria,
      description: record.descripcion,
      priority,
      status,
      created: record.fecha,
      due: record.fin
    }
  }
}

/// `Prioridad` and `Estatus` have been stored as text, numbers and null.
fn loose_text<'de, D>(
  deserializer: D
) -> Result<Option<String>, D::Error>
where
  D: Deserializer<'de>
{
  let raw =
    Option::<serde_json::Value>::deserialize(
      deserializer
    )?;
  Ok(match raw {
    | Some(serde_json::Value::String(
      text
    )) => Some(text),
    | Some(serde_json::Value::Number(
      number
    )) => Some(number.to_string()),
    | Some(serde_json::Value::Bool(
      flag
    )) => Some(flag.to_string()),
    | _ => None
  })
}

/// Body of `POST /actividades` and `PUT /actividades/{id}`.
#[derive(
  Debug, Clone, PartialEq, Serialize,
)]
pub struct ActividadPayload {
  #[serde(rename = "Nombre")]
  pub name:        String,
  #[serde(rename = "Categoria")]
  pub category:    String,
  #[serde(rename = "Descripcion")]
  pub description: String,
  #[serde(rename = "Prioridad")]
  pub priority:    Option<String>,
  #[serde(
    rename = "Fin",
    serialize_with = "wire_date::serialize"
  )]
  pub due:         Option<NaiveDateTime>,
  #[serde(rename = "Estatus")]
  pub status:      TaskStatus
}

impl ActividadPayload {
  pub fn from_task(
    task: &RemoteTask
  ) -> Self {
    Self {
      name:        task.name.clone(),
      category:    task.category.clone(),
      description: task
        .description
        .clone(),
      priority:    task.priority.clone(),
      due:         task.due,
      status:      task.status
    }
  }

  pub fn with_status(
    mut self,
    status: TaskStatus
  ) -> Self {
    self.status = status;
    self
  }
}

/// A task kept in browser-local (or file) storage.
#[derive(
  Debug,
  Clone,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
)]
pub struct LocalTask {
  #[serde(default = "Uuid::nil")]
  pub id:          Uuid,
  #[serde(default)]
  pub text:        String,
  #[serde(default)]
  pub category:    String,
  #[serde(default)]
  pub description: String,
  #[serde(default)]
  pub completed:   bool
}

impl LocalTask {
  pub fn from_draft(
    draft: LocalDraft
  ) -> Self {
    Self {
      id:          Uuid::new_v4(),
      text:        draft.text,
      category:    draft.category,
      description: draft.description,
      completed:   false
    }
  }

  pub fn apply(
    &mut self,
    draft: LocalDraft
  ) {
    self.text = draft.text;
    self.category = draft.category;
    self.description =
      draft.description;
  }
}

impl TaskRecord for LocalTask {
  fn key(&self) -> String {
    self.id.to_string()
  }

  fn status(&self) -> TaskStatus {
    TaskStatus::from_completed(
      self.completed
    )
  }

  fn category(&self) -> &str {
    &self.category
  }
}

/// Validated form input for a local task.
#[derive(
  Debug, Clone, PartialEq, Eq, Default,
)]
pub struct LocalDraft {
  pub text:        String,
  pub category:    String,
  pub description: String
}
