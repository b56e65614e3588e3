//! Domain types and front-end-agnostic logic shared by the terminal and
//! web front-ends.
//!
//! Everything in this crate compiles for `wasm32-unknown-unknown` as well
//! as native targets; platform specific persistence lives behind
//! [`local::KeyValueStore`].

pub mod board;
pub mod datetime;
pub mod filter;
pub mod form;
pub mod local;
pub mod remote;
pub mod settings;
pub mod task;
pub mod view;

pub use board::{
  Board,
  FetchTicket,
  FetchTickets,
  Submission
};
pub use datetime::DueMarker;
pub use filter::{
  StatusFilter,
  TaskFilter
};
pub use form::{
  FormError,
  LocalTaskForm,
  RemoteTaskForm
};
pub use local::{
  KeyValueStore,
  LocalSession,
  LocalTaskStore,
  MemoryStore
};
pub use remote::{
  MutationOutcome,
  RemoteClient,
  RemoteSession
};
pub use settings::Settings;
pub use task::{
  ActividadPayload,
  LocalDraft,
  LocalTask,
  RemoteTask,
  TaskRecord,
  TaskStatus
};
pub use view::{
  DELETE_CONFIRMATION,
  EMPTY_PLACEHOLDER,
  TaskListView,
  TaskRow
};
