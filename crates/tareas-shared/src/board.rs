use crate::filter::TaskFilter;
use crate::form::FormError;
use crate::task::TaskRecord;
use crate::view::{
  RenderContext,
  RenderRow,
  TaskListView,
  render
};

/// Generation number of a list request.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
)]
pub struct FetchTicket(u64);

/// Issues strictly increasing [`FetchTicket`]s.
#[derive(Debug, Default)]
pub struct FetchTickets {
  issued: u64
}

impl FetchTickets {
  pub fn issue(&mut self) -> FetchTicket {
    self.issued += 1;
    FetchTicket(self.issued)
  }
}

/// What a successful form submit should do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission<D> {
  Create(D),
  Update { key: String, draft: D }
}

/// Application state of one front-end variant: the task collection, the
/// applied filter and the task under edit.
#[derive(Debug, Clone, PartialEq)]
pub struct Board<T> {
  tasks:         Vec<T>,
  filter:        TaskFilter,
  editing:       Option<String>,
  applied_fetch: Option<FetchTicket>
}

impl<T> Default for Board<T> {
  fn default() -> Self {
    Self {
      tasks:         Vec::new(),
      filter:        TaskFilter::default(),
      editing:       None,
      applied_fetch: None
    }
  }
}

impl<T: TaskRecord + Clone> Board<T> {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_tasks(tasks: Vec<T>) -> Self {
    Self {
      tasks,
      ..Self::default()
    }
  }

  pub fn tasks(&self) -> &[T] {
    &self.tasks
  }

  pub fn filter(&self) -> &TaskFilter {
    &self.filter
  }

  pub fn editing(&self) -> Option<&str> {
    self.editing.as_deref()
  }

  pub fn find(
    &self,
    key: &str
  ) -> Option<&T> {
    self
      .tasks
      .iter()
      .find(|task| task.key() == key)
  }

  /// Resolves a full key or a unique prefix of one.
  pub fn resolve(
    &self,
    needle: &str
  ) -> anyhow::Result<String> {
    let needle = needle.trim();
    if needle.is_empty() {
      anyhow::bail!("task id is empty");
    }
    if let Some(task) = self.find(needle) {
      return Ok(task.key());
    }

    let needle_lower = needle.to_lowercase();
    let matches: Vec<String> = self
      .tasks
      .iter()
      .map(TaskRecord::key)
      .filter(|key| {
        key
          .to_lowercase()
          .starts_with(&needle_lower)
      })
      .collect();

    match matches.as_slice() {
      | [key] => Ok(key.clone()),
      | [] => Err(anyhow::anyhow!(
        "task not found: {needle}"
      )),
      | _ => Err(anyhow::anyhow!(
        "task id prefix {needle} is \
         ambiguous ({} matches)",
        matches.len()
      ))
    }
  }

  pub fn replace_tasks(
    &mut self,
    tasks: Vec<T>
  ) {
    self.tasks = tasks;
    self.drop_stale_edit();
  }

  /// Installs the result of a list request unless a newer one already
  /// landed. Returns whether the tasks were taken.
  pub fn accept_fetch(
    &mut self,
    ticket: FetchTicket,
    tasks: Vec<T>
  ) -> bool {
    if self
      .applied_fetch
      .is_some_and(|applied| ticket <= applied)
    {
      tracing::debug!(
        ?ticket,
        applied = ?self.applied_fetch,
        "discarding stale task list"
      );
      return false;
    }

    self.applied_fetch = Some(ticket);
    self.replace_tasks(tasks);
    true
  }

  pub fn apply_filter(
    &mut self,
    filter: TaskFilter
  ) {
    self.filter = filter;
  }

  pub fn clear_filter(&mut self) {
    self.filter = TaskFilter::default();
  }

  pub fn visible(&self) -> Vec<&T> {
    self.filter.apply(&self.tasks)
  }

  /// Enters edit mode for `key`; returns the task to load into the form.
  pub fn begin_edit(
    &mut self,
    key: &str
  ) -> Option<&T> {
    let index = self
      .tasks
      .iter()
      .position(|task| task.key() == key)?;
    self.editing = Some(key.to_string());
    self.tasks.get(index)
  }

  pub fn cancel_edit(&mut self) {
    self.editing = None;
  }

  /// Turns a parsed form into a create or an update, leaving edit mode
  /// when the form was valid.
  pub fn submission<D>(
    &mut self,
    parsed: Result<D, FormError>
  ) -> Result<Submission<D>, FormError> {
    let draft = parsed?;
    Ok(match self.editing.take() {
      | Some(key) => {
        Submission::Update { key, draft }
      }
      | None => Submission::Create(draft)
    })
  }

  fn drop_stale_edit(&mut self) {
    if let Some(key) = self.editing.as_deref()
      && self.find(key).is_none()
    {
      self.editing = None;
    }
  }
}

impl<T: RenderRow + Clone> Board<T> {
  pub fn view(
    &self,
    ctx: &RenderContext
  ) -> TaskListView {
    render(&self.tasks, &self.filter, ctx)
  }
}
