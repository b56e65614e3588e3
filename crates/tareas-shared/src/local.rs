use std::collections::BTreeMap;

use anyhow::{
  Context,
  anyhow
};
use tracing::{
  debug,
  info,
  instrument
};
use uuid::Uuid;

use crate::board::{
  Board,
  Submission
};
use crate::form::{
  FormError,
  LocalTaskForm
};
use crate::task::{
  LocalDraft,
  LocalTask
};
use crate::view::{
  RenderContext,
  TaskListView
};

pub const DEFAULT_STORAGE_KEY: &str =
  "tasks";

/// Synchronous string key-value storage, shaped after `window.localStorage`.
pub trait KeyValueStore {
  fn get_item(
    &self,
    key: &str
  ) -> anyhow::Result<Option<String>>;

  fn set_item(
    &mut self,
    key: &str,
    value: &str
  ) -> anyhow::Result<()>;
}

/// In-memory storage, used by tests and as a fallback when no real storage
/// is reachable.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
  items: BTreeMap<String, String>
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_item(
    key: &str,
    value: &str
  ) -> Self {
    let mut store = Self::new();
    store
      .items
      .insert(key.to_string(), value.to_string());
    store
  }
}

impl KeyValueStore for MemoryStore {
  fn get_item(
    &self,
    key: &str
  ) -> anyhow::Result<Option<String>> {
    Ok(self.items.get(key).cloned())
  }

  fn set_item(
    &mut self,
    key: &str,
    value: &str
  ) -> anyhow::Result<()> {
    self
      .items
      .insert(key.to_string(), value.to_string());
    Ok(())
  }
}

/// The local task array, written through to storage on every mutation.
#[derive(Debug)]
pub struct LocalTaskStore<S> {
  storage: S,
  key:     String,
  tasks:   Vec<LocalTask>
}

impl<S: KeyValueStore> LocalTaskStore<S> {
  #[instrument(skip(storage))]
  pub fn open(
    storage: S,
    key: &str
  ) -> anyhow::Result<Self> {
    let raw = storage
      .get_item(key)
      .with_context(|| {
        format!(
          "failed to read storage key \
           {key}"
        )
      })?;

    let mut tasks = match raw.as_deref() {
      | Some(text)
        if !text.trim().is_empty() =>
      {
        serde_json::from_str::<Vec<LocalTask>>(
          text
        )
        .with_context(|| {
          format!(
            "failed to parse tasks \
             stored under {key}"
          )
        })?
      }
      | _ => Vec::new()
    };

    let mut assigned = 0_usize;
    for task in &mut tasks {
      if task.id.is_nil() {
        task.id = Uuid::new_v4();
        assigned += 1;
      }
    }

    let mut store = Self {
      storage,
      key: key.to_string(),
      tasks
    };

    if assigned > 0 {
      info!(
        assigned,
        "assigned ids to stored tasks \
         without one"
      );
      let tasks = store.tasks.clone();
      store.write(&tasks)?;
    }

    debug!(
      count = store.tasks.len(),
      "opened local task store"
    );
    Ok(store)
  }

  /// A store that starts empty without reading `storage`; nothing is
  /// written until the first mutation.
  pub fn empty(storage: S, key: &str) -> Self {
    Self {
      storage,
      key: key.to_string(),
      tasks: Vec::new()
    }
  }

  pub fn tasks(&self) -> &[LocalTask] {
    &self.tasks
  }

  pub fn storage(&self) -> &S {
    &self.storage
  }

  #[instrument(skip(self, draft), fields(text_len = draft.text.len()))]
  pub fn add(
    &mut self,
    draft: LocalDraft
  ) -> anyhow::Result<Uuid> {
    let task = LocalTask::from_draft(draft);
    let id = task.id;
    let mut next = self.tasks.clone();
    next.push(task);
    self.commit(next)?;
    info!(%id, "added local task");
    Ok(id)
  }

  #[instrument(skip(self, draft))]
  pub fn update(
    &mut self,
    id: Uuid,
    draft: LocalDraft
  ) -> anyhow::Result<()> {
    let mut next = self.tasks.clone();
    task_mut(&mut next, id)?.apply(draft);
    self.commit(next)?;
    info!(%id, "updated local task");
    Ok(())
  }

  #[instrument(skip(self))]
  pub fn toggle(
    &mut self,
    id: Uuid
  ) -> anyhow::Result<bool> {
    let mut next = self.tasks.clone();
    let task = task_mut(&mut next, id)?;
    task.completed = !task.completed;
    let completed = task.completed;
    self.commit(next)?;
    info!(%id, completed, "toggled local task");
    Ok(completed)
  }

  #[instrument(skip(self))]
  pub fn remove(
    &mut self,
    id: Uuid
  ) -> anyhow::Result<LocalTask> {
    let mut next = self.tasks.clone();
    let index = next
      .iter()
      .position(|task| task.id == id)
      .ok_or_else(|| {
        anyhow!("task not found: {id}")
      })?;
    let removed = next.remove(index);
    self.commit(next)?;
    info!(%id, "removed local task");
    Ok(removed)
  }

  /// Writes `next` to storage and adopts it only once the write
  /// succeeded; a failed write leaves the store as it was.
  fn commit(
    &mut self,
    next: Vec<LocalTask>
  ) -> anyhow::Result<()> {
    self.write(&next)?;
    self.tasks = next;
    Ok(())
  }

  fn write(
    &mut self,
    tasks: &[LocalTask]
  ) -> anyhow::Result<()> {
    let json = serde_json::to_string(tasks)
      .context("failed to encode tasks")?;
    self
      .storage
      .set_item(&self.key, &json)
      .with_context(|| {
        format!(
          "failed to write storage key {}",
          self.key
        )
      })
  }
}

fn task_mut(
  tasks: &mut [LocalTask],
  id: Uuid
) -> anyhow::Result<&mut LocalTask> {
  tasks
    .iter_mut()
    .find(|task| task.id == id)
    .ok_or_else(|| {
      anyhow!("task not found: {id}")
    })
}

/// The local variant end to end: store plus board.
#[derive(Debug)]
pub struct LocalSession<S> {
  store: LocalTaskStore<S>,
  board: Board<LocalTask>
}

impl<S: KeyValueStore> LocalSession<S> {
  pub fn open(
    storage: S,
    key: &str
  ) -> anyhow::Result<Self> {
    let store =
      LocalTaskStore::open(storage, key)?;
    let board = Board::with_tasks(
      store.tasks().to_vec()
    );
    Ok(Self { store, board })
  }

  pub fn empty(storage: S, key: &str) -> Self {
    Self {
      store: LocalTaskStore::empty(storage, key),
      board: Board::new()
    }
  }

  pub fn board(&self) -> &Board<LocalTask> {
    &self.board
  }

  pub fn board_mut(
    &mut self
  ) -> &mut Board<LocalTask> {
    &mut self.board
  }

  pub fn store(
    &self
  ) -> &LocalTaskStore<S> {
    &self.store
  }

  pub fn view(
    &self,
    ctx: &RenderContext
  ) -> TaskListView {
    self.board.view(ctx)
  }

  /// Handles a form submit. A blank text field is a silent no-op and
  /// leaves the form untouched; otherwise the form is cleared.
  pub fn submit(
    &mut self,
    form: &mut LocalTaskForm
  ) -> anyhow::Result<bool> {
    let submission = match self
      .board
      .submission(form.to_draft())
    {
      | Ok(submission) => submission,
      | Err(FormError::MissingName) => {
        return Ok(false);
      }
      | Err(error) => return Err(error.into())
    };

    match submission {
      | Submission::Create(draft) => {
        self.store.add(draft)?;
      }
      | Submission::Update { key, draft } => {
        let id = parse_key(&key)?;
        self.store.update(id, draft)?;
      }
    }

    *form = LocalTaskForm::default();
    self.sync();
    Ok(true)
  }

  pub fn begin_edit(
    &mut self,
    key: &str
  ) -> Option<LocalTaskForm> {
    self
      .board
      .begin_edit(key)
      .map(LocalTaskForm::from_task)
  }

  pub fn toggle(
    &mut self,
    key: &str
  ) -> anyhow::Result<bool> {
    let completed =
      self.store.toggle(parse_key(key)?)?;
    self.sync();
    Ok(completed)
  }

  pub fn remove(
    &mut self,
    key: &str
  ) -> anyhow::Result<()> {
    self.store.remove(parse_key(key)?)?;
    self.sync();
    Ok(())
  }

  fn sync(&mut self) {
    self
      .board
      .replace_tasks(self.store.tasks().to_vec());
  }
}

fn parse_key(key: &str) -> anyhow::Result<Uuid> {
  Uuid::parse_str(key).with_context(|| {
    format!("invalid task id: {key}")
  })
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;

  use super::*;
  use crate::filter::{
    StatusFilter,
    TaskFilter
  };
  use crate::task::TaskRecord;
  use crate::view::EMPTY_PLACEHOLDER;

  fn ctx() -> RenderContext {
    RenderContext {
      now:           NaiveDate::from_ymd_opt(
        2025, 1, 1
      )
      .and_then(|d| d.and_hms_opt(0, 0, 0))
      .expect("valid now"),
      near_due_days: 7
    }
  }

  fn session() -> LocalSession<MemoryStore> {
    LocalSession::open(
      MemoryStore::new(),
      DEFAULT_STORAGE_KEY
    )
    .expect("open session")
  }

  fn form(text: &str, category: &str) -> LocalTaskForm {
    LocalTaskForm {
      text:        text.to_string(),
      category:    category.to_string(),
      description: String::new()
    }
  }

  #[test]
  fn create_appends_one_task_and_clears_form(
  ) {
    let mut session = session();
    let mut form = form("  buy bread ", "shop");

    assert!(session.submit(&mut form).expect("submit"));
    assert_eq!(form, LocalTaskForm::default());
    assert_eq!(session.board().tasks().len(), 1);
    assert_eq!(
      session.board().tasks()[0].text,
      "buy bread"
    );

    let stored = session
      .store()
      .storage()
      .get_item(DEFAULT_STORAGE_KEY)
      .expect("read storage")
      .expect("tasks persisted");
    let decoded: Vec<LocalTask> =
      serde_json::from_str(&stored)
        .expect("decode stored tasks");
    assert_eq!(decoded.len(), 1);
  }

  #[test]
  fn blank_submit_is_a_no_op() {
    let mut session = session();
    let mut form = form("   ", "keep me");

    assert!(!session.submit(&mut form).expect("submit"));
    assert_eq!(form.category, "keep me");
    assert!(session.board().tasks().is_empty());
  }

  #[test]
  fn toggling_under_a_filter_hits_the_right_task(
  ) {
    let mut session = session();
    for (text, category) in [
      ("first", "home"),
      ("second", "work"),
      ("third", "work"),
    ] {
      session
        .submit(&mut form(text, category))
        .expect("submit");
    }

    session.board_mut().apply_filter(
      TaskFilter::new(StatusFilter::All, "work")
    );
    let view = session.view(&ctx());
    let third = view.rows()[1].key.clone();

    session.toggle(&third).expect("toggle");
    let completed: Vec<&str> = session
      .board()
      .tasks()
      .iter()
      .filter(|task| task.completed)
      .map(|task| task.text.as_str())
      .collect();
    assert_eq!(completed, vec!["third"]);
  }

  #[test]
  fn delete_removes_task_from_later_renders() {
    let mut session = session();
    session
      .submit(&mut form("doomed", ""))
      .expect("submit");
    let key = session.board().tasks()[0].key();

    session.remove(&key).expect("remove");
    assert_eq!(
      session.view(&ctx()),
      TaskListView::Empty {
        message: EMPTY_PLACEHOLDER
      }
    );
    assert!(session.remove(&key).is_err());
  }

  #[test]
  fn edit_then_submit_updates_in_place() {
    let mut session = session();
    session
      .submit(&mut form("draft", "a"))
      .expect("submit");
    let key = session.board().tasks()[0].key();

    let mut edit = session
      .begin_edit(&key)
      .expect("task exists");
    edit.text = "final".into();
    session.submit(&mut edit).expect("submit");

    let tasks = session.board().tasks();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].text, "final");
    assert_eq!(tasks[0].key(), key);
  }

  #[test]
  fn legacy_arrays_get_ids_and_are_rewritten() {
    let storage = MemoryStore::with_item(
      DEFAULT_STORAGE_KEY,
      r#"[{"text":"a","category":"","description":"","completed":false},
          {"text":"b","category":"x","description":"","completed":true}]"#
    );
    let store = LocalTaskStore::open(
      storage,
      DEFAULT_STORAGE_KEY
    )
    .expect("open store");

    assert!(store
      .tasks()
      .iter()
      .all(|task| !task.id.is_nil()));
    let rewritten = store
      .storage()
      .get_item(DEFAULT_STORAGE_KEY)
      .expect("read")
      .expect("present");
    assert!(rewritten.contains(
      &store.tasks()[0].id.to_string()
    ));
  }

  #[test]
  fn corrupt_storage_is_an_error() {
    let storage = MemoryStore::with_item(
      DEFAULT_STORAGE_KEY,
      "{not json"
    );
    assert!(
      LocalTaskStore::open(
        storage,
        DEFAULT_STORAGE_KEY
      )
      .is_err()
    );
  }

  #[test]
  fn empty_session_writes_only_on_first_mutation() {
    let mut session = LocalSession::empty(
      MemoryStore::new(),
      DEFAULT_STORAGE_KEY
    );
    assert_eq!(
      session
        .store()
        .storage()
        .get_item(DEFAULT_STORAGE_KEY)
        .expect("read"),
      None
    );

    let mut form = form("first", "");
    assert!(
      session.submit(&mut form).expect("submit")
    );
    assert!(
      session
        .store()
        .storage()
        .get_item(DEFAULT_STORAGE_KEY)
        .expect("read")
        .is_some()
    );
  }

  /// Memory storage whose next write can be made to fail, the way a full
  /// localStorage quota does.
  #[derive(Default)]
  struct FailingStore {
    inner:     MemoryStore,
    fail_next: bool
  }

  impl KeyValueStore for FailingStore {
    fn get_item(
      &self,
      key: &str
    ) -> anyhow::Result<Option<String>> {
      self.inner.get_item(key)
    }

    fn set_item(
      &mut self,
      key: &str,
      value: &str
    ) -> anyhow::Result<()> {
      if std::mem::take(&mut self.fail_next) {
        return Err(anyhow!("quota exceeded"));
      }
      self.inner.set_item(key, value)
    }
  }

  fn stored_texts(
    session: &LocalSession<FailingStore>
  ) -> Vec<String> {
    let raw = session
      .store()
      .storage()
      .get_item(DEFAULT_STORAGE_KEY)
      .expect("read")
      .unwrap_or_else(|| "[]".to_string());
    serde_json::from_str::<Vec<LocalTask>>(&raw)
      .expect("decode")
      .into_iter()
      .map(|task| task.text)
      .collect()
  }

  #[test]
  fn failed_write_leaves_store_and_form_unchanged() {
    let mut session = LocalSession::empty(
      FailingStore {
        fail_next: true,
        ..FailingStore::default()
      },
      DEFAULT_STORAGE_KEY
    );
    let mut lost = form("lost", "");

    assert!(session.submit(&mut lost).is_err());
    assert_eq!(lost.text, "lost");
    assert!(session.store().tasks().is_empty());
    assert!(session.board().tasks().is_empty());

    session
      .submit(&mut form("second", ""))
      .expect("submit");
    assert_eq!(stored_texts(&session), vec!["second"]);
    let texts: Vec<&str> = session
      .board()
      .tasks()
      .iter()
      .map(|task| task.text.as_str())
      .collect();
    assert_eq!(texts, vec!["second"]);
  }

  #[test]
  fn failed_toggle_and_remove_keep_the_task() {
    let mut session = LocalSession::empty(
      FailingStore::default(),
      DEFAULT_STORAGE_KEY
    );
    session
      .submit(&mut form("keep", ""))
      .expect("submit");
    let key = session.board().tasks()[0].key();

    session.store.storage.fail_next = true;
    assert!(session.toggle(&key).is_err());
    assert!(!session.store().tasks()[0].completed);

    session.store.storage.fail_next = true;
    assert!(session.remove(&key).is_err());
    assert_eq!(session.store().tasks().len(), 1);
    assert_eq!(stored_texts(&session), vec!["keep"]);
  }
}
