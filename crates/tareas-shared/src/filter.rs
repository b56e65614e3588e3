use crate::task::{
  TaskRecord,
  TaskStatus
};

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
)]
pub enum StatusFilter {
  #[default]
  All,
  Pending,
  Completed
}

impl StatusFilter {
  /// Parses a `<select>` value; anything unknown shows every task.
  pub fn from_key(raw: &str) -> Self {
    match raw.trim() {
      | "pending" => StatusFilter::Pending,
      | "completed" => {
        StatusFilter::Completed
      }
      | _ => StatusFilter::All
    }
  }

  pub fn as_key(self) -> &'static str {
    match self {
      | StatusFilter::All => "all",
      | StatusFilter::Pending => "pending",
      | StatusFilter::Completed => {
        "completed"
      }
    }
  }

  pub fn admits(
    self,
    status: TaskStatus
  ) -> bool {
    match self {
      | StatusFilter::All => true,
      | StatusFilter::Pending => {
        status == TaskStatus::Pending
      }
      | StatusFilter::Completed => {
        status == TaskStatus::Completed
      }
    }
  }
}

/// The filter currently applied to a board.
#[derive(
  Debug, Clone, PartialEq, Eq, Default,
)]
pub struct TaskFilter {
  pub status:   StatusFilter,
  pub category: String
}

impl TaskFilter {
  pub fn new(
    status: StatusFilter,
    category: &str
  ) -> Self {
    Self {
      status,
      category: category
        .trim()
        .to_lowercase()
    }
  }

  pub fn is_active(&self) -> bool {
    self.status != StatusFilter::All
      || !self.category.is_empty()
  }

  pub fn matches<T: TaskRecord>(
    &self,
    task: &T
  ) -> bool {
    if !self.status.admits(task.status())
    {
      return false;
    }

    self.category.is_empty()
      || task
        .category()
        .to_lowercase()
        .contains(&self.category)
  }

  pub fn apply<'a, T: TaskRecord>(
    &self,
    tasks: &'a [T]
  ) -> Vec<&'a T> {
    tasks
      .iter()
      .filter(|task| self.matches(*task))
      .collect()
  }
}
