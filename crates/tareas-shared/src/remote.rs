use std::future::Future;

use anyhow::Context;
use reqwest::StatusCode;
use tracing::{
  debug,
  info,
  instrument,
  warn
};

use crate::board::{
  FetchTicket,
  Submission
};
use crate::task::{
  ActividadPayload,
  RemoteTask
};

pub const COLLECTION_PATH: &str =
  "actividades";

/// Result of a create/update/delete call that reached the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
  Applied,
  Rejected(StatusCode)
}

impl MutationOutcome {
  fn from_status(status: StatusCode) -> Self {
    if status.is_success() {
      MutationOutcome::Applied
    } else {
      MutationOutcome::Rejected(status)
    }
  }

  /// Logs the outcome of `action` and tells whether it took effect.
  pub fn report(
    self,
    action: &'static str
  ) -> bool {
    match self {
      | MutationOutcome::Applied => {
        info!(action, "remote mutation applied");
        true
      }
      | MutationOutcome::Rejected(status) => {
        warn!(
          action,
          status = %status,
          "remote mutation rejected"
        );
        false
      }
    }
  }
}

/// Thin HTTP adapter over the `/actividades` collection.
#[derive(Debug, Clone)]
pub struct RemoteClient {
  http:     reqwest::Client,
  base_url: String
}

impl RemoteClient {
  pub fn new(base_url: &str) -> Self {
    Self::with_client(
      reqwest::Client::new(),
      base_url
    )
  }

  pub fn with_client(
    http: reqwest::Client,
    base_url: &str
  ) -> Self {
    Self {
      http,
      base_url: base_url
        .trim()
        .trim_end_matches('/')
        .to_string()
    }
  }

  pub fn base_url(&self) -> &str {
    &self.base_url
  }

  fn collection_url(&self) -> String {
    format!(
      "{}/{COLLECTION_PATH}",
      self.base_url
    )
  }

  fn item_url(&self, id: &str) -> String {
    format!(
      "{}/{COLLECTION_PATH}/{id}",
      self.base_url
    )
  }

  #[instrument(skip(self), fields(base_url = %self.base_url))]
  pub async fn list(
    &self
  ) -> anyhow::Result<Vec<RemoteTask>> {
    let url = self.collection_url();
    let tasks = self
      .http
      .get(&url)
      .send()
      .await
      .with_context(|| {
        format!("failed requesting {url}")
      })?
      .error_for_status()
      .with_context(|| {
        format!("task list request to {url} failed")
      })?
      .json::<Vec<RemoteTask>>()
      .await
      .with_context(|| {
        format!(
          "failed decoding task list from \
           {url}"
        )
      })?;

    debug!(
      count = tasks.len(),
      "fetched remote tasks"
    );
    Ok(tasks)
  }

  #[instrument(skip(self))]
  pub async fn get(
    &self,
    id: &str
  ) -> anyhow::Result<Option<RemoteTask>> {
    let url = self.item_url(id);
    let response = self
      .http
      .get(&url)
      .send()
      .await
      .with_context(|| {
        format!("failed requesting {url}")
      })?;

    if response.status() == StatusCode::NOT_FOUND
    {
      return Ok(None);
    }

    let task = response
      .error_for_status()
      .with_context(|| {
        format!("task request to {url} failed")
      })?
      .json::<RemoteTask>()
      .await
      .with_context(|| {
        format!("failed decoding task from {url}")
      })?;
    Ok(Some(task))
  }

  #[instrument(skip(self, payload), fields(name_len = payload.name.len()))]
  pub async fn create(
    &self,
    payload: &ActividadPayload
  ) -> anyhow::Result<MutationOutcome> {
    let url = self.collection_url();
    let response = self
      .http
      .post(&url)
      .json(payload)
      .send()
      .await
      .with_context(|| {
        format!("failed posting to {url}")
      })?;
    Ok(MutationOutcome::from_status(
      response.status()
    ))
  }

  #[instrument(skip(self, payload))]
  pub async fn update(
    &self,
    id: &str,
    payload: &ActividadPayload
  ) -> anyhow::Result<MutationOutcome> {
    let url = self.item_url(id);
    let response = self
      .http
      .put(&url)
      .json(payload)
      .send()
      .await
      .with_context(|| {
        format!("failed putting to {url}")
      })?;
    Ok(MutationOutcome::from_status(
      response.status()
    ))
  }

  #[instrument(skip(self))]
  pub async fn delete(
    &self,
    id: &str
  ) -> anyhow::Result<MutationOutcome> {
    let url = self.item_url(id);
    let response = self
      .http
      .delete(&url)
      .send()
      .await
      .with_context(|| {
        format!("failed deleting {url}")
      })?;
    Ok(MutationOutcome::from_status(
      response.status()
    ))
  }
}

/// Mutation flows of the remote variant: every applied mutation is
/// followed by a full re-fetch, rejected ones are logged and dropped.
#[derive(Debug, Clone)]
pub struct RemoteSession {
  client: RemoteClient
}

impl RemoteSession {
  pub fn new(client: RemoteClient) -> Self {
    Self { client }
  }

  pub fn client(&self) -> &RemoteClient {
    &self.client
  }

  pub async fn refresh(
    &self
  ) -> anyhow::Result<Vec<RemoteTask>> {
    self.client.list().await
  }

  /// Awaits `mutation` and, when it reports a change, re-fetches the
  /// list. The ticket is issued right before the list request, so a
  /// list fetched later always carries the larger ticket.
  pub async fn then_refresh<M, I>(
    &self,
    mutation: M,
    issue: I
  ) -> anyhow::Result<
    Option<(FetchTicket, Vec<RemoteTask>)>
  >
  where
    M: Future<Output = anyhow::Result<bool>>,
    I: FnOnce() -> FetchTicket
  {
    if !mutation.await? {
      return Ok(None);
    }
    let ticket = issue();
    let tasks = self.refresh().await?;
    Ok(Some((ticket, tasks)))
  }

  /// `Some(tasks)` after an applied mutation, `None` when the service
  /// refused it.
  async fn refresh_if_applied(
    &self,
    action: &'static str,
    outcome: MutationOutcome
  ) -> anyhow::Result<Option<Vec<RemoteTask>>>
  {
    if outcome.report(action) {
      Ok(Some(self.refresh().await?))
    } else {
      Ok(None)
    }
  }

  pub async fn create_and_refresh(
    &self,
    payload: &ActividadPayload
  ) -> anyhow::Result<Option<Vec<RemoteTask>>>
  {
    let outcome =
      self.client.create(payload).await?;
    self
      .refresh_if_applied("create", outcome)
      .await
  }

  pub async fn update_and_refresh(
    &self,
    id: &str,
    payload: &ActividadPayload
  ) -> anyhow::Result<Option<Vec<RemoteTask>>>
  {
    let outcome =
      self.client.update(id, payload).await?;
    self
      .refresh_if_applied("update", outcome)
      .await
  }

  pub async fn delete_and_refresh(
    &self,
    id: &str
  ) -> anyhow::Result<Option<Vec<RemoteTask>>>
  {
    let outcome =
      self.client.delete(id).await?;
    self
      .refresh_if_applied("delete", outcome)
      .await
  }

  /// Sends `task` back with its status flipped.
  pub async fn toggle(
    &self,
    task: &RemoteTask
  ) -> anyhow::Result<MutationOutcome> {
    let payload =
      ActividadPayload::from_task(task)
        .with_status(task.status.toggled());
    self.client.update(&task.id, &payload).await
  }

  pub async fn toggle_and_refresh(
    &self,
    task: &RemoteTask
  ) -> anyhow::Result<Option<Vec<RemoteTask>>>
  {
    let outcome = self.toggle(task).await?;
    self
      .refresh_if_applied("toggle", outcome)
      .await
  }

  /// Sends a form submit as a create or an update.
  pub async fn apply(
    &self,
    submission: &Submission<ActividadPayload>
  ) -> anyhow::Result<MutationOutcome> {
    match submission {
      | Submission::Create(payload) => {
        self.client.create(payload).await
      }
      | Submission::Update { key, draft } => {
        self.client.update(key, draft).await
      }
    }
  }

  /// Form submit: create or update, then always re-fetch so the list
  /// reflects the service whatever it answered.
  pub async fn submit(
    &self,
    submission: Submission<ActividadPayload>
  ) -> anyhow::Result<Vec<RemoteTask>> {
    self.apply(&submission).await?.report("submit");
    self.refresh().await
  }
}
