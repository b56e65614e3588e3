use anyhow::anyhow;
use tareas_shared::KeyValueStore;

/// `window.localStorage` as a [`KeyValueStore`].
pub struct BrowserStorage {
  storage: web_sys::Storage
}

impl BrowserStorage {
  pub fn from_window()
  -> anyhow::Result<Self> {
    let window = web_sys::window()
      .ok_or_else(|| {
        anyhow!("no browser window")
      })?;
    let storage = window
      .local_storage()
      .map_err(|err| {
        anyhow!(
          "localStorage unavailable: \
           {err:?}"
        )
      })?
      .ok_or_else(|| {
        anyhow!(
          "localStorage is disabled"
        )
      })?;
    Ok(Self { storage })
  }
}

impl KeyValueStore for BrowserStorage {
  fn get_item(
    &self,
    key: &str
  ) -> anyhow::Result<Option<String>> {
    self.storage.get_item(key).map_err(
      |err| {
        anyhow!(
          "failed reading {key}: {err:?}"
        )
      }
    )
  }

  fn set_item(
    &mut self,
    key: &str,
    value: &str
  ) -> anyhow::Result<()> {
    self
      .storage
      .set_item(key, value)
      .map_err(|err| {
        anyhow!(
          "failed writing {key}: {err:?}"
        )
      })
  }
}

/// Storage the local page runs on: the browser's, or memory when the
/// browser's is unavailable or holds data that does not parse.
pub enum PageStorage {
  Browser(BrowserStorage),
  Memory(tareas_shared::MemoryStore)
}

impl KeyValueStore for PageStorage {
  fn get_item(
    &self,
    key: &str
  ) -> anyhow::Result<Option<String>> {
    match self {
      | PageStorage::Browser(storage) => {
        storage.get_item(key)
      }
      | PageStorage::Memory(storage) => {
        storage.get_item(key)
      }
    }
  }

  fn set_item(
    &mut self,
    key: &str,
    value: &str
  ) -> anyhow::Result<()> {
    match self {
      | PageStorage::Browser(storage) => {
        storage.set_item(key, value)
      }
      | PageStorage::Memory(storage) => {
        storage.set_item(key, value)
      }
    }
  }
}
