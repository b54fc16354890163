use std::path::PathBuf;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::fs;
use tracing::debug;
use uuid::Uuid;

use super::{Item, ItemStore};
use crate::error::Error;

/// Cap on the serialized items file, standing in for the storage quota of
/// the environment. Writes that would exceed it fail without touching disk.
pub const DEFAULT_MAX_BYTES: u64 = 64 * 1024;

pub struct JsonFileStore {
  path: PathBuf,
  max_bytes: u64,
}

impl JsonFileStore {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into(), max_bytes: DEFAULT_MAX_BYTES }
  }

  pub fn with_max_bytes(path: impl Into<PathBuf>, max_bytes: u64) -> Self {
    Self { path: path.into(), max_bytes }
  }

  async fn read_items(&self) -> Result<Vec<Item>, Error> {
    match fs::read(&self.path).await {
      Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
      Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
      Err(err) => Err(err.into()),
    }
  }

  async fn write_items(&self, items: &[Item]) -> Result<(), Error> {
    let bytes = serde_json::to_vec_pretty(items)?;
    if bytes.len() as u64 > self.max_bytes {
      return Err(Error::QuotaExceeded);
    }
    if let Some(parent) = self.path.parent() {
      fs::create_dir_all(parent).await?;
    }
    fs::write(&self.path, bytes).await?;
    Ok(())
  }
}

#[async_trait]
impl ItemStore for JsonFileStore {
  async fn create(&self, name: &str, expiry_date: NaiveDate) -> Result<Item, Error> {
    if name.trim().is_empty() {
      return Err(Error::Validation("item name must not be empty".to_string()));
    }
    let mut items = self.read_items().await?;
    let item = Item::new(name.to_string(), expiry_date);
    items.push(item.clone());
    self.write_items(&items).await?;
    debug!("created item {} ({})", item.name, item.id);
    Ok(item)
  }

  async fn list(&self) -> Result<Vec<Item>, Error> {
    let mut items = self.read_items().await?;
    items.sort_by(|a, b| a.expiry_date.cmp(&b.expiry_date));
    Ok(items)
  }

  async fn delete(&self, id: Uuid) -> Result<(), Error> {
    let mut items = self.read_items().await?;
    let before = items.len();
    items.retain(|item| item.id != id);
    if items.len() == before {
      return Err(Error::Storage(format!("no item with id {id}")));
    }
    self.write_items(&items).await?;
    debug!("deleted item {id}");
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;

  fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
  }

  #[tokio::test]
  async fn test_list_with_no_file_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("items.json"));

    assert_eq!(store.list().await.unwrap(), Vec::new());
  }

  #[tokio::test]
  async fn test_create_then_list_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("items.json"));

    let cucumber = store.create("Cucumber", date(2026, 8, 12)).await.unwrap();
    let milk = store.create("Milk", date(2026, 8, 9)).await.unwrap();

    // Listed soonest-expiring first.
    let listed = store.list().await.unwrap();
    assert_eq!(listed, vec![milk, cucumber]);
  }

  #[tokio::test]
  async fn test_create_rejects_blank_names() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("items.json"));

    let err = store.create("   ", date(2026, 8, 12)).await.unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
    assert_eq!(store.list().await.unwrap(), Vec::new());
  }

  #[tokio::test]
  async fn test_delete_removes_only_the_given_item() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("items.json"));

    let cucumber = store.create("Cucumber", date(2026, 8, 12)).await.unwrap();
    let milk = store.create("Milk", date(2026, 8, 9)).await.unwrap();

    store.delete(cucumber.id).await.unwrap();
    assert_eq!(store.list().await.unwrap(), vec![milk]);
  }

  #[tokio::test]
  async fn test_delete_unknown_id_is_a_storage_error() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("items.json"));

    let err = store.delete(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, Error::Storage(_)));
  }

  #[tokio::test]
  async fn test_quota_blocks_the_write_and_leaves_the_file_alone() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("items.json");
    let store = JsonFileStore::with_max_bytes(&path, 200);

    store.create("Cucumber", date(2026, 8, 12)).await.unwrap();
    let before = std::fs::read(&path).unwrap();

    let err = store.create("Milk", date(2026, 8, 9)).await.unwrap_err();
    assert!(matches!(err, Error::QuotaExceeded));
    assert_eq!(std::fs::read(&path).unwrap(), before);
  }

  #[tokio::test]
  async fn test_corrupt_file_surfaces_as_a_json_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("items.json");
    std::fs::write(&path, "not json").unwrap();
    let store = JsonFileStore::new(&path);

    let err = store.list().await.unwrap_err();
    assert!(matches!(err, Error::Json(_)));
  }
}
