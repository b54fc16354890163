use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Error;

pub mod json_store;
pub mod mock_store;

pub use json_store::JsonFileStore;
pub use mock_store::MockItemStore;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
  pub id: Uuid,
  pub name: String,
  pub expiry_date: NaiveDate,
}

impl Item {
  pub fn new(name: String, expiry_date: NaiveDate) -> Self {
    Item { id: Uuid::new_v4(), name, expiry_date }
  }

  /// Negative once the item is past its date.
  pub fn days_until_expiry(&self, today: NaiveDate) -> i64 {
    self.expiry_date.signed_duration_since(today).num_days()
  }
}

/// The persistence collaborator. Storage mechanics — file layout, id
/// generation, the quota — are internal to the implementation; callers only
/// see `Item`s and `Error`s.
#[async_trait]
pub trait ItemStore: Send + Sync {
  async fn create(&self, name: &str, expiry_date: NaiveDate) -> Result<Item, Error>;
  async fn list(&self) -> Result<Vec<Item>, Error>;
  async fn delete(&self, id: Uuid) -> Result<(), Error>;
}
