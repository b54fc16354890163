use std::sync::{
  Mutex,
  atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use super::{Item, ItemStore};
use crate::error::Error;

/// Which failure `create` should produce, if any.
#[derive(Debug, Clone, Default)]
pub enum FailureMode {
  #[default]
  None,
  Quota,
  Network,
  Validation(String),
  Storage,
  Unclassified,
}

/// In-memory store double for tests: records every `create` call and can be
/// told to fail in each of the classifier's shapes.
#[derive(Debug, Default)]
pub struct MockItemStore {
  failure: FailureMode,
  calls: AtomicUsize,
  items: Mutex<Vec<Item>>,
}

impl MockItemStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn failing_with(failure: FailureMode) -> Self {
    Self { failure, ..Self::default() }
  }

  pub fn create_calls(&self) -> usize {
    self.calls.load(Ordering::SeqCst)
  }

  pub fn created_names(&self) -> Vec<String> {
    self.items.lock().unwrap().iter().map(|item| item.name.clone()).collect()
  }
}

#[async_trait]
impl ItemStore for MockItemStore {
  async fn create(&self, name: &str, expiry_date: NaiveDate) -> Result<Item, Error> {
    self.calls.fetch_add(1, Ordering::SeqCst);
    match &self.failure {
      FailureMode::None => {
        let item = Item::new(name.to_string(), expiry_date);
        self.items.lock().unwrap().push(item.clone());
        Ok(item)
      },
      FailureMode::Quota => Err(Error::QuotaExceeded),
      FailureMode::Network => Err(Error::Network("connection reset".to_string())),
      FailureMode::Validation(message) => Err(Error::Validation(message.clone())),
      FailureMode::Storage => Err(Error::Storage("write failed".to_string())),
      FailureMode::Unclassified => Err(Error::Other("something went wrong".to_string())),
    }
  }

  async fn list(&self) -> Result<Vec<Item>, Error> {
    Ok(self.items.lock().unwrap().clone())
  }

  async fn delete(&self, id: Uuid) -> Result<(), Error> {
    let mut items = self.items.lock().unwrap();
    let before = items.len();
    items.retain(|item| item.id != id);
    if items.len() == before {
      return Err(Error::Storage(format!("no item with id {id}")));
    }
    Ok(())
  }
}
