use serde::{Deserialize, Serialize};
use strum::Display;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Display, Deserialize)]
pub enum Action {
  CloseAddItem,
  DeleteItem,
  DeleteStagedItems,
  Error(String),
  ExitError,
  ItemAdded,
  ItemsLoaded,
  OpenAddItem,
  Quit,
  Refresh,
  Render,
  Resize(u16, u16),
  Resume,
  SelectNext,
  SelectPrevious,
  SetSubmitting(bool),
  StageItemForDeletion,
  Suspend,
  Tick,
  UnstageItemForDeletion,
}
