//! The fixed user-facing message set for the add-item form. Everything the
//! form can tell the user lives here; nothing else formats error text.

pub const NAME_REQUIRED: &str = "Item name is required.";
pub const DATE_REQUIRED: &str = "Expiry date is required.";
pub const DATE_IN_PAST: &str = "Expiry date must be today or later.";
pub const QUOTA_EXCEEDED: &str = "Storage is full. Delete items you no longer need and try again.";
pub const NETWORK_FAILURE: &str = "A network problem prevented saving. Check your connection and try again.";
pub const STORAGE_FAILURE: &str = "Saving failed. Check your storage settings and try again.";
pub const UNKNOWN_FAILURE: &str = "Could not add the item. Please try again.";

pub fn name_too_long(max: usize) -> String {
  format!("Item name must be {max} characters or fewer.")
}
