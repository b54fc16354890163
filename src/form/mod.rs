pub mod classify;
pub mod controller;
pub mod guard;
pub mod messages;
pub mod sanitize;
pub mod validate;

pub use classify::{ClassifiedError, ErrorKind, classify};
pub use controller::{FieldErrors, FocusTarget, FormController, FormState, SubmitOutcome};
pub use guard::{OwnedSubmissionGuard, SharedSubmissionGuard, SubmissionGuard};
pub use sanitize::{collapse_whitespace, sanitize};
pub use validate::{validate_expiry_date, validate_name};
