use chrono::{Days, NaiveDate};
use tracing::warn;

use crate::{
  form::{
    classify::classify,
    guard::SubmissionGuard,
    messages,
    sanitize::{collapse_whitespace, sanitize},
    validate::{validate_expiry_date, validate_name},
  },
  store::{Item, ItemStore},
};

pub const DEFAULT_EXPIRY_OFFSET_DAYS: u64 = 5;

/// At most one active message per field. Field errors are value-derived:
/// they are cleared the instant the underlying value changes, never left
/// stale across edits.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FieldErrors {
  pub name: Option<String>,
  pub expiry_date: Option<String>,
  pub system: Option<String>,
}

impl FieldErrors {
  pub fn is_empty(&self) -> bool {
    self.name.is_none() && self.expiry_date.is_none() && self.system.is_none()
  }
}

/// Where the presentation layer should move focus after a failed submit.
/// Name wins over date when both fields are invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusTarget {
  Name,
  ExpiryDate,
  None,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FormState {
  pub name: String,
  pub expiry_date: Option<NaiveDate>,
  pub errors: FieldErrors,
}

#[derive(Debug, PartialEq)]
pub enum SubmitOutcome {
  /// Validation failed; field errors are set and the store was not called.
  Invalid(FocusTarget),
  /// Another submission is still in flight; nothing was touched.
  AlreadySubmitting,
  /// The item was persisted. The caller fires its added/close notifications
  /// exactly once, in that order.
  Submitted(Item),
  /// The store call failed; the classified message is in `errors.system`.
  Failed,
}

/// Owns the add-item form state and drives its lifecycle:
/// open → edit → validate → submit → success/error → reset on next open.
/// All mutation happens through the event methods below.
pub struct FormController {
  state: FormState,
  guard: Box<dyn SubmissionGuard>,
  max_name_length: usize,
  expiry_offset_days: u64,
}

impl FormController {
  pub fn new(guard: Box<dyn SubmissionGuard>, max_name_length: usize, expiry_offset_days: u64) -> Self {
    Self { state: FormState::default(), guard, max_name_length, expiry_offset_days }
  }

  pub fn state(&self) -> &FormState {
    &self.state
  }

  pub fn is_submitting(&self) -> bool {
    self.guard.is_submitting()
  }

  /// Swaps the guard strategy. Called once while the dialog is being wired
  /// up, before any submission can run.
  pub fn set_guard(&mut self, guard: Box<dyn SubmissionGuard>) {
    self.guard = guard;
  }

  /// Dialog open: prior state is discarded, not merely cleared. The expiry
  /// date is seeded at the configured offset from today.
  pub fn on_open(&mut self, today: NaiveDate) {
    self.state = FormState {
      name: String::new(),
      expiry_date: today.checked_add_days(Days::new(self.expiry_offset_days)).or(Some(today)),
      errors: FieldErrors::default(),
    };
  }

  pub fn on_name_change(&mut self, raw: &str) {
    self.state.name = raw.to_string();
    // Only the name error clears here; a failed submit's system error stays
    // visible until the date changes or the next submit.
    self.state.errors.name = None;
  }

  /// Early feedback: validates the name as soon as the field loses focus.
  pub fn on_name_blur(&mut self) {
    self.state.errors.name = validate_name(&self.state.name, self.max_name_length);
  }

  pub fn on_date_change(&mut self, date: Option<NaiveDate>) {
    self.state.expiry_date = date;
    self.state.errors.expiry_date = None;
    self.state.errors.system = None;
  }

  /// Runs both validators, then the guarded store call. Field validation
  /// failures never reach the store; store failures never escape — they are
  /// classified into `errors.system`. The guard is released on every path.
  pub async fn on_submit(&mut self, store: &dyn ItemStore, today: NaiveDate) -> SubmitOutcome {
    let name_error = validate_name(&self.state.name, self.max_name_length);
    let date_error = validate_expiry_date(self.state.expiry_date, today);
    if name_error.is_some() || date_error.is_some() {
      let focus = if name_error.is_some() { FocusTarget::Name } else { FocusTarget::ExpiryDate };
      self.state.errors.name = name_error;
      self.state.errors.expiry_date = date_error;
      return SubmitOutcome::Invalid(focus);
    }

    self.state.errors = FieldErrors::default();
    if self.guard.is_submitting() {
      return SubmitOutcome::AlreadySubmitting;
    }
    self.guard.begin();

    let name = collapse_whitespace(&sanitize(&self.state.name));
    let Some(expiry_date) = self.state.expiry_date else {
      // Validation just vouched for this date. If it is gone anyway, surface
      // the generic failure rather than crashing.
      warn!("submit reached with no expiry date after validation passed");
      self.guard.end();
      self.state.errors.system = Some(messages::UNKNOWN_FAILURE.to_string());
      return SubmitOutcome::Failed;
    };

    let result = store.create(&name, expiry_date).await;
    self.guard.end();

    match result {
      Ok(item) => SubmitOutcome::Submitted(item),
      Err(err) => {
        self.state.errors.system = Some(classify(&err).message);
        SubmitOutcome::Failed
      },
    }
  }
}

#[cfg(test)]
mod tests {
  use std::sync::{Arc, atomic::AtomicBool};

  use pretty_assertions::assert_eq;

  use super::*;
  use crate::{
    form::{
      guard::{OwnedSubmissionGuard, SharedSubmissionGuard},
      validate::DEFAULT_MAX_NAME_LENGTH,
    },
    store::mock_store::{FailureMode, MockItemStore},
  };

  fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
  }

  fn today() -> NaiveDate {
    date(2026, 8, 7)
  }

  fn controller() -> FormController {
    FormController::new(Box::new(OwnedSubmissionGuard::new()), DEFAULT_MAX_NAME_LENGTH, DEFAULT_EXPIRY_OFFSET_DAYS)
  }

  fn open_controller() -> FormController {
    let mut controller = controller();
    controller.on_open(today());
    controller
  }

  #[test]
  fn test_open_seeds_defaults() {
    let controller = open_controller();
    assert_eq!(controller.state().name, "");
    assert_eq!(controller.state().expiry_date, Some(date(2026, 8, 12)));
    assert!(controller.state().errors.is_empty());
    assert!(!controller.is_submitting());
  }

  #[test]
  fn test_reopen_discards_previous_state() {
    let mut controller = open_controller();
    controller.on_name_change("Leftover soup");
    controller.on_date_change(Some(date(2026, 9, 1)));
    controller.on_name_blur();

    controller.on_open(date(2026, 8, 10));
    assert_eq!(controller.state().name, "");
    assert_eq!(controller.state().expiry_date, Some(date(2026, 8, 15)));
    assert!(controller.state().errors.is_empty());
  }

  #[test]
  fn test_name_blur_gives_early_feedback_and_edit_clears_it() {
    let mut controller = open_controller();
    controller.on_name_blur();
    assert_eq!(controller.state().errors.name, Some(messages::NAME_REQUIRED.to_string()));

    controller.on_name_change("C");
    assert_eq!(controller.state().errors.name, None);
  }

  #[test]
  fn test_name_edit_does_not_clear_system_error() {
    let mut controller = open_controller();
    controller.state.errors.system = Some(messages::UNKNOWN_FAILURE.to_string());

    controller.on_name_change("Cucumber");
    assert_eq!(controller.state().errors.system, Some(messages::UNKNOWN_FAILURE.to_string()));
  }

  #[test]
  fn test_date_edit_clears_date_and_system_errors() {
    let mut controller = open_controller();
    controller.state.errors.expiry_date = Some(messages::DATE_IN_PAST.to_string());
    controller.state.errors.system = Some(messages::UNKNOWN_FAILURE.to_string());

    controller.on_date_change(Some(date(2026, 8, 20)));
    assert_eq!(controller.state().errors.expiry_date, None);
    assert_eq!(controller.state().errors.system, None);
  }

  #[tokio::test]
  async fn test_submit_with_empty_name_sets_name_error_and_skips_store() {
    let store = MockItemStore::new();
    let mut controller = open_controller();

    let outcome = controller.on_submit(&store, today()).await;

    assert_eq!(outcome, SubmitOutcome::Invalid(FocusTarget::Name));
    assert_eq!(controller.state().errors.name, Some(messages::NAME_REQUIRED.to_string()));
    assert_eq!(controller.state().errors.expiry_date, None);
    assert_eq!(store.create_calls(), 0);
  }

  #[tokio::test]
  async fn test_submit_with_past_date_sets_date_error_only() {
    let store = MockItemStore::new();
    let mut controller = open_controller();
    controller.on_name_change("Cucumber");
    controller.on_date_change(Some(date(2026, 8, 1)));

    let outcome = controller.on_submit(&store, today()).await;

    assert_eq!(outcome, SubmitOutcome::Invalid(FocusTarget::ExpiryDate));
    assert_eq!(controller.state().errors.name, None);
    assert_eq!(controller.state().errors.expiry_date, Some(messages::DATE_IN_PAST.to_string()));
    assert_eq!(store.create_calls(), 0);
  }

  #[tokio::test]
  async fn test_submit_focus_prefers_name_when_both_fields_fail() {
    let store = MockItemStore::new();
    let mut controller = open_controller();
    controller.on_date_change(None);

    let outcome = controller.on_submit(&store, today()).await;

    assert_eq!(outcome, SubmitOutcome::Invalid(FocusTarget::Name));
    assert_eq!(controller.state().errors.name, Some(messages::NAME_REQUIRED.to_string()));
    assert_eq!(controller.state().errors.expiry_date, Some(messages::DATE_REQUIRED.to_string()));
  }

  #[tokio::test]
  async fn test_submit_sanitizes_and_trims_the_name() {
    let store = MockItemStore::new();
    let mut controller = open_controller();
    controller.on_name_change("  <div>Tag</div><script>alert(1)</script>Cucumber  ");

    let outcome = controller.on_submit(&store, today()).await;

    match outcome {
      SubmitOutcome::Submitted(item) => assert_eq!(item.name, "Tag Cucumber"),
      other => panic!("expected Submitted, got {other:?}"),
    }
    assert_eq!(store.created_names(), vec!["Tag Cucumber".to_string()]);
    assert!(controller.state().errors.is_empty());
    assert!(!controller.is_submitting());
  }

  #[tokio::test]
  async fn test_submit_failure_shows_fallback_message_and_releases_guard() {
    let store = MockItemStore::failing_with(FailureMode::Unclassified);
    let mut controller = open_controller();
    controller.on_name_change("Cucumber");

    let outcome = controller.on_submit(&store, today()).await;

    assert_eq!(outcome, SubmitOutcome::Failed);
    assert_eq!(controller.state().errors.system, Some(messages::UNKNOWN_FAILURE.to_string()));
    // Field values survive the failure and the guard is released so the
    // user can retry.
    assert_eq!(controller.state().name, "Cucumber");
    assert!(!controller.is_submitting());
  }

  #[tokio::test]
  async fn test_submit_quota_failure_uses_the_exact_quota_message() {
    let store = MockItemStore::failing_with(FailureMode::Quota);
    let mut controller = open_controller();
    controller.on_name_change("Cucumber");

    let outcome = controller.on_submit(&store, today()).await;

    assert_eq!(outcome, SubmitOutcome::Failed);
    assert_eq!(controller.state().errors.system, Some(messages::QUOTA_EXCEEDED.to_string()));
  }

  #[tokio::test]
  async fn test_submit_validation_failure_passes_store_message_through() {
    let store = MockItemStore::failing_with(FailureMode::Validation("name rejected by store".to_string()));
    let mut controller = open_controller();
    controller.on_name_change("Cucumber");

    controller.on_submit(&store, today()).await;

    assert_eq!(controller.state().errors.system, Some("name rejected by store".to_string()));
  }

  #[tokio::test]
  async fn test_submit_is_a_no_op_while_a_submission_is_in_flight() {
    let flag = Arc::new(AtomicBool::new(true));
    let store = MockItemStore::new();
    let mut controller = FormController::new(
      Box::new(SharedSubmissionGuard::new(flag)),
      DEFAULT_MAX_NAME_LENGTH,
      DEFAULT_EXPIRY_OFFSET_DAYS,
    );
    controller.on_open(today());
    controller.on_name_change("Cucumber");

    let before = controller.state().clone();
    let outcome = controller.on_submit(&store, today()).await;

    assert_eq!(outcome, SubmitOutcome::AlreadySubmitting);
    assert_eq!(controller.state(), &before);
    assert_eq!(store.create_calls(), 0);
  }

  #[tokio::test]
  async fn test_repeated_submits_after_settling_each_reach_the_store_once() {
    let store = MockItemStore::new();
    let mut controller = open_controller();
    controller.on_name_change("Cucumber");

    controller.on_submit(&store, today()).await;
    controller.on_submit(&store, today()).await;

    assert_eq!(store.create_calls(), 2);
  }
}
