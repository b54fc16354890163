use std::sync::{
  Arc,
  atomic::{AtomicBool, Ordering},
};

use tokio::sync::mpsc::UnboundedSender;

use crate::action::Action;

/// Mutual exclusion for the submit critical section. Callers check
/// `is_submitting` before calling `begin`; there is no await point between
/// the two, so on the single event loop the check-then-set cannot interleave
/// with another submit. `end` runs on every exit path of a submission.
pub trait SubmissionGuard: Send + Sync {
  fn is_submitting(&self) -> bool;
  fn begin(&mut self);
  fn end(&mut self);
}

/// The default guard: the controller owns the flag itself.
#[derive(Debug, Default)]
pub struct OwnedSubmissionGuard {
  submitting: bool,
}

impl OwnedSubmissionGuard {
  pub fn new() -> Self {
    Self::default()
  }
}

impl SubmissionGuard for OwnedSubmissionGuard {
  fn is_submitting(&self) -> bool {
    self.submitting
  }

  fn begin(&mut self) {
    self.submitting = true;
  }

  fn end(&mut self) {
    self.submitting = false;
  }
}

/// Delegates the flag to an externally owned `AtomicBool` so a parent can
/// coordinate submission state across forms, optionally notifying it with
/// `Action::SetSubmitting` on each transition. The external flag is the only
/// authority; this guard holds no state of its own.
pub struct SharedSubmissionGuard {
  flag: Arc<AtomicBool>,
  action_tx: Option<UnboundedSender<Action>>,
}

impl SharedSubmissionGuard {
  pub fn new(flag: Arc<AtomicBool>) -> Self {
    Self { flag, action_tx: None }
  }

  pub fn with_notify(flag: Arc<AtomicBool>, action_tx: UnboundedSender<Action>) -> Self {
    Self { flag, action_tx: Some(action_tx) }
  }

  fn set(&self, value: bool) {
    self.flag.store(value, Ordering::SeqCst);
    if let Some(tx) = &self.action_tx {
      let _ = tx.send(Action::SetSubmitting(value));
    }
  }
}

impl SubmissionGuard for SharedSubmissionGuard {
  fn is_submitting(&self) -> bool {
    self.flag.load(Ordering::SeqCst)
  }

  fn begin(&mut self) {
    self.set(true);
  }

  fn end(&mut self) {
    self.set(false);
  }
}
