use std::sync::{Arc, atomic::AtomicBool};

use chrono::{Local, NaiveDate};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Style},
  text::Line,
  widgets::{Block, Borders, Clear, Paragraph},
};
use tokio::sync::mpsc::UnboundedSender;
use tracing::info;

use crate::{
  action::Action,
  components::{AsyncComponent, Component, common::text_input::TextInput},
  form::{
    controller::{FocusTarget, FormController, SubmitOutcome},
    guard::{OwnedSubmissionGuard, SharedSubmissionGuard},
  },
  store::ItemStore,
  tui::Frame,
};

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
  Name,
  Date,
}

/// The TUI face of the add-item form: two inputs, inline field errors, a
/// form-level error line. All form semantics live in `FormController`; this
/// component only translates key events and renders the state.
pub struct AddItemDialog {
  controller: FormController,
  store: Arc<dyn ItemStore>,
  name_input: TextInput,
  date_input: TextInput,
  focus: Field,
  action_tx: Option<UnboundedSender<Action>>,
  submitting: Arc<AtomicBool>,
}

impl AddItemDialog {
  pub fn new(store: Arc<dyn ItemStore>, max_name_length: usize, expiry_offset_days: u64) -> Self {
    Self {
      controller: FormController::new(Box::new(OwnedSubmissionGuard::new()), max_name_length, expiry_offset_days),
      store,
      name_input: TextInput::new("Name"),
      date_input: TextInput::new("Expiry date (YYYY-MM-DD)"),
      focus: Field::Name,
      action_tx: None,
      submitting: Arc::new(AtomicBool::new(false)),
    }
  }

  fn open(&mut self, today: NaiveDate) {
    self.controller.on_open(today);
    self.name_input.clear();
    match self.controller.state().expiry_date {
      Some(date) => self.date_input.set_text(&date.format(DATE_FORMAT).to_string()),
      None => self.date_input.clear(),
    }
    self.focus = Field::Name;
  }

  fn apply_focus(&mut self, target: FocusTarget) {
    match target {
      FocusTarget::Name => self.focus = Field::Name,
      FocusTarget::ExpiryDate => self.focus = Field::Date,
      FocusTarget::None => {},
    }
  }

  // Moving focus off the name field is the blur that triggers early
  // validation; the date field has no blur rule.
  fn advance_focus(&mut self) {
    match self.focus {
      Field::Name => {
        self.controller.on_name_blur();
        self.focus = Field::Date;
      },
      Field::Date => self.focus = Field::Name,
    }
  }

  async fn submit(&mut self) -> color_eyre::Result<Option<Action>> {
    let today = Local::now().date_naive();
    match self.controller.on_submit(self.store.as_ref(), today).await {
      SubmitOutcome::Submitted(item) => {
        info!("added item {} ({})", item.name, item.id);
        // Added first, then close, each exactly once.
        if let Some(tx) = &self.action_tx {
          tx.send(Action::ItemAdded)?;
        }
        Ok(Some(Action::CloseAddItem))
      },
      SubmitOutcome::Invalid(focus) => {
        self.apply_focus(focus);
        Ok(None)
      },
      SubmitOutcome::AlreadySubmitting | SubmitOutcome::Failed => Ok(None),
    }
  }

  async fn handle_key_event(&mut self, key: KeyEvent) -> color_eyre::Result<Option<Action>> {
    match key {
      // Cancel never clears the fields; the next open does the reset.
      KeyEvent { code: KeyCode::Esc, .. } => Ok(Some(Action::CloseAddItem)),
      KeyEvent { code: KeyCode::Enter, .. } => self.submit().await,
      KeyEvent { code: KeyCode::Tab | KeyCode::BackTab, .. } => {
        self.advance_focus();
        Ok(None)
      },
      _ => {
        match self.focus {
          Field::Name => {
            if self.name_input.input(key) {
              let text = self.name_input.text();
              self.controller.on_name_change(&text);
            }
          },
          Field::Date => {
            if self.date_input.input(key) {
              let text = self.date_input.text();
              self.controller.on_date_change(parse_date(&text));
            }
          },
        }
        Ok(None)
      },
    }
  }

  fn render_error_line(&self, f: &mut Frame<'_>, area: Rect, message: Option<&String>) {
    let Some(message) = message else {
      return;
    };
    let paragraph = Paragraph::new(Line::raw(message.clone())).style(Style::default().fg(Color::Red));
    f.render_widget(paragraph, area);
  }
}

impl Component for AddItemDialog {
  fn register_action_handler(&mut self, tx: UnboundedSender<Action>) -> color_eyre::Result<()> {
    self.action_tx = Some(tx.clone());
    // The parent owns the submitting flag; swap in the delegating guard now
    // that the notification channel exists.
    self.controller.set_guard(Box::new(SharedSubmissionGuard::with_notify(self.submitting.clone(), tx)));
    Ok(())
  }

  fn draw(&mut self, f: &mut Frame<'_>, area: Rect) -> color_eyre::Result<()> {
    let popup = centered_rect(area, 60, 14);
    f.render_widget(Clear, popup);

    let block = Block::default().title("Add Item").borders(Borders::ALL);
    let inner = block.inner(popup);
    f.render_widget(block, popup);

    let layout = Layout::new(
      Direction::Vertical,
      [
        Constraint::Length(3), // name input
        Constraint::Length(1), // name error
        Constraint::Length(3), // date input
        Constraint::Length(1), // date error
        Constraint::Length(1), // system error
        Constraint::Length(1), // footer
      ],
    )
    .split(inner);

    let errors = self.controller.state().errors.clone();
    self.name_input.set_focused(self.focus == Field::Name);
    self.name_input.set_invalid(errors.name.is_some());
    self.date_input.set_focused(self.focus == Field::Date);
    self.date_input.set_invalid(errors.expiry_date.is_some());

    self.name_input.render(f, layout[0]);
    self.render_error_line(f, layout[1], errors.name.as_ref());
    self.date_input.render(f, layout[2]);
    self.render_error_line(f, layout[3], errors.expiry_date.as_ref());
    self.render_error_line(f, layout[4], errors.system.as_ref());

    let footer = if self.controller.is_submitting() {
      Line::raw("Saving...")
    } else {
      Line::raw("Enter: Save | Tab: Next field | Esc: Cancel")
    };
    f.render_widget(Paragraph::new(footer), layout[5]);

    Ok(())
  }
}

#[async_trait::async_trait]
impl AsyncComponent for AddItemDialog {
  async fn handle_events(&mut self, event: Option<crate::tui::Event>) -> color_eyre::Result<Option<Action>> {
    match event {
      Some(crate::tui::Event::Key(key)) => self.handle_key_event(key).await,
      _ => Ok(None),
    }
  }

  async fn update(&mut self, action: Action) -> color_eyre::Result<Option<Action>> {
    match action {
      Action::OpenAddItem => {
        self.open(Local::now().date_naive());
        Ok(None)
      },
      Action::SetSubmitting(_) => Ok(Some(Action::Render)),
      _ => Ok(None),
    }
  }
}

fn parse_date(text: &str) -> Option<NaiveDate> {
  NaiveDate::parse_from_str(text.trim(), DATE_FORMAT).ok()
}

fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
  let width = width.min(area.width);
  let height = height.min(area.height);
  let x = area.x + (area.width - width) / 2;
  let y = area.y + (area.height - height) / 2;
  Rect::new(x, y, width, height)
}

#[cfg(test)]
mod tests {
  use crossterm::event::KeyModifiers;
  use pretty_assertions::assert_eq;
  use tokio::sync::mpsc;

  use super::*;
  use crate::{
    form::messages,
    store::mock_store::{FailureMode, MockItemStore},
  };

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  fn dialog_with(store: Arc<MockItemStore>) -> AddItemDialog {
    let mut dialog = AddItemDialog::new(store, 50, 5);
    dialog.open(Local::now().date_naive());
    dialog
  }

  async fn type_str(dialog: &mut AddItemDialog, text: &str) {
    for c in text.chars() {
      dialog.handle_key_event(key(KeyCode::Char(c))).await.unwrap();
    }
  }

  #[tokio::test]
  async fn test_submit_with_empty_name_shows_error_and_keeps_dialog_open() {
    let store = Arc::new(MockItemStore::new());
    let mut dialog = dialog_with(store.clone());

    let action = dialog.handle_key_event(key(KeyCode::Enter)).await.unwrap();

    assert_eq!(action, None);
    assert_eq!(dialog.controller.state().errors.name, Some(messages::NAME_REQUIRED.to_string()));
    assert_eq!(dialog.focus, Field::Name);
    assert_eq!(store.create_calls(), 0);
  }

  #[tokio::test]
  async fn test_successful_submit_notifies_added_then_close() {
    let store = Arc::new(MockItemStore::new());
    let mut dialog = dialog_with(store.clone());
    let (tx, mut rx) = mpsc::unbounded_channel();
    dialog.register_action_handler(tx).unwrap();

    type_str(&mut dialog, "Cucumber").await;
    let action = dialog.handle_key_event(key(KeyCode::Enter)).await.unwrap();

    assert_eq!(action, Some(Action::CloseAddItem));
    assert_eq!(store.created_names(), vec!["Cucumber".to_string()]);
    // The guard notifications bracket the store call; the added notification
    // follows once the call settles.
    assert_eq!(rx.try_recv().unwrap(), Action::SetSubmitting(true));
    assert_eq!(rx.try_recv().unwrap(), Action::SetSubmitting(false));
    assert_eq!(rx.try_recv().unwrap(), Action::ItemAdded);
    assert!(rx.try_recv().is_err());
  }

  #[tokio::test]
  async fn test_failed_submit_shows_system_error_and_sends_no_notifications() {
    let store = Arc::new(MockItemStore::failing_with(FailureMode::Unclassified));
    let mut dialog = dialog_with(store.clone());
    let (tx, mut rx) = mpsc::unbounded_channel();
    dialog.register_action_handler(tx).unwrap();

    type_str(&mut dialog, "Cucumber").await;
    let action = dialog.handle_key_event(key(KeyCode::Enter)).await.unwrap();

    assert_eq!(action, None);
    assert_eq!(dialog.controller.state().errors.system, Some(messages::UNKNOWN_FAILURE.to_string()));
    assert!(!dialog.controller.is_submitting());
    // Only the guard transitions went out; no added/close notifications.
    assert_eq!(rx.try_recv().unwrap(), Action::SetSubmitting(true));
    assert_eq!(rx.try_recv().unwrap(), Action::SetSubmitting(false));
    assert!(rx.try_recv().is_err());
  }

  #[tokio::test]
  async fn test_escape_cancels_without_clearing_fields() {
    let store = Arc::new(MockItemStore::new());
    let mut dialog = dialog_with(store.clone());

    type_str(&mut dialog, "Cucumber").await;
    let action = dialog.handle_key_event(key(KeyCode::Esc)).await.unwrap();

    assert_eq!(action, Some(Action::CloseAddItem));
    assert_eq!(dialog.controller.state().name, "Cucumber");
    assert_eq!(store.create_calls(), 0);
  }

  #[tokio::test]
  async fn test_tab_off_the_name_field_validates_early() {
    let store = Arc::new(MockItemStore::new());
    let mut dialog = dialog_with(store.clone());

    dialog.handle_key_event(key(KeyCode::Tab)).await.unwrap();

    assert_eq!(dialog.focus, Field::Date);
    assert_eq!(dialog.controller.state().errors.name, Some(messages::NAME_REQUIRED.to_string()));

    // Typing into the name field clears the early error again.
    dialog.handle_key_event(key(KeyCode::Tab)).await.unwrap();
    type_str(&mut dialog, "C").await;
    assert_eq!(dialog.controller.state().errors.name, None);
  }

  #[tokio::test]
  async fn test_editing_the_date_field_updates_the_controller() {
    let store = Arc::new(MockItemStore::new());
    let mut dialog = dialog_with(store.clone());
    dialog.handle_key_event(key(KeyCode::Tab)).await.unwrap();

    dialog.date_input.clear();
    type_str(&mut dialog, "2029-01-3").await;
    assert_eq!(dialog.controller.state().expiry_date, None);

    type_str(&mut dialog, "1").await;
    assert_eq!(dialog.controller.state().expiry_date, NaiveDate::from_ymd_opt(2029, 1, 31));
  }

  #[tokio::test]
  async fn test_reopen_resets_name_and_reseeds_the_date() {
    let store = Arc::new(MockItemStore::new());
    let mut dialog = dialog_with(store.clone());

    type_str(&mut dialog, "Cucumber").await;
    dialog.handle_key_event(key(KeyCode::Esc)).await.unwrap();

    dialog.update(Action::OpenAddItem).await.unwrap();
    assert_eq!(dialog.controller.state().name, "");
    assert_eq!(dialog.name_input.text(), "");
    let expected = Local::now().date_naive().checked_add_days(chrono::Days::new(5));
    assert_eq!(dialog.controller.state().expiry_date, expected);
  }

  #[test]
  fn test_parse_date() {
    assert_eq!(parse_date(" 2026-08-12 "), NaiveDate::from_ymd_opt(2026, 8, 12));
    assert_eq!(parse_date("2026-13-01"), None);
    assert_eq!(parse_date("tomorrow"), None);
    assert_eq!(parse_date(""), None);
  }
}
