use std::{
  sync::{Arc, Mutex},
  time::SystemTime,
};

use chrono::Local;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  widgets::{Block, Borders, List, ListItem, ListState},
};
use tokio::{sync::mpsc::UnboundedSender, task::spawn};
use tracing::error;

use super::{instruction_footer::InstructionFooter, item_row::ItemRow};
use crate::{
  action::Action,
  components::{AsyncComponent, Component},
  store::ItemStore,
  tui::Frame,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoadingOperation {
  None,
  Loading(SystemTime),
  Deleting(SystemTime),
  DeletingWithProgress(SystemTime, usize, usize), // (time, current, total)
}

// Shared state that async tasks update while the component keeps rendering.
#[derive(Clone)]
struct SharedState {
  loading: Arc<Mutex<LoadingOperation>>,
  items: Arc<Mutex<Vec<ItemRow>>>,
  selected_index: Arc<Mutex<usize>>,
  action_tx: Arc<Mutex<Option<UnboundedSender<Action>>>>,
}

impl SharedState {
  fn new() -> Self {
    SharedState {
      loading: Arc::new(Mutex::new(LoadingOperation::None)),
      items: Arc::new(Mutex::new(Vec::new())),
      selected_index: Arc::new(Mutex::new(0)),
      action_tx: Arc::new(Mutex::new(None)),
    }
  }

  fn set_loading(&self, op: LoadingOperation) {
    let mut loading_guard = self.loading.lock().unwrap();
    *loading_guard = op;
  }

  fn send_render(&self) {
    if let Some(tx) = self.action_tx.lock().unwrap().as_ref() {
      let _ = tx.send(Action::Render);
    }
  }

  fn send_error(&self, message: String) {
    if let Some(tx) = self.action_tx.lock().unwrap().as_ref() {
      let _ = tx.send(Action::Error(message));
    }
  }

  fn update_items(&self, new_items: Vec<ItemRow>) {
    let mut items_guard = self.items.lock().unwrap();
    *items_guard = new_items;

    // Keep the selection in bounds after a reload shrinks the list.
    let mut selected_guard = self.selected_index.lock().unwrap();
    if *selected_guard >= items_guard.len() {
      *selected_guard = items_guard.len().saturating_sub(1);
    }
  }

  fn get_items(&self) -> Vec<ItemRow> {
    self.items.lock().unwrap().clone()
  }

  fn get_selected_index(&self) -> usize {
    *self.selected_index.lock().unwrap()
  }
}

pub struct ItemList {
  store: Arc<dyn ItemStore>,
  shared_state: SharedState,
  // Local cached copies for rendering
  loading: LoadingOperation,
  items: Vec<ItemRow>,
  list_state: ListState,
  selected_index: usize,
  instruction_footer: InstructionFooter,
}

impl ItemList {
  pub fn new(store: Arc<dyn ItemStore>) -> Self {
    ItemList {
      store,
      shared_state: SharedState::new(),
      loading: LoadingOperation::None,
      items: Vec::new(),
      list_state: ListState::default(),
      selected_index: 0,
      instruction_footer: InstructionFooter::default(),
    }
  }

  // Sync UI state with shared state
  fn sync_state_for_render(&mut self) {
    self.loading = *self.shared_state.loading.lock().unwrap();
    self.items = self.shared_state.get_items();
    self.selected_index = self.shared_state.get_selected_index();
  }

  fn load_items(&self) {
    let state = self.shared_state.clone();
    let store = self.store.clone();

    state.set_loading(LoadingOperation::Loading(SystemTime::now()));
    state.send_render();

    spawn(async move {
      match store.list().await {
        Ok(items) => {
          let rows = items.into_iter().map(ItemRow::new).collect();
          state.update_items(rows);
          state.set_loading(LoadingOperation::None);
          if let Some(tx) = state.action_tx.lock().unwrap().as_ref() {
            let _ = tx.send(Action::ItemsLoaded);
          }
          state.send_render();
        },
        Err(err) => {
          error!("{}", err);
          state.send_error(format!("Failed to load items: {err}"));
          state.set_loading(LoadingOperation::None);
          state.send_render();
        },
      }
    });
  }

  fn select_previous(&mut self) {
    let items = self.shared_state.items.lock().unwrap();
    if items.is_empty() {
      return;
    }
    let mut selected_idx = self.shared_state.selected_index.lock().unwrap();
    *selected_idx = if *selected_idx == 0 { items.len() - 1 } else { (*selected_idx - 1).min(items.len() - 1) };
    self.selected_index = *selected_idx;
  }

  fn select_next(&mut self) {
    let items = self.shared_state.items.lock().unwrap();
    if items.is_empty() {
      return;
    }
    let mut selected_idx = self.shared_state.selected_index.lock().unwrap();
    *selected_idx = if *selected_idx >= items.len() - 1 { 0 } else { *selected_idx + 1 };
    self.selected_index = *selected_idx;
  }

  fn get_selected_item(&self) -> Option<&ItemRow> {
    self.items.get(self.selected_index)
  }

  fn stage_selected_for_deletion(&mut self, stage: bool) {
    let selected_idx = self.shared_state.get_selected_index();
    let mut items = self.shared_state.get_items();

    let Some(selected) = items.get_mut(selected_idx) else {
      return;
    };
    selected.stage_for_deletion(stage);
    self.shared_state.update_items(items);
    self.sync_state_for_render();
  }

  fn delete_selected(&self) {
    let state = self.shared_state.clone();
    let store = self.store.clone();

    let items = state.get_items();
    let Some(selected) = items.get(state.get_selected_index()) else {
      return;
    };
    let to_delete = selected.item.clone();

    state.set_loading(LoadingOperation::Deleting(SystemTime::now()));
    state.send_render();

    spawn(async move {
      if let Err(err) = store.delete(to_delete.id).await {
        error!("{}", err);
        state.send_error(format!("Failed to delete {}: {err}", to_delete.name));
        state.set_loading(LoadingOperation::None);
        state.send_render();
        return;
      }

      if let Ok(items) = store.list().await {
        state.update_items(items.into_iter().map(ItemRow::new).collect());
      }
      state.set_loading(LoadingOperation::None);
      state.send_render();
    });
  }

  fn delete_staged(&self) {
    let state = self.shared_state.clone();
    let store = self.store.clone();

    let staged: Vec<_> =
      state.get_items().iter().filter(|row| row.staged_for_deletion).map(|row| row.item.clone()).collect();
    if staged.is_empty() {
      return;
    }

    spawn(async move {
      let total = staged.len();
      for (index, item) in staged.iter().enumerate() {
        state.set_loading(LoadingOperation::DeletingWithProgress(SystemTime::now(), index + 1, total));
        state.send_render();
        if let Err(err) = store.delete(item.id).await {
          error!("{}", err);
          state.send_error(format!("Failed to delete {}: {err}", item.name));
        }
      }

      if let Ok(items) = store.list().await {
        state.update_items(items.into_iter().map(ItemRow::new).collect());
      }
      state.set_loading(LoadingOperation::None);
      state.send_render();
    });
  }

  fn render_list(&mut self, f: &mut Frame<'_>, area: Rect) {
    let today = Local::now().date_naive();
    let render_items: Vec<ListItem> = self.items.iter().map(|row| row.render(today)).collect();

    let title = match self.loading {
      LoadingOperation::Loading(time) => format!("Items - Loading... ({})", format_time_elapsed(time)),
      LoadingOperation::Deleting(time) => format!("Items - Deleting... ({})", format_time_elapsed(time)),
      LoadingOperation::DeletingWithProgress(time, current, total) => {
        format!("Items - Deleting {current}/{total}... ({})", format_time_elapsed(time))
      },
      LoadingOperation::None => "Items".to_string(),
    };

    let list = List::new(render_items)
      .block(Block::default().title(title).borders(Borders::ALL))
      .style(Style::default().fg(Color::White))
      .highlight_style(Style::default().add_modifier(Modifier::BOLD))
      .highlight_symbol("→")
      .repeat_highlight_symbol(true);

    if self.items.is_empty() {
      self.list_state.select(None);
    } else {
      self.list_state.select(Some(self.selected_index.min(self.items.len() - 1)));
    }

    f.render_stateful_widget(list, area, &mut self.list_state);
  }
}

impl Component for ItemList {
  fn register_action_handler(&mut self, tx: UnboundedSender<Action>) -> color_eyre::Result<()> {
    *self.shared_state.action_tx.lock().unwrap() = Some(tx);
    Ok(())
  }

  fn draw(&mut self, f: &mut Frame<'_>, area: Rect) -> color_eyre::Result<()> {
    self.sync_state_for_render();

    let layout = Layout::new(Direction::Vertical, [Constraint::Fill(1), Constraint::Length(1)]).margin(1).split(area);
    self.render_list(f, layout[0]);
    self.instruction_footer.render(f, layout[1], &self.items, self.items.get(self.selected_index));

    Ok(())
  }
}

#[async_trait::async_trait]
impl AsyncComponent for ItemList {
  async fn handle_events(&mut self, event: Option<crate::tui::Event>) -> color_eyre::Result<Option<Action>> {
    match event {
      Some(crate::tui::Event::Key(key)) => self.handle_key_event(key),
      _ => Ok(None),
    }
  }

  async fn update(&mut self, action: Action) -> color_eyre::Result<Option<Action>> {
    match action {
      Action::SelectPrevious => {
        self.select_previous();
        Ok(None)
      },
      Action::SelectNext => {
        self.select_next();
        Ok(None)
      },
      Action::Refresh | Action::ItemAdded => {
        self.load_items();
        Ok(None)
      },
      Action::ItemsLoaded => {
        self.sync_state_for_render();
        Ok(None)
      },
      Action::StageItemForDeletion => {
        self.stage_selected_for_deletion(true);
        Ok(None)
      },
      Action::UnstageItemForDeletion => {
        self.stage_selected_for_deletion(false);
        Ok(None)
      },
      Action::DeleteItem => {
        self.delete_selected();
        Ok(None)
      },
      Action::DeleteStagedItems => {
        self.delete_staged();
        Ok(None)
      },
      _ => Ok(None),
    }
  }
}

impl ItemList {
  fn handle_key_event(&mut self, key: KeyEvent) -> color_eyre::Result<Option<Action>> {
    match key {
      KeyEvent { code: KeyCode::Down, modifiers: KeyModifiers::NONE, .. } => Ok(Some(Action::SelectNext)),
      KeyEvent { code: KeyCode::Up, modifiers: KeyModifiers::NONE, .. } => Ok(Some(Action::SelectPrevious)),
      KeyEvent { code: KeyCode::Char('a' | 'A'), modifiers: KeyModifiers::NONE, .. } => Ok(Some(Action::OpenAddItem)),
      KeyEvent { code: KeyCode::Char('r' | 'R'), modifiers: KeyModifiers::NONE, .. } => Ok(Some(Action::Refresh)),
      KeyEvent { code: KeyCode::Char('d' | 'D'), modifiers: KeyModifiers::SHIFT, .. } => {
        Ok(Some(Action::UnstageItemForDeletion))
      },
      KeyEvent { code: KeyCode::Char('d' | 'D'), modifiers: KeyModifiers::CONTROL, .. } => {
        Ok(Some(Action::DeleteStagedItems))
      },
      KeyEvent { code: KeyCode::Char('d' | 'D'), modifiers: KeyModifiers::NONE, .. } => {
        let Some(selected) = self.get_selected_item() else {
          return Ok(None);
        };
        if selected.staged_for_deletion {
          Ok(Some(Action::DeleteItem))
        } else {
          Ok(Some(Action::StageItemForDeletion))
        }
      },
      _ => Ok(None),
    }
  }
}

fn format_time_elapsed(time: SystemTime) -> String {
  match time.elapsed() {
    Ok(elapsed) => format!("{:.1}s", elapsed.as_secs_f64()),
    Err(_) => "?".to_string(),
  }
}
