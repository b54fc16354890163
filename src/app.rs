use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::prelude::Rect;
use tokio::sync::mpsc;

use crate::{
  action::Action,
  components::{AddItemDialog, AsyncComponent, Component, ErrorView, ItemList},
  config::Config,
  mode::Mode,
  store::ItemStore,
  tui,
  tui::Tui,
};

pub struct App {
  pub config: Config,
  pub tick_rate: f64,
  pub frame_rate: f64,
  pub item_list: Box<dyn AsyncComponent>,
  pub add_item: Box<dyn AsyncComponent>,
  pub error_view: ErrorView,
  pub should_quit: bool,
  pub should_suspend: bool,
  pub mode: Mode,
}

impl App {
  pub fn new(config: Config, store: Arc<dyn ItemStore>, tick_rate: f64, frame_rate: f64) -> Result<Self> {
    let item_list = Box::new(ItemList::new(store.clone()));
    let add_item = Box::new(AddItemDialog::new(store, config.max_name_length, config.default_expiry_offset_days));
    Ok(Self {
      config,
      tick_rate,
      frame_rate,
      item_list,
      add_item,
      error_view: ErrorView::default(),
      should_quit: false,
      should_suspend: false,
      mode: Mode::Browse,
    })
  }

  fn active_component(&mut self) -> &mut dyn AsyncComponent {
    match self.mode {
      Mode::Browse => self.item_list.as_mut(),
      Mode::AddItem => self.add_item.as_mut(),
      Mode::Error => &mut self.error_view,
    }
  }

  fn draw_views(&mut self, f: &mut tui::Frame<'_>) -> Result<()> {
    match self.mode {
      Mode::Browse => self.item_list.draw(f, f.area())?,
      Mode::AddItem => {
        // The dialog floats over the list.
        self.item_list.draw(f, f.area())?;
        self.add_item.draw(f, f.area())?;
      },
      Mode::Error => self.error_view.draw(f, f.area())?,
    }
    Ok(())
  }

  pub async fn run(&mut self) -> Result<()> {
    let (action_tx, mut action_rx) = mpsc::unbounded_channel();

    let mut tui = tui::Tui::new()?.tick_rate(self.tick_rate).frame_rate(self.frame_rate);
    tui.enter()?;

    self.item_list.register_action_handler(action_tx.clone())?;
    self.add_item.register_action_handler(action_tx.clone())?;

    // Initial load of the item list.
    action_tx.send(Action::Refresh)?;

    loop {
      if let Some(e) = tui.next().await {
        match e {
          tui::Event::Quit => action_tx.send(Action::Quit)?,
          tui::Event::Tick => action_tx.send(Action::Tick)?,
          tui::Event::Render => action_tx.send(Action::Render)?,
          tui::Event::Resize(x, y) => action_tx.send(Action::Resize(x, y))?,
          tui::Event::Key(key) => {
            if self.mode == Mode::Browse {
              if let Some(action) = self.config.keybindings.get(&self.mode).and_then(|map| map.get(&vec![key])) {
                action_tx.send(action.clone())?;
              } else if let Some(action) = global_key_action(key) {
                action_tx.send(action)?;
              }
            }
          },
          _ => {},
        }

        if let Some(action) = self.active_component().handle_events(Some(e.clone())).await? {
          action_tx.send(action)?;
        }
      }

      while let Ok(action) = action_rx.try_recv() {
        if action != Action::Tick && action != Action::Render {
          log::debug!("{action:?}");
        }

        match &action {
          Action::OpenAddItem => self.mode = Mode::AddItem,
          Action::CloseAddItem => self.mode = Mode::Browse,
          Action::Error(message) => {
            self.error_view.set_message(message.clone());
            self.mode = Mode::Error;
          },
          Action::ExitError => self.mode = Mode::Browse,
          Action::Quit => self.should_quit = true,
          Action::Suspend => self.should_suspend = true,
          Action::Resume => self.should_suspend = false,
          Action::Resize(w, h) => {
            tui.resize(Rect::new(0, 0, *w, *h))?;
            tui.draw(|f| {
              if let Err(e) = self.draw_views(f) {
                action_tx.send(Action::Error(format!("Failed to draw: {:?}", e))).unwrap();
              }
            })?;
          },
          Action::Render => {
            tui.draw(|f| {
              if let Err(e) = self.draw_views(f) {
                action_tx.send(Action::Error(format!("Failed to draw: {:?}", e))).unwrap();
              }
            })?;
          },
          _ => {},
        }

        // Both main components see every action; the dialog fires ItemAdded
        // while it is still the active view, and the list must catch it.
        if let Some(follow_up) = self.item_list.update(action.clone()).await? {
          action_tx.send(follow_up)?;
        }
        if let Some(follow_up) = self.add_item.update(action.clone()).await? {
          action_tx.send(follow_up)?;
        }
      }

      if self.should_suspend {
        tui.suspend()?;
        action_tx.send(Action::Resume)?;
        tui = Tui::new()?.tick_rate(self.tick_rate).frame_rate(self.frame_rate);
        tui.enter()?;
      } else if self.should_quit {
        tui.stop()?;
        break;
      }
    }
    tui.exit()?;
    Ok(())
  }
}

fn global_key_action(key: KeyEvent) -> Option<Action> {
  match key {
    KeyEvent { code: KeyCode::Char('q'), modifiers: KeyModifiers::NONE, .. } => Some(Action::Quit),
    KeyEvent { code: KeyCode::Char('c' | 'C'), modifiers: KeyModifiers::CONTROL, .. } => Some(Action::Quit),
    KeyEvent { code: KeyCode::Char('z' | 'Z'), modifiers: KeyModifiers::CONTROL, .. } => Some(Action::Suspend),
    _ => None,
  }
}
