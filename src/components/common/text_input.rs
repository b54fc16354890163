use crossterm::event::KeyEvent;
use ratatui::{
  layout::Rect,
  prelude::Color,
  style::Style,
  widgets::{Block, Borders},
};
use tui_textarea::{CursorMove, Input, TextArea};

use crate::tui::Frame;

/// Single-line text field built on tui-textarea. The dialog owns validation;
/// this widget only carries the text and its focused/invalid styling.
#[derive(Debug, Default)]
pub struct TextInput {
  text_input: TextArea<'static>,
  title: String,
  focused: bool,
  invalid: bool,
}

impl TextInput {
  pub fn new(title: &str) -> Self {
    let mut input = Self { title: title.to_string(), ..Self::default() };
    input.apply_style();
    input
  }

  pub fn text(&self) -> String {
    self.text_input.lines().first().cloned().unwrap_or_default()
  }

  pub fn set_text(&mut self, text: &str) {
    self.clear();
    self.text_input.insert_str(text);
  }

  pub fn clear(&mut self) {
    self.text_input.move_cursor(CursorMove::Head);
    self.text_input.delete_line_by_end();
  }

  /// Feeds a key event into the textarea. Returns true when the content
  /// changed.
  pub fn input(&mut self, key_event: KeyEvent) -> bool {
    self.text_input.input(Input::from(key_event))
  }

  pub fn set_focused(&mut self, focused: bool) {
    self.focused = focused;
    self.apply_style();
  }

  pub fn set_invalid(&mut self, invalid: bool) {
    self.invalid = invalid;
    self.apply_style();
  }

  fn apply_style(&mut self) {
    let text_color = if self.invalid { Color::LightRed } else { Color::White };
    let border_color = if self.focused { Color::LightBlue } else { Color::White };
    self.text_input.set_style(Style::default().fg(text_color));
    self
      .text_input
      .set_block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(border_color)).title(self.title.clone()));
  }

  pub fn render(&mut self, f: &mut Frame<'_>, area: Rect) {
    f.render_widget(&self.text_input, area);
  }
}
