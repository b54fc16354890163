use ratatui::{
  layout::Rect,
  prelude::{Line, Span},
};

use super::item_row::ItemRow;
use crate::tui::Frame;

#[derive(Debug, Default)]
pub struct InstructionFooter {}

impl InstructionFooter {
  pub fn render(&self, f: &mut Frame<'_>, area: Rect, items: &[ItemRow], selected: Option<&ItemRow>) {
    let mut commands = vec![Span::raw("q: Quit"), Span::raw(" | a: Add item"), Span::raw(" | r: Refresh")];

    if let Some(selected) = selected {
      if selected.staged_for_deletion {
        commands.push(Span::raw(" | d: Delete"));
        commands.push(Span::raw(" | ⇧ + d: Unstage"));
      } else {
        commands.push(Span::raw(" | d: Stage for deletion"));
      }
    }

    if items.iter().any(|item| item.staged_for_deletion) {
      commands.push(Span::raw(" | ^ + d: Delete all staged items"));
    }

    let footer = Line::from(commands);
    f.render_widget(footer, area);
  }
}
