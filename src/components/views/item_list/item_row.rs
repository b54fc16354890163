use chrono::NaiveDate;
use ratatui::{
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::ListItem,
};

use crate::store::Item;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRow {
  pub item: Item,
  pub staged_for_deletion: bool,
}

impl ItemRow {
  pub fn new(item: Item) -> Self {
    ItemRow { item, staged_for_deletion: false }
  }

  pub fn render(&self, today: NaiveDate) -> ListItem {
    let mut parts = Vec::new();

    let mut name = Span::styled(self.item.name.clone(), Style::default());
    if self.staged_for_deletion {
      name = name.style(Style::default().fg(Color::Red));
    }
    parts.push(name);

    let date = Span::styled(format!(" {}", self.item.expiry_date), Style::default().add_modifier(Modifier::DIM));
    parts.push(date);

    let days = self.item.days_until_expiry(today);
    let badge = match days {
      d if d < 0 => Span::styled(" expired".to_string(), Style::default().fg(Color::Red)),
      0 => Span::styled(" expires today".to_string(), Style::default().fg(Color::Yellow)),
      1 => Span::styled(" 1 day left".to_string(), Style::default().fg(Color::Yellow)),
      d => Span::styled(format!(" {d} days left"), Style::default().add_modifier(Modifier::DIM)),
    };
    parts.push(badge);

    ListItem::from(Line::from(parts))
  }

  pub fn stage_for_deletion(&mut self, stage: bool) {
    self.staged_for_deletion = stage;
  }
}
