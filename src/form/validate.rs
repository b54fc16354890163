use chrono::NaiveDate;

use crate::form::messages;

pub const DEFAULT_MAX_NAME_LENGTH: usize = 50;

/// Field verdicts are `Option<String>`: `None` means the field is valid,
/// `Some` carries the message to show inline.
///
/// Length is measured on the trimmed input as the user typed it; markup is
/// only stripped later, at submit time. A name that would shrink below the
/// limit after sanitization still fails here.
pub fn validate_name(raw: &str, max_len: usize) -> Option<String> {
  let trimmed = raw.trim();
  if trimmed.is_empty() {
    return Some(messages::NAME_REQUIRED.to_string());
  }
  if trimmed.chars().count() > max_len {
    return Some(messages::name_too_long(max_len));
  }
  None
}

/// `NaiveDate` has no time component, so comparing dates is the
/// normalize-to-midnight rule. `today` is an argument to keep this pure.
pub fn validate_expiry_date(date: Option<NaiveDate>, today: NaiveDate) -> Option<String> {
  match date {
    None => Some(messages::DATE_REQUIRED.to_string()),
    Some(date) if date < today => Some(messages::DATE_IN_PAST.to_string()),
    Some(_) => None,
  }
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;

  fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
  }

  #[test]
  fn test_validate_name_rejects_empty_and_whitespace_only() {
    for input in ["", " ", "   ", "\t\n ", "\u{3000}"] {
      assert_eq!(validate_name(input, DEFAULT_MAX_NAME_LENGTH), Some(messages::NAME_REQUIRED.to_string()));
    }
  }

  #[test]
  fn test_validate_name_accepts_lengths_up_to_the_limit() {
    assert_eq!(validate_name("Cucumber", DEFAULT_MAX_NAME_LENGTH), None);
    assert_eq!(validate_name(&"x".repeat(50), DEFAULT_MAX_NAME_LENGTH), None);
    assert_eq!(validate_name(&format!("  {}  ", "x".repeat(50)), DEFAULT_MAX_NAME_LENGTH), None);
  }

  #[test]
  fn test_validate_name_rejects_names_over_the_limit() {
    assert_eq!(validate_name(&"x".repeat(51), DEFAULT_MAX_NAME_LENGTH), Some(messages::name_too_long(50)));
  }

  #[test]
  fn test_validate_name_counts_characters_not_bytes() {
    // 50 multi-byte characters are within the limit even though the byte
    // count is far larger.
    assert_eq!(validate_name(&"ながねぎ".repeat(12), 50), None);
    assert_eq!(validate_name(&"ね".repeat(51), 50), Some(messages::name_too_long(50)));
  }

  #[test]
  fn test_validate_name_measures_unsanitized_length() {
    // Markup counts toward the limit; stripping happens after validation.
    let input = format!("<b>{}</b>", "x".repeat(48));
    assert_eq!(validate_name(&input, DEFAULT_MAX_NAME_LENGTH), Some(messages::name_too_long(50)));
  }

  #[test]
  fn test_validate_name_respects_configured_limit() {
    assert_eq!(validate_name("abcdef", 5), Some(messages::name_too_long(5)));
    assert_eq!(validate_name("abcde", 5), None);
  }

  #[test]
  fn test_validate_expiry_date_requires_a_date() {
    assert_eq!(validate_expiry_date(None, date(2026, 8, 7)), Some(messages::DATE_REQUIRED.to_string()));
  }

  #[test]
  fn test_validate_expiry_date_rejects_past_dates() {
    let today = date(2026, 8, 7);
    assert_eq!(validate_expiry_date(Some(date(2026, 8, 6)), today), Some(messages::DATE_IN_PAST.to_string()));
    assert_eq!(validate_expiry_date(Some(date(2020, 1, 1)), today), Some(messages::DATE_IN_PAST.to_string()));
  }

  #[test]
  fn test_validate_expiry_date_accepts_today_and_later() {
    let today = date(2026, 8, 7);
    assert_eq!(validate_expiry_date(Some(today), today), None);
    assert_eq!(validate_expiry_date(Some(date(2026, 8, 8)), today), None);
    assert_eq!(validate_expiry_date(Some(date(2030, 1, 1)), today), None);
  }
}
