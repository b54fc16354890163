use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
  static ref SCRIPT_BLOCK: Regex = Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>").unwrap();
  static ref TAG: Regex = Regex::new(r"<[^>]*>").unwrap();
}

/// Strips markup from free-text input in two passes: script blocks together
/// with their content first, then any remaining angle-bracket tag. Each
/// removed block becomes a single space so the text on either side never
/// fuses into one word. Idempotent. Never trims; whitespace cleanup is a
/// separate step composed at submit time.
pub fn sanitize(input: &str) -> String {
  let without_scripts = SCRIPT_BLOCK.replace_all(input, " ");
  TAG.replace_all(&without_scripts, " ").into_owned()
}

/// Trims and collapses runs of whitespace to single spaces.
pub fn collapse_whitespace(input: &str) -> String {
  input.split_whitespace().collect::<Vec<_>>().join(" ")
}
