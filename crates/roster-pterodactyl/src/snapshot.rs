//! Whitelist file (de)serialisation, kept separate from the HTTP plumbing so
//! the empty-file and bad-content cases are testable without a panel.

use roster_core::binding::WhitelistEntry;

use crate::Result;

/// Parse raw `whitelist.json` content. Empty and whitespace-only files are an
/// empty whitelist, not an error; anything else must be valid JSON.
pub fn parse(content: &str) -> Result<Vec<WhitelistEntry>> {
  let trimmed = content.trim();
  if trimmed.is_empty() {
    return Ok(Vec::new());
  }
  Ok(serde_json::from_str(trimmed)?)
}

/// Render entries the way the game server writes the file itself:
/// pretty-printed JSON.
pub fn serialize(entries: &[WhitelistEntry]) -> Result<String> {
  Ok(serde_json::to_string_pretty(entries)?)
}

#[cfg(test)]
mod tests {
  use uuid::Uuid;

  use super::*;
  use crate::Error;

  #[test]
  fn empty_and_whitespace_content_is_an_empty_whitelist() {
    assert!(parse("").unwrap().is_empty());
    assert!(parse("   \n\t ").unwrap().is_empty());
  }

  #[test]
  fn entries_round_trip_with_hyphenated_uuids() {
    let entries = vec![WhitelistEntry {
      uuid: Uuid::from_u128(1),
      name: "CoolGuy".into(),
    }];
    let rendered = serialize(&entries).unwrap();
    assert!(rendered.contains("00000000-0000-0000-0000-000000000001"));
    assert_eq!(parse(&rendered).unwrap(), entries);
  }

  #[test]
  fn garbage_content_is_a_parse_error_not_an_empty_list() {
    let err = parse("definitely not json").unwrap_err();
    assert!(matches!(err, Error::Json(_)));
  }
}
