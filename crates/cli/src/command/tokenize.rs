use crate::error::{CommandError, Result};

/// Splits a command line into words on whitespace.
///
/// A double-quoted run is kept as one word with the quotes removed, so
/// `"Team sync"` yields `Team sync` and `""` yields an empty word.
pub fn tokenize(line: &str) -> Result<Vec<String>> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut quoted = false;

    for c in line.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                quoted = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if quoted || !current.is_empty() {
                    words.push(std::mem::take(&mut current));
                }
                quoted = false;
            }
            c => current.push(c),
        }
    }

    if in_quotes {
        return Err(CommandError::UnterminatedQuote);
    }
    if quoted || !current.is_empty() {
        words.push(current);
    }
    Ok(words)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_splits_on_whitespace() {
        assert_eq!(
            tokenize("  print events   on 2025-05-01 ").unwrap(),
            vec!["print", "events", "on", "2025-05-01"]
        );
    }

    #[test]
    fn test_quoted_words() {
        assert_eq!(
            tokenize(r#"create event "Team sync" on 2025-05-01"#).unwrap(),
            vec!["create", "event", "Team sync", "on", "2025-05-01"]
        );
        assert_eq!(
            tokenize(r#"edit event location Lunch from 2025-05-01T12:00 with """#).unwrap(),
            vec![
                "edit",
                "event",
                "location",
                "Lunch",
                "from",
                "2025-05-01T12:00",
                "with",
                ""
            ]
        );
    }

    #[test]
    fn test_blank_line() {
        assert!(tokenize("   ").unwrap().is_empty());
    }

    #[test]
    fn test_unterminated_quote() {
        assert_eq!(
            tokenize(r#"create event "Team sync on 2025-05-01"#),
            Err(CommandError::UnterminatedQuote)
        );
    }
}
