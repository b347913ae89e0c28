//! Declaration line tokenizer.

use regex::Regex;
use std::sync::OnceLock;

/// Whitespace-delimited words or double-quoted runs.
fn token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r#"[^\s"]+|"[^"]*""#).expect("token pattern is valid"))
}

/// Replace typographic quotes with their straight equivalents.
pub fn normalize_quotes(line: &str) -> String {
    line.chars()
        .map(|c| match c {
            '\u{201C}' | '\u{201D}' | '\u{201E}' => '"',
            '\u{2018}' | '\u{2019}' => '\'',
            other => other,
        })
        .collect()
}

/// Split a declaration line into tokens.
///
/// Quoted substrings stay together. A token whose first `=` is its last
/// character absorbs the token that follows it, so `key= "a b"` and
/// `key="a b"` both yield `key="a b"`.
pub fn tokenize(line: &str) -> Vec<String> {
    let normalized = normalize_quotes(line);
    let mut tokens: Vec<String> = Vec::new();

    for found in token_pattern().find_iter(&normalized) {
        let token = found.as_str();
        match tokens.last_mut() {
            Some(previous) if ends_with_open_assignment(previous) => previous.push_str(token),
            _ => tokens.push(token.to_string()),
        }
    }

    tokens
}

fn ends_with_open_assignment(token: &str) -> bool {
    token.find('=') == Some(token.len() - 1)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_empty_and_blank() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   \t ").is_empty());
    }

    #[test]
    fn test_tokenize_rejoins_quoted_value() {
        let tokens = tokenize(r#"mdp-image caption="A long caption" .wide"#);
        assert_eq!(tokens, vec!["mdp-image", r#"caption="A long caption""#, ".wide"]);
    }

    #[test]
    fn test_tokenize_rejoins_after_separated_assignment() {
        let tokens = tokenize(r#"label= "two words""#);
        assert_eq!(tokens, vec![r#"label="two words""#]);
    }

    #[test]
    fn test_tokenize_only_first_equals_counts() {
        // "a=b=" has its first '=' mid-token, so the next token stands alone
        let tokens = tokenize("a=b= next");
        assert_eq!(tokens, vec!["a=b=", "next"]);
    }

    #[test]
    fn test_tokenize_typographic_quotes() {
        let tokens = tokenize("title=\u{201C}Hello world\u{201D}");
        assert_eq!(tokens, vec![r#"title="Hello world""#]);
    }

    #[test]
    fn test_tokenize_standalone_quoted_arg() {
        let tokens = tokenize(r#"mdp-map "first arg" second"#);
        assert_eq!(tokens, vec!["mdp-map", r#""first arg""#, "second"]);
    }
}
