//! Parsing of free-text classifier replies
//!
//! Replies are parsed strictly; each call site chooses its own fallback.

/// `true` only for an exact, case-insensitive "YES" (surrounding whitespace ignored)
pub fn parse_yes_no(reply: &str) -> bool {
    reply.trim().eq_ignore_ascii_case("YES")
}

/// A finite number, or `None` when the reply is anything else
pub fn parse_score(reply: &str) -> Option<f64> {
    reply
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|score| score.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yes_no() {
        assert!(parse_yes_no("YES"));
        assert!(parse_yes_no("  yes\n"));
        assert!(!parse_yes_no("NO"));
        assert!(!parse_yes_no("Yes, it is."));
        assert!(!parse_yes_no(""));
    }

    #[test]
    fn test_score() {
        assert_eq!(parse_score("9"), Some(9.0));
        assert_eq!(parse_score(" 7.5 \n"), Some(7.5));
        assert_eq!(parse_score("8/10"), None);
        assert_eq!(parse_score("Score: 8"), None);
        assert_eq!(parse_score("NaN"), None);
        assert_eq!(parse_score("inf"), None);
    }
}
