//! String utilities for the domain layer.

/// Trim surrounding whitespace, returning `None` when nothing is left
///
/// Participants and candidates are identified by their trimmed text.
pub fn non_blank(s: &str) -> Option<&str> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_blank_trims() {
        assert_eq!(non_blank("  pizza "), Some("pizza"));
        assert_eq!(non_blank("김밥천국"), Some("김밥천국"));
    }

    #[test]
    fn test_non_blank_rejects_whitespace() {
        assert_eq!(non_blank(""), None);
        assert_eq!(non_blank(" \t\n "), None);
    }
}
