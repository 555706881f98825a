//! Shared predicates for bounded text fields.

/// Outcome of checking a text field against its bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TextCheck {
    Ok,
    Blank,
    TooLong,
}

/// Check that `value` is non-blank and at most `max` characters long.
pub(crate) fn check_bounded_text(value: &str, max: usize) -> TextCheck {
    if value.trim().is_empty() {
        return TextCheck::Blank;
    }
    if value.chars().count() > max {
        return TextCheck::TooLong;
    }
    TextCheck::Ok
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("flour", 8, TextCheck::Ok)]
    #[case("  ", 8, TextCheck::Blank)]
    #[case("", 8, TextCheck::Blank)]
    #[case("wholemeal", 8, TextCheck::TooLong)]
    #[case("мука", 4, TextCheck::Ok)]
    fn bounded_text_counts_characters(
        #[case] value: &str,
        #[case] max: usize,
        #[case] expected: TextCheck,
    ) {
        assert_eq!(check_bounded_text(value, max), expected);
    }
}
