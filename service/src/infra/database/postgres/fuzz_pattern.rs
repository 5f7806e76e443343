//! [`FuzzPattern`] definition.

use derive_more::Display;
use itertools::Itertools as _;
use postgres_types::{FromSql, ToSql};

/// `SIMILAR TO` pattern matching any of the words of a search input.
#[derive(Clone, Debug, Display, Eq, FromSql, PartialEq, ToSql)]
#[postgres(transparent)]
pub struct FuzzPattern(String);

impl FuzzPattern {
    /// Characters having a special meaning in `SIMILAR TO` patterns.
    const SPECIAL: &'static [char] = &[
        '\\', '%', '_', '|', '*', '+', '?', '{', '}', '(', ')', '[', ']',
    ];

    /// Creates a new [`FuzzPattern`] out of the given search `input`.
    ///
    /// Every whitespace-separated word becomes an alternative matching
    /// anywhere in the text.
    #[must_use]
    pub fn new(input: &str) -> Self {
        Self(format!(
            "%({})%",
            input.split_whitespace().format_with("|", |word, f| {
                f(&word.chars().format_with("", |c, f| {
                    if Self::SPECIAL.contains(&c) {
                        f(&format_args!("\\{c}"))
                    } else {
                        f(&c)
                    }
                }))
            }),
        ))
    }
}

#[cfg(test)]
mod spec {
    use super::FuzzPattern;

    #[test]
    fn joins_words_as_alternatives() {
        assert_eq!(
            FuzzPattern::new("sunny  flat").to_string(),
            "%(sunny|flat)%",
        );
    }

    #[test]
    fn escapes_special_characters() {
        assert_eq!(
            FuzzPattern::new("50% off_(now)").to_string(),
            r"%(50\%|off\_\(now\))%",
        );
    }
}
