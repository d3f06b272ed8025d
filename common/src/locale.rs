//! Structured locale values parsed from BCP 47 language tags.
//!
//! [`Locale`] wraps `unic_langid::LanguageIdentifier` so callers get canonical
//! casing (`en-us` becomes `en-US`) and subtag accessors without depending on
//! `unic-langid` directly. Parsing trims surrounding whitespace before
//! handing the tag to the identifier parser.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use unic_langid::LanguageIdentifier;

use crate::tag::normalise_tag;

/// Error raised when a language tag cannot be turned into a [`Locale`].
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum TagError {
    /// The tag was empty once surrounding whitespace was removed.
    #[error("language tag is blank")]
    Blank,
    /// The tag is not a well-formed language identifier.
    #[error("`{tag}` is not a valid language tag: {reason}")]
    Malformed {
        /// Trimmed tag as supplied by the caller.
        tag: String,
        /// Parser diagnostic.
        reason: String,
    },
}

/// A parsed locale such as `de-DE` or `ja-JP`.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Locale {
    identifier: LanguageIdentifier,
}

impl Locale {
    /// Parse a language tag, trimming surrounding whitespace first.
    ///
    /// ```
    /// use locale_matrix_common::Locale;
    ///
    /// let locale = Locale::parse(" de-DE ").expect("tag should parse");
    /// assert_eq!(locale.language(), "de");
    /// assert_eq!(locale.region(), Some("DE"));
    /// assert_eq!(locale.to_string(), "de-DE");
    /// ```
    pub fn parse(tag: &str) -> Result<Self, TagError> {
        let trimmed = normalise_tag(Some(tag)).ok_or(TagError::Blank)?;

        trimmed
            .parse::<LanguageIdentifier>()
            .map(Self::from)
            .map_err(|error| TagError::Malformed {
                tag: trimmed.to_owned(),
                reason: error.to_string(),
            })
    }

    /// Language subtag, e.g. `de` for `de-DE`.
    #[must_use]
    pub fn language(&self) -> &str {
        self.identifier.language.as_str()
    }

    /// Region subtag, if the tag carries one.
    #[must_use]
    pub fn region(&self) -> Option<&str> {
        self.identifier.region.as_ref().map(|region| region.as_str())
    }

    /// Canonical language tag.
    #[must_use]
    pub fn tag(&self) -> String {
        self.identifier.to_string()
    }

    /// Borrow the underlying identifier.
    #[must_use]
    pub const fn identifier(&self) -> &LanguageIdentifier {
        &self.identifier
    }

    /// Consume the locale, yielding the underlying identifier.
    #[must_use]
    pub fn into_identifier(self) -> LanguageIdentifier {
        self.identifier
    }
}

impl From<LanguageIdentifier> for Locale {
    fn from(identifier: LanguageIdentifier) -> Self {
        Self { identifier }
    }
}

impl FromStr for Locale {
    type Err = TagError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        Self::parse(input)
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.identifier, formatter)
    }
}
