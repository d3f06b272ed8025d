//! Selection of the initial process default locale.
//!
//! Rust has no process-wide "default locale" of its own, so the value that
//! seeds one is chosen here. Candidates are considered in priority order and
//! the first one that parses as a language tag wins:
//!
//! 1. An explicit override supplied by the caller.
//! 2. The environment ([`ENVIRONMENT_VARIABLES`], first set entry).
//! 3. The `default_locale` configuration value.
//! 4. [`FALLBACK_LOCALE`].

use std::env;
use std::fmt;

use log::{debug, warn};
use unic_langid::{LanguageIdentifier, langid};

use crate::locale::Locale;
use crate::tag::{normalise_tag, posix_to_language_tag};

/// Locale used when no candidate resolves.
pub const FALLBACK_LOCALE: LanguageIdentifier = langid!("en-US");

/// Environment variables consulted for the default locale, highest priority
/// first.
pub const ENVIRONMENT_VARIABLES: [&str; 4] =
    ["LOCALE_MATRIX_DEFAULT", "LC_ALL", "LC_MESSAGES", "LANG"];

/// Source for a resolved default locale.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LocaleSource {
    /// Locale supplied explicitly by the caller.
    ExplicitArgument,
    /// Locale sourced from the process environment.
    EnvironmentVariable,
    /// Locale taken from the extension configuration file.
    Configuration,
    /// Built-in fallback locale.
    Fallback,
}

impl fmt::Display for LocaleSource {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExplicitArgument => formatter.write_str("explicit locale override"),
            Self::EnvironmentVariable => formatter.write_str("environment locale"),
            Self::Configuration => formatter.write_str("configuration locale"),
            Self::Fallback => formatter.write_str("fallback locale"),
        }
    }
}

/// Outcome of default-locale resolution including provenance.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LocaleSelection {
    locale: Locale,
    source: LocaleSource,
}

impl LocaleSelection {
    const fn new(locale: Locale, source: LocaleSource) -> Self {
        Self { locale, source }
    }

    /// Returns the effective locale source.
    #[must_use]
    pub const fn source(&self) -> LocaleSource {
        self.source
    }

    /// Returns the resolved locale.
    #[must_use]
    pub const fn locale(&self) -> &Locale {
        &self.locale
    }

    /// Whether the fallback locale was used.
    #[must_use]
    pub fn used_fallback(&self) -> bool {
        self.source == LocaleSource::Fallback
    }

    /// Consumes the selection, yielding the [`Locale`].
    #[must_use]
    pub fn into_locale(self) -> Locale {
        self.locale
    }

    /// Emit a debug log summarising the resolved locale.
    pub fn log_outcome(&self, target: &str) {
        debug!(
            target: target,
            "resolved {} to `{}`",
            self.source(),
            self.locale(),
        );
    }
}

fn try_resolve_candidate(source: LocaleSource, raw: Option<&str>) -> Option<LocaleSelection> {
    let candidate = normalise_tag(raw)?;

    match Locale::parse(candidate) {
        Ok(locale) => Some(LocaleSelection::new(locale, source)),
        Err(error) => {
            warn!(
                target: "locale_matrix::selection",
                "skipping unusable {source} `{candidate}`: {error}",
            );
            None
        }
    }
}

/// Resolve the default locale from explicit, environment, and configuration
/// candidates, falling back to [`FALLBACK_LOCALE`].
///
/// ```
/// use locale_matrix_common::{LocaleSource, resolve_default_locale};
///
/// let selection = resolve_default_locale(None, Some(String::from("ja-JP")), Some("de-DE"));
/// assert_eq!(selection.source(), LocaleSource::EnvironmentVariable);
/// assert_eq!(selection.locale().to_string(), "ja-JP");
/// ```
#[must_use]
pub fn resolve_default_locale(
    explicit: Option<&str>,
    environment: Option<String>,
    configuration: Option<&str>,
) -> LocaleSelection {
    let candidates = [
        (LocaleSource::ExplicitArgument, explicit),
        (LocaleSource::EnvironmentVariable, environment.as_deref()),
        (LocaleSource::Configuration, configuration),
    ];

    candidates
        .into_iter()
        .find_map(|(source, raw)| try_resolve_candidate(source, raw))
        .unwrap_or_else(|| {
            LocaleSelection::new(Locale::from(FALLBACK_LOCALE), LocaleSource::Fallback)
        })
}

/// Read the first usable locale name from [`ENVIRONMENT_VARIABLES`].
///
/// POSIX names are converted to language tags; `C`, `POSIX`, blank and
/// non-UTF-8 values are skipped.
#[must_use]
pub fn environment_locale() -> Option<String> {
    ENVIRONMENT_VARIABLES.iter().find_map(|name| {
        env::var_os(name)
            .and_then(|value| value.into_string().ok())
            .and_then(|value| posix_to_language_tag(&value))
    })
}
