//! Locale primitives shared by the locale-matrix crates: a parsed [`Locale`]
//! value, tag normalisation, and selection of the initial process default.

pub mod locale;
pub mod selection;
pub mod tag;

pub use locale::{Locale, TagError};
pub use selection::{
    ENVIRONMENT_VARIABLES, FALLBACK_LOCALE, LocaleSelection, LocaleSource, environment_locale,
    resolve_default_locale,
};
pub use tag::{normalise_tag, posix_to_language_tag};
