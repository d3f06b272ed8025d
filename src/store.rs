//! The shared "current default locale" resource.
//!
//! Code under test reads the default locale through a [`LocaleStore`]. The
//! process-wide value lives behind [`ProcessLocaleStore`]; tests of the
//! extension itself substitute an [`InMemoryLocaleStore`] so they never touch
//! process state.
//!
//! Writes through a store are only race-free while the caller holds the
//! registry's [`crate::FairLock`]. Mutating the default outside an invocation
//! scope is unsupported.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use locale_matrix_common::{Locale, LocaleSelection, environment_locale, resolve_default_locale};
use once_cell::sync::OnceCell;

use crate::error::LocaleError;

/// Read/write access to a default-locale value.
pub trait LocaleStore: fmt::Debug + Send + Sync {
    /// Returns the current default locale.
    fn current(&self) -> Result<Locale, LocaleError>;

    /// Overwrites the current default locale.
    fn replace(&self, locale: Locale) -> Result<(), LocaleError>;
}

static PROCESS_LOCALE: OnceCell<RwLock<Locale>> = OnceCell::new();

const STORE_TARGET: &str = "locale_matrix::store";

fn process_cell() -> &'static RwLock<Locale> {
    PROCESS_LOCALE.get_or_init(|| {
        let selection = resolve_default_locale(None, environment_locale(), None);
        selection.log_outcome(STORE_TARGET);
        RwLock::new(selection.into_locale())
    })
}

/// Seed the process default locale before first use.
///
/// Returns the selection that was applied, or `None` when the process locale
/// had already been initialised (either by an earlier call or by a read).
pub fn seed_process_locale(configuration: Option<&str>) -> Option<LocaleSelection> {
    let selection = resolve_default_locale(None, environment_locale(), configuration);

    PROCESS_LOCALE
        .set(RwLock::new(selection.locale().clone()))
        .ok()?;
    selection.log_outcome(STORE_TARGET);
    Some(selection)
}

/// Returns the process default locale, seeding it from the environment on
/// first access.
#[must_use]
pub fn default_locale() -> Locale {
    process_cell()
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// The process-wide default locale.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProcessLocaleStore;

impl LocaleStore for ProcessLocaleStore {
    fn current(&self) -> Result<Locale, LocaleError> {
        Ok(default_locale())
    }

    fn replace(&self, locale: Locale) -> Result<(), LocaleError> {
        *process_cell()
            .write()
            .unwrap_or_else(PoisonError::into_inner) = locale;
        Ok(())
    }
}

/// Standalone default-locale cell for tests and embedded runners.
///
/// Clones share the same cell, so a test can hand one clone to a registry and
/// observe the value through another.
///
/// ```
/// use locale_matrix::{InMemoryLocaleStore, LocaleStore};
/// use locale_matrix_common::Locale;
///
/// let store = InMemoryLocaleStore::new(Locale::parse("en-GB").expect("valid tag"));
/// let observer = store.clone();
/// store.replace(Locale::parse("cy").expect("valid tag")).expect("in-memory writes succeed");
/// assert_eq!(observer.snapshot().to_string(), "cy");
/// ```
#[derive(Clone, Debug)]
pub struct InMemoryLocaleStore {
    cell: Arc<RwLock<Locale>>,
}

impl InMemoryLocaleStore {
    /// Create a store holding `initial`.
    #[must_use]
    pub fn new(initial: Locale) -> Self {
        Self {
            cell: Arc::new(RwLock::new(initial)),
        }
    }

    /// Returns the held locale without going through the fallible trait API.
    #[must_use]
    pub fn snapshot(&self) -> Locale {
        self.cell
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl LocaleStore for InMemoryLocaleStore {
    fn current(&self) -> Result<Locale, LocaleError> {
        Ok(self.snapshot())
    }

    fn replace(&self, locale: Locale) -> Result<(), LocaleError> {
        *self.cell.write().unwrap_or_else(PoisonError::into_inner) = locale;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use log::{LevelFilter, Log, Metadata, Record};
    use rstest::rstest;

    /// Collects messages logged under the store target.
    struct StoreLog {
        messages: Mutex<Vec<String>>,
    }

    impl StoreLog {
        fn take(&self) -> Vec<String> {
            std::mem::take(&mut *self.messages.lock().unwrap_or_else(PoisonError::into_inner))
        }
    }

    impl Log for StoreLog {
        fn enabled(&self, metadata: &Metadata<'_>) -> bool {
            metadata.target() == STORE_TARGET
        }

        fn log(&self, record: &Record<'_>) {
            if self.enabled(record.metadata()) {
                self.messages
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .push(record.args().to_string());
            }
        }

        fn flush(&self) {}
    }

    static STORE_LOG: StoreLog = StoreLog {
        messages: Mutex::new(Vec::new()),
    };

    fn locale(tag: &str) -> Locale {
        Locale::parse(tag).expect("test tags are valid")
    }

    #[rstest]
    fn in_memory_clones_share_a_cell() {
        let store = InMemoryLocaleStore::new(locale("en-US"));
        let observer = store.clone();

        store
            .replace(locale("ja-JP"))
            .expect("in-memory writes succeed");

        assert_eq!(observer.current(), Ok(locale("ja-JP")));
    }

    #[rstest]
    fn seeding_after_first_use_is_refused() {
        let initial = default_locale();

        assert!(!initial.tag().is_empty());
        assert!(seed_process_locale(Some("de-DE")).is_none());
    }

    #[rstest]
    fn refused_seeds_are_not_logged_as_resolved() {
        log::set_logger(&STORE_LOG).expect("only this test installs a logger");
        log::set_max_level(LevelFilter::Debug);
        assert!(!default_locale().tag().is_empty());
        STORE_LOG.take();

        assert!(seed_process_locale(Some("de-DE")).is_none());

        assert_eq!(STORE_LOG.take(), Vec::<String>::new());
    }
}
