//! Turns a declaration into the tags to run.

use std::vec;

use locale_matrix_common::normalise_tag;
use log::debug;

use crate::declaration::LocaleDeclaration;
use crate::error::LocaleError;
use crate::store::LocaleStore;

/// Trimmed, non-empty tags in declaration order. Never empty.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ResolvedTagList {
    tags: Vec<String>,
}

impl ResolvedTagList {
    /// The resolved tags.
    #[must_use]
    pub fn tags(&self) -> &[String] {
        self.tags.as_slice()
    }
}

impl IntoIterator for ResolvedTagList {
    type Item = String;
    type IntoIter = vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.tags.into_iter()
    }
}

/// Resolve `declaration` into the tags to run.
///
/// Tags are trimmed and blanks dropped; order and duplicates are kept. When
/// nothing usable remains, the store's current locale is read (now, not
/// earlier) and used as the single tag.
pub fn resolve_tags(
    declaration: &LocaleDeclaration,
    store: &dyn LocaleStore,
) -> Result<ResolvedTagList, LocaleError> {
    let tags: Vec<String> = declaration
        .tags()
        .iter()
        .filter_map(|tag| normalise_tag(Some(tag.as_str())))
        .map(str::to_owned)
        .collect();

    if !tags.is_empty() {
        return Ok(ResolvedTagList { tags });
    }

    let current = store.current()?;
    debug!(
        target: "locale_matrix::resolver",
        "no usable tags declared; falling back to current default `{current}`",
    );

    Ok(ResolvedTagList {
        tags: vec![current.tag()],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryLocaleStore;
    use locale_matrix_common::Locale;
    use rstest::{fixture, rstest};

    #[fixture]
    fn store() -> InMemoryLocaleStore {
        InMemoryLocaleStore::new(Locale::parse("en-GB").expect("test tags are valid"))
    }

    #[rstest]
    #[case(&["de-DE", "en-US"], &["de-DE", "en-US"])]
    #[case(&[" de-DE ", "\tja-JP\n"], &["de-DE", "ja-JP"])]
    #[case(&["fr-FR", "", "  ", "fr-FR"], &["fr-FR", "fr-FR"])]
    #[case(&[], &["en-GB"])]
    #[case(&["", "   "], &["en-GB"])]
    fn resolves_declarations(
        store: InMemoryLocaleStore,
        #[case] declared: &[&str],
        #[case] expected: &[&str],
    ) {
        let declaration = LocaleDeclaration::new(declared.iter().copied());

        let resolved = resolve_tags(&declaration, &store).expect("resolution succeeds");

        assert_eq!(resolved.tags(), expected);
    }

    #[rstest]
    fn fallback_reads_the_default_at_resolution_time(store: InMemoryLocaleStore) {
        let declaration = LocaleDeclaration::empty();
        store
            .replace(Locale::parse("ja-JP").expect("test tags are valid"))
            .expect("in-memory writes succeed");

        let resolved = resolve_tags(&declaration, &store).expect("resolution succeeds");

        assert_eq!(resolved.tags(), ["ja-JP"]);
    }
}
