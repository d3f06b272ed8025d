//! Invocation descriptors produced per resolved tag.

use std::fmt;
use std::sync::Arc;
use std::vec;

use crate::guard::LocaleScopeGuard;
use crate::parameter::ParameterSupplier;
use crate::registry::LocaleRegistry;
use crate::resolver::ResolvedTagList;

/// Process-unique identity of one invocation.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct InvocationId(u64);

impl InvocationId {
    pub(crate) const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw numeric identity.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for InvocationId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "invocation#{}", self.0)
    }
}

/// One repetition of a test body with a fixed locale tag.
///
/// Each invocation owns its own [`LocaleScopeGuard`] and
/// [`ParameterSupplier`]; nothing is shared between invocations except the
/// registry.
#[derive(Debug)]
pub struct Invocation {
    ordinal: usize,
    tag: String,
    guard: LocaleScopeGuard,
    supplier: ParameterSupplier,
}

impl Invocation {
    fn new(ordinal: usize, tag: String, registry: &Arc<LocaleRegistry>) -> Self {
        let guard =
            LocaleScopeGuard::new(registry.allocate_id(), tag.as_str(), Arc::clone(registry));
        let supplier = ParameterSupplier::new(tag.as_str());

        Self {
            ordinal,
            tag,
            guard,
            supplier,
        }
    }

    /// Identity snapshots and lock ownership are keyed by.
    #[must_use]
    pub const fn id(&self) -> InvocationId {
        self.guard.id()
    }

    /// 1-based position in the resolved tag list.
    #[must_use]
    pub const fn ordinal(&self) -> usize {
        self.ordinal
    }

    /// Tag this invocation installs.
    #[must_use]
    pub fn tag(&self) -> &str {
        self.tag.as_str()
    }

    /// Display label, `locale=<tag>`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("locale={}", self.tag)
    }

    /// The guard that installs and restores this invocation's locale.
    #[must_use]
    pub const fn scope_guard(&self) -> &LocaleScopeGuard {
        &self.guard
    }

    /// The supplier resolving this invocation's parameters.
    #[must_use]
    pub const fn parameter_supplier(&self) -> &ParameterSupplier {
        &self.supplier
    }
}

/// Lazy, single-pass sequence of [`Invocation`]s in tag order.
///
/// Identities are allocated as invocations are pulled, so an unconsumed tail
/// never touches the registry.
#[derive(Debug)]
pub struct Invocations {
    tags: vec::IntoIter<String>,
    next_ordinal: usize,
    registry: Arc<LocaleRegistry>,
}

impl Invocations {
    /// Create the sequence for `tags`.
    #[must_use]
    pub fn new(tags: ResolvedTagList, registry: Arc<LocaleRegistry>) -> Self {
        Self {
            tags: tags.into_iter(),
            next_ordinal: 1,
            registry,
        }
    }
}

impl Iterator for Invocations {
    type Item = Invocation;

    fn next(&mut self) -> Option<Self::Item> {
        let tag = self.tags.next()?;
        let invocation = Invocation::new(self.next_ordinal, tag, &self.registry);
        self.next_ordinal += 1;
        Some(invocation)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.tags.size_hint()
    }
}

impl ExactSizeIterator for Invocations {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declaration::LocaleDeclaration;
    use crate::resolver::resolve_tags;
    use crate::store::InMemoryLocaleStore;
    use locale_matrix_common::Locale;
    use rstest::{fixture, rstest};

    #[fixture]
    fn registry() -> Arc<LocaleRegistry> {
        let initial = Locale::parse("en-US").expect("test tags are valid");
        Arc::new(LocaleRegistry::new(Arc::new(InMemoryLocaleStore::new(initial))))
    }

    fn invocations(registry: &Arc<LocaleRegistry>, tags: &[&str]) -> Invocations {
        let declaration = LocaleDeclaration::new(tags.iter().copied());
        let resolved = resolve_tags(&declaration, registry.store()).expect("resolution succeeds");
        Invocations::new(resolved, Arc::clone(registry))
    }

    #[rstest]
    fn yields_one_invocation_per_tag_in_order(registry: Arc<LocaleRegistry>) {
        let produced: Vec<Invocation> =
            invocations(&registry, &["de-DE", "en-US", "fr-FR", "ja-JP"]).collect();

        let labels: Vec<String> = produced.iter().map(Invocation::label).collect();
        let ordinals: Vec<usize> = produced.iter().map(Invocation::ordinal).collect();

        assert_eq!(
            labels,
            ["locale=de-DE", "locale=en-US", "locale=fr-FR", "locale=ja-JP"]
        );
        assert_eq!(ordinals, [1, 2, 3, 4]);
    }

    #[rstest]
    fn invocations_own_distinct_collaborators(registry: Arc<LocaleRegistry>) {
        let produced: Vec<Invocation> = invocations(&registry, &["de-DE", "de-DE"]).collect();

        let [first, second] = produced.as_slice() else {
            panic!("expected two invocations");
        };
        assert_ne!(first.id(), second.id());
        assert_eq!(first.scope_guard().id(), first.id());
        assert_eq!(first.parameter_supplier(), second.parameter_supplier());
    }

    #[rstest]
    fn sequence_is_single_pass(registry: Arc<LocaleRegistry>) {
        let mut sequence = invocations(&registry, &["de-DE", "ja-JP"]);
        assert_eq!(sequence.len(), 2);

        let drained = sequence.by_ref().count();

        assert_eq!(drained, 2);
        assert!(sequence.next().is_none());
    }
}
