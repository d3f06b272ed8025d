//! Locale declarations and the test descriptors that carry them.
//!
//! A declaration may sit on the test itself or on its enclosing
//! [`TestScope`]. The test-level declaration wins; the scope-level one applies
//! to every test in the scope that lacks its own.

/// Ordered list of raw locale tags, possibly empty.
///
/// An empty declaration means "run once with the current default locale".
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct LocaleDeclaration {
    tags: Vec<String>,
}

impl LocaleDeclaration {
    /// Declare `tags` in order.
    #[must_use]
    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tags: tags.into_iter().map(Into::into).collect(),
        }
    }

    /// A declaration with no tags.
    #[must_use]
    pub const fn empty() -> Self {
        Self { tags: Vec::new() }
    }

    /// The raw tags as declared.
    #[must_use]
    pub fn tags(&self) -> &[String] {
        self.tags.as_slice()
    }
}

/// Where a test's effective declaration came from.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DeclarationSource {
    /// Declared on the test itself.
    Method,
    /// Inherited from the enclosing scope.
    Scope,
}

/// The enclosing unit of a group of tests.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TestScope {
    name: String,
    declaration: Option<LocaleDeclaration>,
}

impl TestScope {
    /// A scope without a declaration.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            declaration: None,
        }
    }

    /// Attach a scope-level declaration.
    #[must_use]
    pub fn with_locales(mut self, declaration: LocaleDeclaration) -> Self {
        self.declaration = Some(declaration);
        self
    }

    /// Scope name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Describe a test `name` inside this scope.
    #[must_use]
    pub fn test(&self, name: impl Into<String>) -> TestDescriptor {
        TestDescriptor {
            name: name.into(),
            scope: Some(self.clone()),
            declaration: None,
        }
    }
}

/// What the host runner knows about one test.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TestDescriptor {
    name: String,
    scope: Option<TestScope>,
    declaration: Option<LocaleDeclaration>,
}

impl TestDescriptor {
    /// A free-standing test outside any scope.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            scope: None,
            declaration: None,
        }
    }

    /// Attach a test-level declaration.
    #[must_use]
    pub fn with_locales(mut self, declaration: LocaleDeclaration) -> Self {
        self.declaration = Some(declaration);
        self
    }

    /// Test name without the scope prefix.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// `scope::name`, or just the name for free-standing tests.
    #[must_use]
    pub fn display_name(&self) -> String {
        match &self.scope {
            Some(scope) => format!("{}::{}", scope.name(), self.name),
            None => self.name.clone(),
        }
    }

    /// The declaration that applies to this test, with its provenance.
    #[must_use]
    pub fn effective_declaration(&self) -> Option<(DeclarationSource, &LocaleDeclaration)> {
        if let Some(declaration) = &self.declaration {
            return Some((DeclarationSource::Method, declaration));
        }

        self.scope
            .as_ref()
            .and_then(|scope| scope.declaration.as_ref())
            .map(|declaration| (DeclarationSource::Scope, declaration))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn method_declaration_wins_over_scope() {
        let scope = TestScope::new("Formatting").with_locales(LocaleDeclaration::new(["de-DE"]));
        let test = scope
            .test("prints_dates")
            .with_locales(LocaleDeclaration::new(["ja-JP", "fr-FR"]));

        let (source, declaration) = test
            .effective_declaration()
            .expect("a declaration applies");

        assert_eq!(source, DeclarationSource::Method);
        assert_eq!(declaration.tags(), ["ja-JP", "fr-FR"]);
    }

    #[rstest]
    fn scope_declaration_applies_to_undeclared_siblings() {
        let scope = TestScope::new("Formatting").with_locales(LocaleDeclaration::new(["de-DE"]));
        let declared = scope
            .test("declared")
            .with_locales(LocaleDeclaration::new(["ja-JP"]));
        let sibling = scope.test("sibling");

        let (source, declaration) = sibling
            .effective_declaration()
            .expect("the scope declaration applies");

        assert_eq!(source, DeclarationSource::Scope);
        assert_eq!(declaration.tags(), ["de-DE"]);
        assert!(declared.effective_declaration().is_some());
    }

    #[rstest]
    #[case(TestDescriptor::new("bare"), "bare")]
    #[case(TestScope::new("Scope").test("inner"), "Scope::inner")]
    fn undeclared_tests_have_no_effective_declaration(
        #[case] test: TestDescriptor,
        #[case] display: &str,
    ) {
        assert!(test.effective_declaration().is_none());
        assert_eq!(test.display_name(), display);
    }

    #[rstest]
    fn empty_declarations_still_count() {
        let test = TestDescriptor::new("defaults").with_locales(LocaleDeclaration::empty());

        let (_, declaration) = test
            .effective_declaration()
            .expect("an empty declaration is still a declaration");

        assert!(declaration.tags().is_empty());
    }
}
