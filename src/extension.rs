//! Registration surface the host test runner drives.
//!
//! The runner asks [`LocaleExtension::supports`] whether to hand a test over,
//! calls [`LocaleExtension::expand`] for the invocations, and then, for each
//! invocation in turn: [`LocaleExtension::before`], parameter resolution via
//! [`LocaleExtension::resolve_parameter`], the body, and
//! [`LocaleExtension::after`]. `after` must run whenever `before` succeeded,
//! regardless of how the body ended.

use std::any::Any;
use std::sync::Arc;

use log::debug;

use crate::config::{ExtensionConfig, MissingDeclarationPolicy};
use crate::declaration::TestDescriptor;
use crate::error::LocaleError;
use crate::invocation::{Invocation, Invocations};
use crate::parameter::DeclaredType;
use crate::registry::LocaleRegistry;
use crate::resolver::resolve_tags;
use crate::store::seed_process_locale;

/// Re-runs a test once per declared locale.
#[derive(Clone, Debug)]
pub struct LocaleExtension {
    registry: Arc<LocaleRegistry>,
    policy: MissingDeclarationPolicy,
}

impl LocaleExtension {
    /// Create an extension over `registry` using `config`.
    #[must_use]
    pub fn new(registry: Arc<LocaleRegistry>, config: &ExtensionConfig) -> Self {
        Self {
            registry,
            policy: config.missing_declaration,
        }
    }

    /// Extension guarding the process default locale with default settings.
    #[must_use]
    pub fn process() -> Self {
        Self::process_with(&ExtensionConfig::default())
    }

    /// Extension guarding the process default locale.
    ///
    /// The configured `default_locale` seeds the process default when nothing
    /// has read it yet; later calls leave the current value alone.
    #[must_use]
    pub fn process_with(config: &ExtensionConfig) -> Self {
        if seed_process_locale(config.default_locale()).is_none() {
            debug!(
                target: "locale_matrix::extension",
                "process default locale already initialised; configuration seed ignored",
            );
        }

        Self::new(LocaleRegistry::process(), config)
    }

    /// The registry shared by this extension's invocations.
    #[must_use]
    pub const fn registry(&self) -> &Arc<LocaleRegistry> {
        &self.registry
    }

    /// Whether the runner should hand `test` to this extension.
    ///
    /// Tests with a declaration are always supported. Undeclared tests are
    /// supported only under [`MissingDeclarationPolicy::Fail`], so that
    /// [`Self::expand`] can report the missing declaration.
    #[must_use]
    pub fn supports(&self, test: &TestDescriptor) -> bool {
        test.effective_declaration().is_some() || self.policy == MissingDeclarationPolicy::Fail
    }

    /// Produce the invocations for `test`.
    ///
    /// Fails with [`LocaleError::DeclarationMissing`] before producing
    /// anything when neither the test nor its scope declares locales.
    pub fn expand(&self, test: &TestDescriptor) -> Result<Invocations, LocaleError> {
        let Some((source, declaration)) = test.effective_declaration() else {
            return Err(LocaleError::DeclarationMissing {
                test: test.display_name(),
            });
        };

        let tags = resolve_tags(declaration, self.registry.store())?;
        debug!(
            target: "locale_matrix::extension",
            "expanding `{}` from its {source:?} declaration into {} invocation(s)",
            test.display_name(),
            tags.tags().len(),
        );

        Ok(Invocations::new(tags, Arc::clone(&self.registry)))
    }

    /// Before-phase: lock and install the invocation's locale.
    pub fn before(&self, invocation: &Invocation) -> Result<(), LocaleError> {
        invocation.scope_guard().before()
    }

    /// Whether a parameter of `declared` type can be resolved.
    #[must_use]
    pub fn supports_parameter(&self, invocation: &Invocation, declared: DeclaredType) -> bool {
        invocation.parameter_supplier().supports(declared)
    }

    /// Resolve a parameter of `declared` type for `invocation`.
    pub fn resolve_parameter(
        &self,
        invocation: &Invocation,
        declared: DeclaredType,
    ) -> Result<Box<dyn Any + Send>, LocaleError> {
        invocation.parameter_supplier().supply(declared)
    }

    /// After-phase: restore the previous locale and unlock.
    pub fn after(&self, invocation: &Invocation) -> Result<(), LocaleError> {
        invocation.scope_guard().after()
    }
}
