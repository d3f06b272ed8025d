//! Re-run a test body once per declared locale.
//!
//! A test (or its enclosing scope) carries a [`LocaleDeclaration`]. The
//! [`LocaleExtension`] resolves it into one [`Invocation`] per tag; around
//! each invocation a [`LocaleScopeGuard`] takes the registry's [`FairLock`],
//! installs the tag as the default locale, and restores the previous value
//! afterwards. Because every mutate/restore cycle runs under the same lock,
//! invocations running concurrently on different threads never observe one
//! another's locale.
//!
//! Hosts without their own runner can drive the lifecycle with
//! [`TemplateRunner`].

pub mod config;
pub mod declaration;
pub mod error;
pub mod extension;
pub mod guard;
pub mod harness;
pub mod invocation;
pub mod lock;
pub mod parameter;
pub mod registry;
pub mod resolver;
pub mod store;

pub use config::{CONFIG_FILE_NAME, ConfigError, ExtensionConfig, MissingDeclarationPolicy};
pub use declaration::{DeclarationSource, LocaleDeclaration, TestDescriptor, TestScope};
pub use error::LocaleError;
pub use extension::LocaleExtension;
pub use guard::{LocaleScopeGuard, ScopeState};
pub use harness::{InvocationFailure, InvocationReport, TemplateRunner};
pub use invocation::{Invocation, InvocationId, Invocations};
pub use lock::FairLock;
pub use parameter::{DeclaredType, ParameterSupplier};
pub use registry::LocaleRegistry;
pub use resolver::{ResolvedTagList, resolve_tags};
pub use store::{
    InMemoryLocaleStore, LocaleStore, ProcessLocaleStore, default_locale, seed_process_locale,
};
