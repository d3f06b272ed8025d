//! In-process template runner.
//!
//! [`TemplateRunner`] plays the host runner's part for one test: it expands
//! the test, then drives before → parameter resolution → body → after for
//! every invocation on the calling thread and reports each invocation
//! separately. A failing invocation never stops the ones after it.
//!
//! ```
//! use std::sync::Arc;
//!
//! use locale_matrix::{
//!     ExtensionConfig, InMemoryLocaleStore, LocaleDeclaration, LocaleExtension, LocaleRegistry,
//!     LocaleStore, TemplateRunner, TestDescriptor,
//! };
//! use locale_matrix_common::Locale;
//!
//! let store = InMemoryLocaleStore::new(Locale::parse("en-US").expect("valid tag"));
//! let registry = Arc::new(LocaleRegistry::new(Arc::new(store.clone())));
//! let extension = LocaleExtension::new(registry, &ExtensionConfig::default());
//! let test = TestDescriptor::new("greets")
//!     .with_locales(LocaleDeclaration::new(["de-DE", "ja-JP"]));
//!
//! let reports = TemplateRunner::new(&extension)
//!     .run(&test, |tag: String| {
//!         let current = store.current().map_err(|error| error.to_string())?;
//!         if current.tag() == tag { Ok(()) } else { Err(format!("saw {current}")) }
//!     })
//!     .expect("the test declares locales");
//!
//! assert_eq!(reports.len(), 2);
//! assert!(reports.iter().all(|report| report.passed()));
//! ```

use std::any::Any;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};

use log::debug;
use thiserror::Error;

use crate::declaration::TestDescriptor;
use crate::error::LocaleError;
use crate::extension::LocaleExtension;
use crate::invocation::Invocation;
use crate::parameter::DeclaredType;

/// Why one invocation failed.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum InvocationFailure {
    /// The before-phase failed; the body did not run.
    #[error("locale setup failed: {0}")]
    Setup(#[source] LocaleError),
    /// The body's parameter could not be supplied; the body did not run.
    #[error("parameter resolution failed: {0}")]
    Parameter(#[source] LocaleError),
    /// The body returned an error or panicked.
    #[error("test body failed: {message}")]
    Body {
        /// Error or panic message.
        message: String,
    },
    /// The after-phase could not restore the previous locale.
    #[error("locale restore failed: {0}")]
    Teardown(#[source] LocaleError),
}

/// Outcome of one invocation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InvocationReport {
    label: String,
    failure: Option<InvocationFailure>,
    suppressed: Vec<InvocationFailure>,
}

impl InvocationReport {
    /// Display label, `locale=<tag>`.
    #[must_use]
    pub fn label(&self) -> &str {
        self.label.as_str()
    }

    /// Whether the invocation completed without any failure.
    #[must_use]
    pub const fn passed(&self) -> bool {
        self.failure.is_none()
    }

    /// The primary failure, if any.
    #[must_use]
    pub const fn failure(&self) -> Option<&InvocationFailure> {
        self.failure.as_ref()
    }

    /// Secondary failures raised while handling the primary one.
    #[must_use]
    pub fn suppressed(&self) -> &[InvocationFailure] {
        self.suppressed.as_slice()
    }
}

impl fmt::Display for InvocationReport {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.failure {
            None => write!(formatter, "{}: passed", self.label),
            Some(failure) => write!(formatter, "{}: {failure}", self.label),
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    match payload.downcast::<String>() {
        Ok(message) => *message,
        Err(non_string) => non_string.downcast::<&'static str>().map_or_else(
            |_| "test body panicked with a non-string payload".to_owned(),
            |message| (*message).to_owned(),
        ),
    }
}

/// A panic escaping `before` or `after` comes from the locale store.
fn lifecycle_panic(payload: Box<dyn Any + Send>) -> LocaleError {
    LocaleError::store(format!("locale store panicked: {}", panic_message(payload)))
}

/// Drives a test's invocations through the extension's lifecycle.
#[derive(Clone, Copy, Debug)]
pub struct TemplateRunner<'a> {
    extension: &'a LocaleExtension,
}

impl<'a> TemplateRunner<'a> {
    /// Runner dispatching to `extension`.
    #[must_use]
    pub const fn new(extension: &'a LocaleExtension) -> Self {
        Self { extension }
    }

    /// Run `body` once per invocation of `test`, supplying a parameter of
    /// type `P`.
    ///
    /// Returns the per-invocation reports in order. Returns an empty list
    /// when the extension declines the test (the host runs it unmodified),
    /// and [`LocaleError::DeclarationMissing`] when the extension requires a
    /// declaration that is absent.
    pub fn run<P, E, F>(
        &self,
        test: &TestDescriptor,
        body: F,
    ) -> Result<Vec<InvocationReport>, LocaleError>
    where
        P: 'static,
        E: fmt::Display,
        F: Fn(P) -> Result<(), E>,
    {
        if !self.extension.supports(test) {
            debug!(
                target: "locale_matrix::harness",
                "declining `{}`; the host runs it unmodified",
                test.display_name(),
            );
            return Ok(Vec::new());
        }

        let reports = self
            .extension
            .expand(test)?
            .map(|invocation| self.run_invocation::<P, E, F>(&invocation, &body))
            .collect();

        Ok(reports)
    }

    fn run_invocation<P, E, F>(&self, invocation: &Invocation, body: &F) -> InvocationReport
    where
        P: 'static,
        E: fmt::Display,
        F: Fn(P) -> Result<(), E>,
    {
        let label = invocation.label();

        let setup = catch_unwind(AssertUnwindSafe(|| self.extension.before(invocation)))
            .unwrap_or_else(|payload| Err(lifecycle_panic(payload)));
        if let Err(error) = setup {
            return InvocationReport {
                label,
                failure: Some(InvocationFailure::Setup(error)),
                suppressed: Vec::new(),
            };
        }

        let outcome = self.call_body::<P, E, F>(invocation, body);
        let teardown = catch_unwind(AssertUnwindSafe(|| self.extension.after(invocation)))
            .unwrap_or_else(|payload| Err(lifecycle_panic(payload)))
            .map_err(InvocationFailure::Teardown);

        let (failure, suppressed) = match (outcome, teardown) {
            (Ok(()), Ok(())) => (None, Vec::new()),
            (Ok(()), Err(restore)) => (Some(restore), Vec::new()),
            (Err(primary), Ok(())) => (Some(primary), Vec::new()),
            (Err(primary), Err(restore)) => (Some(primary), vec![restore]),
        };

        debug!(
            target: "locale_matrix::harness",
            "{label} finished ({})",
            if failure.is_none() { "passed" } else { "failed" },
        );

        InvocationReport {
            label,
            failure,
            suppressed,
        }
    }

    fn call_body<P, E, F>(
        &self,
        invocation: &Invocation,
        body: &F,
    ) -> Result<(), InvocationFailure>
    where
        P: 'static,
        E: fmt::Display,
        F: Fn(P) -> Result<(), E>,
    {
        let parameter = self
            .extension
            .resolve_parameter(invocation, DeclaredType::of::<P>())
            .and_then(|boxed| {
                boxed
                    .downcast::<P>()
                    .map(|value| *value)
                    .map_err(|_| LocaleError::UnsupportedParameterType {
                        type_name: DeclaredType::of::<P>().name(),
                    })
            })
            .map_err(InvocationFailure::Parameter)?;

        match catch_unwind(AssertUnwindSafe(|| body(parameter))) {
            Ok(Ok(())) => Ok(()),
            Ok(Err(error)) => Err(InvocationFailure::Body {
                message: error.to_string(),
            }),
            Err(payload) => Err(InvocationFailure::Body {
                message: panic_message(payload),
            }),
        }
    }
}
