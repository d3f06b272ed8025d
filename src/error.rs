//! Error types surfaced by the locale extension.
//!
//! Each variant maps onto one failure point in an invocation's lifecycle so
//! hosts can tell a precondition failure (nothing ran) from a failure that
//! aborted a single invocation.

use locale_matrix_common::TagError;
use thiserror::Error;

use crate::guard::ScopeState;
use crate::invocation::InvocationId;

/// Errors raised while expanding, preparing, or tearing down invocations.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum LocaleError {
    /// Neither the test nor its enclosing scope declares locales.
    #[error("no locale declaration found on test `{test}` or its enclosing scope")]
    DeclarationMissing {
        /// Display name of the test that lacked a declaration.
        test: String,
    },

    /// The parameter supplier was asked for a type it cannot produce.
    #[error("cannot supply a parameter of type `{type_name}`; expected a text or locale type")]
    UnsupportedParameterType {
        /// Name of the requested type.
        type_name: &'static str,
    },

    /// An invocation's tag is not a usable language tag.
    #[error("invalid locale tag `{tag}`: {source}")]
    InvalidTag {
        /// Tag as declared, after trimming.
        tag: String,
        /// Parser failure.
        #[source]
        source: TagError,
    },

    /// A scope phase was invoked out of order, such as `before` twice.
    #[error("cannot run `{phase}` for {invocation} while its scope is {state}")]
    ScopeMisuse {
        /// Phase that was refused.
        phase: &'static str,
        /// Invocation whose scope was misused.
        invocation: InvocationId,
        /// State the scope was in when the phase was requested.
        state: ScopeState,
    },

    /// The invocation already holds the locale lock; the lock is not
    /// reentrant.
    #[error("{invocation} already holds the locale lock")]
    LockAlreadyHeld {
        /// Invocation that asked for the lock twice.
        invocation: InvocationId,
    },

    /// The locale store rejected a read or write.
    #[error("locale store failure: {reason}")]
    Store {
        /// Description supplied by the store.
        reason: String,
    },
}

impl LocaleError {
    /// Build an [`Self::InvalidTag`] for `tag`.
    pub(crate) fn invalid_tag(tag: &str, source: TagError) -> Self {
        Self::InvalidTag {
            tag: tag.to_owned(),
            source,
        }
    }

    /// Build a [`Self::Store`] from any displayable reason.
    pub fn store(reason: impl Into<String>) -> Self {
        Self::Store {
            reason: reason.into(),
        }
    }
}
