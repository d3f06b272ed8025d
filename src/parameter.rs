//! Supplies an invocation's locale to test parameters.
//!
//! A parameter declared as a text type receives the raw tag; one declared as a
//! locale type receives the parsed locale. Everything else is rejected.

use std::any::{Any, TypeId, type_name};
use std::borrow::Cow;
use std::sync::Arc;

use locale_matrix_common::Locale;
use unic_langid::LanguageIdentifier;

use crate::error::LocaleError;

/// Runtime description of a declared parameter type.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct DeclaredType {
    id: TypeId,
    name: &'static str,
}

impl DeclaredType {
    /// Describe `T`.
    #[must_use]
    pub fn of<T: 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    /// Fully qualified type name, as reported in errors.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Supplied {
    Text,
    Locale,
}

fn classify(declared: DeclaredType) -> Option<Supplied> {
    let text = [
        TypeId::of::<String>(),
        TypeId::of::<Box<str>>(),
        TypeId::of::<Arc<str>>(),
        TypeId::of::<Cow<'static, str>>(),
    ];
    let locale = [TypeId::of::<Locale>(), TypeId::of::<LanguageIdentifier>()];

    if text.contains(&declared.id) {
        Some(Supplied::Text)
    } else if locale.contains(&declared.id) {
        Some(Supplied::Locale)
    } else {
        None
    }
}

/// Parameter resolver bound to one invocation's tag.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParameterSupplier {
    tag: String,
}

impl ParameterSupplier {
    /// Create a supplier for `tag`.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self { tag: tag.into() }
    }

    /// Whether `declared` is a text or locale type this supplier can fill.
    #[must_use]
    pub fn supports(&self, declared: DeclaredType) -> bool {
        classify(declared).is_some()
    }

    /// Produce a value for `declared`, boxed as [`Any`].
    pub fn supply(&self, declared: DeclaredType) -> Result<Box<dyn Any + Send>, LocaleError> {
        match classify(declared) {
            Some(Supplied::Text) => Ok(self.text_as(declared)),
            Some(Supplied::Locale) => self.locale_as(declared),
            None => Err(LocaleError::UnsupportedParameterType {
                type_name: declared.name(),
            }),
        }
    }

    /// Produce a value of type `T`.
    ///
    /// ```
    /// use locale_matrix::ParameterSupplier;
    /// use locale_matrix_common::Locale;
    ///
    /// let supplier = ParameterSupplier::new("de-DE");
    /// let tag: String = supplier.supply_as().expect("text is supported");
    /// let locale: Locale = supplier.supply_as().expect("locales are supported");
    /// assert_eq!(tag, "de-DE");
    /// assert_eq!(locale.language(), "de");
    /// assert!(supplier.supply_as::<u32>().is_err());
    /// ```
    pub fn supply_as<T: 'static>(&self) -> Result<T, LocaleError> {
        let declared = DeclaredType::of::<T>();
        self.supply(declared)?
            .downcast::<T>()
            .map(|boxed| *boxed)
            .map_err(|_| LocaleError::UnsupportedParameterType {
                type_name: declared.name(),
            })
    }

    fn text_as(&self, declared: DeclaredType) -> Box<dyn Any + Send> {
        let tag = self.tag.as_str();
        if declared.id == TypeId::of::<Box<str>>() {
            return Box::new(Box::<str>::from(tag));
        }
        if declared.id == TypeId::of::<Arc<str>>() {
            return Box::new(Arc::<str>::from(tag));
        }
        if declared.id == TypeId::of::<Cow<'static, str>>() {
            return Box::new(Cow::<'static, str>::Owned(tag.to_owned()));
        }
        Box::new(tag.to_owned())
    }

    fn locale_as(&self, declared: DeclaredType) -> Result<Box<dyn Any + Send>, LocaleError> {
        let locale =
            Locale::parse(&self.tag).map_err(|error| LocaleError::invalid_tag(&self.tag, error))?;

        if declared.id == TypeId::of::<LanguageIdentifier>() {
            return Ok(Box::new(locale.into_identifier()));
        }
        Ok(Box::new(locale))
    }
}
