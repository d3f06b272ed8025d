//! Shared test support utilities for behaviour-driven suites.
//!
//! Exposes the `locale` helpers (`StepLocale`, `StepTags`) that parse quoted
//! step parameters so scenarios can feed raw, untrimmed values into the
//! declaration and configuration flow.
pub mod locale;
