use std::convert::Infallible;
use std::str::FromStr;

fn unquote(input: &str) -> &str {
    input
        .trim()
        .trim_matches(|candidate| matches!(candidate, '"' | '\''))
}

/// Wrapper for a single quoted value supplied via behaviour-driven test steps.
///
/// Whitespace inside the quotes is preserved.
#[derive(Clone, Debug)]
pub struct StepLocale {
    raw: String,
}

impl FromStr for StepLocale {
    type Err = Infallible;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        Ok(Self {
            raw: unquote(input).to_owned(),
        })
    }
}

impl StepLocale {
    /// Consumes the step value, yielding the parsed string.
    pub fn into_inner(self) -> String {
        self.raw
    }
}

/// Comma-separated list of quoted values, kept untrimmed per entry.
#[derive(Clone, Debug)]
pub struct StepTags {
    entries: Vec<String>,
}

impl FromStr for StepTags {
    type Err = Infallible;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let entries = unquote(input).split(',').map(str::to_owned).collect();

        Ok(Self { entries })
    }
}

impl StepTags {
    /// Consumes the step value, yielding the raw entries.
    pub fn into_inner(self) -> Vec<String> {
        self.entries
    }

    /// Entries with surrounding whitespace removed.
    pub fn trimmed(self) -> Vec<String> {
        self.entries
            .into_iter()
            .map(|entry| entry.trim().to_owned())
            .collect()
    }
}
